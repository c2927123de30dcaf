// ⚖️ Reconciliation - the tally must partition the detail records
//
//   sum(all cells) = number of flat records
//   total votes cast + absence = row sum   (per person)
//
// Runs after tallying, before anything is written.

use crate::config::PipelineConfig;
use crate::flatten::FlatRecord;
use crate::tally::VoteTally;
use serde::{Deserialize, Serialize};

// ============================================================================
// DISCREPANCIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiscrepancyCategory {
    /// Record from a term other than the configured one
    TermMismatch,
    /// Record carrying an excluded option
    ExcludedOption,
    /// Tally cells don't add up to the record count
    CountMismatch,
    /// Person total + absence != row sum
    RowTotalMismatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub category: DiscrepancyCategory,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReconciliationResult {
    Balanced,
    Unbalanced { discrepancy_count: usize },
}

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub result: ReconciliationResult,
    pub record_count: usize,
    pub tallied_count: u64,
    pub person_count: usize,
    pub discrepancies: Vec<Discrepancy>,
}

impl ReconciliationReport {
    pub fn is_balanced(&self) -> bool {
        matches!(self.result, ReconciliationResult::Balanced)
    }

    pub fn summary(&self) -> String {
        format!(
            "Reconciliation: {} records, {} tallied across {} persons, {} discrepancies",
            self.record_count,
            self.tallied_count,
            self.person_count,
            self.discrepancies.len()
        )
    }
}

/// Check flat records and their tally against each other
pub fn reconcile(
    records: &[FlatRecord],
    tally: &VoteTally,
    config: &PipelineConfig,
) -> ReconciliationReport {
    let mut discrepancies = Vec::new();

    for (index, record) in records.iter().enumerate() {
        if record.term != config.term {
            discrepancies.push(Discrepancy {
                category: DiscrepancyCategory::TermMismatch,
                description: format!(
                    "Record {} ({}) has term {}, expected {}",
                    index, record.person, record.term, config.term
                ),
            });
        }
        if config.is_excluded(&record.option) {
            discrepancies.push(Discrepancy {
                category: DiscrepancyCategory::ExcludedOption,
                description: format!(
                    "Record {} ({}) carries excluded option {:?}",
                    index, record.person, record.option
                ),
            });
        }
    }

    let tallied_count = tally.grand_total();
    if tallied_count != records.len() as u64 {
        discrepancies.push(Discrepancy {
            category: DiscrepancyCategory::CountMismatch,
            description: format!(
                "Tally holds {} votes but there are {} records",
                tallied_count,
                records.len()
            ),
        });
    }

    for person in tally.persons() {
        let total = tally.total_votes_cast(person);
        let absence = tally.absence_count(person);
        let row_sum = tally.row_sum(person);
        if total + absence != row_sum {
            discrepancies.push(Discrepancy {
                category: DiscrepancyCategory::RowTotalMismatch,
                description: format!(
                    "{}: total {} + absence {} != row sum {}",
                    person, total, absence, row_sum
                ),
            });
        }
    }

    let result = if discrepancies.is_empty() {
        ReconciliationResult::Balanced
    } else {
        ReconciliationResult::Unbalanced {
            discrepancy_count: discrepancies.len(),
        }
    };

    ReconciliationReport {
        result,
        record_count: records.len(),
        tallied_count,
        person_count: tally.person_count(),
        discrepancies,
    }
}

// ============================================================================
// TESTS
// ============================================================================
