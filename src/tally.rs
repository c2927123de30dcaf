// 📊 Vote Tally - person × option contingency table
//
// Rows and columns keep first-seen order. Cells that never occur read as 0.

use crate::flatten::FlatRecord;
use indexmap::{IndexMap, IndexSet};

#[derive(Debug, Clone, PartialEq)]
pub struct VoteTally {
    options: IndexSet<String>,
    rows: IndexMap<String, IndexMap<String, u64>>,
    absence_option: String,
}

impl VoteTally {
    /// Cross-tabulate records by (person, option)
    pub fn from_records(records: &[FlatRecord], absence_option: &str) -> Self {
        let mut options = IndexSet::new();
        let mut rows: IndexMap<String, IndexMap<String, u64>> = IndexMap::new();

        for record in records {
            options.insert(record.option.clone());
            *rows
                .entry(record.person.clone())
                .or_default()
                .entry(record.option.clone())
                .or_insert(0) += 1;
        }

        VoteTally {
            options,
            rows,
            absence_option: absence_option.to_string(),
        }
    }

    /// Distinct options, first-seen order
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(String::as_str)
    }

    /// Distinct persons, first-seen order
    pub fn persons(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn person_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count(&self, person: &str, option: &str) -> u64 {
        self.rows
            .get(person)
            .and_then(|row| row.get(option))
            .copied()
            .unwrap_or(0)
    }

    /// Full row over every option column (zeros filled in), or None for unknown persons
    pub fn row(&self, person: &str) -> Option<Vec<(&str, u64)>> {
        let cells = self.rows.get(person)?;
        Some(
            self.options
                .iter()
                .map(|o| (o.as_str(), cells.get(o).copied().unwrap_or(0)))
                .collect(),
        )
    }

    pub fn row_sum(&self, person: &str) -> u64 {
        self.rows
            .get(person)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }

    /// Whether any record carried the absence option
    pub fn has_absence_column(&self) -> bool {
        self.options.contains(&self.absence_option)
    }

    pub fn absence_option(&self) -> &str {
        &self.absence_option
    }

    pub fn absence_count(&self, person: &str) -> u64 {
        self.count(person, &self.absence_option)
    }

    /// Row sum over every option except the absence column
    pub fn total_votes_cast(&self, person: &str) -> u64 {
        self.rows
            .get(person)
            .map(|row| {
                row.iter()
                    .filter(|(option, _)| **option != self.absence_option)
                    .map(|(_, n)| *n)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Sum of every cell; equals the number of tallied records
    pub fn grand_total(&self) -> u64 {
        self.rows.values().flat_map(|row| row.values()).sum()
    }
}
