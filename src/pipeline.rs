// 🚰 Pipeline - fetch → flatten → tally/join → reconcile → serialize
//
// Each stage's failure carries the stage name in its error context.

use crate::config::PipelineConfig;
use crate::flatten::{flatten_people, FlatRecord};
use crate::graphql::{load_people_from_file, GraphqlClient, Person};
use crate::output::{write_json, write_summary_csv};
use crate::reconciliation::{reconcile, ReconciliationReport};
use crate::summary::{
    build_detail, build_province_summary, build_summary, colliding_options, person_lookup,
    summary_columns, DetailRow, ProvinceSummary, SummaryRow,
};
use crate::tally::VoteTally;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// Where the people graph comes from
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// POST the query to the configured endpoint
    Remote,
    /// Replay a saved GraphQL response
    File(PathBuf),
}

/// Everything derived from one people graph, before any file is written
#[derive(Debug, Clone)]
pub struct Outputs {
    pub records: Vec<FlatRecord>,
    pub tally: VoteTally,
    pub columns: Vec<String>,
    pub summary: Vec<SummaryRow>,
    pub detail: Vec<DetailRow>,
    pub provinces: Vec<ProvinceSummary>,
    pub reconciliation: ReconciliationReport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub people: usize,
    pub records: usize,
    pub persons: usize,
    pub options: usize,
    pub files: Vec<PathBuf>,
}

impl PipelineReport {
    pub fn summary(&self) -> String {
        format!(
            "{} people fetched, {} vote records, {} persons × {} options, {} files written",
            self.people,
            self.records,
            self.persons,
            self.options,
            self.files.len()
        )
    }
}

/// Pure part of the run: no network, no filesystem
pub fn transform(people: &[Person], config: &PipelineConfig) -> Outputs {
    let records = flatten_people(people, config);

    let tally = VoteTally::from_records(&records, &config.absence_option);
    let lookup = person_lookup(&records);
    let columns = summary_columns(&tally, config);
    let summary = build_summary(&tally, &lookup, config);
    let detail = build_detail(&records);
    let provinces = build_province_summary(&summary, config);
    let reconciliation = reconcile(&records, &tally, config);

    Outputs {
        records,
        tally,
        columns,
        summary,
        detail,
        provinces,
        reconciliation,
    }
}

fn fetch(config: &PipelineConfig, source: &Source) -> Result<Vec<Person>> {
    match source {
        Source::Remote => {
            let client = GraphqlClient::new(config.endpoint.clone());
            let people = client.fetch_people(&config.query_variables())?;
            Ok(people)
        }
        Source::File(path) => Ok(load_people_from_file(path)?),
    }
}

/// Write every configured artifact; returns the paths written
pub fn write_outputs(outputs: &Outputs, config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    write_json(&config.summary_path, &outputs.summary)?;
    files.push(config.summary_path.clone());

    write_json(&config.detail_path, &outputs.detail)?;
    files.push(config.detail_path.clone());

    if let Some(path) = &config.province_path {
        write_json(path, &outputs.provinces)?;
        files.push(path.clone());
    }

    if let Some(path) = &config.summary_csv_path {
        write_summary_csv(path, &outputs.summary, &outputs.columns)?;
        files.push(path.clone());
    }

    Ok(files)
}

/// Run the whole batch once
pub fn run(config: &PipelineConfig, source: &Source) -> Result<PipelineReport> {
    let people = fetch(config, source).context("fetch stage failed")?;
    tracing::info!(people = people.len(), "Fetch complete");

    let outputs = transform(&people, config);
    tracing::info!(
        records = outputs.records.len(),
        persons = outputs.tally.person_count(),
        options = outputs.tally.option_count(),
        "Flatten and tally complete"
    );

    if outputs.records.is_empty() {
        bail!(
            "flatten stage failed: no vote records for term {} in {} people",
            config.term,
            people.len()
        );
    }

    if !outputs.tally.has_absence_column() {
        tracing::warn!(
            absence_option = %config.absence_option,
            "No absence votes found; totals cover every option"
        );
    }

    for option in colliding_options(&outputs.tally, config) {
        tracing::warn!(
            option = %option,
            "Option shares a name with a fixed column; its count appears only in the total"
        );
    }

    let report = &outputs.reconciliation;
    if !report.is_balanced() {
        for d in &report.discrepancies {
            tracing::error!(category = ?d.category, "{}", d.description);
        }
        bail!("reconcile stage failed: {}", report.summary());
    }
    tracing::info!("{}", report.summary());

    let files = write_outputs(&outputs, config).context("serialize stage failed")?;
    for file in &files {
        tracing::info!(path = %file.display(), "Wrote artifact");
    }

    Ok(PipelineReport {
        people: people.len(),
        records: outputs.records.len(),
        persons: outputs.tally.person_count(),
        options: outputs.tally.option_count(),
        files,
    })
}
