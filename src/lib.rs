// Politigraph Votes - Core Library
// Fetch, flatten, tally and serialize House voting records

pub mod config;
pub mod graphql;
pub mod flatten;
pub mod tally;
pub mod summary;
pub mod reconciliation;
pub mod output;
pub mod pipeline;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use graphql::{
    FetchError, GraphqlClient, Membership, Organization, Person, Vote, VoteEvent,
    load_people_from_file, parse_response, PEOPLE_QUERY,
};
pub use flatten::{derive_province, flatten_people, FlatRecord};
pub use tally::VoteTally;
pub use summary::{
    build_detail, build_province_summary, build_summary, colliding_options, person_lookup,
    summary_columns, DetailRow, PersonInfo, ProvinceSummary, SummaryRow,
};
pub use reconciliation::{
    reconcile, Discrepancy, DiscrepancyCategory, ReconciliationReport, ReconciliationResult,
};
pub use output::{write_json, write_summary_csv};
pub use pipeline::{run, transform, write_outputs, Outputs, PipelineReport, Source};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
