// 🧱 Flatten - people → votes → vote events → organizations into flat records
//
// One record per (person, vote, vote event, organization) where:
//   organization.term == config.term
//   vote.option is present and not in config.excluded_options
//
// Province is derived once per person: the last non-empty membership province.
// Null titles and organization names pass through as None.

use crate::config::PipelineConfig;
use crate::graphql::{Membership, Person};
use serde::{Deserialize, Serialize};

/// One person × vote option × vote event × qualifying organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub person: String,
    pub province: Option<String>,
    pub option: String,
    /// Vote event title
    pub law: Option<String>,
    pub result: Option<String>,
    pub organization: Option<String>,
    pub term: i64,
    pub image: Option<String>,
}

/// Last non-empty province across memberships, in input order
pub fn derive_province(memberships: &[Membership]) -> Option<String> {
    memberships
        .iter()
        .filter_map(|m| m.province.as_deref())
        .filter(|p| !p.is_empty())
        .last()
        .map(str::to_string)
}

/// Flatten people into records, preserving input order at every level
pub fn flatten_people(people: &[Person], config: &PipelineConfig) -> Vec<FlatRecord> {
    let mut records = Vec::new();
    let mut skipped_votes = 0usize;

    for person in people {
        let province = derive_province(&person.memberships);

        for vote in &person.votes {
            let Some(option) = vote.option.as_deref() else {
                skipped_votes += 1;
                continue;
            };
            if config.is_excluded(option) {
                skipped_votes += 1;
                continue;
            }

            for event in &vote.vote_events {
                for org in &event.organizations {
                    if org.term != Some(config.term) {
                        continue;
                    }

                    records.push(FlatRecord {
                        person: person.name.clone(),
                        province: province.clone(),
                        option: option.to_string(),
                        law: event.title.clone(),
                        result: event.result.clone(),
                        organization: org.name.clone(),
                        term: config.term,
                        image: person.image.clone(),
                    });
                }
            }
        }
    }

    tracing::debug!(
        people = people.len(),
        records = records.len(),
        skipped_votes,
        "Flattened people"
    );

    records
}
