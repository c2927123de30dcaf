// 🌐 GraphQL Fetch - Politigraph people/votes query
// One blocking POST, typed response model, offline replay of saved responses

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// People with their memberships and votes, organizations filtered by `$where`
pub const PEOPLE_QUERY: &str = r#"
query ($where: OrganizationWhere){
  people {
    name
    image
    memberships {
      province
    }
    votes {
      option
      vote_events {
        title
        result
        organizations (where: $where){
          name
          term
        }
      }
    }
  }
}
"#;

// ============================================================================
// ERRORS
// ============================================================================

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failed, body could not be read
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// `errors` array returned without any people
    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response has no data.people")]
    MissingData,

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// RESPONSE MODEL
// ============================================================================

/// GraphQL lists may come back as `null`; treat that as empty
fn nullable_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default, deserialize_with = "nullable_list")]
    pub memberships: Vec<Membership>,

    #[serde(default, deserialize_with = "nullable_list")]
    pub votes: Vec<Vote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    #[serde(default)]
    pub province: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Null options never reach the tally
    #[serde(default)]
    pub option: Option<String>,

    #[serde(default, deserialize_with = "nullable_list")]
    pub vote_events: Vec<VoteEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteEvent {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub result: Option<String>,

    #[serde(default, deserialize_with = "nullable_list")]
    pub organizations: Vec<Organization>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub term: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<PeopleData>,
    errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct PeopleData {
    people: Option<Vec<Person>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: &'a serde_json::Value,
}

/// Decode a `{data: {people: [...]}}` envelope
///
/// An `errors` array is fatal only when no people came back with it.
pub fn parse_response(body: &str) -> Result<Vec<Person>> {
    let response: GraphqlResponse = serde_json::from_str(body)?;

    let messages: Vec<String> = response
        .errors
        .unwrap_or_default()
        .into_iter()
        .map(|e| e.message)
        .collect();

    match response.data.and_then(|d| d.people) {
        Some(people) => {
            if !messages.is_empty() {
                tracing::warn!(errors = %messages.join("; "), "GraphQL returned partial data");
            }
            Ok(people)
        }
        None if !messages.is_empty() => Err(FetchError::Graphql(messages.join("; "))),
        None => Err(FetchError::MissingData),
    }
}

/// Replay a previously saved GraphQL response
pub fn load_people_from_file(path: &Path) -> Result<Vec<Person>> {
    let body = fs::read_to_string(path).map_err(|source| FetchError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let people = parse_response(&body)?;
    tracing::info!(path = %path.display(), count = people.len(), "Loaded people from saved response");
    Ok(people)
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct GraphqlClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the people query once; no retry
    pub fn fetch_people(&self, variables: &serde_json::Value) -> Result<Vec<Person>> {
        let request = GraphqlRequest {
            query: PEOPLE_QUERY,
            variables,
        };

        tracing::info!(endpoint = %self.endpoint, "Posting people query");
        let resp = self.client.post(&self.endpoint).json(&request).send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text()?;
        tracing::debug!(bytes = body.len(), "Received GraphQL response");

        let people = parse_response(&body)?;
        tracing::info!(count = people.len(), "Fetched people");
        Ok(people)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_person() {
        let body = r#"{
            "data": {
                "people": [{
                    "name": "A",
                    "image": "https://example.org/a.jpg",
                    "memberships": [{"province": "กรุงเทพมหานคร"}, {"province": null}],
                    "votes": [{
                        "option": "เห็นด้วย",
                        "vote_events": [{
                            "title": "ร่าง พ.ร.บ. งบประมาณ",
                            "result": "PASSED",
                            "organizations": [{"name": "สภาผู้แทนราษฎร ชุดที่ 26", "term": 26}]
                        }]
                    }]
                }]
            }
        }"#;

        let people = parse_response(body).unwrap();

        assert_eq!(people.len(), 1);
        let person = &people[0];
        assert_eq!(person.name, "A");
        assert_eq!(person.memberships.len(), 2);
        assert_eq!(person.memberships[1].province, None);
        assert_eq!(person.votes[0].vote_events[0].organizations[0].term, Some(26));
        assert_eq!(person.votes[0].vote_events[0].result.as_deref(), Some("PASSED"));
    }

    #[test]
    fn test_null_and_missing_lists_are_empty() {
        let body = r#"{"data": {"people": [
            {"name": "A", "image": null, "memberships": null, "votes": null},
            {"name": "B"}
        ]}}"#;

        let people = parse_response(body).unwrap();

        assert_eq!(people.len(), 2);
        assert!(people[0].memberships.is_empty());
        assert!(people[0].votes.is_empty());
        assert!(people[1].image.is_none());
        assert!(people[1].votes.is_empty());
    }

    #[test]
    fn test_null_option_title_and_name_parse() {
        let body = r#"{"data": {"people": [{
            "name": "A",
            "votes": [
                {"option": null, "vote_events": []},
                {"option": "เห็นด้วย", "vote_events": [
                    {"title": null, "result": null, "organizations": [{"name": null, "term": 26}]}
                ]}
            ]
        }]}}"#;

        let people = parse_response(body).unwrap();
        let votes = &people[0].votes;

        assert_eq!(votes[0].option, None);
        assert_eq!(votes[1].option.as_deref(), Some("เห็นด้วย"));
        assert_eq!(votes[1].vote_events[0].title, None);
        assert_eq!(votes[1].vote_events[0].organizations[0].name, None);
    }

    #[test]
    fn test_errors_without_data_fail() {
        let body = r#"{"data": null, "errors": [{"message": "boom"}, {"message": "bang"}]}"#;

        match parse_response(body) {
            Err(FetchError::Graphql(msg)) => assert_eq!(msg, "boom; bang"),
            other => panic!("expected GraphQL error, got {:?}", other),
        }
    }

    #[test]
    fn test_errors_with_data_keep_people() {
        let body = r#"{"data": {"people": [{"name": "A"}]}, "errors": [{"message": "partial"}]}"#;

        let people = parse_response(body).unwrap();
        assert_eq!(people.len(), 1);
    }

    #[test]
    fn test_missing_people_key() {
        assert!(matches!(parse_response(r#"{"data": {}}"#), Err(FetchError::MissingData)));
        assert!(matches!(parse_response(r#"{}"#), Err(FetchError::MissingData)));
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(parse_response("<html>"), Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let variables = serde_json::json!({"where": {"classification_EQ": "HOUSE_OF_REPRESENTATIVE"}});
        let request = GraphqlRequest {
            query: PEOPLE_QUERY,
            variables: &variables,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value["query"].as_str().unwrap().contains("vote_events"));
        assert_eq!(value["variables"], variables);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_people_from_file(Path::new("/nonexistent/response.json"));
        assert!(matches!(result, Err(FetchError::Io { .. })));
    }
}
