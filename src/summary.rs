// 🧾 Summary & Detail - joins the tally back onto person metadata
//
// Summary rows serialize as flat objects whose option columns are only known
// at runtime, so they carry their own `Serialize` impl instead of a derive.

use crate::config::PipelineConfig;
use crate::flatten::FlatRecord;
use crate::tally::VoteTally;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

pub const PERSON_COLUMN: &str = "person";
pub const PROVINCE_COLUMN: &str = "province";
pub const IMAGE_COLUMN: &str = "image";
pub const MEMBERS_COLUMN: &str = "members";

// ============================================================================
// PERSON LOOKUP
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonInfo {
    pub province: Option<String>,
    pub image: Option<String>,
}

/// Province and image from each person's first record
pub fn person_lookup(records: &[FlatRecord]) -> IndexMap<String, PersonInfo> {
    let mut lookup = IndexMap::new();
    for record in records {
        lookup
            .entry(record.person.clone())
            .or_insert_with(|| PersonInfo {
                province: record.province.clone(),
                image: record.image.clone(),
            });
    }
    lookup
}

// ============================================================================
// SUMMARY (data.json)
// ============================================================================

/// Option columns that would clash with a fixed column are dropped
fn is_fixed_column(name: &str, config: &PipelineConfig) -> bool {
    name == PERSON_COLUMN
        || name == PROVINCE_COLUMN
        || name == IMAGE_COLUMN
        || name == config.total_column
}

/// Options whose column is shadowed by a fixed column; their counts only
/// show up in the total
pub fn colliding_options(tally: &VoteTally, config: &PipelineConfig) -> Vec<String> {
    tally
        .options()
        .filter(|o| is_fixed_column(o, config))
        .map(str::to_string)
        .collect()
}

/// Column order of the summary table
pub fn summary_columns(tally: &VoteTally, config: &PipelineConfig) -> Vec<String> {
    let mut columns = vec![PERSON_COLUMN.to_string()];
    columns.extend(
        tally
            .options()
            .filter(|o| !is_fixed_column(o, config))
            .map(str::to_string),
    );
    columns.push(config.total_column.clone());
    columns.push(PROVINCE_COLUMN.to_string());
    columns.push(IMAGE_COLUMN.to_string());
    columns
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub person: String,
    /// One entry per option column, tally order
    pub counts: IndexMap<String, u64>,
    pub total_column: String,
    pub total: u64,
    pub province: Option<String>,
    pub image: Option<String>,
}

impl SummaryRow {
    /// Cell text for CSV export; nulls become empty cells
    pub fn cell(&self, column: &str) -> String {
        if column == PERSON_COLUMN {
            self.person.clone()
        } else if column == self.total_column {
            self.total.to_string()
        } else if column == PROVINCE_COLUMN {
            self.province.clone().unwrap_or_default()
        } else if column == IMAGE_COLUMN {
            self.image.clone().unwrap_or_default()
        } else {
            self.counts.get(column).map(u64::to_string).unwrap_or_default()
        }
    }
}

impl Serialize for SummaryRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len() + 4))?;
        map.serialize_entry(PERSON_COLUMN, &self.person)?;
        for (option, count) in &self.counts {
            map.serialize_entry(option, count)?;
        }
        map.serialize_entry(&self.total_column, &self.total)?;
        map.serialize_entry(PROVINCE_COLUMN, &self.province)?;
        map.serialize_entry(IMAGE_COLUMN, &self.image)?;
        map.end()
    }
}

/// Left-join the lookup onto the tally, one row per tallied person
pub fn build_summary(
    tally: &VoteTally,
    lookup: &IndexMap<String, PersonInfo>,
    config: &PipelineConfig,
) -> Vec<SummaryRow> {
    tally
        .persons()
        .map(|person| {
            let counts = tally
                .row(person)
                .unwrap_or_default()
                .into_iter()
                .filter(|(option, _)| !is_fixed_column(option, config))
                .map(|(option, n)| (option.to_string(), n))
                .collect();

            let info = lookup.get(person).cloned().unwrap_or_default();

            SummaryRow {
                person: person.to_string(),
                counts,
                total_column: config.total_column.clone(),
                total: tally.total_votes_cast(person),
                province: info.province,
                image: info.image,
            }
        })
        .collect()
}

// ============================================================================
// DETAIL (bill.json)
// ============================================================================

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetailRow {
    pub person: String,
    pub province: Option<String>,
    pub option: String,
    pub law: Option<String>,
    pub result: Option<String>,
}

impl From<&FlatRecord> for DetailRow {
    fn from(record: &FlatRecord) -> Self {
        DetailRow {
            person: record.person.clone(),
            province: record.province.clone(),
            option: record.option.clone(),
            law: record.law.clone(),
            result: record.result.clone(),
        }
    }
}

/// One row per record, no aggregation
pub fn build_detail(records: &[FlatRecord]) -> Vec<DetailRow> {
    records.iter().map(DetailRow::from).collect()
}

// ============================================================================
// PROVINCE ROLLUP
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceSummary {
    pub province: String,
    /// Persons rolled into this province
    pub members: usize,
    pub counts: IndexMap<String, u64>,
    pub total_column: String,
    pub total: u64,
}

impl Serialize for ProvinceSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len() + 3))?;
        map.serialize_entry(PROVINCE_COLUMN, &self.province)?;
        map.serialize_entry(MEMBERS_COLUMN, &self.members)?;
        for (option, count) in &self.counts {
            map.serialize_entry(option, count)?;
        }
        map.serialize_entry(&self.total_column, &self.total)?;
        map.end()
    }
}

/// Sum summary rows per province; rows without a province are left out
pub fn build_province_summary(rows: &[SummaryRow], config: &PipelineConfig) -> Vec<ProvinceSummary> {
    let mut provinces: IndexMap<String, ProvinceSummary> = IndexMap::new();

    for row in rows {
        let Some(province) = row.province.as_deref() else {
            continue;
        };

        let entry = provinces
            .entry(province.to_string())
            .or_insert_with(|| ProvinceSummary {
                province: province.to_string(),
                members: 0,
                counts: row.counts.keys().map(|k| (k.clone(), 0)).collect(),
                total_column: config.total_column.clone(),
                total: 0,
            });

        entry.members += 1;
        entry.total += row.total;
        for (option, count) in &row.counts {
            *entry.counts.entry(option.clone()).or_insert(0) += count;
        }
    }

    provinces.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABSENT: &str = "ลา / ขาดลงมติ";
    const TOTAL: &str = "รวมลงมติ";

    fn record(person: &str, province: Option<&str>, option: &str) -> FlatRecord {
        FlatRecord {
            person: person.to_string(),
            province: province.map(str::to_string),
            option: option.to_string(),
            law: Some("Bill X".to_string()),
            result: Some("Passed".to_string()),
            organization: Some("House".to_string()),
            term: 26,
            image: Some(format!("{}.jpg", person)),
        }
    }

    fn summarize(records: &[FlatRecord]) -> Vec<SummaryRow> {
        let config = PipelineConfig::default();
        let tally = VoteTally::from_records(records, &config.absence_option);
        build_summary(&tally, &person_lookup(records), &config)
    }

    #[test]
    fn test_lookup_takes_first_occurrence() {
        let records = vec![
            record("A", Some("Bangkok"), "Yes"),
            record("A", Some("Phuket"), "No"),
        ];

        let lookup = person_lookup(&records);
        assert_eq!(lookup["A"].province.as_deref(), Some("Bangkok"));
    }

    #[test]
    fn test_single_person_summary_json() {
        let rows = summarize(&[record("A", Some("Bangkok"), "Yes")]);

        let json = serde_json::to_string(&rows).unwrap();
        assert_eq!(
            json,
            format!(
                r#"[{{"person":"A","Yes":1,"{}":1,"province":"Bangkok","image":"A.jpg"}}]"#,
                TOTAL
            )
        );
    }

    #[test]
    fn test_summary_column_order_and_absence_kept() {
        let records = vec![
            record("A", None, "เห็นด้วย"),
            record("A", None, ABSENT),
            record("B", None, "ไม่เห็นด้วย"),
        ];
        let rows = summarize(&records);

        let value = serde_json::to_string(&rows[0]).unwrap();
        let expected = format!(
            r#"{{"person":"A","เห็นด้วย":1,"{}":1,"ไม่เห็นด้วย":0,"{}":1,"province":null,"image":"A.jpg"}}"#,
            ABSENT, TOTAL
        );
        assert_eq!(value, expected);
        assert_eq!(rows[1].total, 1);
    }

    #[test]
    fn test_summary_columns_list() {
        let config = PipelineConfig::default();
        let records = vec![record("A", None, "Yes"), record("A", None, "No")];
        let tally = VoteTally::from_records(&records, &config.absence_option);

        assert_eq!(
            summary_columns(&tally, &config),
            vec!["person", "Yes", "No", TOTAL, "province", "image"]
        );
    }

    #[test]
    fn test_fixed_columns_win_over_options() {
        let rows = summarize(&[record("A", None, "province"), record("A", None, "Yes")]);

        assert!(!rows[0].counts.contains_key("province"));
        assert_eq!(rows[0].cell("province"), "");
        assert_eq!(rows[0].total, 2);
    }

    #[test]
    fn test_colliding_options_reported() {
        let config = PipelineConfig::default();
        let records = vec![
            record("A", None, "Yes"),
            record("A", None, "image"),
            record("B", None, TOTAL),
        ];
        let tally = VoteTally::from_records(&records, &config.absence_option);

        assert_eq!(colliding_options(&tally, &config), vec!["image", TOTAL]);

        let clean = VoteTally::from_records(&records[..1], &config.absence_option);
        assert!(colliding_options(&clean, &config).is_empty());
    }

    #[test]
    fn test_unknown_person_gets_nulls() {
        let config = PipelineConfig::default();
        let records = vec![record("A", Some("Bangkok"), "Yes")];
        let tally = VoteTally::from_records(&records, &config.absence_option);

        let rows = build_summary(&tally, &IndexMap::new(), &config);
        assert_eq!(rows[0].province, None);
        assert_eq!(rows[0].image, None);
    }

    #[test]
    fn test_cells() {
        let rows = summarize(&[record("A", Some("Bangkok"), "Yes")]);
        let row = &rows[0];

        assert_eq!(row.cell("person"), "A");
        assert_eq!(row.cell("Yes"), "1");
        assert_eq!(row.cell(TOTAL), "1");
        assert_eq!(row.cell("province"), "Bangkok");
        assert_eq!(row.cell("missing"), "");
    }

    #[test]
    fn test_detail_rows() {
        let records = vec![record("A", Some("Bangkok"), "Yes"), record("B", None, "No")];
        let detail = build_detail(&records);

        assert_eq!(detail.len(), 2);
        assert_eq!(
            serde_json::to_value(&detail[0]).unwrap(),
            serde_json::json!({
                "person": "A",
                "province": "Bangkok",
                "option": "Yes",
                "law": "Bill X",
                "result": "Passed"
            })
        );
        assert_eq!(detail[1].province, None);
    }

    #[test]
    fn test_province_rollup() {
        let records = vec![
            record("A", Some("Bangkok"), "Yes"),
            record("B", Some("Bangkok"), "Yes"),
            record("B", Some("Bangkok"), ABSENT),
            record("C", Some("Phuket"), "No"),
            record("D", None, "Yes"),
        ];
        let rows = summarize(&records);
        let provinces = build_province_summary(&rows, &PipelineConfig::default());

        assert_eq!(provinces.len(), 2);
        let bangkok = &provinces[0];
        assert_eq!(bangkok.province, "Bangkok");
        assert_eq!(bangkok.members, 2);
        assert_eq!(bangkok.counts["Yes"], 2);
        assert_eq!(bangkok.counts[ABSENT], 1);
        assert_eq!(bangkok.counts["No"], 0);
        assert_eq!(bangkok.total, 2);

        let json = serde_json::to_value(&provinces[1]).unwrap();
        assert_eq!(json["province"], "Phuket");
        assert_eq!(json["members"], 1);
        assert_eq!(json[TOTAL], 1);
    }
}
