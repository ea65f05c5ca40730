use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const UNKNOWN_YEAR: &str = "Unknown Year";
pub const UNKNOWN_CONTEST: &str = "Unknown Contest";
pub const NO_STARS: &str = "No Stars";

/// One contestant's result in a named contest, as served by the backend.
///
/// The backend is loose about types (stars and years arrive as numbers or
/// strings, ranks sometimes as numeric strings), so every optional field is
/// read leniently and empty values collapse to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerRecord {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub username: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub library_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub roll_number: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub branch: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub section: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub year_of_study: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub contest_name: Option<String>,

    #[serde(default, alias = "stars", deserialize_with = "lenient_string")]
    pub star_rating: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub codechef_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_rank")]
    pub contest_global_rank: Option<u64>,

    #[serde(default, alias = "userImage", deserialize_with = "lenient_string")]
    pub profile_image_url: Option<String>,
}

impl WinnerRecord {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            library_id: None,
            roll_number: None,
            branch: None,
            section: None,
            year_of_study: None,
            contest_name: None,
            star_rating: None,
            codechef_id: None,
            contest_global_rank: None,
            profile_image_url: None,
        }
    }

    pub fn with_rank(mut self, rank: u64) -> Self {
        self.contest_global_rank = Some(rank);
        self
    }

    pub fn with_stars(mut self, stars: impl Into<String>) -> Self {
        self.star_rating = Some(stars.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year_of_study = Some(year.into());
        self
    }

    pub fn with_contest(mut self, contest: impl Into<String>) -> Self {
        self.contest_name = Some(contest.into());
        self
    }

    pub fn with_academics(
        mut self,
        branch: impl Into<String>,
        section: impl Into<String>,
        codechef_id: impl Into<String>,
    ) -> Self {
        self.branch = Some(branch.into());
        self.section = Some(section.into());
        self.codechef_id = Some(codechef_id.into());
        self
    }

    pub fn year_label(&self) -> &str {
        self.year_of_study.as_deref().unwrap_or(UNKNOWN_YEAR)
    }

    pub fn contest_label(&self) -> &str {
        self.contest_name.as_deref().unwrap_or(UNKNOWN_CONTEST)
    }

    pub fn stars_label(&self) -> Option<&str> {
        self.star_rating.as_deref()
    }

    /// Numeric star tier, `0` when absent or unreadable.
    pub fn star_value(&self) -> u32 {
        self.star_rating
            .as_deref()
            .and_then(leading_integer)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    }

    /// Sort key for ranking; records without a rank go last.
    pub fn rank_key(&self) -> u64 {
        self.contest_global_rank.unwrap_or(u64::MAX)
    }
}

/// Parses the run of digits a string starts with ("3", "3 Star", "2nd").
pub fn leading_integer(s: &str) -> Option<u64> {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Payload of the winners endpoint: `{ "data": [...] }`, or the older
/// `{ "data": { "winners": [...] } }` shape.
#[derive(Debug, Deserialize)]
pub struct WinnersEnvelope {
    #[serde(default)]
    data: Option<WinnersPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WinnersPayload {
    List(Vec<WinnerRecord>),
    Nested {
        #[serde(default)]
        winners: Vec<WinnerRecord>,
    },
}

impl WinnersEnvelope {
    pub fn into_records(self) -> Vec<WinnerRecord> {
        match self.data {
            Some(WinnersPayload::List(records)) => records,
            Some(WinnersPayload::Nested { winners }) => winners,
            None => Vec::new(),
        }
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_rank<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_backend_record() {
        let raw = json!({
            "username": "asha",
            "yearOfStudy": 2,
            "contestName": "START101",
            "stars": 3,
            "contestGlobalRank": "42",
            "codechefId": "asha_cc",
            "branch": "CSE",
            "section": "A",
            "userImage": "https://img/asha.png",
            "_id": "ignored"
        });

        let record: WinnerRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.username, "asha");
        assert_eq!(record.year_of_study.as_deref(), Some("2"));
        assert_eq!(record.star_rating.as_deref(), Some("3"));
        assert_eq!(record.contest_global_rank, Some(42));
        assert_eq!(record.profile_image_url.as_deref(), Some("https://img/asha.png"));
        assert_eq!(record.star_value(), 3);
    }

    #[test]
    fn test_missing_fields_fall_back_to_sentinels() {
        let record: WinnerRecord = serde_json::from_value(json!({
            "username": "ravi",
            "yearOfStudy": "",
            "contestName": null
        }))
        .unwrap();

        assert_eq!(record.year_label(), UNKNOWN_YEAR);
        assert_eq!(record.contest_label(), UNKNOWN_CONTEST);
        assert_eq!(record.stars_label(), None);
        assert_eq!(record.star_value(), 0);
        assert_eq!(record.rank_key(), u64::MAX);
    }

    #[test]
    fn test_envelope_shapes() {
        let flat: WinnersEnvelope =
            serde_json::from_value(json!({ "data": [{ "username": "a" }, { "username": "b" }] }))
                .unwrap();
        assert_eq!(flat.into_records().len(), 2);

        let nested: WinnersEnvelope =
            serde_json::from_value(json!({ "data": { "winners": [{ "username": "a" }] } }))
                .unwrap();
        assert_eq!(nested.into_records().len(), 1);

        let empty: WinnersEnvelope = serde_json::from_value(json!({ "data": null })).unwrap();
        assert!(empty.into_records().is_empty());
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("3 Star"), Some(3));
        assert_eq!(leading_integer(" 12"), Some(12));
        assert_eq!(leading_integer("Unknown Year"), None);
    }
}
