use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::leaderboard::ranker;
use crate::models::{
    leading_integer, LeaderboardError, WinnerRecord, NO_STARS, UNKNOWN_CONTEST, UNKNOWN_YEAR,
};

/// How winner records are grouped before ranking and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CategorizationScheme {
    /// Year of study, then contest and star tier.
    #[default]
    #[serde(rename = "year-star", alias = "by-year-and-star", alias = "by_year_and_star")]
    ByYearAndStar,
    #[serde(rename = "star", alias = "by-star-only", alias = "by_star_only")]
    ByStarOnly,
    #[serde(rename = "contest", alias = "by-contest-name", alias = "by_contest_name")]
    ByContestName,
    #[serde(rename = "contest-star", alias = "by-contest-and-star", alias = "by_contest_and_star")]
    ByContestAndStar,
}

impl CategorizationScheme {
    pub const ALL: [CategorizationScheme; 4] = [
        CategorizationScheme::ByYearAndStar,
        CategorizationScheme::ByStarOnly,
        CategorizationScheme::ByContestName,
        CategorizationScheme::ByContestAndStar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategorizationScheme::ByYearAndStar => "year-star",
            CategorizationScheme::ByStarOnly => "star",
            CategorizationScheme::ByContestName => "contest",
            CategorizationScheme::ByContestAndStar => "contest-star",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CategorizationScheme::ByYearAndStar => "Year of study / star tier",
            CategorizationScheme::ByStarOnly => "Star tier",
            CategorizationScheme::ByContestName => "Contest",
            CategorizationScheme::ByContestAndStar => "Contest / star tier",
        }
    }

    /// The scheme after this one, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            CategorizationScheme::ByYearAndStar => CategorizationScheme::ByStarOnly,
            CategorizationScheme::ByStarOnly => CategorizationScheme::ByContestName,
            CategorizationScheme::ByContestName => CategorizationScheme::ByContestAndStar,
            CategorizationScheme::ByContestAndStar => CategorizationScheme::ByYearAndStar,
        }
    }

    /// Group and bucket key for a record under this scheme.
    pub fn keys_for(&self, record: &WinnerRecord) -> (String, String) {
        match self {
            CategorizationScheme::ByYearAndStar => {
                (record.year_label().to_string(), contest_star_key(record))
            }
            CategorizationScheme::ByStarOnly => {
                let key = star_key(record);
                (key.clone(), key)
            }
            CategorizationScheme::ByContestName => {
                let key = record.contest_label().to_string();
                (key.clone(), key)
            }
            CategorizationScheme::ByContestAndStar => {
                (record.contest_label().to_string(), contest_star_key(record))
            }
        }
    }
}

impl fmt::Display for CategorizationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategorizationScheme {
    type Err = LeaderboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "year-star" | "by-year-and-star" | "year" => Ok(CategorizationScheme::ByYearAndStar),
            "star" | "stars" | "by-star-only" => Ok(CategorizationScheme::ByStarOnly),
            "contest" | "by-contest-name" => Ok(CategorizationScheme::ByContestName),
            "contest-star" | "by-contest-and-star" => Ok(CategorizationScheme::ByContestAndStar),
            _ => Err(LeaderboardError::UnknownScheme(s.to_string())),
        }
    }
}

fn star_key(record: &WinnerRecord) -> String {
    match record.stars_label() {
        Some(stars) => format!("{} Star", stars),
        None => NO_STARS.to_string(),
    }
}

fn contest_star_key(record: &WinnerRecord) -> String {
    match record.stars_label() {
        Some(stars) => format!("{} - ({} Star)", record.contest_label(), stars),
        None => format!("{} - {}", record.contest_label(), NO_STARS),
    }
}

fn is_sentinel(key: &str) -> bool {
    key == UNKNOWN_YEAR || key == UNKNOWN_CONTEST || key.ends_with(NO_STARS)
}

/// Display ordering for group and bucket keys: numbered keys by number,
/// other keys alphabetically, sentinel keys last.
pub fn display_cmp(a: &str, b: &str) -> Ordering {
    is_sentinel(a)
        .cmp(&is_sentinel(b))
        .then_with(|| match (leading_integer(a), leading_integer(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.cmp(b))
}

/// Winner records partitioned into `group -> bucket -> records`.
///
/// The maps carry no order; [`Categorized::groups`] applies [`display_cmp`]
/// every time it is asked.
#[derive(Debug, Clone, PartialEq)]
pub struct Categorized {
    scheme: CategorizationScheme,
    groups: HashMap<String, HashMap<String, Vec<WinnerRecord>>>,
}

#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: &'a str,
    pub buckets: Vec<Bucket<'a>>,
}

#[derive(Debug, Clone)]
pub struct Bucket<'a> {
    pub key: &'a str,
    pub records: &'a [WinnerRecord],
}

impl Categorized {
    pub fn empty(scheme: CategorizationScheme) -> Self {
        Self {
            scheme,
            groups: HashMap::new(),
        }
    }

    pub fn scheme(&self) -> CategorizationScheme {
        self.scheme
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn bucket_count(&self) -> usize {
        self.groups.values().map(|buckets| buckets.len()).sum()
    }

    pub fn record_count(&self) -> usize {
        self.records().count()
    }

    pub fn bucket(&self, group: &str, bucket: &str) -> Option<&[WinnerRecord]> {
        self.groups
            .get(group)
            .and_then(|buckets| buckets.get(bucket))
            .map(|records| records.as_slice())
    }

    /// Every record in every bucket, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &WinnerRecord> {
        self.groups
            .values()
            .flat_map(|buckets| buckets.values())
            .flat_map(|records| records.iter())
    }

    /// Groups and their buckets in display order.
    pub fn groups(&self) -> Vec<Group<'_>> {
        let mut groups: Vec<Group<'_>> = self
            .groups
            .iter()
            .map(|(key, buckets)| {
                let mut buckets: Vec<Bucket<'_>> = buckets
                    .iter()
                    .map(|(key, records)| Bucket {
                        key: key.as_str(),
                        records: records.as_slice(),
                    })
                    .collect();
                buckets.sort_by(|a, b| display_cmp(a.key, b.key));
                Group {
                    key: key.as_str(),
                    buckets,
                }
            })
            .collect();
        groups.sort_by(|a, b| display_cmp(a.key, b.key));
        groups
    }

    /// A copy with every bucket ranked and, when `top_n` is given, truncated.
    pub fn ranked(&self, top_n: Option<usize>) -> Categorized {
        let groups = self
            .groups
            .iter()
            .map(|(group, buckets)| {
                let buckets = buckets
                    .iter()
                    .map(|(bucket, records)| {
                        let ranked = match top_n {
                            Some(n) => ranker::top_n(records, n),
                            None => ranker::rank(records),
                        };
                        (bucket.clone(), ranked)
                    })
                    .collect();
                (group.clone(), buckets)
            })
            .collect();

        Categorized {
            scheme: self.scheme,
            groups,
        }
    }
}

/// Partitions `records` under `scheme`. Every record lands in exactly one
/// bucket; missing fields go to the sentinel buckets.
pub fn categorize(records: &[WinnerRecord], scheme: CategorizationScheme) -> Categorized {
    let mut categorized = Categorized::empty(scheme);

    for record in records {
        let (group, bucket) = scheme.keys_for(record);
        categorized
            .groups
            .entry(group)
            .or_default()
            .entry(bucket)
            .or_default()
            .push(record.clone());
    }

    categorized
}
