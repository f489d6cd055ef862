use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::Error;

/// Opaque platform identifier. Compared as a string, never as a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single game entry as one source describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// The source exposes a stable identifier (storefront app id, etc.)
    Identified { display_name: String, id: GameId },
    /// Only a title is available
    Named { display_name: String },
}

impl Record {
    pub fn identified(display_name: impl Into<String>, id: impl Into<String>) -> Self {
        Record::Identified {
            display_name: display_name.into(),
            id: GameId::new(id),
        }
    }

    pub fn named(display_name: impl Into<String>) -> Self {
        Record::Named {
            display_name: display_name.into(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Record::Identified { display_name, .. } | Record::Named { display_name } => {
                display_name
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifiedRecord {
    pub display_name: String,
    pub id: GameId,
}

/// Records produced by one fetch. Every element shares a variant; the list
/// itself carries the tag so mixed lists cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordList {
    Identified(Vec<IdentifiedRecord>),
    Named(Vec<String>),
}

impl RecordList {
    pub fn identified<I, N, D>(records: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<String>,
    {
        RecordList::Identified(
            records
                .into_iter()
                .map(|(display_name, id)| IdentifiedRecord {
                    display_name: display_name.into(),
                    id: GameId::new(id),
                })
                .collect(),
        )
    }

    pub fn named<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        RecordList::Named(names.into_iter().map(Into::into).collect())
    }

    /// Builds a list from loose records, rejecting empty or mixed input.
    pub fn from_records(records: Vec<Record>) -> Result<Self, Error> {
        let identified = match records.first() {
            Some(first) => matches!(first, Record::Identified { .. }),
            None => return Err(Error::InvalidRecordList("no records to classify".into())),
        };

        if identified {
            let mut out = Vec::with_capacity(records.len());
            for record in records {
                match record {
                    Record::Identified { display_name, id } => {
                        out.push(IdentifiedRecord { display_name, id })
                    }
                    Record::Named { display_name } => {
                        return Err(Error::InvalidRecordList(format!(
                            "title-only record '{display_name}' in an identified list"
                        )))
                    }
                }
            }
            Ok(RecordList::Identified(out))
        } else {
            let mut out = Vec::with_capacity(records.len());
            for record in records {
                match record {
                    Record::Named { display_name } => out.push(display_name),
                    Record::Identified { display_name, .. } => {
                        return Err(Error::InvalidRecordList(format!(
                            "identified record '{display_name}' in a title-only list"
                        )))
                    }
                }
            }
            Ok(RecordList::Named(out))
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RecordList::Identified(records) => records.len(),
            RecordList::Named(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn display_names(&self) -> impl Iterator<Item = &str> + '_ {
        let (identified, named) = match self {
            RecordList::Identified(records) => (Some(records.iter()), None),
            RecordList::Named(names) => (None, Some(names.iter())),
        };
        identified
            .into_iter()
            .flatten()
            .map(|r| r.display_name.as_str())
            .chain(named.into_iter().flatten().map(String::as_str))
    }
}

/// Wishlist entries confirmed present in a catalog. Sorted, deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchResult(BTreeSet<String>);

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for MatchResult {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for MatchResult {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(iter.into_iter().map(str::to_owned).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WishlistPlatform {
    Steam,
    Gog,
}

impl WishlistPlatform {
    /// Detects the storefront from a public wishlist URL.
    pub fn from_url(url: &str) -> Result<Self, Error> {
        if url.contains("gog.com") {
            Ok(WishlistPlatform::Gog)
        } else if url.contains("store.steampowered.com") {
            Ok(WishlistPlatform::Steam)
        } else {
            Err(Error::UnsupportedUrl(url.to_string()))
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WishlistPlatform::Steam => "Steam",
            WishlistPlatform::Gog => "GOG",
        }
    }
}

impl fmt::Display for WishlistPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What happened when one catalog was checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ServiceOutcome {
    Matched(MatchResult),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceOverlap {
    pub service_name: String,
    pub outcome: ServiceOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapReport {
    pub platform: WishlistPlatform,
    pub wishlist_size: usize,
    pub services: Vec<ServiceOverlap>,
}
