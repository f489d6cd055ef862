use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use wishlist_core::ports::{CatalogSource, Result};
use wishlist_core::{Error, Record, RecordList};

use crate::http::Fetch;
use crate::json;

pub const DEFAULT_URL: &str =
    "https://raw.githubusercontent.com/nilicule/StadiaGameDB/master/data/gamedb.json";

/// Title-only catalog from the community Stadia game database.
pub struct StadiaCatalog<F> {
    fetch: F,
    service_name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct GameDb {
    data: Vec<Vec<Value>>,
}

impl<F: Fetch> StadiaCatalog<F> {
    pub fn new(fetch: F, service_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            fetch,
            service_name: service_name.into(),
            url: url.into(),
        }
    }
}

/// Records from a game db body; each row of `data` has the title in column 1.
pub fn parse_records(source_name: &str, body: &str) -> Result<Vec<Record>> {
    let db: GameDb = json::parse(source_name, body)?;
    db.data
        .into_iter()
        .enumerate()
        .map(|(row, columns)| match columns.get(1) {
            Some(Value::String(title)) => Ok(Record::named(title.as_str())),
            _ => Err(Error::malformed(source_name, format!("row {row} has no title"))),
        })
        .collect()
}

impl<F: Fetch> CatalogSource for StadiaCatalog<F> {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn fetch_catalog(&self) -> Result<RecordList> {
        let response = self.fetch.get(&self.url)?;
        if !response.is_success() {
            return Err(Error::unavailable(
                &self.service_name,
                format!("HTTP {}", response.status),
            ));
        }
        let records = parse_records(&self.service_name, &response.body)?;
        if records.is_empty() {
            return Err(Error::EmptyCatalog {
                service: self.service_name.clone(),
            });
        }
        info!(service = %self.service_name, games = records.len(), "stadia catalog fetched");
        RecordList::from_records(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeFetch;

    const DB: &str = r#"{"data":[
        ["1", "Destiny 2", "Bungie", "2019-11-19"],
        ["2", "Hitman World of Assassination", "IO Interactive", "2021-01-20"]
    ]}"#;

    #[test]
    fn test_parse_records() {
        assert_eq!(
            parse_records("Stadia", DB).unwrap(),
            vec![
                Record::named("Destiny 2"),
                Record::named("Hitman World of Assassination")
            ]
        );
    }

    #[test]
    fn test_parse_records_short_row() {
        let err = parse_records("Stadia", r#"{"data":[["1"]]}"#).unwrap_err();
        assert!(err.to_string().contains("row 0 has no title"));
    }

    #[test]
    fn test_parse_records_missing_data() {
        assert!(matches!(
            parse_records("Stadia", r#"{"games":[]}"#),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_fetch_catalog() {
        let fetch = FakeFetch::default().with(DEFAULT_URL, 200, DB);
        let list = StadiaCatalog::new(&fetch, "Stadia", DEFAULT_URL).fetch_catalog().unwrap();
        assert_eq!(list, RecordList::named(["Destiny 2", "Hitman World of Assassination"]));
    }

    #[test]
    fn test_fetch_empty_catalog() {
        let fetch = FakeFetch::default().with(DEFAULT_URL, 200, r#"{"data":[]}"#);
        assert!(matches!(
            StadiaCatalog::new(&fetch, "Stadia", DEFAULT_URL).fetch_catalog(),
            Err(Error::EmptyCatalog { .. })
        ));
    }

    #[test]
    fn test_fetch_not_found() {
        let fetch = FakeFetch::default().with(DEFAULT_URL, 404, "404: Not Found");
        let source = StadiaCatalog::new(&fetch, "Stadia", DEFAULT_URL);
        assert_eq!(source.service_name(), "Stadia");
        assert!(matches!(source.fetch_catalog(), Err(Error::SourceUnavailable { .. })));
    }
}
