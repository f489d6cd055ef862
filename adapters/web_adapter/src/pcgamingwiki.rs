use reqwest::Url;
use serde_json::Value;
use tracing::{debug, info};
use wishlist_core::ports::{CatalogSource, Result};
use wishlist_core::{Error, RecordList, WishlistPlatform};

use crate::http::Fetch;
use crate::json;

pub const DEFAULT_ENDPOINT: &str = "https://www.pcgamingwiki.com/w/api.php";

/// Semantic MediaWiki property holding the id of the wishlist's storefront.
pub fn id_property(platform: WishlistPlatform) -> &'static str {
    match platform {
        WishlistPlatform::Steam => "Steam_AppID",
        WishlistPlatform::Gog => "GOGcom ID",
    }
}

/// Catalog assembled from a PCGamingWiki `askargs` query such as
/// `Ubisoft Plus::true`. Records carry the storefront id of the wishlist.
pub struct PcGamingWikiCatalog<F> {
    fetch: F,
    endpoint: String,
    service_name: String,
    condition: String,
    property: &'static str,
}

/// One batch of results plus the offset of the next batch, if any.
#[derive(Debug, PartialEq)]
pub struct AskBatch {
    pub games: Vec<(String, String)>,
    pub continue_offset: Option<u64>,
}

impl<F: Fetch> PcGamingWikiCatalog<F> {
    pub fn new(
        fetch: F,
        service_name: impl Into<String>,
        condition: impl Into<String>,
        platform: WishlistPlatform,
    ) -> Self {
        Self {
            fetch,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            service_name: service_name.into(),
            condition: condition.into(),
            property: id_property(platform),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn query_url(&self, offset: Option<u64>) -> Result<Url> {
        let mut params = vec![
            ("action", "askargs".to_string()),
            ("printouts", self.property.to_string()),
            ("format", "json".to_string()),
            ("conditions", self.condition.clone()),
        ];
        if let Some(offset) = offset {
            params.push(("parameters", format!("offset={offset}")));
        }
        Url::parse_with_params(&self.endpoint, &params)
            .map_err(|e| Error::unavailable(&self.service_name, e))
    }
}

/// Parses one `askargs` response. `results` is an object keyed by page title
/// when there are hits and an empty array when there are none.
pub fn parse_batch(source_name: &str, property: &str, body: &str) -> Result<AskBatch> {
    let value: Value = json::parse(source_name, body)?;
    if let Some(error) = value.get("error") {
        let info = error.get("info").and_then(Value::as_str).unwrap_or("unknown error");
        return Err(Error::malformed(source_name, info));
    }

    let results = value
        .get("query")
        .and_then(|q| q.get("results"))
        .ok_or_else(|| Error::malformed(source_name, "missing query.results"))?;

    let mut games = Vec::new();
    match results {
        Value::Object(pages) => {
            for (title, page) in pages {
                let ids = page
                    .get("printouts")
                    .and_then(|p| p.get(property))
                    .and_then(Value::as_array)
                    .ok_or_else(|| {
                        Error::malformed(source_name, format!("'{title}' has no {property} printout"))
                    })?;
                games.extend(ids.iter().filter_map(json::id_to_string).map(|id| (title.clone(), id)));
            }
        }
        Value::Array(items) if items.is_empty() => {}
        _ => return Err(Error::malformed(source_name, "query.results is not an object")),
    }

    let continue_offset = value.get("query-continue-offset").and_then(|v| match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    });

    Ok(AskBatch {
        games,
        continue_offset,
    })
}

impl<F: Fetch> CatalogSource for PcGamingWikiCatalog<F> {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn fetch_catalog(&self) -> Result<RecordList> {
        let mut games = Vec::new();
        let mut offset = None;
        loop {
            let url = self.query_url(offset)?;
            let response = self.fetch.get(url.as_str())?;
            if !response.is_success() {
                return Err(Error::unavailable(
                    &self.service_name,
                    format!("PCGamingWiki answered HTTP {}", response.status),
                ));
            }

            let batch = parse_batch(&self.service_name, self.property, &response.body)?;
            debug!(service = %self.service_name, ?offset, games = batch.games.len(), "pcgamingwiki batch");
            games.extend(batch.games);

            match batch.continue_offset {
                // A server that does not advance would loop forever.
                Some(next) if offset.map_or(true, |current| next > current) => offset = Some(next),
                _ => break,
            }
        }

        if games.is_empty() {
            return Err(Error::EmptyCatalog {
                service: self.service_name.clone(),
            });
        }
        info!(service = %self.service_name, games = games.len(), "pcgamingwiki catalog fetched");
        Ok(RecordList::identified(games))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeFetch;

    const FIRST: &str = r#"{
        "query": {
            "results": {
                "Assassin's Creed Odyssey": {"printouts": {"Steam_AppID": ["812140"]}},
                "Far Cry 5": {"printouts": {"Steam_AppID": ["552520", "756800"]}},
                "Trackmania": {"printouts": {"Steam_AppID": []}}
            },
            "meta": {"count": 3, "offset": 0}
        },
        "query-continue-offset": 50
    }"#;

    const SECOND: &str = r#"{
        "query": {
            "results": {"Rayman Legends": {"printouts": {"Steam_AppID": [242550]}}},
            "meta": {"count": 1, "offset": 50}
        }
    }"#;

    fn catalog(fetch: &FakeFetch) -> PcGamingWikiCatalog<&FakeFetch> {
        PcGamingWikiCatalog::new(fetch, "Ubisoft+", "Ubisoft Plus::true", WishlistPlatform::Steam)
    }

    #[test]
    fn test_id_property() {
        assert_eq!(id_property(WishlistPlatform::Steam), "Steam_AppID");
        assert_eq!(id_property(WishlistPlatform::Gog), "GOGcom ID");
    }

    #[test]
    fn test_query_url_encodes_condition() {
        let fetch = FakeFetch::default();
        let source = PcGamingWikiCatalog::new(
            &fetch,
            "Xbox Game Pass",
            "Xbox Game Pass for PC::true|Xbox Play Anywhere::true",
            WishlistPlatform::Gog,
        );
        let url = source.query_url(Some(50)).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(url.host_str(), Some("www.pcgamingwiki.com"));
        assert!(pairs.contains(&("action".into(), "askargs".into())));
        assert!(pairs.contains(&("printouts".into(), "GOGcom ID".into())));
        assert!(pairs.contains(&(
            "conditions".into(),
            "Xbox Game Pass for PC::true|Xbox Play Anywhere::true".into()
        )));
        assert!(pairs.contains(&("parameters".into(), "offset=50".into())));
    }

    #[test]
    fn test_parse_batch() {
        let batch = parse_batch("Ubisoft+", "Steam_AppID", FIRST).unwrap();
        assert_eq!(
            batch.games,
            vec![
                ("Assassin's Creed Odyssey".to_string(), "812140".to_string()),
                ("Far Cry 5".to_string(), "552520".to_string()),
                ("Far Cry 5".to_string(), "756800".to_string()),
            ]
        );
        assert_eq!(batch.continue_offset, Some(50));
    }

    #[test]
    fn test_parse_batch_no_results() {
        let batch = parse_batch("EA Play", "Steam_AppID", r#"{"query":{"results":[]}}"#).unwrap();
        assert!(batch.games.is_empty());
        assert_eq!(batch.continue_offset, None);
    }

    #[test]
    fn test_parse_batch_api_error() {
        let body = r#"{"error":{"code":"smw-condition","info":"Bad condition"}}"#;
        let err = parse_batch("EA Play", "Steam_AppID", body).unwrap_err();
        assert!(err.to_string().contains("Bad condition"));
    }

    #[test]
    fn test_parse_batch_missing_printout() {
        let body = r#"{"query":{"results":{"Far Cry 5":{"printouts":{}}}}}"#;
        assert!(matches!(
            parse_batch("Ubisoft+", "Steam_AppID", body),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_fetch_follows_continue_offset() {
        let unused = FakeFetch::default();
        let first = catalog(&unused).query_url(None).unwrap().to_string();
        let second = catalog(&unused).query_url(Some(50)).unwrap().to_string();

        let fetch = FakeFetch::default().with(&first, 200, FIRST).with(&second, 200, SECOND);
        let list = catalog(&fetch).fetch_catalog().unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list.display_names().last(), Some("Rayman Legends"));
        assert_eq!(fetch.requested.borrow().len(), 2);
    }

    #[test]
    fn test_fetch_stops_when_offset_does_not_advance() {
        let unused = FakeFetch::default();
        let first = catalog(&unused).query_url(None).unwrap().to_string();
        let second = catalog(&unused).query_url(Some(50)).unwrap().to_string();

        // The second batch claims the same continuation offset as the first.
        let fetch = FakeFetch::default().with(&first, 200, FIRST).with(&second, 200, FIRST);
        let list = catalog(&fetch).fetch_catalog().unwrap();
        assert_eq!(list.len(), 6);
        assert_eq!(fetch.requested.borrow().len(), 2);
    }

    #[test]
    fn test_fetch_empty_catalog() {
        let unused = FakeFetch::default();
        let first = catalog(&unused).query_url(None).unwrap().to_string();
        let fetch = FakeFetch::default().with(&first, 200, r#"{"query":{"results":[]}}"#);
        match catalog(&fetch).fetch_catalog() {
            Err(Error::EmptyCatalog { service }) => assert_eq!(service, "Ubisoft+"),
            other => panic!("expected empty catalog, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_http_error() {
        let unused = FakeFetch::default();
        let first = catalog(&unused).query_url(None).unwrap().to_string();
        let fetch = FakeFetch::default().with(&first, 503, "busy");
        assert!(matches!(
            catalog(&fetch).fetch_catalog(),
            Err(Error::SourceUnavailable { .. })
        ));
    }
}
