use serde_json::Value;
use tracing::{debug, info};
use wishlist_core::ports::{Result, WishlistSource};
use wishlist_core::{Error, RecordList, WishlistPlatform};

use crate::http::Fetch;
use crate::json;

const SOURCE: &str = "Steam wishlist";
const NOT_PUBLIC: &str = "Either bad URL or wishlist is not public.";

/// Public Steam wishlist, read through its paged `wishlistdata` endpoint.
pub struct SteamWishlist<F> {
    fetch: F,
    data_url: String,
}

impl<F: Fetch> SteamWishlist<F> {
    pub fn new(fetch: F, wishlist_url: &str) -> Self {
        Self {
            fetch,
            data_url: data_url(wishlist_url),
        }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

/// Turns a wishlist page URL into its data endpoint.
///
/// `https://store.steampowered.com/wishlist/profiles/76561197974046543#sort=order`
/// becomes `https://store.steampowered.com/wishlist/profiles/76561197974046543/wishlistdata/`,
/// and `.../wishlist/id/ezekiel_iii` becomes `.../wishlist/id/ezekiel_iii/wishlistdata/`.
pub fn data_url(wishlist_url: &str) -> String {
    let base = match wishlist_url.find('#') {
        Some(i) => &wishlist_url[..i],
        None => wishlist_url,
    };
    format!("{}/wishlistdata/", base.trim_end_matches('/'))
}

/// Games on one page as `(name, app id)`.
///
/// A bad user or id answers `{"success":2}`, an empty page answers `[]`, and a
/// page with games is an object keyed by app id.
pub fn parse_page(body: &str) -> Result<Vec<(String, String)>> {
    let value: Value = json::parse(SOURCE, body)?;
    match value {
        Value::Object(map) if map.contains_key("success") => {
            Err(Error::unavailable(SOURCE, NOT_PUBLIC))
        }
        Value::Object(map) => map
            .into_iter()
            .map(|(app_id, item)| match item.get("name").and_then(Value::as_str) {
                Some(name) => Ok((name.to_string(), app_id)),
                None => Err(Error::malformed(SOURCE, format!("app {app_id} has no name"))),
            })
            .collect(),
        Value::Array(items) if items.is_empty() => Ok(Vec::new()),
        other => Err(Error::malformed(
            SOURCE,
            format!("expected an object of games, got {}", kind_of(&other)),
        )),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<F: Fetch> WishlistSource for SteamWishlist<F> {
    fn platform(&self) -> WishlistPlatform {
        WishlistPlatform::Steam
    }

    fn fetch_wishlist(&self) -> Result<RecordList> {
        let mut games = Vec::new();
        let mut page = 0u32;
        loop {
            let url = format!("{}?p={}", self.data_url, page);
            let response = self.fetch.get(&url)?;
            if !response.is_success() {
                return Err(Error::unavailable(
                    SOURCE,
                    format!("HTTP {}. {}", response.status, NOT_PUBLIC),
                ));
            }

            let batch = parse_page(&response.body)?;
            debug!(page, games = batch.len(), "steam wishlist page");
            if batch.is_empty() {
                if page == 0 {
                    return Err(Error::EmptyWishlist {
                        platform: WishlistPlatform::Steam.label().to_string(),
                    });
                }
                break;
            }
            games.extend(batch);
            page += 1;
        }

        info!(games = games.len(), pages = page, "steam wishlist fetched");
        Ok(RecordList::identified(games))
    }
}
