use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use wishlist_core::ports::{Result, WishlistSource};
use wishlist_core::{Error, RecordList, WishlistPlatform};

use crate::http::Fetch;
use crate::json;

const SOURCE: &str = "GOG wishlist";
const NOT_PUBLIC: &str = "Either bad URL or wishlist is not public.";

pub const DEFAULT_EMBED_BASE: &str = "https://embed.gog.com";

/// Public GOG wishlist. The JSON pages are keyed by the numeric gog-user id,
/// which only appears in the HTML of the wishlist page itself.
///
/// The page and the JSON search go through separate fetchers: the page may
/// redirect to its canonical URL, while a redirected search means the
/// wishlist is not public.
pub struct GogWishlist<F> {
    page_fetch: F,
    search_fetch: F,
    wishlist_url: String,
    embed_base: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    total_products: u64,
    total_pages: u32,
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    title: String,
    id: Value,
}

impl<F: Fetch> GogWishlist<F> {
    pub fn new(page_fetch: F, search_fetch: F, wishlist_url: &str) -> Self {
        Self {
            page_fetch,
            search_fetch,
            wishlist_url: wishlist_url.to_string(),
            embed_base: DEFAULT_EMBED_BASE.to_string(),
        }
    }

    pub fn with_embed_base(mut self, embed_base: &str) -> Self {
        self.embed_base = embed_base.trim_end_matches('/').to_string();
        self
    }

    fn page_url(&self, user: &str, page: u32) -> String {
        format!("{}/public_wishlist/{}/search?page={}", self.embed_base, user, page)
    }

    fn gog_user(&self) -> Result<String> {
        let response = self.page_fetch.get(&self.wishlist_url)?;
        if !response.is_success() {
            return Err(Error::unavailable(
                SOURCE,
                format!("HTTP {}. {}", response.status, NOT_PUBLIC),
            ));
        }
        extract_gog_user(&response.body)
            .ok_or_else(|| Error::unavailable(SOURCE, format!("no gog-user id on page. {NOT_PUBLIC}")))
    }
}

/// Finds the `gog-user="<digits>"` attribute on a wishlist page.
pub fn extract_gog_user(html: &str) -> Option<String> {
    const NEEDLE: &str = "gog-user=\"";
    let mut rest = html;
    while let Some(i) = rest.find(NEEDLE) {
        rest = &rest[i + NEEDLE.len()..];
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        if !digits.is_empty() && rest[digits.len()..].starts_with('"') {
            return Some(digits);
        }
    }
    None
}

fn parse_page(body: &str) -> Result<SearchPage> {
    json::parse(SOURCE, body)
}

fn products_to_games(products: Vec<Product>) -> Result<Vec<(String, String)>> {
    products
        .into_iter()
        .map(|p| match json::id_to_string(&p.id) {
            Some(id) => Ok((p.title, id)),
            None => Err(Error::malformed(SOURCE, format!("product '{}' has no id", p.title))),
        })
        .collect()
}

impl<F: Fetch> WishlistSource for GogWishlist<F> {
    fn platform(&self) -> WishlistPlatform {
        WishlistPlatform::Gog
    }

    fn fetch_wishlist(&self) -> Result<RecordList> {
        let user = self.gog_user()?;
        debug!(user = %user, "gog user resolved");

        let mut games = Vec::new();
        let mut page = 1u32;
        loop {
            let response = self.search_fetch.get(&self.page_url(&user, page))?;
            if !response.is_success() {
                return Err(Error::unavailable(
                    SOURCE,
                    format!("HTTP {}. {}", response.status, NOT_PUBLIC),
                ));
            }
            let parsed = parse_page(&response.body)?;
            if parsed.total_products == 0 {
                return Err(Error::EmptyWishlist {
                    platform: WishlistPlatform::Gog.label().to_string(),
                });
            }
            debug!(page, total_pages = parsed.total_pages, "gog wishlist page");
            games.extend(products_to_games(parsed.products)?);
            if page >= parsed.total_pages {
                break;
            }
            page += 1;
        }

        info!(games = games.len(), pages = page, "gog wishlist fetched");
        Ok(RecordList::identified(games))
    }
}
