use tracing::info;
use wishlist_core::ports::{CatalogSource, Result};
use wishlist_core::{Error, RecordList};

use crate::html::{element_text, has_attr, open_tag, Lowered};
use crate::http::Fetch;

pub const DEFAULT_URL: &str = "https://en.wikipedia.org/wiki/List_of_Apple_Arcade_games";

/// Title-only catalog scraped from the Wikipedia list of Apple Arcade games.
pub struct AppleArcadeCatalog<F> {
    fetch: F,
    service_name: String,
    url: String,
}

impl<F: Fetch> AppleArcadeCatalog<F> {
    pub fn new(fetch: F, service_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            fetch,
            service_name: service_name.into(),
            url: url.into(),
        }
    }
}

/// Every `<th scope="row">` holding an `<i>` element contributes that element's text.
/// Row headers without italics are footnotes or section labels and are skipped.
pub fn parse_titles(html: &str) -> Vec<String> {
    let doc = Lowered::new(html);
    let mut titles = Vec::new();
    let mut from = 0;
    while let Some((start, end)) = doc.next_element("th", from) {
        from = end;
        let cell = &html[start..end];
        if !has_attr(open_tag(cell), "scope", "row") {
            continue;
        }
        let cell_doc = Lowered::new(cell);
        if let Some((i_start, i_end)) = cell_doc.next_element("i", 0) {
            let title = element_text(&cell[i_start..i_end]);
            if !title.is_empty() {
                titles.push(title);
            }
        }
    }
    titles
}

impl<F: Fetch> CatalogSource for AppleArcadeCatalog<F> {
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
        let titles = parse_titles(&response.body);
        if titles.is_empty() {
            return Err(Error::EmptyCatalog {
                service: self.service_name.clone(),
            });
        }
        info!(service = %self.service_name, games = titles.len(), "apple arcade catalog fetched");
        Ok(RecordList::named(titles))
    }
}
