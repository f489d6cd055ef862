use std::cell::RefCell;
use std::collections::HashMap;
use wishlist_core::ports::Result;
use wishlist_core::Error;

use crate::http::{Fetch, HttpResponse};

/// Canned responses keyed by exact URL. Unknown URLs fail like a dead host.
#[derive(Default)]
pub struct FakeFetch {
    responses: HashMap<String, HttpResponse>,
    pub requested: RefCell<Vec<String>>,
}

impl FakeFetch {
    pub fn with(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        );
        self
    }
}

impl Fetch for FakeFetch {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requested.borrow_mut().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| Error::unavailable(url, "connection refused"))
    }
}
