use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::debug;
use wishlist_core::ports::Result;
use wishlist_core::Error;

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(27),
            connect_timeout: Duration::from_secs(3),
            user_agent: concat!("wishlist-overlap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Plain GET access. Implemented by [`HttpClient`] and by in-memory fakes in tests.
pub trait Fetch {
    /// Returns the response for any status; only transport failures are errors.
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        (**self).get(url)
    }
}

/// Blocking reqwest client shared by every source.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Builds a client that follows redirects.
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        Self::build(settings, Policy::default())
    }

    /// Storefront wishlist endpoints answer a private or unknown profile with a
    /// redirect; those must surface as a non-success status.
    pub fn without_redirects(settings: &HttpSettings) -> Result<Self> {
        Self::build(settings, Policy::none())
    }

    fn build(settings: &HttpSettings, redirect: Policy) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.clone())
            .redirect(redirect)
            .build()
            .map_err(|e| Error::unavailable("HTTP client", e))?;
        Ok(Self { client })
    }
}

impl Fetch for HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::unavailable(url, e))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| Error::unavailable(url, e))?;
        debug!(url, status, bytes = body.len(), "response");
        Ok(HttpResponse { status, body })
    }
}
