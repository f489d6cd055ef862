use std::io;
use thiserror::Error;

/// Errors surfaced while gathering and reporting wishlist overlaps.
#[derive(Debug, Error)]
pub enum Error {
    /// The URL is neither a Steam nor a GOG wishlist.
    #[error("bad url: {0} is not a Steam or GOG wishlist")]
    UnsupportedUrl(String),
    /// Bad URL, private wishlist, transport failure or non-success status.
    #[error("could not load {source_name}: {reason}")]
    SourceUnavailable { source_name: String, reason: String },
    #[error("{platform} wishlist is empty.")]
    EmptyWishlist { platform: String },
    /// Absorbed by the overlap service; the catalog is treated as empty.
    #[error("{service} catalog is empty")]
    EmptyCatalog { service: String },
    /// The body did not have the expected shape.
    #[error("malformed response from {source_name}: {detail}")]
    MalformedResponse { source_name: String, detail: String },
    #[error("invalid record list: {0}")]
    InvalidRecordList(String),
    #[error("report error: {0}")]
    Report(#[from] io::Error),
}

impl Error {
    pub fn unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Error::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(source_name: impl Into<String>, detail: impl ToString) -> Self {
        Error::MalformedResponse {
            source_name: source_name.into(),
            detail: detail.to_string(),
        }
    }
}
