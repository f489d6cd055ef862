use crate::domain::{OverlapReport, RecordList, WishlistPlatform};
use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub trait WishlistSource {
    fn platform(&self) -> WishlistPlatform;

    // Fetches every wishlist page and maps it to a RecordList.
    // An empty wishlist is reported as Error::EmptyWishlist.
    fn fetch_wishlist(&self) -> Result<RecordList>;
}

/// A subscription service catalog
pub trait CatalogSource {
    fn service_name(&self) -> &str;

    fn fetch_catalog(&self) -> Result<RecordList>;
}

/// Trait for writing the overlap report
/// This is a port (interface) that defines how the core communicates with output adapters
pub trait ReportWriter {
    fn write(&self, report: &OverlapReport) -> Result<()>;
}
