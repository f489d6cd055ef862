use tracing::{info, warn};

use crate::domain::{OverlapReport, RecordList, ServiceOutcome, ServiceOverlap};
use crate::error::Error;
use crate::matcher::match_records;
use crate::ports::{CatalogSource, ReportWriter, Result, WishlistSource};

/// Application service that checks one wishlist against every configured catalog
pub struct OverlapServiceImpl {
    wishlist_source: Box<dyn WishlistSource>,
    catalog_sources: Vec<Box<dyn CatalogSource>>,
    report_writers: Vec<Box<dyn ReportWriter>>,
    fail_fast: bool,
}

impl OverlapServiceImpl {
    /// Creates a new OverlapServiceImpl with the given dependencies
    pub fn new(
        wishlist_source: Box<dyn WishlistSource>,
        catalog_sources: Vec<Box<dyn CatalogSource>>,
        report_writers: Vec<Box<dyn ReportWriter>>,
    ) -> Self {
        Self {
            wishlist_source,
            catalog_sources,
            report_writers,
            fail_fast: false,
        }
    }

    /// Stop at the first catalog that cannot be loaded instead of recording it as failed.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Fetches the wishlist, matches it against each catalog in order and
    /// hands the finished report to every writer.
    pub fn execute(&self) -> Result<OverlapReport> {
        let platform = self.wishlist_source.platform();
        let wishlist = self.wishlist_source.fetch_wishlist()?;
        if wishlist.is_empty() {
            return Err(Error::EmptyWishlist {
                platform: platform.label().to_string(),
            });
        }
        info!(platform = %platform, games = wishlist.len(), "wishlist loaded");

        let mut services = Vec::with_capacity(self.catalog_sources.len());
        for source in &self.catalog_sources {
            let service_name = source.service_name().to_string();
            let outcome = match self.load_catalog(source.as_ref(), &wishlist) {
                Ok(catalog) => ServiceOutcome::Matched(match_records(&wishlist, &catalog)),
                Err(e) if self.fail_fast => return Err(e),
                Err(e) => {
                    warn!(service = %service_name, error = %e, "skipping catalog");
                    ServiceOutcome::Failed(e.to_string())
                }
            };
            services.push(ServiceOverlap {
                service_name,
                outcome,
            });
        }

        let report = OverlapReport {
            platform,
            wishlist_size: wishlist.len(),
            services,
        };
        for writer in &self.report_writers {
            writer.write(&report)?;
        }
        Ok(report)
    }

    fn load_catalog(&self, source: &dyn CatalogSource, wishlist: &RecordList) -> Result<RecordList> {
        match source.fetch_catalog() {
            Ok(catalog) => {
                info!(service = source.service_name(), games = catalog.len(), "catalog loaded");
                Ok(catalog)
            }
            // An empty catalog only means no overlap. The variant is picked so
            // the matcher stays on the same path it would take for a real one.
            Err(Error::EmptyCatalog { service }) => {
                info!(service = %service, "catalog is empty");
                Ok(match wishlist {
                    RecordList::Identified(_) => RecordList::Identified(Vec::new()),
                    RecordList::Named(_) => RecordList::Named(Vec::new()),
                })
            }
            Err(e) => Err(e),
        }
    }
}
