pub mod application;
pub mod domain;
pub mod error;
pub mod matcher;
pub mod ports;
pub mod utils;

pub use domain::{
    GameId, IdentifiedRecord, MatchResult, OverlapReport, Record, RecordList, ServiceOutcome,
    ServiceOverlap, WishlistPlatform,
};
pub use error::Error;
pub use matcher::match_records;
