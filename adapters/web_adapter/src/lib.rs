//! Fetch collaborators for wishlists and subscription catalogs.
//!
//! Every source hides its own paging and payload shape and hands the core a
//! homogeneous `RecordList`.

pub mod apple_arcade;
pub mod gog;
pub mod html;
pub mod http;
pub mod json;
pub mod pcgamingwiki;
pub mod stadia;
pub mod steam;

pub use apple_arcade::AppleArcadeCatalog;
pub use gog::GogWishlist;
pub use http::{Fetch, HttpClient, HttpResponse, HttpSettings};
pub use pcgamingwiki::PcGamingWikiCatalog;
pub use stadia::StadiaCatalog;
pub use steam::SteamWishlist;

#[cfg(test)]
pub(crate) mod testing;
