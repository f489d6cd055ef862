use std::collections::HashSet;

use crate::domain::{MatchResult, RecordList};

/// Computes which wishlist entries are present in a catalog.
///
/// When both sides carry identifiers the comparison is on `id` strings and the
/// wishlist's display name is reported. Otherwise both sides are projected to
/// display names and intersected exactly; no case, punctuation or edition
/// normalization is applied, so title matching can under-report.
pub fn match_records(wishlist: &RecordList, catalog: &RecordList) -> MatchResult {
    match (wishlist, catalog) {
        (RecordList::Identified(wanted), RecordList::Identified(available)) => {
            let ids: HashSet<&str> = available.iter().map(|r| r.id.as_str()).collect();
            wanted
                .iter()
                .filter(|r| ids.contains(r.id.as_str()))
                .map(|r| r.display_name.as_str())
                .collect()
        }
        (RecordList::Identified(_), RecordList::Named(_))
        | (RecordList::Named(_), RecordList::Identified(_))
        | (RecordList::Named(_), RecordList::Named(_)) => {
            let titles: HashSet<&str> = catalog.display_names().collect();
            wishlist
                .display_names()
                .filter(|name| titles.contains(name))
                .collect()
        }
    }
}
