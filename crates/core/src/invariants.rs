//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::{Listing, ReviewStatus};

/// Validate that a listing's state is internally consistent
pub fn assert_listing_invariants(listing: &Listing) {
    debug_assert!(!listing.id.is_empty(), "Listing has empty id");

    // A rejection reason only makes sense while rejected
    debug_assert!(
        listing.reject_reason.is_empty() || listing.review_status == ReviewStatus::Rejected,
        "Listing {} carries reject reason {:?} while {}",
        listing.id,
        listing.reject_reason,
        listing.review_status
    );
}

/// Validate that room type ids are unique within a listing
pub fn assert_room_ids_unique(listing: &Listing) {
    let mut seen = HashSet::new();
    for room in &listing.room_types {
        let first_seen = seen.insert(room.id.as_str());
        debug_assert!(
            first_seen,
            "Listing {} has duplicate room type id {}",
            listing.id,
            room.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoomType;

    fn make_listing() -> Listing {
        serde_json::from_value(serde_json::json!({
            "id": "h1",
            "name": "Test Inn",
            "reviewStatus": "pending"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_listing() {
        let mut listing = make_listing();
        listing.room_types = vec![
            RoomType::new("rt1", "Twin", None),
            RoomType::new("rt2", "Suite", Some(800.0)),
        ];
        assert_listing_invariants(&listing);
        assert_room_ids_unique(&listing);
    }

    #[test]
    fn test_rejected_with_reason() {
        let mut listing = make_listing();
        listing.review_status = ReviewStatus::Rejected;
        listing.reject_reason = "photos missing".into();
        assert_listing_invariants(&listing);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "carries reject reason")]
    fn test_reason_without_rejection() {
        let mut listing = make_listing();
        listing.reject_reason = "stale".into();
        assert_listing_invariants(&listing);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "duplicate room type id")]
    fn test_duplicate_room_ids() {
        let mut listing = make_listing();
        listing.room_types = vec![
            RoomType::new("rt1", "Twin", None),
            RoomType::new("rt1", "Suite", None),
        ];
        assert_room_ids_unique(&listing);
    }
}
