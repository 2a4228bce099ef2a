//! Review desk view model

use eshotel_core::{ListingAction, SlotStore};

use super::listings::summary;
use super::{usage, LOGIN_REQUIRED};
use crate::state::AppState;

const ADMIN_REQUIRED: &str = "Admin access required.";

pub fn handle<S: SlotStore>(state: &mut AppState<S>, command: &str, rest: &str) -> Option<String> {
    let action = match command {
        "all" => ListingAction::ViewAllListings,
        "approve" | "reject" => ListingAction::ReviewListing,
        "publish" | "unpublish" => ListingAction::PublishListing,
        _ => return None,
    };
    if state.session().is_none() {
        return Some(LOGIN_REQUIRED.to_string());
    }
    if !state.can(action) {
        return Some(ADMIN_REQUIRED.to_string());
    }

    let (id, reason) = rest
        .split_once(char::is_whitespace)
        .map(|(id, reason)| (id, reason.trim()))
        .unwrap_or((rest, ""));
    if command != "all" && id.is_empty() {
        return Some(usage(match command {
            "reject" => "reject <id> <reason...>",
            other => other,
        }));
    }
    if command != "all" && state.listings.get(id).is_none() {
        return Some(format!("No listing {}.", id));
    }

    let reply = match command {
        "all" => all(state),
        "approve" => match state.listings.approve(id) {
            Ok(()) => format!("Approved {}.", id),
            Err(e) => e.to_string(),
        },
        "reject" => match state.listings.reject(id, reason) {
            Ok(()) => format!("Rejected {}.", id),
            Err(e) => e.to_string(),
        },
        "publish" => match state.listings.set_published(id, true) {
            Ok(()) => format!("Published {}.", id),
            Err(e) => e.to_string(),
        },
        _ => match state.listings.set_published(id, false) {
            Ok(()) => format!("Unpublished {}.", id),
            Err(e) => e.to_string(),
        },
    };
    Some(reply)
}

fn all<S: SlotStore>(state: &AppState<S>) -> String {
    let listings = state.listings.by_recency();
    if listings.is_empty() {
        return "No listings yet.".to_string();
    }
    listings
        .into_iter()
        .map(|l| {
            let owner = if l.created_by.is_empty() { "-" } else { l.created_by.as_str() };
            format!("{}  by {}", summary(l), owner)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
