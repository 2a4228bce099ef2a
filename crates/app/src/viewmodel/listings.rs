//! Merchant workspace view model

use eshotel_core::{Listing, ListingAction, ListingInput, SlotStore};
use tracing::debug;

use super::{usage, LOGIN_REQUIRED};
use crate::state::AppState;

pub fn handle<S: SlotStore>(state: &mut AppState<S>, command: &str, rest: &str) -> Option<String> {
    let reply = match command {
        "list" | "show" | "save" | "submit" | "remove" if state.session().is_none() => {
            LOGIN_REQUIRED.to_string()
        }
        "list" => list(state),
        "show" => show(state, rest),
        "save" => save(state, rest, false),
        "submit" => save(state, rest, true),
        "remove" => remove(state, rest),
        _ => return None,
    };
    Some(reply)
}

/// One-line summary used by listing tables
pub(crate) fn summary(listing: &Listing) -> String {
    let mut line = format!("{}  {}  [{}", listing.id, listing.name, listing.review_status);
    if listing.published {
        line.push_str(", published");
    }
    line.push(']');
    if !listing.reject_reason.is_empty() {
        line.push_str(&format!("  reason: {}", listing.reject_reason));
    }
    line
}

fn list<S: SlotStore>(state: &AppState<S>) -> String {
    let Some(session) = state.session() else {
        return LOGIN_REQUIRED.to_string();
    };

    let listings = state.listings.visible_to(&session.username);
    if listings.is_empty() {
        return "No listings yet.".to_string();
    }
    listings
        .into_iter()
        .map(summary)
        .collect::<Vec<_>>()
        .join("\n")
}

fn show<S: SlotStore>(state: &AppState<S>, id: &str) -> String {
    if id.is_empty() {
        return usage("show <id>");
    }
    match state.accessible_listing(id) {
        Some(listing) => serde_json::to_string_pretty(listing)
            .unwrap_or_else(|e| format!("Could not render listing: {}", e)),
        None => format!("No listing {}.", id),
    }
}

fn save<S: SlotStore>(state: &mut AppState<S>, json: &str, submit: bool) -> String {
    if !state.can(ListingAction::EditListing) {
        return LOGIN_REQUIRED.to_string();
    }
    if json.is_empty() {
        return usage(if submit { "submit <json>" } else { "save <json>" });
    }

    let input: ListingInput = match serde_json::from_str(json) {
        Ok(input) => input,
        Err(e) => return format!("Invalid listing JSON: {}", e),
    };
    let mut input = input.normalized(state.listings.now_millis());
    if let Err(e) = input.validate() {
        return e.to_string();
    }

    // The owner is always the account that first saved the listing
    let existing = input
        .supplied_id()
        .filter(|id| state.listings.get(id).is_some())
        .map(str::to_string);
    match existing {
        Some(id) if state.accessible_listing(&id).is_none() => {
            return format!("No listing {}.", id);
        }
        Some(_) => input.created_by = None,
        None => input.created_by = state.session().map(|s| s.username.clone()),
    }

    let id = state.listings.save_one(input, submit);
    debug!(%id, submit, "Listing saved from console");
    if submit {
        format!("Submitted {} for review.", id)
    } else {
        format!("Saved {}.", id)
    }
}

fn remove<S: SlotStore>(state: &mut AppState<S>, id: &str) -> String {
    if id.is_empty() {
        return usage("remove <id>");
    }
    if !state.can(ListingAction::RemoveListing) || state.accessible_listing(id).is_none() {
        return format!("No listing {}.", id);
    }

    state.listings.remove_one(id);
    format!("Removed {}.", id)
}
