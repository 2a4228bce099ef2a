//! Room type view model

use eshotel_core::{ListingAction, RoomType, SlotStore};

use super::{usage, LOGIN_REQUIRED};
use crate::state::AppState;

pub fn handle<S: SlotStore>(state: &mut AppState<S>, command: &str, rest: &str) -> Option<String> {
    let args: Vec<&str> = rest.split_whitespace().collect();

    let reply = match command {
        "rooms" | "room-add" | "room-edit" | "room-rm"
            if !state.can(ListingAction::ManageRoomTypes) =>
        {
            LOGIN_REQUIRED.to_string()
        }
        "rooms" => match args.as_slice() {
            &[id] => rooms(state, id),
            _ => usage("rooms <id>"),
        },
        "room-add" => match args.as_slice() {
            &[id, price, ref name @ ..] if !name.is_empty() => {
                put(state, id, String::new(), price, &name.join(" "))
            }
            _ => usage("room-add <id> <price|-> <name...>"),
        },
        "room-edit" => match args.as_slice() {
            &[id, room_id, price, ref name @ ..] if !name.is_empty() => {
                let exists = state
                    .accessible_listing(id)
                    .is_some_and(|l| l.room_type(room_id).is_some());
                if !exists {
                    return Some(format!("No room type {} on {}.", room_id, id));
                }
                put(state, id, room_id.to_string(), price, &name.join(" "))
            }
            _ => usage("room-edit <id> <room-id> <price|-> <name...>"),
        },
        "room-rm" => match args.as_slice() {
            &[id, room_id] => remove(state, id, room_id),
            _ => usage("room-rm <id> <room-id>"),
        },
        _ => return None,
    };
    Some(reply)
}

/// Parse a price argument; `-` means no price
fn parse_price(raw: &str) -> Result<Option<f64>, String> {
    if raw == "-" {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(Some(price)),
        _ => Err(format!("Invalid price: {}", raw)),
    }
}

fn format_price(price: Option<f64>) -> String {
    price.map_or_else(|| "-".to_string(), |p| p.to_string())
}

fn rooms<S: SlotStore>(state: &AppState<S>, id: &str) -> String {
    let Some(listing) = state.accessible_listing(id) else {
        return format!("No listing {}.", id);
    };
    if listing.room_types.is_empty() {
        return format!("{} has no room types.", listing.name);
    }
    listing
        .room_types
        .iter()
        .map(|r| format!("{}  {}  {}", r.id, r.name, format_price(r.price)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn put<S: SlotStore>(
    state: &mut AppState<S>,
    id: &str,
    room_id: String,
    price: &str,
    name: &str,
) -> String {
    if state.accessible_listing(id).is_none() {
        return format!("No listing {}.", id);
    }
    let price = match parse_price(price) {
        Ok(price) => price,
        Err(message) => return message,
    };

    match state.listings.put_room_type(id, RoomType::new(room_id, name, price)) {
        Ok(()) => format!("Saved room type {} on {}.", name, id),
        Err(e) => e.to_string(),
    }
}

fn remove<S: SlotStore>(state: &mut AppState<S>, id: &str, room_id: &str) -> String {
    let exists = state
        .accessible_listing(id)
        .is_some_and(|l| l.room_type(room_id).is_some());
    if !exists {
        return format!("No room type {} on {}.", room_id, id);
    }

    state.listings.remove_room_type(id, room_id);
    format!("Removed room type {} from {}.", room_id, id)
}
