//! Console view model
//!
//! Each line typed at the prompt is split into a command word and the rest
//! of the line, then offered to the handler modules in turn. A handler
//! returns `None` for commands it does not own.

mod admin;
mod auth;
mod listings;
mod rooms;

use eshotel_core::SlotStore;

use crate::state::AppState;

pub const HELP: &str = "\
Commands:
  help                                   show this text
  quit                                   leave eshotel
  whoami                                 show the logged-in account
  login <user> <password>                log in
  logout                                 log out
  register <user> <password> <confirm> [admin|merchant]
Merchant workspace:
  list                                   your listings
  show <id>                              listing details as JSON
  save <json>                            save a listing without submitting
  submit <json>                          save a listing and submit it for review
  remove <id>                            delete a listing
  rooms <id>                             room types of a listing
  room-add <id> <price|-> <name...>      add a room type
  room-edit <id> <room-id> <price|-> <name...>
  room-rm <id> <room-id>                 delete a room type
Review desk (admin):
  all                                    every listing, most recent first
  approve <id>
  reject <id> <reason...>
  publish <id>
  unpublish <id>";

type Handler<S> = fn(&mut AppState<S>, &str, &str) -> Option<String>;

/// Result of one console line
#[derive(Debug, PartialEq)]
pub enum Reply {
    Output(String),
    Quit,
}

pub fn dispatch<S: SlotStore>(state: &mut AppState<S>, line: &str) -> Reply {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(command, rest)| (command, rest.trim()))
        .unwrap_or((line, ""));

    match command {
        "" => return Reply::Output(String::new()),
        "help" => return Reply::Output(HELP.to_string()),
        "quit" | "exit" => return Reply::Quit,
        _ => {}
    }

    let handlers: [Handler<S>; 4] = [
        auth::handle,
        listings::handle,
        rooms::handle,
        admin::handle,
    ];
    let output = handlers
        .iter()
        .find_map(|handle| handle(state, command, rest))
        .unwrap_or_else(|| format!("Unknown command: {}. Type help for a list.", command));
    Reply::Output(output)
}

pub(crate) const LOGIN_REQUIRED: &str = "Please log in first.";

pub(crate) fn usage(text: &str) -> String {
    format!("Usage: {}", text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::*;

    fn output(state: &mut TestState, line: &str) -> String {
        match dispatch(state, line) {
            Reply::Output(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_quit_and_help() {
        let mut state = state();
        assert_eq!(dispatch(&mut state, "quit"), Reply::Quit);
        assert_eq!(dispatch(&mut state, "  exit  "), Reply::Quit);
        assert!(output(&mut state, "help").contains("room-add"));
        assert_eq!(output(&mut state, "   "), "");
    }

    #[test]
    fn test_unknown_command() {
        let mut state = state();
        assert!(output(&mut state, "dance now").starts_with("Unknown command: dance"));
    }

    #[test]
    fn test_session_commands_need_login() {
        let mut state = state();
        assert_eq!(output(&mut state, "list"), LOGIN_REQUIRED);
        assert_eq!(output(&mut state, "rooms h1"), LOGIN_REQUIRED);
        assert_eq!(output(&mut state, "all"), LOGIN_REQUIRED);
    }

    #[test]
    fn test_merchant_to_admin_flow() {
        let mut state = state();
        output(&mut state, "login 1234 1234");
        output(
            &mut state,
            r#"submit {"name":"Sea Breeze","address":"1 Beach Rd","star":4,"openingTime":"2020-05"}"#,
        );
        let id = state.listings.listings()[0].id.clone();
        output(&mut state, &format!("room-add {} 399 Twin Room", id));
        output(&mut state, "logout");

        output(&mut state, "login admin 1234");
        assert!(output(&mut state, "all").contains("pending"));
        output(&mut state, &format!("approve {}", id));
        output(&mut state, &format!("publish {}", id));

        let listing = state.listings.get(&id).unwrap();
        assert!(listing.published);
        assert_eq!(listing.created_by, "1234");
        assert_eq!(listing.room_types.len(), 1);
    }
}
