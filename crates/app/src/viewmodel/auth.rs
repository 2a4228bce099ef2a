//! Authentication view model

use eshotel_core::{Error, SlotStore};
use tracing::debug;

use super::usage;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

pub fn handle<S: SlotStore>(state: &mut AppState<S>, command: &str, rest: &str) -> Option<String> {
    let args: Vec<&str> = rest.split_whitespace().collect();

    let reply = match command {
        "whoami" => match state.session() {
            Some(session) => format!("{} ({})", session.username, session.role),
            None => "Not logged in.".to_string(),
        },
        "login" => {
            let &[username, password] = args.as_slice() else {
                return Some(usage("login <user> <password>"));
            };
            match state.accounts.login(username, password) {
                Ok(session) => format!("Welcome, {} ({}).", session.username, session.role),
                Err(e) => format!("Login failed: {}", e),
            }
        }
        "logout" => {
            if state.session().is_none() {
                "Not logged in.".to_string()
            } else {
                state.accounts.logout();
                "Logged out.".to_string()
            }
        }
        "register" => {
            let (username, password, confirm, role) = match args.as_slice() {
                &[u, p, c] => (u, p, c, "merchant"),
                &[u, p, c, r] => (u, p, c, r),
                _ => {
                    return Some(usage(
                        "register <user> <password> <confirm> [admin|merchant]",
                    ))
                }
            };
            register(state, username, password, confirm, role)
        }
        _ => return None,
    };
    Some(reply)
}

fn register<S: SlotStore>(
    state: &mut AppState<S>,
    username: &str,
    password: &str,
    confirm: &str,
    role: &str,
) -> String {
    if username.trim().is_empty() {
        return "Username is required.".to_string();
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return format!(
            "Password must be at least {} characters.",
            MIN_PASSWORD_LEN
        );
    }
    if password != confirm {
        return "Passwords do not match.".to_string();
    }

    match state.accounts.register(username, password, role) {
        Ok(()) => format!("Registered {}. Log in to continue.", username),
        Err(Error::UsernameExists(_)) => "That username is already taken.".to_string(),
        Err(e) => {
            debug!(error = %e, "Registration failed");
            format!("Registration failed: {}", e)
        }
    }
}
