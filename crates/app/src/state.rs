//! Application state management

use std::fs;
use std::path::Path;
use std::rc::Rc;

use eshotel_core::{
    AccountStore, AppConfig, Database, Listing, ListingAction, ListingEngine, PermissionMatrix,
    Result, Session, SlotStore,
};
use tracing::info;

/// Services shared by every console command
pub struct AppState<S: SlotStore> {
    pub accounts: AccountStore<S>,
    pub listings: ListingEngine<S>,
}

impl AppState<Rc<Database>> {
    /// Open the database and build the services from configuration
    pub fn open(config: &AppConfig, data_dir: Option<&Path>) -> Result<Self> {
        let db_path = config.database_path(data_dir)?;
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        info!(path = %db_path.display(), "Opening database");

        let db = Rc::new(Database::open(&db_path)?);
        info!(schema_version = db.schema_version(), "Database ready");
        let accounts =
            AccountStore::with_scheme(Rc::clone(&db), config.accounts.password_scheme.build())?;
        let listings = ListingEngine::load(db);
        Ok(Self::new(accounts, listings))
    }
}

impl<S: SlotStore> AppState<S> {
    pub fn new(accounts: AccountStore<S>, listings: ListingEngine<S>) -> Self {
        Self { accounts, listings }
    }

    pub fn session(&self) -> Option<&Session> {
        self.accounts.current_session()
    }

    /// Whether the logged-in account may perform `action`
    pub fn can(&self, action: ListingAction) -> bool {
        self.session()
            .is_some_and(|s| PermissionMatrix::can_perform(s.role, action))
    }

    /// Look up a listing the current account may work on.
    ///
    /// Admins see every listing; merchants see their own and unowned ones.
    pub fn accessible_listing(&self, id: &str) -> Option<&Listing> {
        let session = self.session()?;
        let listing = self.listings.get(id)?;
        if session.is_admin() || listing.is_visible_to(&session.username) {
            Some(listing)
        } else {
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::rc::Rc;

    use eshotel_core::{AccountStore, ListingEngine, MemorySlots, SteppingClock};

    use super::AppState;

    pub type TestState = AppState<Rc<MemorySlots>>;

    pub fn state() -> TestState {
        let store = Rc::new(MemorySlots::new());
        let accounts = AccountStore::load(Rc::clone(&store)).unwrap();
        let listings =
            ListingEngine::with_clock(store, Box::new(SteppingClock::new(1_000, 10)));
        AppState::new(accounts, listings)
    }

    pub fn logged_in(username: &str) -> TestState {
        let mut state = state();
        state.accounts.login(username, "1234").unwrap();
        state
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use eshotel_core::ListingInput;

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default();
        {
            let mut state = AppState::open(&config, Some(dir.path())).unwrap();
            state.accounts.login("admin", "1234").unwrap();
            state.listings.save_one(ListingInput::new("Harbor View"), false);
        }

        let state = AppState::open(&config, Some(dir.path())).unwrap();
        assert!(state.accounts.is_admin());
        assert!(Database::open(config.database_path(Some(dir.path())).unwrap())
            .unwrap()
            .schema_version()
            >= 2);
        assert_eq!(state.listings.listings().len(), 1);
    }

    #[test]
    fn test_permissions_follow_session() {
        let state = state();
        assert!(!state.can(ListingAction::EditListing));

        let state = logged_in("1234");
        assert!(state.can(ListingAction::EditListing));
        assert!(!state.can(ListingAction::ReviewListing));

        let state = logged_in("admin");
        assert!(state.can(ListingAction::ReviewListing));
    }

    #[test]
    fn test_accessible_listing_scoped_to_owner() {
        let mut state = logged_in("1234");
        let own = state
            .listings
            .save_one(ListingInput::new("Mine").with_created_by("1234"), false);
        let other = state
            .listings
            .save_one(ListingInput::new("Theirs").with_created_by("zoe"), false);
        let legacy = state.listings.save_one(ListingInput::new("Legacy"), false);

        assert!(state.accessible_listing(&own).is_some());
        assert!(state.accessible_listing(&legacy).is_some());
        assert!(state.accessible_listing(&other).is_none());

        state.accounts.logout();
        state.accounts.login("admin", "1234").unwrap();
        assert!(state.accessible_listing(&other).is_some());
    }
}
