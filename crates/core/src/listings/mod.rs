//! Listing lifecycle engine
//!
//! Owns the in-memory listing sequence and enforces the review/publish
//! rules on every mutation. Each mutation persists the whole sequence to
//! the listings slot; a failed write is logged and the in-memory sequence
//! stays authoritative.
//!
//! Review transitions:
//!
//! ```text
//! draft ──submit──▶ pending ──approve──▶ approved
//!                      │  ▲
//!               reject │  │ resubmit
//!                      ▼  │
//!                    rejected
//! ```
//!
//! `approve` and `reject` only act on pending listings. `published` is an
//! overlay that can only be switched on for approved listings, and a
//! rejection switches it off. Operations on unknown ids are silent no-ops.
//!
//! Stored records that fail to decode are kept aside and written back
//! after the decoded listings, so a mutation never drops them.

pub mod legacy;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::invariants::{assert_listing_invariants, assert_room_ids_unique};
use crate::models::{Listing, ListingInput, ReviewStatus, RoomType};
use crate::storage::slots::{self, Record};
use crate::storage::SlotStore;

/// Owner of the listing sequence
pub struct ListingEngine<S: SlotStore> {
    store: S,
    clock: Box<dyn Clock>,
    listings: Vec<Listing>,
    /// Stored records that could not be decoded, written back untouched
    unreadable: Vec<Value>,
}

impl<S: SlotStore> ListingEngine<S> {
    /// Load listings from the store using the wall clock
    pub fn load(store: S) -> Self {
        Self::with_clock(store, Box::new(SystemClock))
    }

    /// Load listings from the store, upgrading legacy records
    #[instrument(skip_all)]
    pub fn with_clock(store: S, clock: Box<dyn Clock>) -> Self {
        let now = clock.now_millis();
        let mut listings = Vec::new();
        let mut unreadable = Vec::new();
        for (index, record) in slots::load_listing_records(&store).into_iter().enumerate() {
            let mut upgraded = record.clone();
            if !legacy::migrate_record(&mut upgraded, now) {
                warn!(index, "Keeping listing record that is not an object");
                unreadable.push(record);
                continue;
            }
            match serde_json::from_value::<Listing>(upgraded) {
                Ok(listing) => listings.push(listing),
                Err(e) => {
                    warn!(index, error = %e, "Keeping undecodable listing record");
                    unreadable.push(record);
                }
            }
        }

        info!(
            count = listings.len(),
            unreadable = unreadable.len(),
            "Loaded listings"
        );
        Self {
            store,
            clock,
            listings,
            unreadable,
        }
    }

    /// All listings in stored order
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    /// Listings a merchant may see: their own plus unowned legacy ones
    pub fn visible_to(&self, username: &str) -> Vec<&Listing> {
        self.listings
            .iter()
            .filter(|l| l.is_visible_to(username))
            .collect()
    }

    /// All listings, most recently modified first
    pub fn by_recency(&self) -> Vec<&Listing> {
        let mut sorted: Vec<&Listing> = self.listings.iter().collect();
        sorted.sort_by_key(|l| std::cmp::Reverse(l.last_modified()));
        sorted
    }

    /// Current time on the engine's clock
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Insert or merge a listing by id, returning the id it was stored under.
    ///
    /// An existing listing keeps its `published` flag, its creation time and
    /// (when the input omits them) its room types and owner. Submitting for
    /// review moves it to `pending` and clears any rejection reason;
    /// otherwise the current review state is kept.
    #[instrument(skip(self, input), fields(id = input.supplied_id()))]
    pub fn save_one(&mut self, input: ListingInput, submit_for_review: bool) -> String {
        let now = self.clock.now_millis();
        let position = input
            .supplied_id()
            .and_then(|id| self.listings.iter().position(|l| l.id == id));

        let id = match position {
            Some(index) => {
                let previous = &self.listings[index];
                let (review_status, reject_reason) = if submit_for_review {
                    (ReviewStatus::Pending, String::new())
                } else {
                    (previous.review_status, previous.reject_reason.clone())
                };
                let room_types = input
                    .room_types
                    .clone()
                    .unwrap_or_else(|| previous.room_types.clone());
                let created_by = input
                    .created_by
                    .clone()
                    .unwrap_or_else(|| previous.created_by.clone());
                let merged = Listing {
                    published: previous.published,
                    room_types,
                    created_by,
                    created_at: previous.created_at,
                    extra: previous.extra.clone(),
                    ..build_listing(previous.id.clone(), input, review_status, reject_reason, now)
                };
                info!(
                    id = %merged.id,
                    status = %merged.review_status,
                    "Updated listing"
                );
                self.listings[index] = merged;
                self.listings[index].id.clone()
            }
            None => {
                let id = match input.supplied_id() {
                    Some(id) => id.to_string(),
                    None => self.generate_id(now),
                };
                let status = if submit_for_review {
                    ReviewStatus::Pending
                } else {
                    ReviewStatus::Draft
                };
                let mut listing = build_listing(id.clone(), input, status, String::new(), now);
                listing.published = false;
                listing.created_at = Some(now);
                info!(id = %listing.id, status = %listing.review_status, "Created listing");
                self.listings.push(listing);
                id
            }
        };

        if let Some(listing) = self.get(&id) {
            assert_listing_invariants(listing);
        }
        self.persist();
        id
    }

    /// Overwrite a listing's review status.
    ///
    /// The rejection reason is only kept when the new status is `rejected`.
    #[instrument(skip(self, reject_reason))]
    pub fn set_review(&mut self, id: &str, status: ReviewStatus, reject_reason: Option<&str>) {
        let now = self.clock.now_millis();
        let Some(listing) = self.listings.iter_mut().find(|l| l.id == id) else {
            debug!("Review of unknown listing ignored");
            return;
        };

        listing.review_status = status;
        listing.reject_reason = match status {
            ReviewStatus::Rejected => reject_reason.unwrap_or_default().to_string(),
            _ => String::new(),
        };
        listing.updated_at = Some(now);
        assert_listing_invariants(listing);
        info!(%status, "Review status set");

        self.persist();
    }

    /// Approve a pending listing
    pub fn approve(&mut self, id: &str) -> Result<()> {
        self.ensure_pending(id)?;
        self.set_review(id, ReviewStatus::Approved, None);
        Ok(())
    }

    /// Reject a pending listing; a reason is required.
    ///
    /// A listing still published from an earlier approval is taken offline.
    pub fn reject(&mut self, id: &str, reason: &str) -> Result<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(Error::Validation("a rejection reason is required".into()));
        }
        self.ensure_pending(id)?;

        if let Some(listing) = self.listings.iter_mut().find(|l| l.id == id) {
            if listing.published {
                info!(id, "Unpublishing rejected listing");
                listing.published = false;
            }
        }
        self.set_review(id, ReviewStatus::Rejected, Some(reason));
        Ok(())
    }

    /// Review decisions only apply to listings awaiting review
    fn ensure_pending(&self, id: &str) -> Result<()> {
        match self.get(id) {
            Some(listing) if listing.review_status != ReviewStatus::Pending => {
                Err(Error::InvalidOperation(format!(
                    "listing {} is {} and is not awaiting review",
                    id, listing.review_status
                )))
            }
            _ => Ok(()),
        }
    }

    /// Publish or unpublish a listing.
    ///
    /// Publishing requires the listing to be approved; unpublishing is always
    /// allowed. The review status is never touched.
    #[instrument(skip(self))]
    pub fn set_published(&mut self, id: &str, published: bool) -> Result<()> {
        let now = self.clock.now_millis();
        let Some(listing) = self.listings.iter_mut().find(|l| l.id == id) else {
            debug!("Publish toggle of unknown listing ignored");
            return Ok(());
        };

        if published && listing.review_status != ReviewStatus::Approved {
            return Err(Error::InvalidOperation(format!(
                "listing {} is {} and cannot be published until approved",
                id, listing.review_status
            )));
        }

        listing.published = published;
        listing.updated_at = Some(now);
        info!(published, "Publish state set");

        self.persist();
        Ok(())
    }

    /// Delete a listing together with its room types
    #[instrument(skip(self))]
    pub fn remove_one(&mut self, id: &str) {
        let before = self.listings.len();
        self.listings.retain(|l| l.id != id);
        if self.listings.len() == before {
            debug!("Removal of unknown listing ignored");
            return;
        }

        info!("Removed listing");
        self.persist();
    }

    /// Add a room type, or replace the one with the same id.
    ///
    /// A room without an id gets a generated one. The updated room is moved
    /// to the end of the list. Goes through [`save_one`](Self::save_one)
    /// without submitting, so the review state is unchanged.
    #[instrument(skip(self, room), fields(room_id = %room.id))]
    pub fn put_room_type(&mut self, listing_id: &str, room: RoomType) -> Result<()> {
        let name = room.name.trim();
        if name.is_empty() {
            return Err(Error::Validation("room type name is required".into()));
        }
        let Some(listing) = self.get(listing_id) else {
            debug!("Room update for unknown listing ignored");
            return Ok(());
        };

        let room_id = if room.id.is_empty() {
            format!("rt_{}_{}", listing_id, self.clock.now_millis())
        } else {
            room.id.clone()
        };

        let mut input = ListingInput::from(listing);
        let mut rooms: Vec<RoomType> = listing
            .room_types
            .iter()
            .filter(|r| r.id != room_id)
            .cloned()
            .collect();
        rooms.push(RoomType::new(room_id, name, room.price));
        input.room_types = Some(rooms);

        let id = self.save_one(input, false);
        if let Some(listing) = self.get(&id) {
            assert_room_ids_unique(listing);
        }
        Ok(())
    }

    /// Delete a room type from a listing
    #[instrument(skip(self))]
    pub fn remove_room_type(&mut self, listing_id: &str, room_id: &str) {
        let Some(listing) = self.get(listing_id) else {
            debug!("Room removal for unknown listing ignored");
            return;
        };

        let mut input = ListingInput::from(listing);
        input.room_types = Some(
            listing
                .room_types
                .iter()
                .filter(|r| r.id != room_id)
                .cloned()
                .collect(),
        );

        self.save_one(input, false);
    }

    fn generate_id(&self, now: i64) -> String {
        let base = format!("hotel_{}", now);
        if self.get(&base).is_none() {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}_{}", base, n);
            if self.get(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    fn persist(&self) {
        let records: Vec<Record<'_, Listing>> = self
            .listings
            .iter()
            .map(Record::Decoded)
            .chain(self.unreadable.iter().map(Record::Raw))
            .collect();
        slots::save_listings(&self.store, &records);
    }
}

/// Listing carrying the input's descriptive fields
fn build_listing(
    id: String,
    input: ListingInput,
    review_status: ReviewStatus,
    reject_reason: String,
    now: i64,
) -> Listing {
    Listing {
        id,
        name: input.name,
        name_en: input.name_en,
        address: input.address,
        star: input.star,
        opening_time: input.opening_time,
        nearby_info: input.nearby_info,
        services: input.services,
        promotions: input.promotions,
        custom_dimensions: input.custom_dimensions,
        images: input.images,
        room_types: input.room_types.unwrap_or_default(),
        review_status,
        reject_reason,
        published: false,
        created_by: input.created_by.unwrap_or_default(),
        created_at: None,
        updated_at: Some(now),
        extra: Default::default(),
    }
}
