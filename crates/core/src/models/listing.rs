//! Hotel listing model - the unit moving through review and publishing

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Maximum number of inlined images per listing
pub const MAX_IMAGES: usize = 9;

/// Review state of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Saved by the merchant, not yet submitted
    #[default]
    Draft,
    /// Submitted and waiting for an administrator
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 4] = [
        ReviewStatus::Draft,
        ReviewStatus::Pending,
        ReviewStatus::Approved,
        ReviewStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Draft => "draft",
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    /// Parse a stored status tag
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == tag)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookable room type owned by a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: String,
    pub name: String,
    /// Price per night
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl RoomType {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// Free-form name/value pair shown alongside the listing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomDimension {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// A stored hotel listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star: Option<u8>,
    /// Opening month, `YYYY-MM`
    #[serde(default)]
    pub opening_time: String,
    #[serde(default)]
    pub nearby_info: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub promotions: Vec<String>,
    #[serde(default)]
    pub custom_dimensions: Vec<CustomDimension>,
    /// Inlined image references (data URLs)
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub room_types: Vec<RoomType>,
    #[serde(default)]
    pub review_status: ReviewStatus,
    #[serde(default)]
    pub reject_reason: String,
    #[serde(default)]
    pub published: bool,
    /// Owning merchant; empty for legacy records
    #[serde(default)]
    pub created_by: String,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    /// Fields this version does not model, kept as stored
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listing {
    /// Legacy records without an owner are visible to every merchant
    pub fn is_visible_to(&self, username: &str) -> bool {
        self.created_by.is_empty() || self.created_by == username
    }

    /// Last modification time, falling back to creation time
    pub fn last_modified(&self) -> i64 {
        self.updated_at.or(self.created_at).unwrap_or(0)
    }

    pub fn room_type(&self, room_id: &str) -> Option<&RoomType> {
        self.room_types.iter().find(|r| r.id == room_id)
    }
}

/// Listing payload submitted by the editing form
///
/// `room_types` and `created_by` are optional: leaving them out keeps the
/// stored values of an existing listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star: Option<u8>,
    #[serde(default)]
    pub opening_time: String,
    #[serde(default)]
    pub nearby_info: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub promotions: Vec<String>,
    #[serde(default)]
    pub custom_dimensions: Vec<CustomDimension>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_types: Option<Vec<RoomType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl ListingInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_star(mut self, star: u8) -> Self {
        self.star = Some(star);
        self
    }

    pub fn with_room_types(mut self, room_types: Vec<RoomType>) -> Self {
        self.room_types = Some(room_types);
        self
    }

    pub fn with_created_by(mut self, username: impl Into<String>) -> Self {
        self.created_by = Some(username.into());
        self
    }

    /// Supplied id, treating an empty string as absent
    pub fn supplied_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Clean up raw form values.
    ///
    /// Trims text, drops blank list entries and assigns ids to room types
    /// that have none.
    pub fn normalized(&self, now_millis: i64) -> Self {
        let trim_list = |items: &[String]| -> Vec<String> {
            items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };

        let custom_dimensions = self
            .custom_dimensions
            .iter()
            .map(|d| CustomDimension {
                name: d.name.trim().to_string(),
                value: d.value.trim().to_string(),
            })
            .filter(|d| !d.name.is_empty() || !d.value.is_empty())
            .collect();

        let owner_tag = self.supplied_id().unwrap_or("new").to_string();
        let room_types = self.room_types.as_ref().map(|rooms| {
            rooms
                .iter()
                .filter(|r| !r.name.trim().is_empty())
                .enumerate()
                .map(|(idx, r)| {
                    let id = if r.id.is_empty() {
                        format!("rt_{}_{}_{}", owner_tag, now_millis, idx)
                    } else {
                        r.id.clone()
                    };
                    RoomType::new(id, r.name.trim(), r.price)
                })
                .collect()
        });

        Self {
            id: self.id.clone(),
            name: self.name.trim().to_string(),
            name_en: self.name_en.trim().to_string(),
            address: self.address.trim().to_string(),
            star: self.star,
            opening_time: self.opening_time.trim().to_string(),
            nearby_info: self.nearby_info.trim().to_string(),
            services: trim_list(&self.services),
            promotions: trim_list(&self.promotions),
            custom_dimensions,
            images: self.images.clone(),
            room_types,
            created_by: self.created_by.clone(),
        }
    }

    /// Check the fields the editing form requires
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("hotel name is required".into()));
        }
        if self.address.trim().is_empty() {
            return Err(Error::Validation("hotel address is required".into()));
        }
        match self.star {
            Some(1..=5) => {}
            Some(star) => {
                return Err(Error::Validation(format!(
                    "star rating must be between 1 and 5, got {}",
                    star
                )))
            }
            None => return Err(Error::Validation("star rating is required".into())),
        }
        if !is_year_month(&self.opening_time) {
            return Err(Error::Validation(
                "opening time must be given as YYYY-MM".into(),
            ));
        }
        if let Some(rooms) = &self.room_types {
            let mut ids = std::collections::HashSet::new();
            if let Some(dup) = rooms
                .iter()
                .filter(|r| !r.id.is_empty())
                .find(|r| !ids.insert(r.id.as_str()))
            {
                return Err(Error::Validation(format!(
                    "room type id {} is used twice",
                    dup.id
                )));
            }
        }
        if self.images.len() > MAX_IMAGES {
            return Err(Error::Validation(format!(
                "at most {} images are allowed",
                MAX_IMAGES
            )));
        }
        Ok(())
    }
}

impl From<&Listing> for ListingInput {
    fn from(listing: &Listing) -> Self {
        Self {
            id: Some(listing.id.clone()),
            name: listing.name.clone(),
            name_en: listing.name_en.clone(),
            address: listing.address.clone(),
            star: listing.star,
            opening_time: listing.opening_time.clone(),
            nearby_info: listing.nearby_info.clone(),
            services: listing.services.clone(),
            promotions: listing.promotions.clone(),
            custom_dimensions: listing.custom_dimensions.clone(),
            images: listing.images.clone(),
            room_types: Some(listing.room_types.clone()),
            created_by: Some(listing.created_by.clone()),
        }
    }
}

fn is_year_month(value: &str) -> bool {
    value.len() == 7 && NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").is_ok()
}
