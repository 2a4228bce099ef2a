//! Permission system for listing operations

use crate::models::Role;

/// Actions that can be performed on listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingAction {
    // Merchant workspace
    ViewOwnListings,
    EditListing,
    ManageRoomTypes,
    RemoveListing,

    // Review desk
    ViewAllListings,
    ReviewListing,
    PublishListing,
}

/// Permission matrix for account roles
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// Check if a role has permission to perform an action
    pub fn can_perform(role: Role, action: ListingAction) -> bool {
        match action {
            ListingAction::ViewOwnListings
            | ListingAction::EditListing
            | ListingAction::ManageRoomTypes
            | ListingAction::RemoveListing => true,

            // Admin only
            ListingAction::ViewAllListings
            | ListingAction::ReviewListing
            | ListingAction::PublishListing => role == Role::Admin,
        }
    }
}
