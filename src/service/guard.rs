use uuid::Uuid;

use crate::{
    models::{listingmodel::Listing, usermodel::User},
    service::error::{Action, ListingError},
};

pub const LISTING_NOT_FOUND: &str = "Realestate data are not found";

/// The authenticated identity a request acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub email: String,
    pub is_realtor: bool,
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Caller {
            id: user.id,
            email: user.email.clone(),
            is_realtor: user.is_realtor,
        }
    }
}

pub fn require_realtor(caller: &Caller, action: Action) -> Result<&Caller, ListingError> {
    if !caller.is_realtor {
        tracing::debug!(caller = %caller.id, action = action.verb(), "non-realtor refused");
        return Err(ListingError::NotRealtor(action));
    }
    Ok(caller)
}

/// A listing owned by someone else is reported exactly like a missing one.
pub fn require_owner(caller: &Caller, listing: &Listing) -> Result<(), ListingError> {
    if listing.realtor_id != caller.id {
        return Err(ListingError::NotFound(LISTING_NOT_FOUND));
    }
    Ok(())
}
