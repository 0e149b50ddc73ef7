use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::StoreError, listingdb::ListingExt, search::SearchFilters},
    dtos::listingdtos::ListingInputDto,
    models::listingmodel::{Listing, NewListing},
    service::{
        error::{Action, FieldErrors, ListingError},
        guard::{require_owner, require_realtor, Caller, LISTING_NOT_FOUND},
    },
    utils::image_utils::{is_owned_by, ImageStore},
};

const SLUG_TAKEN: &str = "Realestate with this slug already exists";
const FOREIGN_PHOTO: &str = "Photo reference must start with the realtor's id";

/// Outcome of a successful delete. The record is always gone; photo
/// cleanup is best-effort and failures are reported, not raised.
/// `images_kept` holds references left in place because another listing
/// still uses them or they sit outside the caller's folder.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeletedListing {
    pub images_removed: Vec<String>,
    pub images_kept: Vec<String>,
    pub images_failed: Vec<String>,
}

#[derive(Clone)]
pub struct ListingService {
    db_client: Arc<dyn ListingExt>,
    image_store: Arc<dyn ImageStore>,
}

fn slug_taken() -> ListingError {
    let mut fields = FieldErrors::new();
    fields.insert("slug".to_string(), vec![SLUG_TAKEN.to_string()]);
    ListingError::Validation(fields)
}

fn check_photo_owner(realtor_id: Uuid, listing: &NewListing) -> Result<(), ListingError> {
    let mut fields = FieldErrors::new();
    for (field, reference) in listing.images().named() {
        if !is_owned_by(reference, realtor_id) {
            fields
                .entry(field.to_string())
                .or_default()
                .push(FOREIGN_PHOTO.to_string());
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ListingError::Validation(fields))
    }
}

impl ListingService {
    pub fn new(db_client: Arc<dyn ListingExt>, image_store: Arc<dyn ImageStore>) -> Self {
        ListingService {
            db_client,
            image_store,
        }
    }

    /// The caller's own listings, newest first. May be empty.
    pub async fn list_own(&self, caller: &Caller) -> Result<Vec<Listing>, ListingError> {
        let caller = require_realtor(caller, Action::Retrieve)?;

        self.db_client
            .get_listings_by_realtor(caller.id)
            .await
            .map_err(ListingError::internal(Action::Retrieve))
    }

    pub async fn get_own(&self, caller: &Caller, slug: &str) -> Result<Listing, ListingError> {
        let caller = require_realtor(caller, Action::Retrieve)?;

        let listing = self
            .db_client
            .get_listing_by_realtor_and_slug(caller.id, slug)
            .await
            .map_err(ListingError::internal(Action::Retrieve))?
            .ok_or(ListingError::NotFound(LISTING_NOT_FOUND))?;

        require_owner(caller, &listing)?;
        Ok(listing)
    }

    pub async fn create(
        &self,
        caller: &Caller,
        input: ListingInputDto,
    ) -> Result<Listing, ListingError> {
        let caller = require_realtor(caller, Action::Post)?;
        let new = input.into_new_listing().map_err(ListingError::Validation)?;
        check_photo_owner(caller.id, &new)?;

        let listing = self
            .db_client
            .create_listing(caller.id, &new)
            .await
            .map_err(|err| match err {
                StoreError::DuplicateSlug => slug_taken(),
                other => ListingError::internal(Action::Post)(other),
            })?;

        tracing::info!(realtor = %caller.id, slug = %listing.slug, "listing created");
        Ok(listing)
    }

    /// Full replace of the listing named by the body's slug. The slug itself
    /// is never rewritten.
    pub async fn replace(
        &self,
        caller: &Caller,
        input: ListingInputDto,
    ) -> Result<Listing, ListingError> {
        let caller = require_realtor(caller, Action::Update)?;
        if input.slug.as_deref().map_or(true, str::is_empty) {
            return Err(ListingError::BadRequest("Slug is not provided"));
        }
        let new = input.into_new_listing().map_err(ListingError::Validation)?;
        check_photo_owner(caller.id, &new)?;

        let listing = self
            .db_client
            .replace_listing(caller.id, &new.slug, &new)
            .await
            .map_err(ListingError::internal(Action::Update))?
            .ok_or(ListingError::NotFound(LISTING_NOT_FOUND))?;

        tracing::info!(realtor = %caller.id, slug = %listing.slug, "listing replaced");
        Ok(listing)
    }

    pub async fn set_published(
        &self,
        caller: &Caller,
        slug: Option<&str>,
        is_published: Option<bool>,
    ) -> Result<(), ListingError> {
        let caller = require_realtor(caller, Action::Update)?;
        let slug = slug.ok_or(ListingError::BadRequest("Slug is not provided"))?;
        let is_published =
            is_published.ok_or(ListingError::BadRequest("is_published must be provided"))?;

        let updated = self
            .db_client
            .set_listing_published(caller.id, slug, is_published)
            .await
            .map_err(ListingError::internal(Action::Update))?;

        if !updated {
            return Err(ListingError::NotFound(LISTING_NOT_FOUND));
        }

        tracing::info!(realtor = %caller.id, slug, is_published, "listing visibility changed");
        Ok(())
    }

    pub async fn delete(
        &self,
        caller: &Caller,
        slug: Option<&str>,
    ) -> Result<DeletedListing, ListingError> {
        let caller = require_realtor(caller, Action::Delete)?;
        let slug = slug.ok_or(ListingError::BadRequest("Slug is not provided"))?;

        let images = self
            .db_client
            .delete_listing(caller.id, slug)
            .await
            .map_err(ListingError::internal(Action::Delete))?
            .ok_or(ListingError::NotFound(LISTING_NOT_FOUND))?;

        let still_there = self
            .db_client
            .get_listing_by_realtor_and_slug(caller.id, slug)
            .await
            .map_err(ListingError::internal(Action::Delete))?;

        if still_there.is_some() {
            tracing::warn!(realtor = %caller.id, slug, "listing still present after delete");
            return Err(ListingError::BadRequest("Failed to delete"));
        }

        let mut outcome = DeletedListing::default();
        for reference in images.references() {
            self.remove_image(caller, slug, reference, &mut outcome).await;
        }

        tracing::info!(
            realtor = %caller.id,
            slug,
            removed = outcome.images_removed.len(),
            kept = outcome.images_kept.len(),
            failed = outcome.images_failed.len(),
            "listing deleted"
        );
        Ok(outcome)
    }

    /// Removes one photo of a deleted listing unless it belongs to another
    /// realtor or another listing still shows it.
    async fn remove_image(
        &self,
        caller: &Caller,
        slug: &str,
        reference: &str,
        outcome: &mut DeletedListing,
    ) {
        if !is_owned_by(reference, caller.id) {
            tracing::warn!(realtor = %caller.id, slug, reference, "kept photo outside the realtor's folder");
            outcome.images_kept.push(reference.to_string());
            return;
        }

        match self.db_client.image_in_use(reference).await {
            Ok(false) => {}
            Ok(true) => {
                tracing::debug!(slug, reference, "kept photo shared with another listing");
                outcome.images_kept.push(reference.to_string());
                return;
            }
            Err(err) => {
                tracing::warn!(slug, error = %err, "failed to check photo usage");
                outcome.images_failed.push(reference.to_string());
                return;
            }
        }

        match self.image_store.delete(reference).await {
            Ok(()) => outcome.images_removed.push(reference.to_string()),
            Err(err) => {
                tracing::warn!(slug, error = %err, "failed to remove listing image");
                outcome.images_failed.push(reference.to_string());
            }
        }
    }

    pub async fn get_published(&self, slug: Option<&str>) -> Result<Listing, ListingError> {
        let slug = slug.ok_or(ListingError::BadRequest("Must provide slug"))?;

        self.db_client
            .get_published_listing(slug)
            .await
            .map_err(ListingError::internal(Action::Retrieve))?
            .ok_or(ListingError::NotFound(
                "Published detail with provided slug does not exist",
            ))
    }

    pub async fn list_published(&self) -> Result<Vec<Listing>, ListingError> {
        let listings = self
            .db_client
            .get_published_listings()
            .await
            .map_err(ListingError::internal(Action::Retrieve))?;

        if listings.is_empty() {
            return Err(ListingError::NotFound("Published list does not exist"));
        }
        Ok(listings)
    }

    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Listing>, ListingError> {
        let listings = self
            .db_client
            .search_listings(filters)
            .await
            .map_err(ListingError::internal(Action::Search))?;

        if listings.is_empty() {
            return Err(ListingError::NotFound("No search data is found"));
        }
        Ok(listings)
    }
}
