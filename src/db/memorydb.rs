//! In-process stand-in for PostgreSQL used by the service and router tests.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    db::{
        db::StoreError,
        listingdb::ListingExt,
        search::SearchFilters,
        userdb::UserExt,
    },
    models::{
        listingmodel::{Listing, ListingImages, NewListing},
        usermodel::User,
    },
};

#[derive(Default)]
struct State {
    users: Vec<User>,
    listings: Vec<Listing>,
    last_tick: Option<DateTime<Utc>>,
}

impl State {
    /// Strictly increasing timestamps so "newest first" is deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_tick {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_tick = Some(next);
        next
    }
}

#[derive(Default)]
pub struct InMemoryDB {
    state: Mutex<State>,
    failing: AtomicBool,
}

impl InMemoryDB {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail like a dropped database connection.
    pub fn fail_all_calls(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Inserts a listing row as-is, skipping the service's input checks.
    pub fn insert_raw(&self, listing: Listing) {
        self.state.lock().unwrap().listings.push(listing);
    }

    pub fn listing_count(&self) -> usize {
        self.state.lock().unwrap().listings.len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn apply_writable(listing: &mut Listing, new: &NewListing) {
    listing.title = new.title.clone();
    listing.price = new.price.clone();
    listing.currency = new.currency;
    listing.street_address = new.street_address.clone();
    listing.city = new.city.clone();
    listing.state = new.state.clone();
    listing.country = new.country.clone();
    listing.zipcode = new.zipcode.clone();
    listing.area_value = new.area_value.clone();
    listing.area_unit = new.area_unit;
    listing.rent_or_sale_status = new.rent_or_sale_status;
    listing.listing_type = new.listing_type;
    listing.is_available = new.is_available;
    listing.available_date = new.available_date;
    listing.no_of_bedrooms = new.no_of_bedrooms;
    listing.no_of_bathrooms = new.no_of_bathrooms;
    listing.is_parking = new.is_parking;
    listing.facilities = new.facilities.clone();
    listing.nearby_places = new.nearby_places.clone();
    listing.overview = new.overview.clone();
    listing.main_photo = new.main_photo.clone();
    listing.photo_one = new.photo_one.clone();
    listing.photo_two = new.photo_two.clone();
    listing.photo_three = new.photo_three.clone();
    listing.is_published = new.is_published;
}

fn newest_first(mut listings: Vec<Listing>) -> Vec<Listing> {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    listings
}

#[async_trait]
impl UserExt for InMemoryDB {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();

        let user = match (user_id, email) {
            (Some(user_id), _) => state.users.iter().find(|u| u.id == user_id),
            (None, Some(email)) => state.users.iter().find(|u| u.email == email),
            (None, None) => None,
        };

        Ok(user.cloned())
    }

    async fn save_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        is_realtor: bool,
    ) -> Result<User, StoreError> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();

        if state.users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = state.tick();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            is_realtor,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());

        Ok(user)
    }
}

#[async_trait]
impl ListingExt for InMemoryDB {
    async fn get_listings_by_realtor(&self, realtor_id: Uuid) -> Result<Vec<Listing>, StoreError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();

        Ok(newest_first(
            state
                .listings
                .iter()
                .filter(|l| l.realtor_id == realtor_id)
                .cloned()
                .collect(),
        ))
    }

    async fn get_listing_by_realtor_and_slug(
        &self,
        realtor_id: Uuid,
        slug: &str,
    ) -> Result<Option<Listing>, StoreError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();

        Ok(state
            .listings
            .iter()
            .find(|l| l.realtor_id == realtor_id && l.slug == slug)
            .cloned())
    }

    async fn create_listing(
        &self,
        realtor_id: Uuid,
        new: &NewListing,
    ) -> Result<Listing, StoreError> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();

        if state.listings.iter().any(|l| l.slug == new.slug) {
            return Err(StoreError::DuplicateSlug);
        }

        let realtor_email = state
            .users
            .iter()
            .find(|u| u.id == realtor_id)
            .map(|u| u.email.clone())
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;

        let now = state.tick();
        let mut listing = Listing {
            id: Uuid::new_v4(),
            realtor_id,
            realtor_email,
            title: String::new(),
            slug: new.slug.clone(),
            created_at: now,
            modified_at: now,
            price: new.price.clone(),
            currency: new.currency,
            street_address: String::new(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
            zipcode: String::new(),
            area_value: new.area_value.clone(),
            area_unit: new.area_unit,
            rent_or_sale_status: new.rent_or_sale_status,
            listing_type: new.listing_type,
            is_available: true,
            available_date: None,
            no_of_bedrooms: 0,
            no_of_bathrooms: 0,
            is_parking: false,
            facilities: None,
            nearby_places: None,
            overview: None,
            main_photo: None,
            photo_one: None,
            photo_two: None,
            photo_three: None,
            is_published: false,
        };
        apply_writable(&mut listing, new);
        state.listings.push(listing.clone());

        Ok(listing)
    }

    async fn replace_listing(
        &self,
        realtor_id: Uuid,
        slug: &str,
        new: &NewListing,
    ) -> Result<Option<Listing>, StoreError> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();
        let now = state.tick();

        let Some(listing) = state
            .listings
            .iter_mut()
            .find(|l| l.realtor_id == realtor_id && l.slug == slug)
        else {
            return Ok(None);
        };

        apply_writable(listing, new);
        listing.modified_at = now;

        Ok(Some(listing.clone()))
    }

    async fn set_listing_published(
        &self,
        realtor_id: Uuid,
        slug: &str,
        is_published: bool,
    ) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();
        let now = state.tick();

        match state
            .listings
            .iter_mut()
            .find(|l| l.realtor_id == realtor_id && l.slug == slug)
        {
            Some(listing) => {
                listing.is_published = is_published;
                listing.modified_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_listing(
        &self,
        realtor_id: Uuid,
        slug: &str,
    ) -> Result<Option<ListingImages>, StoreError> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();

        let position = state
            .listings
            .iter()
            .position(|l| l.realtor_id == realtor_id && l.slug == slug);

        Ok(position.map(|index| state.listings.remove(index).images()))
    }

    async fn image_in_use(&self, reference: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();

        Ok(state
            .listings
            .iter()
            .any(|l| l.images().references().any(|r| r == reference)))
    }

    async fn get_published_listing(&self, slug: &str) -> Result<Option<Listing>, StoreError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();

        Ok(state
            .listings
            .iter()
            .find(|l| l.slug == slug && l.is_published)
            .cloned())
    }

    async fn get_published_listings(&self) -> Result<Vec<Listing>, StoreError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();

        Ok(newest_first(
            state
                .listings
                .iter()
                .filter(|l| l.is_published)
                .cloned()
                .collect(),
        ))
    }

    async fn search_listings(&self, filters: &SearchFilters) -> Result<Vec<Listing>, StoreError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();
        let predicates = filters.predicates();

        Ok(state
            .listings
            .iter()
            .filter(|l| predicates.iter().all(|p| p.matches(l)))
            .cloned()
            .collect())
    }
}
