//! Fixtures shared by the unit and router tests.

use std::{str::FromStr, sync::Arc, sync::Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{memorydb::InMemoryDB, userdb::UserExt},
    dtos::listingdtos::ListingInputDto,
    models::{
        listingmodel::{AreaUnit, Currency, Listing, ListingType, RentOrSale},
        usermodel::User,
    },
    routes::create_router,
    utils::{
        image_utils::{ImageStore, ImageStoreError},
        password, token,
    },
    AppState,
};

pub const TEST_PASSWORD: &str = "pw123456";

pub fn sample_listing(owner_id: Uuid, slug: &str) -> Listing {
    let now = Utc::now();
    Listing {
        id: Uuid::new_v4(),
        realtor_id: owner_id,
        realtor_email: "owner@example.com".to_string(),
        title: "Sunny Condo".to_string(),
        slug: slug.to_string(),
        created_at: now,
        modified_at: now,
        price: BigDecimal::from_str("100000.00").unwrap(),
        currency: Currency::Usd,
        street_address: "12 Sukhumvit Road".to_string(),
        city: "Bangkok".to_string(),
        state: "Bangkok".to_string(),
        country: "Thailand".to_string(),
        zipcode: "10110".to_string(),
        area_value: BigDecimal::from_str("850.50").unwrap(),
        area_unit: AreaUnit::Sqft,
        rent_or_sale_status: RentOrSale::Sale,
        listing_type: ListingType::Condo,
        is_available: true,
        available_date: None,
        no_of_bedrooms: 2,
        no_of_bathrooms: 1,
        is_parking: false,
        facilities: None,
        nearby_places: None,
        overview: Some("Bright corner unit with a garden view".to_string()),
        main_photo: None,
        photo_one: None,
        photo_two: None,
        photo_three: None,
        is_published: true,
    }
}

/// A valid, unpublished listing body with all four photos set under the
/// owner's folder.
pub fn new_listing(owner: Uuid, slug: &str) -> ListingInputDto {
    ListingInputDto {
        title: "Lake House".to_string(),
        slug: Some(slug.to_string()),
        price: BigDecimal::from_str("100000.00").unwrap(),
        currency: Currency::Usd,
        street_address: "1 Lake Road".to_string(),
        city: "Chiang Mai".to_string(),
        state: "Chiang Mai".to_string(),
        country: "Thailand".to_string(),
        zipcode: "50000".to_string(),
        area_value: BigDecimal::from_str("120.00").unwrap(),
        area_unit: AreaUnit::Sqft,
        rent_or_sale_status: RentOrSale::Sale,
        listing_type: ListingType::House,
        is_available: true,
        available_date: None,
        no_of_bedrooms: 3,
        no_of_bathrooms: 2,
        is_parking: true,
        facilities: Some("Pool".to_string()),
        nearby_places: Some("Night market".to_string()),
        overview: Some("Quiet house by the lake".to_string()),
        main_photo: Some(format!("{owner}/{slug}/main.jpg")),
        photo_one: Some(format!("{owner}/{slug}/one.jpg")),
        photo_two: Some(format!("{owner}/{slug}/two.jpg")),
        photo_three: Some(format!("{owner}/{slug}/three.jpg")),
        is_published: false,
    }
}

pub fn listing_input(title: &str) -> ListingInputDto {
    ListingInputDto {
        title: title.to_string(),
        slug: None,
        price: BigDecimal::from_str("100000.00").unwrap(),
        currency: Currency::Usd,
        street_address: "12 Sukhumvit Road".to_string(),
        city: "Bangkok".to_string(),
        state: "Bangkok".to_string(),
        country: "Thailand".to_string(),
        zipcode: "10110".to_string(),
        area_value: BigDecimal::from_str("850.50").unwrap(),
        area_unit: AreaUnit::Sqft,
        rent_or_sale_status: RentOrSale::Sale,
        listing_type: ListingType::Condo,
        is_available: true,
        available_date: None,
        no_of_bedrooms: 2,
        no_of_bathrooms: 1,
        is_parking: false,
        facilities: None,
        nearby_places: None,
        overview: None,
        main_photo: None,
        photo_one: None,
        photo_two: None,
        photo_three: None,
        is_published: false,
    }
}

/// Image store that only remembers what it was asked to delete.
#[derive(Default)]
pub struct RecordingImageStore {
    deleted: Mutex<Vec<String>>,
}

impl RecordingImageStore {
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn delete(&self, reference: &str) -> Result<(), ImageStoreError> {
        self.deleted.lock().unwrap().push(reference.to_string());
        Ok(())
    }
}

pub struct FailingImageStore;

#[async_trait]
impl ImageStore for FailingImageStore {
    async fn delete(&self, reference: &str) -> Result<(), ImageStoreError> {
        Err(ImageStoreError::Io {
            reference: reference.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
        jwt_secret: "router-test-secret".to_string(),
        jwt_maxage: 60,
        port: 0,
        media_root: "media".to_string(),
        allowed_origins: vec![],
        log_level: "debug".to_string(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: Arc<InMemoryDB>,
    pub images: Arc<RecordingImageStore>,
    pub env: Config,
}

impl TestApp {
    pub fn new() -> Self {
        let env = test_config();
        let db = Arc::new(InMemoryDB::new());
        let images = Arc::new(RecordingImageStore::default());
        let app_state = AppState::new(env.clone(), db.clone(), images.clone());

        TestApp {
            router: create_router(Arc::new(app_state)),
            db,
            images,
            env,
        }
    }

    pub async fn user(&self, email: &str, is_realtor: bool) -> User {
        let hashed = password::hash(TEST_PASSWORD).unwrap();
        self.db
            .save_user("Test User", email, &hashed, is_realtor)
            .await
            .unwrap()
    }

    pub fn bearer(&self, user: &User) -> String {
        let token = token::create_token(
            &user.id.to_string(),
            self.env.jwt_secret.as_bytes(),
            self.env.jwt_maxage,
        )
        .unwrap();
        format!("Bearer {token}")
    }
}
