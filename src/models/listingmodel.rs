use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::types::BigDecimal;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "currency_code", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Thb,
    Mmk,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "area_unit", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    Sqft,
    Acres,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "rent_or_sale", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RentOrSale {
    Rent,
    Sale,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "listing_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListingType {
    Apartment,
    Condo,
    TownHouse,
    House,
}

impl FromStr for RentOrSale {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rent" => Ok(RentOrSale::Rent),
            "sale" => Ok(RentOrSale::Sale),
            _ => Err(()),
        }
    }
}

impl FromStr for ListingType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "apartment" => Ok(ListingType::Apartment),
            "condo" => Ok(ListingType::Condo),
            "town_house" => Ok(ListingType::TownHouse),
            "house" => Ok(ListingType::House),
            _ => Err(()),
        }
    }
}

/// A property record as stored, joined with its owner's email.
#[derive(Debug, Clone, FromRow)]
pub struct Listing {
    pub id: Uuid,
    pub realtor_id: Uuid,
    pub realtor_email: String,
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,

    // Pricing
    pub price: BigDecimal,
    pub currency: Currency,

    // Location
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zipcode: String,

    // Property details
    pub area_value: BigDecimal,
    pub area_unit: AreaUnit,
    pub rent_or_sale_status: RentOrSale,
    #[sqlx(rename = "type")]
    pub listing_type: ListingType,
    pub is_available: bool,
    pub available_date: Option<DateTime<Utc>>,
    pub no_of_bedrooms: i32,
    pub no_of_bathrooms: i32,
    pub is_parking: bool,
    pub facilities: Option<String>,
    pub nearby_places: Option<String>,
    pub overview: Option<String>,

    // Photos (references into the image store)
    pub main_photo: Option<String>,
    pub photo_one: Option<String>,
    pub photo_two: Option<String>,
    pub photo_three: Option<String>,

    pub is_published: bool,
}

impl Listing {
    pub fn images(&self) -> ListingImages {
        ListingImages {
            main_photo: self.main_photo.clone(),
            photo_one: self.photo_one.clone(),
            photo_two: self.photo_two.clone(),
            photo_three: self.photo_three.clone(),
        }
    }
}

/// Every client-writable field of a listing, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub slug: String,
    pub price: BigDecimal,
    pub currency: Currency,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zipcode: String,
    pub area_value: BigDecimal,
    pub area_unit: AreaUnit,
    pub rent_or_sale_status: RentOrSale,
    pub listing_type: ListingType,
    pub is_available: bool,
    pub available_date: Option<DateTime<Utc>>,
    pub no_of_bedrooms: i32,
    pub no_of_bathrooms: i32,
    pub is_parking: bool,
    pub facilities: Option<String>,
    pub nearby_places: Option<String>,
    pub overview: Option<String>,
    pub main_photo: Option<String>,
    pub photo_one: Option<String>,
    pub photo_two: Option<String>,
    pub photo_three: Option<String>,
    pub is_published: bool,
}

impl NewListing {
    pub fn images(&self) -> ListingImages {
        ListingImages {
            main_photo: self.main_photo.clone(),
            photo_one: self.photo_one.clone(),
            photo_two: self.photo_two.clone(),
            photo_three: self.photo_three.clone(),
        }
    }
}

/// The four photo references left behind by a deleted listing.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct ListingImages {
    pub main_photo: Option<String>,
    pub photo_one: Option<String>,
    pub photo_two: Option<String>,
    pub photo_three: Option<String>,
}

impl ListingImages {
    /// Set references paired with the field that holds them.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("main_photo", &self.main_photo),
            ("photo_one", &self.photo_one),
            ("photo_two", &self.photo_two),
            ("photo_three", &self.photo_three),
        ]
        .into_iter()
        .filter_map(|(field, photo)| photo.as_deref().map(|photo| (field, photo)))
        .filter(|(_, photo)| !photo.is_empty())
    }

    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.named().map(|(_, photo)| photo)
    }
}
