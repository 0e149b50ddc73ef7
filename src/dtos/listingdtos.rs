use std::borrow::Cow;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    db::search::SearchFilters,
    models::listingmodel::{
        AreaUnit, Currency, Listing, ListingType, NewListing, RentOrSale,
    },
    service::error::{field_errors, FieldErrors, ListingError},
    utils::{
        decimal::{deserialize_decimal, BigDecimalHelpers},
        slug::{is_valid_slug, slugify, MAX_SLUG_LENGTH},
    },
};

const PRICE_DIGITS: u32 = 10;
const AREA_DIGITS: u32 = 6;
const DECIMAL_PLACES: u32 = 2;

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_price(price: &BigDecimal) -> Result<(), ValidationError> {
    if *price < BigDecimal::from(0) {
        return Err(validation_error("min_value", "Price must not be negative"));
    }
    if !price.fits_numeric(PRICE_DIGITS, DECIMAL_PLACES) {
        return Err(validation_error(
            "max_digits",
            "Price must have at most 8 integer digits and 2 decimal places",
        ));
    }
    Ok(())
}

fn validate_area(area: &BigDecimal) -> Result<(), ValidationError> {
    if *area < BigDecimal::from(0) {
        return Err(validation_error("min_value", "Area must not be negative"));
    }
    if !area.fits_numeric(AREA_DIGITS, DECIMAL_PLACES) {
        return Err(validation_error(
            "max_digits",
            "Area must have at most 4 integer digits and 2 decimal places",
        ));
    }
    Ok(())
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(validation_error(
            "max_length",
            "Slug must not be more than 50 characters",
        ));
    }
    if !slug.is_empty() && !is_valid_slug(slug) {
        return Err(validation_error(
            "invalid_slug",
            "Slug may only contain letters, numbers, underscores or hyphens",
        ));
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

/// Body of Manage create/replace. Owner, id and timestamps are not
/// accepted from clients; unknown keys such as `realtor` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListingInputDto {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(custom = "validate_slug")]
    pub slug: Option<String>,

    #[serde(deserialize_with = "deserialize_decimal")]
    #[validate(custom = "validate_price")]
    pub price: BigDecimal,
    pub currency: Currency,

    // Location
    #[validate(length(min = 1, max = 200, message = "Street address must be between 1 and 200 characters"))]
    pub street_address: String,

    #[validate(length(min = 1, max = 50, message = "City must be between 1 and 50 characters"))]
    pub city: String,

    #[validate(length(min = 1, max = 50, message = "State must be between 1 and 50 characters"))]
    pub state: String,

    #[validate(length(min = 1, max = 50, message = "Country must be between 1 and 50 characters"))]
    pub country: String,

    #[validate(length(min = 1, max = 10, message = "Zipcode must be between 1 and 10 characters"))]
    pub zipcode: String,

    // Property details
    #[serde(deserialize_with = "deserialize_decimal")]
    #[validate(custom = "validate_area")]
    pub area_value: BigDecimal,
    pub area_unit: AreaUnit,
    pub rent_or_sale_status: RentOrSale,
    #[serde(rename = "type")]
    pub listing_type: ListingType,

    #[serde(default = "default_true")]
    pub is_available: bool,
    pub available_date: Option<DateTime<Utc>>,

    #[validate(range(min = 0, message = "Number of bedrooms must not be negative"))]
    pub no_of_bedrooms: i32,

    #[validate(range(min = 0, message = "Number of bathrooms must not be negative"))]
    pub no_of_bathrooms: i32,

    #[serde(default)]
    pub is_parking: bool,
    pub facilities: Option<String>,
    pub nearby_places: Option<String>,
    pub overview: Option<String>,

    // Photos
    #[validate(length(max = 100, message = "Photo reference must not be more than 100 characters"))]
    pub main_photo: Option<String>,
    #[validate(length(max = 100, message = "Photo reference must not be more than 100 characters"))]
    pub photo_one: Option<String>,
    #[validate(length(max = 100, message = "Photo reference must not be more than 100 characters"))]
    pub photo_two: Option<String>,
    #[validate(length(max = 100, message = "Photo reference must not be more than 100 characters"))]
    pub photo_three: Option<String>,

    #[serde(default)]
    pub is_published: bool,
}

impl ListingInputDto {
    /// Validates every field and produces the row to write. A missing or
    /// empty slug is derived from the title.
    pub fn into_new_listing(self) -> Result<NewListing, FieldErrors> {
        self.validate().map_err(|e| field_errors(&e))?;

        let slug = match self.slug {
            Some(slug) if !slug.is_empty() => slug,
            _ => slugify(&self.title),
        };

        if !is_valid_slug(&slug) {
            let mut errors = FieldErrors::new();
            errors.insert(
                "slug".to_string(),
                vec!["Slug could not be derived from the title, please provide one".to_string()],
            );
            return Err(errors);
        }

        Ok(NewListing {
            title: self.title,
            slug,
            price: self.price.to_money_scale(DECIMAL_PLACES),
            currency: self.currency,
            street_address: self.street_address,
            city: self.city,
            state: self.state,
            country: self.country,
            zipcode: self.zipcode,
            area_value: self.area_value.to_money_scale(DECIMAL_PLACES),
            area_unit: self.area_unit,
            rent_or_sale_status: self.rent_or_sale_status,
            listing_type: self.listing_type,
            is_available: self.is_available,
            available_date: self.available_date,
            no_of_bedrooms: self.no_of_bedrooms,
            no_of_bathrooms: self.no_of_bathrooms,
            is_parking: self.is_parking,
            facilities: self.facilities,
            nearby_places: self.nearby_places,
            overview: self.overview,
            main_photo: self.main_photo,
            photo_one: self.photo_one,
            photo_two: self.photo_two,
            photo_three: self.photo_three,
            is_published: self.is_published,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublishDto {
    pub is_published: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlugQueryDto {
    pub slug: Option<String>,
}

impl SlugQueryDto {
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|slug| !slug.is_empty())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchQueryDto {
    pub keyword: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub max_price: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub rent_or_sale: Option<String>,
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_count(value: Option<String>, message: &'static str) -> Result<i32, ListingError> {
    match present(value) {
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map_err(|_| ListingError::BadRequest(message)),
        None => Ok(0),
    }
}

impl TryFrom<SearchQueryDto> for SearchFilters {
    type Error = ListingError;

    fn try_from(query: SearchQueryDto) -> Result<Self, Self::Error> {
        let max_price = present(query.max_price)
            .map(|raw| BigDecimal::from_str(raw.trim()))
            .transpose()
            .map_err(|_| ListingError::BadRequest("max_price must be a number"))?;

        let rent_or_sale = present(query.rent_or_sale)
            .map(|raw| RentOrSale::from_str(&raw))
            .transpose()
            .map_err(|_| ListingError::BadRequest("rent_or_sale must be one of: rent, sale"))?;

        let listing_type = present(query.listing_type)
            .map(|raw| ListingType::from_str(&raw))
            .transpose()
            .map_err(|_| {
                ListingError::BadRequest("type must be one of: apartment, condo, town_house, house")
            })?;

        Ok(SearchFilters {
            keyword: present(query.keyword).map(|keyword| keyword.trim().to_string()),
            city: present(query.city),
            state: present(query.state),
            max_price,
            min_bedrooms: parse_count(query.bedrooms, "bedrooms must be a whole number")?,
            min_bathrooms: parse_count(query.bathrooms, "bathrooms must be a whole number")?,
            rent_or_sale,
            listing_type,
        })
    }
}

/// Outbound representation of a listing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ListingDto {
    pub id: Uuid,
    pub realtor: Uuid,
    pub realtor_email: String,
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
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
    #[serde(rename = "type")]
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

impl ListingDto {
    pub fn from_listing(listing: &Listing) -> Self {
        ListingDto {
            id: listing.id,
            realtor: listing.realtor_id,
            realtor_email: listing.realtor_email.clone(),
            title: listing.title.clone(),
            slug: listing.slug.clone(),
            created_at: listing.created_at,
            modified_at: listing.modified_at,
            price: listing.price.clone(),
            currency: listing.currency,
            street_address: listing.street_address.clone(),
            city: listing.city.clone(),
            state: listing.state.clone(),
            country: listing.country.clone(),
            zipcode: listing.zipcode.clone(),
            area_value: listing.area_value.clone(),
            area_unit: listing.area_unit,
            rent_or_sale_status: listing.rent_or_sale_status,
            listing_type: listing.listing_type,
            is_available: listing.is_available,
            available_date: listing.available_date,
            no_of_bedrooms: listing.no_of_bedrooms,
            no_of_bathrooms: listing.no_of_bathrooms,
            is_parking: listing.is_parking,
            facilities: listing.facilities.clone(),
            nearby_places: listing.nearby_places.clone(),
            overview: listing.overview.clone(),
            main_photo: listing.main_photo.clone(),
            photo_one: listing.photo_one.clone(),
            photo_two: listing.photo_two.clone(),
            photo_three: listing.photo_three.clone(),
            is_published: listing.is_published,
        }
    }

    pub fn from_listings(listings: &[Listing]) -> Vec<ListingDto> {
        listings.iter().map(ListingDto::from_listing).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}
