use async_trait::async_trait;
use sqlx::{postgres::PgArguments, query::QueryAs, Postgres};
use uuid::Uuid;

use crate::{
    db::{
        db::{map_unique_violation, DBClient, StoreError},
        search::{build_search_query, SearchFilters},
    },
    models::listingmodel::{Listing, ListingImages, NewListing},
};

const LISTING_COLUMNS: &str = r#"
    l.id, l.realtor_id, u.email AS realtor_email, l.title, l.slug, l.created_at, l.modified_at,
    l.price, l.currency, l.street_address, l.city, l.state, l.country, l.zipcode,
    l.area_value, l.area_unit, l.rent_or_sale_status, l."type", l.is_available, l.available_date,
    l.no_of_bedrooms, l.no_of_bathrooms, l.is_parking, l.facilities, l.nearby_places, l.overview,
    l.main_photo, l.photo_one, l.photo_two, l.photo_three, l.is_published
"#;

/// Columns a realtor may write, in bind order. `slug` is bound separately
/// since it is only written on insert.
const WRITABLE_COLUMNS: [&str; 25] = [
    "title",
    "price",
    "currency",
    "street_address",
    "city",
    "state",
    "country",
    "zipcode",
    "area_value",
    "area_unit",
    "rent_or_sale_status",
    "\"type\"",
    "is_available",
    "available_date",
    "no_of_bedrooms",
    "no_of_bathrooms",
    "is_parking",
    "facilities",
    "nearby_places",
    "overview",
    "main_photo",
    "photo_one",
    "photo_two",
    "photo_three",
    "is_published",
];

#[async_trait]
pub trait ListingExt: Send + Sync {
    async fn get_listings_by_realtor(&self, realtor_id: Uuid) -> Result<Vec<Listing>, StoreError>;

    async fn get_listing_by_realtor_and_slug(
        &self,
        realtor_id: Uuid,
        slug: &str,
    ) -> Result<Option<Listing>, StoreError>;

    async fn create_listing(
        &self,
        realtor_id: Uuid,
        listing: &NewListing,
    ) -> Result<Listing, StoreError>;

    /// Overwrites every writable field except the slug. `None` when the
    /// realtor owns no listing with that slug.
    async fn replace_listing(
        &self,
        realtor_id: Uuid,
        slug: &str,
        listing: &NewListing,
    ) -> Result<Option<Listing>, StoreError>;

    async fn set_listing_published(
        &self,
        realtor_id: Uuid,
        slug: &str,
        is_published: bool,
    ) -> Result<bool, StoreError>;

    /// Removes the row and hands back its photo references for cleanup.
    async fn delete_listing(
        &self,
        realtor_id: Uuid,
        slug: &str,
    ) -> Result<Option<ListingImages>, StoreError>;

    /// Whether any remaining listing still points at this photo reference.
    async fn image_in_use(&self, reference: &str) -> Result<bool, StoreError>;

    async fn get_published_listing(&self, slug: &str) -> Result<Option<Listing>, StoreError>;

    async fn get_published_listings(&self) -> Result<Vec<Listing>, StoreError>;

    async fn search_listings(&self, filters: &SearchFilters) -> Result<Vec<Listing>, StoreError>;
}

fn bind_writable<'q>(
    query: QueryAs<'q, Postgres, Listing, PgArguments>,
    listing: &NewListing,
) -> QueryAs<'q, Postgres, Listing, PgArguments> {
    query
        .bind(listing.title.clone())
        .bind(listing.price.clone())
        .bind(listing.currency)
        .bind(listing.street_address.clone())
        .bind(listing.city.clone())
        .bind(listing.state.clone())
        .bind(listing.country.clone())
        .bind(listing.zipcode.clone())
        .bind(listing.area_value.clone())
        .bind(listing.area_unit)
        .bind(listing.rent_or_sale_status)
        .bind(listing.listing_type)
        .bind(listing.is_available)
        .bind(listing.available_date)
        .bind(listing.no_of_bedrooms)
        .bind(listing.no_of_bathrooms)
        .bind(listing.is_parking)
        .bind(listing.facilities.clone())
        .bind(listing.nearby_places.clone())
        .bind(listing.overview.clone())
        .bind(listing.main_photo.clone())
        .bind(listing.photo_one.clone())
        .bind(listing.photo_two.clone())
        .bind(listing.photo_three.clone())
        .bind(listing.is_published)
}

fn insert_sql() -> String {
    let columns = WRITABLE_COLUMNS.join(", ");
    let placeholders = (3..3 + WRITABLE_COLUMNS.len())
        .map(|n| format!("${}", n))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
        WITH l AS (
            INSERT INTO listings (realtor_id, slug, {columns})
            VALUES ($1, $2, {placeholders})
            RETURNING *
        )
        SELECT {LISTING_COLUMNS} FROM l JOIN users u ON u.id = l.realtor_id
        "#
    )
}

fn replace_sql() -> String {
    let assignments = WRITABLE_COLUMNS
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{} = ${}", column, index + 3))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
        WITH l AS (
            UPDATE listings
            SET {assignments}, modified_at = NOW()
            WHERE realtor_id = $1 AND slug = $2
            RETURNING *
        )
        SELECT {LISTING_COLUMNS} FROM l JOIN users u ON u.id = l.realtor_id
        "#
    )
}

#[async_trait]
impl ListingExt for DBClient {
    async fn get_listings_by_realtor(&self, realtor_id: Uuid) -> Result<Vec<Listing>, StoreError> {
        let sql = format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM listings l JOIN users u ON u.id = l.realtor_id
            WHERE l.realtor_id = $1
            ORDER BY l.created_at DESC
            "#
        );

        let listings = sqlx::query_as::<_, Listing>(&sql)
            .bind(realtor_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(listings)
    }

    async fn get_listing_by_realtor_and_slug(
        &self,
        realtor_id: Uuid,
        slug: &str,
    ) -> Result<Option<Listing>, StoreError> {
        let sql = format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM listings l JOIN users u ON u.id = l.realtor_id
            WHERE l.realtor_id = $1 AND l.slug = $2
            "#
        );

        let listing = sqlx::query_as::<_, Listing>(&sql)
            .bind(realtor_id)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(listing)
    }

    async fn create_listing(
        &self,
        realtor_id: Uuid,
        listing: &NewListing,
    ) -> Result<Listing, StoreError> {
        let sql = insert_sql();
        let query = sqlx::query_as::<_, Listing>(&sql)
            .bind(realtor_id)
            .bind(listing.slug.clone());

        bind_writable(query, listing)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, StoreError::DuplicateSlug))
    }

    async fn replace_listing(
        &self,
        realtor_id: Uuid,
        slug: &str,
        listing: &NewListing,
    ) -> Result<Option<Listing>, StoreError> {
        let sql = replace_sql();
        let query = sqlx::query_as::<_, Listing>(&sql)
            .bind(realtor_id)
            .bind(slug.to_string());

        let listing = bind_writable(query, listing)
            .fetch_optional(&self.pool)
            .await?;

        Ok(listing)
    }

    async fn set_listing_published(
        &self,
        realtor_id: Uuid,
        slug: &str,
        is_published: bool,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE listings
            SET is_published = $3, modified_at = NOW()
            WHERE realtor_id = $1 AND slug = $2
            "#,
        )
        .bind(realtor_id)
        .bind(slug)
        .bind(is_published)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_listing(
        &self,
        realtor_id: Uuid,
        slug: &str,
    ) -> Result<Option<ListingImages>, StoreError> {
        let images = sqlx::query_as::<_, ListingImages>(
            r#"
            DELETE FROM listings
            WHERE realtor_id = $1 AND slug = $2
            RETURNING main_photo, photo_one, photo_two, photo_three
            "#,
        )
        .bind(realtor_id)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(images)
    }

    async fn image_in_use(&self, reference: &str) -> Result<bool, StoreError> {
        let in_use = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM listings
                WHERE $1 IN (main_photo, photo_one, photo_two, photo_three)
            )
            "#,
        )
        .bind(reference)
        .fetch_one(&self.pool)
        .await?;

        Ok(in_use)
    }

    async fn get_published_listing(&self, slug: &str) -> Result<Option<Listing>, StoreError> {
        let sql = format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM listings l JOIN users u ON u.id = l.realtor_id
            WHERE l.slug = $1 AND l.is_published = TRUE
            "#
        );

        let listing = sqlx::query_as::<_, Listing>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(listing)
    }

    async fn get_published_listings(&self) -> Result<Vec<Listing>, StoreError> {
        let sql = format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM listings l JOIN users u ON u.id = l.realtor_id
            WHERE l.is_published = TRUE
            ORDER BY l.created_at DESC
            "#
        );

        let listings = sqlx::query_as::<_, Listing>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(listings)
    }

    async fn search_listings(&self, filters: &SearchFilters) -> Result<Vec<Listing>, StoreError> {
        let mut qb = build_search_query(LISTING_COLUMNS, filters);

        let listings = qb
            .build_query_as::<Listing>()
            .fetch_all(&self.pool)
            .await?;

        Ok(listings)
    }
}
