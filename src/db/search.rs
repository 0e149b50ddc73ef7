use sqlx::{types::BigDecimal, Postgres, QueryBuilder};

use crate::models::listingmodel::{ListingType, RentOrSale};

#[cfg(test)]
use crate::models::listingmodel::Listing;

/// Text-search configuration used both by the generated `search_vector`
/// column and by the query side.
pub const SEARCH_CONFIG: &str = "english";

/// Public search criteria. Every present field narrows the result; absent
/// fields impose nothing beyond the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub keyword: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub max_price: Option<BigDecimal>,
    pub min_bedrooms: i32,
    pub min_bathrooms: i32,
    pub rent_or_sale: Option<RentOrSale>,
    pub listing_type: Option<ListingType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Published,
    MaxPrice(BigDecimal),
    MinBedrooms(i32),
    MinBathrooms(i32),
    City(String),
    State(String),
    RentOrSale(RentOrSale),
    Type(ListingType),
    Keyword(String),
}

impl SearchFilters {
    /// The AND-ed predicates these filters stand for, in a fixed order.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = vec![
            Predicate::Published,
            Predicate::MinBedrooms(self.min_bedrooms),
            Predicate::MinBathrooms(self.min_bathrooms),
        ];

        if let Some(max_price) = &self.max_price {
            predicates.push(Predicate::MaxPrice(max_price.clone()));
        }
        if let Some(city) = &self.city {
            predicates.push(Predicate::City(city.clone()));
        }
        if let Some(state) = &self.state {
            predicates.push(Predicate::State(state.clone()));
        }
        if let Some(rent_or_sale) = self.rent_or_sale {
            predicates.push(Predicate::RentOrSale(rent_or_sale));
        }
        if let Some(listing_type) = self.listing_type {
            predicates.push(Predicate::Type(listing_type));
        }
        if let Some(keyword) = &self.keyword {
            predicates.push(Predicate::Keyword(keyword.clone()));
        }

        predicates
    }
}

impl Predicate {
    /// Appends this predicate as a SQL condition on the `l` (listings) alias.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::Published => {
                qb.push("l.is_published = TRUE");
            }
            Predicate::MaxPrice(max_price) => {
                qb.push("l.price <= ").push_bind(max_price.clone());
            }
            Predicate::MinBedrooms(min) => {
                qb.push("l.no_of_bedrooms >= ").push_bind(*min);
            }
            Predicate::MinBathrooms(min) => {
                qb.push("l.no_of_bathrooms >= ").push_bind(*min);
            }
            Predicate::City(city) => {
                qb.push("l.city = ").push_bind(city.clone());
            }
            Predicate::State(state) => {
                qb.push("l.state = ").push_bind(state.clone());
            }
            Predicate::RentOrSale(rent_or_sale) => {
                qb.push("l.rent_or_sale_status = ").push_bind(*rent_or_sale);
            }
            Predicate::Type(listing_type) => {
                qb.push("l.\"type\" = ").push_bind(*listing_type);
            }
            Predicate::Keyword(keyword) => {
                qb.push("l.search_vector @@ plainto_tsquery('")
                    .push(SEARCH_CONFIG)
                    .push("', ")
                    .push_bind(keyword.clone())
                    .push(")");
            }
        }
    }

    /// In-process evaluation, used by the in-memory store. Keyword matching
    /// requires every query token to appear among the title and overview
    /// tokens; it does not stem.
    #[cfg(test)]
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            Predicate::Published => listing.is_published,
            Predicate::MaxPrice(max_price) => &listing.price <= max_price,
            Predicate::MinBedrooms(min) => listing.no_of_bedrooms >= *min,
            Predicate::MinBathrooms(min) => listing.no_of_bathrooms >= *min,
            Predicate::City(city) => &listing.city == city,
            Predicate::State(state) => &listing.state == state,
            Predicate::RentOrSale(rent_or_sale) => listing.rent_or_sale_status == *rent_or_sale,
            Predicate::Type(listing_type) => listing.listing_type == *listing_type,
            Predicate::Keyword(keyword) => {
                let document = format!(
                    "{} {}",
                    listing.title,
                    listing.overview.as_deref().unwrap_or_default()
                );
                let document_tokens = tokens(&document);
                let query_tokens = tokens(keyword);
                !query_tokens.is_empty()
                    && query_tokens
                        .iter()
                        .all(|token| document_tokens.contains(token))
            }
        }
    }
}

#[cfg(test)]
fn tokens(text: &str) -> Vec<String> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Builds `SELECT <columns> FROM listings l JOIN users u ... WHERE <predicates>`.
pub fn build_search_query<'args>(
    columns: &str,
    filters: &SearchFilters,
) -> QueryBuilder<'args, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(columns);
    qb.push(" FROM listings l JOIN users u ON u.id = l.realtor_id WHERE ");

    for (index, predicate) in filters.predicates().iter().enumerate() {
        if index > 0 {
            qb.push(" AND ");
        }
        predicate.push_sql(&mut qb);
    }

    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn defaults_only_require_publication_and_zero_rooms() {
        assert_eq!(
            SearchFilters::default().predicates(),
            vec![
                Predicate::Published,
                Predicate::MinBedrooms(0),
                Predicate::MinBathrooms(0),
            ]
        );
    }

    #[test]
    fn present_fields_map_to_predicates_in_order() {
        let filters = SearchFilters {
            keyword: Some("garden".into()),
            city: Some("Yangon".into()),
            state: Some("Yangon Region".into()),
            max_price: Some(BigDecimal::from_str("50000").unwrap()),
            min_bedrooms: 2,
            min_bathrooms: 1,
            rent_or_sale: Some(RentOrSale::Sale),
            listing_type: Some(ListingType::Condo),
        };

        assert_eq!(
            filters.predicates(),
            vec![
                Predicate::Published,
                Predicate::MinBedrooms(2),
                Predicate::MinBathrooms(1),
                Predicate::MaxPrice(BigDecimal::from_str("50000").unwrap()),
                Predicate::City("Yangon".into()),
                Predicate::State("Yangon Region".into()),
                Predicate::RentOrSale(RentOrSale::Sale),
                Predicate::Type(ListingType::Condo),
                Predicate::Keyword("garden".into()),
            ]
        );
    }

    #[test]
    fn sql_binds_every_value() {
        let filters = SearchFilters {
            keyword: Some("pool view".into()),
            city: Some("Bangkok".into()),
            max_price: Some(BigDecimal::from_str("50000").unwrap()),
            min_bedrooms: 2,
            ..Default::default()
        };

        let qb = build_search_query("l.id", &filters);
        assert_eq!(
            qb.sql(),
            "SELECT l.id FROM listings l JOIN users u ON u.id = l.realtor_id WHERE \
             l.is_published = TRUE AND l.no_of_bedrooms >= $1 AND l.no_of_bathrooms >= $2 \
             AND l.price <= $3 AND l.city = $4 \
             AND l.search_vector @@ plainto_tsquery('english', $5)"
        );
    }

    #[test]
    fn tokenizer_splits_on_punctuation_and_lowercases() {
        assert_eq!(
            tokens("Sunny CONDO, near-BTS!"),
            vec!["sunny", "condo", "near", "bts"]
        );
    }
}
