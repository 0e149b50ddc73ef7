pub mod error;
pub mod guard;
pub mod listing_service;
