pub mod listingmodel;
pub mod usermodel;
