pub mod listingdtos;
pub mod userdtos;
