pub mod db;
pub mod listingdb;
#[cfg(test)]
pub mod memorydb;
pub mod search;
pub mod userdb;
