pub mod decimal;
pub mod image_utils;
pub mod password;
pub mod slug;
pub mod token;
