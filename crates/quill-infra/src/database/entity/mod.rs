//! SeaORM entities and their domain conversions.

pub mod category;
pub mod comment;
pub mod post;
pub mod user;
