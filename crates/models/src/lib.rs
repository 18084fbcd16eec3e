pub mod errors;
pub mod db;
pub mod user;
pub mod category;
pub mod recipe;
pub mod recipe_image;
pub mod rating;
pub mod comment;
pub mod visit;
