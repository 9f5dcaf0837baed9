// Re-export all model types
pub use self::book::*;
pub use self::cart::*;
pub use self::catalog::{CatalogEntry, Purchasable};
pub use self::contact::*;
pub use self::document::*;
pub use self::enums::*;
pub use self::errors::*;
pub use self::favorite::*;
pub use self::product::*;
pub use self::recipe::*;
pub use self::review::*;
pub use self::validation::*;

mod book;
mod cart;
mod catalog;
mod contact;
mod document;
mod enums;
mod errors;
mod favorite;
mod product;
mod recipe;
mod review;
mod validation;
