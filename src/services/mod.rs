// Services module - business logic layer

pub mod admin_service;
pub mod cart_service;
pub mod catalog_service;
pub mod contact_service;
pub mod favorite_service;
pub mod review_service;
pub mod seed_data;

pub use admin_service::{AdminService, SeedReport, StoreStats, TableSetup};
pub use cart_service::CartService;
pub use catalog_service::{
    BookService, CatalogLookup, CatalogService, ItemSummary, ProductService, RecipeService,
};
pub use contact_service::ContactService;
pub use favorite_service::FavoriteService;
pub use review_service::ReviewService;
