use aws_sdk_dynamodb::Client as DynamoDbClient;
use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::{header, Method},
    middleware, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};
use tracing::info;

use crate::config::{DatabaseConfig, ServerConfig};
use crate::handlers::{self, RequestLimits};
use crate::models::{Book, Contact, Product, Recipe, Review};
use crate::observability::{observability_middleware, BusinessTracingMiddleware, Metrics};
use crate::repositories::{
    CartRepository, DocumentRepository, DynamoDbCartRepository, DynamoDbDocumentRepository,
    DynamoDbFavoriteRepository, FavoriteRepository, InMemoryCartRepository,
    InMemoryDocumentRepository, InMemoryFavoriteRepository, TableManager,
};
use crate::services::{
    AdminService, BookService, CartService, CatalogLookup, ContactService, FavoriteService,
    ProductService, RecipeService, ReviewService, TableSetup,
};

struct Repositories {
    products: Arc<dyn DocumentRepository<Product>>,
    books: Arc<dyn DocumentRepository<Book>>,
    recipes: Arc<dyn DocumentRepository<Recipe>>,
    carts: Arc<dyn CartRepository>,
    favorites: Arc<dyn FavoriteRepository>,
    contacts: Arc<dyn DocumentRepository<Contact>>,
    reviews: Arc<dyn DocumentRepository<Review>>,
}

/// Every service the HTTP layer talks to
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
    pub books: Arc<BookService>,
    pub recipes: Arc<RecipeService>,
    pub carts: Arc<CartService>,
    pub favorites: Arc<FavoriteService>,
    pub contacts: Arc<ContactService>,
    pub reviews: Arc<ReviewService>,
    pub admin: Arc<AdminService>,
    pub assets_cdn_url: String,
}

impl AppServices {
    /// Process-local storage, used for development and tests
    pub fn in_memory(assets_cdn_url: String) -> Self {
        let repositories = Repositories {
            products: Arc::new(InMemoryDocumentRepository::<Product>::new()),
            books: Arc::new(InMemoryDocumentRepository::<Book>::new()),
            recipes: Arc::new(InMemoryDocumentRepository::<Recipe>::new()),
            carts: Arc::new(InMemoryCartRepository::new()),
            favorites: Arc::new(InMemoryFavoriteRepository::new()),
            contacts: Arc::new(InMemoryDocumentRepository::<Contact>::new()),
            reviews: Arc::new(InMemoryDocumentRepository::<Review>::new()),
        };

        Self::assemble(repositories, None, assets_cdn_url)
    }

    pub fn dynamodb(
        client: Arc<DynamoDbClient>,
        database: &DatabaseConfig,
        assets_cdn_url: String,
    ) -> Self {
        let region = database.region.clone();
        let repositories = Repositories {
            products: Arc::new(DynamoDbDocumentRepository::<Product>::new(
                client.clone(),
                database.products_table_name.clone(),
                region.clone(),
            )),
            books: Arc::new(DynamoDbDocumentRepository::<Book>::new(
                client.clone(),
                database.books_table_name.clone(),
                region.clone(),
            )),
            recipes: Arc::new(DynamoDbDocumentRepository::<Recipe>::new(
                client.clone(),
                database.recipes_table_name.clone(),
                region.clone(),
            )),
            carts: Arc::new(DynamoDbCartRepository::new(
                client.clone(),
                database.carts_table_name.clone(),
                region.clone(),
            )),
            favorites: Arc::new(DynamoDbFavoriteRepository::new(
                client.clone(),
                database.favorites_table_name.clone(),
                region.clone(),
            )),
            contacts: Arc::new(DynamoDbDocumentRepository::<Contact>::new(
                client.clone(),
                database.contacts_table_name.clone(),
                region.clone(),
            )),
            reviews: Arc::new(DynamoDbDocumentRepository::<Review>::new(
                client.clone(),
                database.reviews_table_name.clone(),
                region,
            )),
        };

        let table_setup = TableSetup {
            manager: Arc::new(TableManager::new(client)),
            definitions: database.table_definitions(),
        };

        Self::assemble(repositories, Some(table_setup), assets_cdn_url)
    }

    fn assemble(
        repositories: Repositories,
        table_setup: Option<TableSetup>,
        assets_cdn_url: String,
    ) -> Self {
        let products = Arc::new(ProductService::new(repositories.products));
        let books = Arc::new(BookService::new(repositories.books));
        let recipes = Arc::new(RecipeService::new(repositories.recipes));

        let catalog = CatalogLookup::new(products.clone(), books.clone(), assets_cdn_url.clone());
        let carts = Arc::new(CartService::new(repositories.carts, catalog.clone()));
        let favorites = Arc::new(FavoriteService::new(repositories.favorites, catalog));
        let contacts = Arc::new(ContactService::new(repositories.contacts));
        let reviews = Arc::new(ReviewService::new(repositories.reviews, products.clone()));

        let admin = Arc::new(AdminService::new(
            products.clone(),
            books.clone(),
            recipes.clone(),
            carts.clone(),
            contacts.clone(),
            reviews.clone(),
            table_setup,
        ));

        info!("Services initialized successfully");

        Self {
            products,
            books,
            recipes,
            carts,
            favorites,
            contacts,
            reviews,
            admin,
            assets_cdn_url,
        }
    }
}

/// Router state
#[derive(Clone)]
pub struct AppState {
    pub services: AppServices,
    pub metrics: Arc<Metrics>,
    pub tracer: BusinessTracingMiddleware,
}

impl AppState {
    pub fn new(services: AppServices, metrics: Arc<Metrics>) -> Self {
        Self {
            services,
            tracer: BusinessTracingMiddleware::new(metrics.clone()),
            metrics,
        }
    }
}

impl FromRef<AppState> for Arc<ProductService> {
    fn from_ref(state: &AppState) -> Self {
        state.services.products.clone()
    }
}

impl FromRef<AppState> for Arc<BookService> {
    fn from_ref(state: &AppState) -> Self {
        state.services.books.clone()
    }
}

impl FromRef<AppState> for Arc<RecipeService> {
    fn from_ref(state: &AppState) -> Self {
        state.services.recipes.clone()
    }
}

impl FromRef<AppState> for Arc<Metrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

/// Build the application router with every middleware layer
pub fn create_app(services: AppServices, metrics: Arc<Metrics>, server: &ServerConfig) -> Router {
    let metrics_for_middleware = metrics.clone();
    let limits = RequestLimits {
        max_request_size: server.max_request_size,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(86400));

    Router::new()
        .merge(handlers::health::routes())
        .merge(handlers::catalog::routes())
        .merge(handlers::cart::routes())
        .merge(handlers::favorites::routes())
        .merge(handlers::intake::routes())
        .merge(handlers::admin::routes())
        .fallback(handlers::route_not_found)
        .with_state(AppState::new(services, metrics))
        // Layers run outer to inner from the bottom up
        .layer(DefaultBodyLimit::max(server.max_request_size))
        .layer(middleware::from_fn_with_state(
            limits,
            handlers::request_validation_middleware,
        ))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(middleware::from_fn(handlers::security_headers_middleware))
        .layer(cors)
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
}
