use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::models::{ContactStatus, ReviewStatus, ServiceError, ServiceResult};
use crate::repositories::{TableDefinition, TableManager, TableSetupStatus};

use super::catalog_service::{BookService, ProductService, RecipeService};
use super::seed_data::{sample_books, sample_products, sample_recipes};
use super::{CartService, ContactService, ReviewService};

/// Outcome of seeding the catalog
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub products_created: usize,
    pub books_created: usize,
    pub recipes_created: usize,
    pub errors: Vec<String>,
}

impl SeedReport {
    pub fn total_created(&self) -> usize {
        self.products_created + self.books_created + self.recipes_created
    }
}

/// Dashboard counts
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub products: usize,
    pub books: usize,
    pub recipes: usize,
    pub carts: usize,
    pub contacts: BTreeMap<ContactStatus, usize>,
    pub reviews: BTreeMap<ReviewStatus, usize>,
}

/// Tables to create on the DynamoDB backend
#[derive(Clone)]
pub struct TableSetup {
    pub manager: Arc<TableManager>,
    pub definitions: Vec<TableDefinition>,
}

/// Back-office operations spanning every collection
pub struct AdminService {
    products: Arc<ProductService>,
    books: Arc<BookService>,
    recipes: Arc<RecipeService>,
    carts: Arc<CartService>,
    contacts: Arc<ContactService>,
    reviews: Arc<ReviewService>,
    table_setup: Option<TableSetup>,
}

impl AdminService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        products: Arc<ProductService>,
        books: Arc<BookService>,
        recipes: Arc<RecipeService>,
        carts: Arc<CartService>,
        contacts: Arc<ContactService>,
        reviews: Arc<ReviewService>,
        table_setup: Option<TableSetup>,
    ) -> Self {
        Self {
            products,
            books,
            recipes,
            carts,
            contacts,
            reviews,
            table_setup,
        }
    }

    /// Create every missing table. Without a table backend this is a no-op.
    #[instrument(skip(self))]
    pub async fn setup_tables(&self) -> ServiceResult<Vec<(String, TableSetupStatus)>> {
        let Some(setup) = &self.table_setup else {
            crate::info_with_trace!("Storage backend has no tables to set up");
            return Ok(Vec::new());
        };

        let statuses = setup.manager.create_all_tables(&setup.definitions).await?;
        crate::info_with_trace!("Table setup finished for {} tables", statuses.len());
        Ok(statuses)
    }

    /// Create the sample catalog. Fails only when nothing at all was created.
    #[instrument(skip(self))]
    pub async fn seed(&self) -> ServiceResult<SeedReport> {
        let mut report = SeedReport::default();

        for request in sample_products() {
            let name = request.name.clone();
            match self.products.create(request).await {
                Ok(_) => report.products_created += 1,
                Err(err) => {
                    warn!("Failed to seed product {}: {}", name, err);
                    report.errors.push(format!("{}: {}", name, err));
                }
            }
        }

        for request in sample_books() {
            let title = request.title.clone();
            match self.books.create(request).await {
                Ok(_) => report.books_created += 1,
                Err(err) => {
                    warn!("Failed to seed book {}: {}", title, err);
                    report.errors.push(format!("{}: {}", title, err));
                }
            }
        }

        for request in sample_recipes() {
            let name = request.name.clone();
            match self.recipes.create(request).await {
                Ok(_) => report.recipes_created += 1,
                Err(err) => {
                    warn!("Failed to seed recipe {}: {}", name, err);
                    report.errors.push(format!("{}: {}", name, err));
                }
            }
        }

        if report.total_created() == 0 && !report.errors.is_empty() {
            crate::error_with_trace!("Seeding failed for every entry");
            return Err(ServiceError::Configuration {
                message: format!("Seeding failed: {}", report.errors.join("; ")),
            });
        }

        crate::info_with_trace!(
            "Seeded {} entries with {} errors",
            report.total_created(),
            report.errors.len()
        );
        Ok(report)
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> ServiceResult<StoreStats> {
        let (products, books, recipes, carts, contacts, reviews) = tokio::try_join!(
            self.products.count(),
            self.books.count(),
            self.recipes.count(),
            self.carts.count_carts(),
            self.contacts.count_by_status(),
            self.reviews.count_by_status(),
        )?;

        Ok(StoreStats {
            products,
            books,
            recipes,
            carts,
            contacts,
            reviews,
        })
    }
}
