// Repositories module - data access layer

pub mod cart_repository;
pub mod document_repository;
pub mod dynamodb;
pub mod favorite_repository;
pub mod memory;
pub mod records;
pub mod table_manager;


pub use cart_repository::{CartRepository, DynamoDbCartRepository};
pub use document_repository::{DocumentRepository, DynamoDbDocumentRepository};
pub use favorite_repository::{DynamoDbFavoriteRepository, FavoriteRepository};
pub use memory::{InMemoryCartRepository, InMemoryDocumentRepository, InMemoryFavoriteRepository};
pub use records::DynamoRecord;
pub use table_manager::{TableDefinition, TableManager, TableSetupStatus};
