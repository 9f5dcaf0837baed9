//! In-process repositories used by the `memory` storage backend and by tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::models::{Cart, Document, FavoriteEntry, RepositoryError, RepositoryResult};

use super::{CartRepository, DocumentRepository, FavoriteRepository};

/// Collection held in a map keyed by id
pub struct InMemoryDocumentRepository<T> {
    documents: RwLock<HashMap<String, T>>,
}

impl<T: Document> InMemoryDocumentRepository<T> {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Document> Default for InMemoryDocumentRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Document> DocumentRepository<T> for InMemoryDocumentRepository<T> {
    async fn find_all(&self) -> RepositoryResult<Vec<T>> {
        Ok(self.documents.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<T>> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    #[instrument(skip(self, document), fields(kind = T::KIND, id = %document.id()))]
    async fn create(&self, document: T) -> RepositoryResult<T> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(document.id()) {
            return Err(RepositoryError::ConstraintViolation {
                message: format!("{} {} already exists", T::KIND, document.id()),
            });
        }
        documents.insert(document.id().to_string(), document.clone());
        debug!("Document stored");
        Ok(document)
    }

    async fn update(&self, document: T) -> RepositoryResult<T> {
        let mut documents = self.documents.write().await;
        match documents.get_mut(document.id()) {
            Some(existing) => {
                *existing = document.clone();
                Ok(document)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.documents
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.documents.read().await.len())
    }
}

/// Carts keyed by user id
#[derive(Default)]
pub struct InMemoryCartRepository {
    carts: RwLock<HashMap<String, Cart>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn find_cart(&self, user_id: &str) -> RepositoryResult<Option<Cart>> {
        Ok(self.carts.read().await.get(user_id).cloned())
    }

    async fn save_cart(&self, cart: Cart) -> RepositoryResult<Cart> {
        self.carts
            .write()
            .await
            .insert(cart.user_id.clone(), cart.clone());
        Ok(cart)
    }

    async fn delete_cart(&self, user_id: &str) -> RepositoryResult<()> {
        self.carts.write().await.remove(user_id);
        Ok(())
    }

    async fn count_carts(&self) -> RepositoryResult<usize> {
        Ok(self.carts.read().await.len())
    }
}

/// Favorites keyed by user, then item
#[derive(Default)]
pub struct InMemoryFavoriteRepository {
    favorites: RwLock<HashMap<String, BTreeMap<String, FavoriteEntry>>>,
}

impl InMemoryFavoriteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryFavoriteRepository {
    async fn find_by_user(&self, user_id: &str) -> RepositoryResult<Vec<FavoriteEntry>> {
        Ok(self
            .favorites
            .read()
            .await
            .get(user_id)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find(&self, user_id: &str, item_id: &str) -> RepositoryResult<Option<FavoriteEntry>> {
        Ok(self
            .favorites
            .read()
            .await
            .get(user_id)
            .and_then(|entries| entries.get(item_id))
            .cloned())
    }

    async fn save(&self, entry: FavoriteEntry) -> RepositoryResult<FavoriteEntry> {
        self.favorites
            .write()
            .await
            .entry(entry.user_id.clone())
            .or_default()
            .insert(entry.item_id.clone(), entry.clone());
        Ok(entry)
    }

    async fn delete(&self, user_id: &str, item_id: &str) -> RepositoryResult<bool> {
        let mut favorites = self.favorites.write().await;
        let Some(entries) = favorites.get_mut(user_id) else {
            return Ok(false);
        };
        let removed = entries.remove(item_id).is_some();
        if entries.is_empty() {
            favorites.remove(user_id);
        }
        Ok(removed)
    }
}
