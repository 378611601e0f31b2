use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::users::DUPLICATE_EMAIL_MESSAGE;
use super::{ProductStore, UpdateOutcome, UserStore};
use crate::models::{AddProductRequest, CartData, ItemId, Product, User};
use crate::utils::AppError;

/// Process-local store (`STORE_BACKEND=memory`).
///
/// Each mutation holds the write lock for its whole read-modify-write, which gives the
/// same per-operation atomicity as the MongoDB update operators.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<ObjectId, User>>,
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn mutate_user<F>(&self, user_id: &ObjectId, f: F) -> UpdateOutcome
    where
        F: FnOnce(&mut User) -> bool + Send,
    {
        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(user) => {
                if f(user) {
                    UpdateOutcome::Applied
                } else {
                    UpdateOutcome::Unchanged
                }
            }
            None => UpdateOutcome::UserNotFound,
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Validation(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_password(&self, user_id: &ObjectId, password_hash: &str) -> Result<(), AppError> {
        let hash = password_hash.to_string();
        self.mutate_user(user_id, move |user| {
            user.password = hash;
            true
        })
        .await;
        Ok(())
    }

    async fn increment_cart_slot(&self, user_id: &ObjectId, slot: usize) -> Result<UpdateOutcome, AppError> {
        Ok(self
            .mutate_user(user_id, |user| {
                user.cart.increment(slot);
                true
            })
            .await)
    }

    async fn decrement_cart_slot(&self, user_id: &ObjectId, slot: usize) -> Result<UpdateOutcome, AppError> {
        Ok(self.mutate_user(user_id, |user| user.cart.decrement(slot)).await)
    }

    async fn cart(&self, user_id: &ObjectId) -> Result<Option<CartData>, AppError> {
        let users = self.users.read().await;
        Ok(users.get(user_id).map(|u| u.cart.clone()))
    }

    async fn push_wishlist_item(&self, user_id: &ObjectId, item: &ItemId) -> Result<UpdateOutcome, AppError> {
        let item = item.clone();
        Ok(self
            .mutate_user(user_id, move |user| {
                user.wishlist.push(item);
                true
            })
            .await)
    }

    async fn pull_wishlist_item(&self, user_id: &ObjectId, item: &ItemId) -> Result<UpdateOutcome, AppError> {
        Ok(self
            .mutate_user(user_id, |user| {
                let before = user.wishlist.len();
                user.wishlist.retain(|stored| !item.matches(stored));
                user.wishlist.len() != before
            })
            .await)
    }

    async fn wishlist(&self, user_id: &ObjectId) -> Result<Option<Vec<ItemId>>, AppError> {
        let users = self.users.read().await;
        Ok(users.get(user_id).map(|u| u.wishlist.clone()))
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn all_products(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.products.read().await.clone())
    }

    async fn products_in_category(&self, category: &str, limit: Option<i64>) -> Result<Vec<Product>, AppError> {
        let products = self.products.read().await;
        let limit = limit.and_then(|l| usize::try_from(l).ok()).unwrap_or(usize::MAX);

        Ok(products
            .iter()
            .filter(|p| p.category == category)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_product(&self, request: AddProductRequest) -> Result<Product, AppError> {
        let mut products = self.products.write().await;
        let next_id = products.iter().map(|p| p.id).max().map(|id| id + 1).unwrap_or(1);

        let mut product = Product::new(next_id, request);
        product.object_id = Some(ObjectId::new());
        products.push(product.clone());

        Ok(product)
    }

    async fn remove_product(&self, id: i64) -> Result<Option<Product>, AppError> {
        let mut products = self.products.write().await;
        Ok(products
            .iter()
            .position(|p| p.id == id)
            .map(|index| products.remove(index)))
    }
}
