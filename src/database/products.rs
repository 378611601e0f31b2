use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;

use super::{MongoDB, ProductStore, PRODUCTS_COLLECTION};
use crate::models::{AddProductRequest, Product};
use crate::utils::AppError;

#[async_trait]
impl ProductStore for MongoDB {
    async fn all_products(&self) -> Result<Vec<Product>, AppError> {
        let cursor = self
            .collection::<Product>(PRODUCTS_COLLECTION)
            .find(doc! {})
            .sort(doc! { "id": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn products_in_category(&self, category: &str, limit: Option<i64>) -> Result<Vec<Product>, AppError> {
        let collection = self.collection::<Product>(PRODUCTS_COLLECTION);
        let mut find = collection
            .find(doc! { "category": category })
            .sort(doc! { "id": 1 });

        if let Some(limit) = limit {
            find = find.limit(limit);
        }

        Ok(find.await?.try_collect().await?)
    }

    async fn insert_product(&self, request: AddProductRequest) -> Result<Product, AppError> {
        let collection = self.collection::<Product>(PRODUCTS_COLLECTION);

        let last = collection
            .find_one(doc! {})
            .sort(doc! { "id": -1 })
            .await?;
        let next_id = last.map(|p| p.id + 1).unwrap_or(1);

        // products(id) is unique, so a concurrent insert with the same id fails here
        let mut product = Product::new(next_id, request);
        let result = collection.insert_one(&product).await?;
        product.object_id = result.inserted_id.as_object_id();

        Ok(product)
    }

    async fn remove_product(&self, id: i64) -> Result<Option<Product>, AppError> {
        Ok(self
            .collection::<Product>(PRODUCTS_COLLECTION)
            .find_one_and_delete(doc! { "id": id })
            .await?)
    }
}
