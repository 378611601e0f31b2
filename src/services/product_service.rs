use crate::{
    database::ProductStore,
    models::{AddProductRequest, Product, ProductResponse},
    utils::AppError,
};

const NEW_COLLECTION_SIZE: usize = 8;
const POPULAR_CATEGORY: &str = "women";
const POPULAR_SIZE: i64 = 4;

/// Public base URL plus the host prefixes that older product records were saved with
#[derive(Debug, Clone)]
pub struct ImageHosts<'a> {
    pub public_url: &'a str,
    pub legacy_hosts: &'a [String],
}

impl ImageHosts<'_> {
    /// Points images saved under a legacy host at the public URL
    pub fn rewrite(&self, image: &str) -> String {
        for legacy in self.legacy_hosts {
            if let Some(rest) = image.strip_prefix(legacy.as_str()) {
                return format!("{}{}", self.public_url, rest);
            }
        }
        image.to_string()
    }

    fn present(&self, products: Vec<Product>) -> Vec<ProductResponse> {
        products
            .into_iter()
            .map(|mut product| {
                product.image = self.rewrite(&product.image);
                ProductResponse::from(product)
            })
            .collect()
    }
}

/// Catalog minus its first entry, then the last 8 of what remains
pub fn new_collection_slice<T>(mut products: Vec<T>) -> Vec<T> {
    if products.is_empty() {
        return products;
    }
    products.remove(0);
    let start = products.len().saturating_sub(NEW_COLLECTION_SIZE);
    products.split_off(start)
}

pub async fn add_product(store: &dyn ProductStore, request: AddProductRequest) -> Result<Product, AppError> {
    let product = store.insert_product(request).await?;
    log::info!("✅ Product saved: #{} {}", product.id, product.name);
    Ok(product)
}

pub async fn remove_product(store: &dyn ProductStore, id: i64) -> Result<Option<Product>, AppError> {
    let removed = store.remove_product(id).await?;
    match &removed {
        Some(product) => log::info!("🗑️  Product removed: #{} {}", product.id, product.name),
        None => log::info!("Product #{} not found, nothing removed", id),
    }
    Ok(removed)
}

pub async fn all_products(store: &dyn ProductStore, hosts: &ImageHosts<'_>) -> Result<Vec<ProductResponse>, AppError> {
    Ok(hosts.present(store.all_products().await?))
}

pub async fn new_collections(store: &dyn ProductStore, hosts: &ImageHosts<'_>) -> Result<Vec<ProductResponse>, AppError> {
    let products = new_collection_slice(store.all_products().await?);
    Ok(hosts.present(products))
}

pub async fn popular_in_women(store: &dyn ProductStore, hosts: &ImageHosts<'_>) -> Result<Vec<ProductResponse>, AppError> {
    let products = store
        .products_in_category(POPULAR_CATEGORY, Some(POPULAR_SIZE))
        .await?;
    Ok(hosts.present(products))
}
