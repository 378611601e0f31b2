pub mod memory;
pub mod products;
pub mod users;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::{Client, Collection, Database};
use std::error::Error;

use crate::models::{AddProductRequest, CartData, ItemId, Product, User};
use crate::utils::AppError;

pub use memory::MemoryStore;

pub const USERS_COLLECTION: &str = "users";
pub const PRODUCTS_COLLECTION: &str = "products";

const DEFAULT_DB_NAME: &str = "ecommerce";

/// Result of a single atomic mutation on a user document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// The guard did not hold (slot already at 0, item not in the wishlist)
    Unchanged,
    UserNotFound,
}

/// Persistence of user accounts, carts and wishlists.
///
/// Every cart/wishlist mutation is one atomic operation on the store; callers never
/// read the document and write it back.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with `Validation` when the email is already registered
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;

    async fn update_password(&self, user_id: &ObjectId, password_hash: &str) -> Result<(), AppError>;

    async fn increment_cart_slot(&self, user_id: &ObjectId, slot: usize) -> Result<UpdateOutcome, AppError>;

    /// Decrements only when the slot is above 0
    async fn decrement_cart_slot(&self, user_id: &ObjectId, slot: usize) -> Result<UpdateOutcome, AppError>;

    async fn cart(&self, user_id: &ObjectId) -> Result<Option<CartData>, AppError>;

    async fn push_wishlist_item(&self, user_id: &ObjectId, item: &ItemId) -> Result<UpdateOutcome, AppError>;

    /// Removes every occurrence of `item`
    async fn pull_wishlist_item(&self, user_id: &ObjectId, item: &ItemId) -> Result<UpdateOutcome, AppError>;

    async fn wishlist(&self, user_id: &ObjectId) -> Result<Option<Vec<ItemId>>, AppError>;
}

/// Persistence of the product catalog
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Whole catalog ordered by product id
    async fn all_products(&self) -> Result<Vec<Product>, AppError>;

    async fn products_in_category(&self, category: &str, limit: Option<i64>) -> Result<Vec<Product>, AppError>;

    /// Assigns the next sequential id (highest id + 1, starting at 1)
    async fn insert_product(&self, request: AddProductRequest) -> Result<Product, AppError>;

    async fn remove_product(&self, id: i64) -> Result<Option<Product>, AppError>;
}

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DB_NAME.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await;

        log::info!("✅ MongoDB connected (database: {})", db_name);

        Ok(mongodb)
    }

    /// Creates the indexes the stores rely on. Failures are logged, not fatal
    async fn ensure_indexes(&self) {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<mongodb::bson::Document>(USERS_COLLECTION);
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index ready: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }

        let products = self.collection::<mongodb::bson::Document>(PRODUCTS_COLLECTION);
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match products.create_index(id_index).await {
            Ok(_) => log::info!("   ✅ Index ready: products(id) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create products(id) index: {}", e),
        }

        let category_index = IndexModel::builder()
            .keys(doc! { "category": 1, "id": 1 })
            .build();

        match products.create_index(category_index).await {
            Ok(_) => log::info!("   ✅ Index ready: products(category, id)"),
            Err(e) => log::warn!("   ⚠️  Could not create products(category) index: {}", e),
        }
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

/// E11000 duplicate key
pub(crate) fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == 11000
    )
}
