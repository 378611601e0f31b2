use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::Collection;

use super::{is_duplicate_key, MongoDB, UpdateOutcome, UserStore, USERS_COLLECTION};
use crate::models::{CartData, ItemId, User};
use crate::utils::AppError;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "Existing user found with same email address";

impl MongoDB {
    fn users(&self) -> Collection<User> {
        self.collection::<User>(USERS_COLLECTION)
    }

    async fn user_exists(&self, user_id: &ObjectId) -> Result<bool, AppError> {
        let count = self
            .collection::<Document>(USERS_COLLECTION)
            .count_documents(doc! { "_id": user_id })
            .await?;
        Ok(count > 0)
    }

    async fn find_by_id(&self, user_id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "_id": user_id }).await?)
    }

    /// Maps an update result to an outcome. A filter that matched nothing is either a
    /// missing user or a guard that did not hold
    async fn outcome(&self, user_id: &ObjectId, matched: u64, modified: u64) -> Result<UpdateOutcome, AppError> {
        if modified > 0 {
            return Ok(UpdateOutcome::Applied);
        }
        if matched > 0 || self.user_exists(user_id).await? {
            return Ok(UpdateOutcome::Unchanged);
        }
        Ok(UpdateOutcome::UserNotFound)
    }
}

fn slot_field(slot: usize) -> String {
    format!("cartData.{}", slot)
}

#[async_trait]
impl UserStore for MongoDB {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        match self.users().insert_one(user).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(AppError::Validation(DUPLICATE_EMAIL_MESSAGE.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_password(&self, user_id: &ObjectId, password_hash: &str) -> Result<(), AppError> {
        self.users()
            .update_one(doc! { "_id": user_id }, doc! { "$set": { "password": password_hash } })
            .await?;
        Ok(())
    }

    async fn increment_cart_slot(&self, user_id: &ObjectId, slot: usize) -> Result<UpdateOutcome, AppError> {
        let field = slot_field(slot);
        let result = self
            .users()
            .update_one(doc! { "_id": user_id }, doc! { "$inc": { field: 1 } })
            .await?;

        if result.matched_count == 0 {
            return Ok(UpdateOutcome::UserNotFound);
        }
        Ok(UpdateOutcome::Applied)
    }

    async fn decrement_cart_slot(&self, user_id: &ObjectId, slot: usize) -> Result<UpdateOutcome, AppError> {
        let field = slot_field(slot);
        // The $gt guard and the $inc run as one document update
        let result = self
            .users()
            .update_one(
                doc! { "_id": user_id, field.clone(): { "$gt": 0 } },
                doc! { "$inc": { field: -1 } },
            )
            .await?;

        self.outcome(user_id, result.matched_count, result.modified_count).await
    }

    async fn cart(&self, user_id: &ObjectId) -> Result<Option<CartData>, AppError> {
        Ok(self.find_by_id(user_id).await?.map(|user| user.cart))
    }

    async fn push_wishlist_item(&self, user_id: &ObjectId, item: &ItemId) -> Result<UpdateOutcome, AppError> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": user_id },
                doc! { "$push": { "wishlistData": Bson::from(item) } },
            )
            .await?;

        if result.matched_count == 0 {
            return Ok(UpdateOutcome::UserNotFound);
        }
        Ok(UpdateOutcome::Applied)
    }

    async fn pull_wishlist_item(&self, user_id: &ObjectId, item: &ItemId) -> Result<UpdateOutcome, AppError> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": user_id },
                doc! { "$pull": { "wishlistData": { "$in": item.equivalent_bson() } } },
            )
            .await?;

        self.outcome(user_id, result.matched_count, result.modified_count).await
    }

    async fn wishlist(&self, user_id: &ObjectId) -> Result<Option<Vec<ItemId>>, AppError> {
        Ok(self.find_by_id(user_id).await?.map(|user| user.wishlist))
    }
}
