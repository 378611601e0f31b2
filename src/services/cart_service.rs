//! Cart and wishlist operations for an authenticated user.
//!
//! Each operation is a single atomic call on the [`UserStore`]; a cart slot moves
//! `n -> n + 1` on increment and `n -> max(n - 1, 0)` on decrement.

use mongodb::bson::oid::ObjectId;

use crate::{
    database::{UpdateOutcome, UserStore},
    models::{CartData, ItemId, CART_SLOTS},
    utils::AppError,
};

pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";

/// Parses the user id carried by a session token
pub fn parse_user_id(user_id: &str) -> Result<ObjectId, AppError> {
    // A signed token with a malformed id cannot name any account
    ObjectId::parse_str(user_id).map_err(|_| AppError::Unauthenticated)
}

fn slot_for(item: &ItemId) -> Result<usize, AppError> {
    item.as_slot()
        .filter(|slot| CartData::is_valid_slot(*slot))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid itemId {}: cart slots range from 0 to {}",
                item,
                CART_SLOTS - 1
            ))
        })
}

fn require_user(outcome: UpdateOutcome) -> Result<UpdateOutcome, AppError> {
    match outcome {
        UpdateOutcome::UserNotFound => Err(AppError::NotFound(USER_NOT_FOUND_MESSAGE.to_string())),
        other => Ok(other),
    }
}

pub async fn increment_cart_slot(store: &dyn UserStore, user_id: &str, item: &ItemId) -> Result<(), AppError> {
    let id = parse_user_id(user_id)?;
    let slot = slot_for(item)?;

    require_user(store.increment_cart_slot(&id, slot).await?)?;
    log::debug!("cart[{}] += 1 for user {}", slot, user_id);
    Ok(())
}

/// No-op when the slot is already at 0
pub async fn decrement_cart_slot(store: &dyn UserStore, user_id: &str, item: &ItemId) -> Result<(), AppError> {
    let id = parse_user_id(user_id)?;
    let slot = slot_for(item)?;

    match require_user(store.decrement_cart_slot(&id, slot).await?)? {
        UpdateOutcome::Applied => log::debug!("cart[{}] -= 1 for user {}", slot, user_id),
        _ => log::debug!("cart[{}] already empty for user {}", slot, user_id),
    }
    Ok(())
}

pub async fn get_cart(store: &dyn UserStore, user_id: &str) -> Result<CartData, AppError> {
    let id = parse_user_id(user_id)?;
    store
        .cart(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND_MESSAGE.to_string()))
}

/// Appends without checking for duplicates
pub async fn add_wishlist_item(store: &dyn UserStore, user_id: &str, item: &ItemId) -> Result<(), AppError> {
    let id = parse_user_id(user_id)?;
    require_user(store.push_wishlist_item(&id, item).await?)?;
    Ok(())
}

/// Removes every occurrence of the item
pub async fn remove_wishlist_item(store: &dyn UserStore, user_id: &str, item: &ItemId) -> Result<(), AppError> {
    let id = parse_user_id(user_id)?;
    require_user(store.pull_wishlist_item(&id, item).await?)?;
    Ok(())
}

pub async fn get_wishlist(store: &dyn UserStore, user_id: &str) -> Result<Vec<ItemId>, AppError> {
    let id = parse_user_id(user_id)?;
    store
        .wishlist(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND_MESSAGE.to_string()))
}
