use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

use super::{CartData, ItemId};

/// Document of the "users" collection
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    /// bcrypt hash; older records may still hold the plaintext password
    pub password: String,
    #[serde(rename = "cartData", default)]
    pub cart: CartData,
    #[serde(rename = "wishlistData", default)]
    pub wishlist: Vec<ItemId>,
    #[serde(default = "BsonDateTime::now")]
    pub date: BsonDateTime,
}

impl User {
    /// Fresh account: 300 empty cart slots, empty wishlist
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: ObjectId::new(),
            name,
            email,
            password: password_hash,
            cart: CartData::empty(),
            wishlist: Vec::new(),
            date: BsonDateTime::now(),
        }
    }

    pub fn user_id(&self) -> String {
        self.id.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    #[test]
    fn test_new_user_starts_empty() {
        let user = User::new("ana".into(), "a@x.com".into(), "hash".into());
        assert_eq!(user.cart, CartData::empty());
        assert!(user.wishlist.is_empty());
        assert_eq!(user.user_id().len(), 24);
    }

    #[test]
    fn test_reads_legacy_document() {
        let id = ObjectId::new();
        let stored = doc! {
            "_id": id,
            "name": "bo",
            "email": "b@x.com",
            "password": "plain",
            "cartData": { "1": 3 },
            "wishlistData": [4, "7"],
            "date": BsonDateTime::now(),
            "__v": 0,
        };

        let user: User = bson::from_document(stored).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.cart.quantity(1), 3);
        assert_eq!(user.wishlist.len(), 2);
        assert!(user.wishlist[1].matches(&ItemId::Number(7)));
    }
}
