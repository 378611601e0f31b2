use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Product identifier as sent by the storefront (`5` or `"5"`)
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl ItemId {
    /// Cart slot addressed by this id, if it is a non-negative integer
    pub fn as_slot(&self) -> Option<usize> {
        match self {
            ItemId::Number(n) => usize::try_from(*n).ok(),
            ItemId::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Loose comparison: `5` and `"5"` name the same item. A stored entry matches when
    /// its BSON form is one of [`ItemId::equivalent_bson`], the same set the MongoDB
    /// `$pull` filter uses
    pub fn matches(&self, stored: &ItemId) -> bool {
        self.equivalent_bson().contains(&Bson::from(stored))
    }

    /// Every stored representation that `matches` this id
    pub fn equivalent_bson(&self) -> Vec<Bson> {
        match self {
            ItemId::Number(n) => vec![Bson::Int64(*n), Bson::String(n.to_string())],
            ItemId::Text(s) => {
                let mut values = vec![Bson::String(s.clone())];
                if let Ok(n) = s.parse::<i64>() {
                    values.push(Bson::Int64(n));
                    // "+5" or "05" also name the canonical "5"
                    if n.to_string() != *s {
                        values.push(Bson::String(n.to_string()));
                    }
                }
                values
            }
        }
    }
}

impl From<&ItemId> for Bson {
    fn from(item: &ItemId) -> Self {
        match item {
            ItemId::Number(n) => Bson::Int64(*n),
            ItemId::Text(s) => Bson::String(s.clone()),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Body of the cart and wishlist mutation endpoints
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ItemRequest {
    #[serde(rename = "itemId")]
    pub item_id: ItemId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_and_text_match() {
        let n = ItemId::Number(5);
        let t = ItemId::Text("5".into());
        assert!(n.matches(&t));
        assert!(t.matches(&n));
        assert!(!n.matches(&ItemId::Number(6)));
    }

    #[test]
    fn test_as_slot() {
        assert_eq!(ItemId::Number(12).as_slot(), Some(12));
        assert_eq!(ItemId::Text("7".into()).as_slot(), Some(7));
        assert_eq!(ItemId::Number(-1).as_slot(), None);
        assert_eq!(ItemId::Text("abc".into()).as_slot(), None);
    }

    #[test]
    fn test_item_request_accepts_both_shapes() {
        let a: ItemRequest = serde_json::from_str(r#"{"itemId": 3}"#).unwrap();
        let b: ItemRequest = serde_json::from_str(r#"{"itemId": "3"}"#).unwrap();
        assert!(a.item_id.matches(&b.item_id));
    }

    #[test]
    fn test_padded_text_is_a_distinct_id() {
        let padded = ItemId::Text(" 5".into());
        assert!(!ItemId::Number(5).matches(&padded));
        assert!(!ItemId::Number(5).equivalent_bson().contains(&Bson::from(&padded)));
        assert!(padded.matches(&padded));
    }

    #[test]
    fn test_equivalent_bson_covers_numeric_text() {
        let values = ItemId::Text("9".into()).equivalent_bson();
        assert!(values.contains(&Bson::String("9".into())));
        assert!(values.contains(&Bson::Int64(9)));
    }
}
