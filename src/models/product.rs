use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Produto do catálogo (collection "products")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,

    /// Sequential catalog id (1, 2, 3, ...)
    pub id: i64,

    pub name: String,

    pub image: String,

    /// "women", "men", "kid", ...
    pub category: String,

    pub new_price: f64,

    pub old_price: f64,

    #[serde(default = "BsonDateTime::now")]
    pub date: BsonDateTime,

    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Admin forms send numeric inputs either as JSON numbers or as strings ("50")
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Numeric::deserialize(deserializer)? {
        Numeric::Int(n) => Ok(n as f64),
        Numeric::Float(n) => Ok(n),
        Numeric::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| de::Error::custom(format!("invalid number: {:?}", s))),
    }
}

fn integer_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = number_or_string(deserializer)?;
    if value.fract() != 0.0 {
        return Err(de::Error::custom(format!("expected an integer id, got {}", value)));
    }
    Ok(value as i64)
}

/// Request para criar produto
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct AddProductRequest {
    pub name: String,
    pub image: String,
    pub category: String,
    #[serde(deserialize_with = "number_or_string")]
    pub new_price: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub old_price: f64,
}

/// Request para remover produto
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RemoveProductRequest {
    #[serde(deserialize_with = "integer_or_string")]
    pub id: i64,
    pub name: Option<String>,
}

/// Produto como devolvido pela API
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ProductResponse {
    /// Document `_id` as hex
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    pub id: i64,
    pub name: String,
    pub image: String,
    pub category: String,
    pub new_price: f64,
    pub old_price: f64,
    /// RFC 3339
    pub date: String,
    pub available: bool,
}

impl Product {
    pub fn new(id: i64, request: AddProductRequest) -> Self {
        Product {
            object_id: None,
            id,
            name: request.name,
            image: request.image,
            category: request.category,
            new_price: request.new_price,
            old_price: request.old_price,
            date: BsonDateTime::now(),
            available: true,
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let date = chrono::DateTime::from_timestamp_millis(product.date.timestamp_millis())
            .map(|d| d.to_rfc3339())
            .unwrap_or_default();

        ProductResponse {
            object_id: product.object_id.map(|oid| oid.to_hex()),
            id: product.id,
            name: product.name,
            image: product.image,
            category: product.category,
            new_price: product.new_price,
            old_price: product.old_price,
            date,
            available: product.available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_request_accepts_numeric_strings() {
        let request: AddProductRequest = serde_json::from_str(
            r#"{"name":"dress","image":"x.png","category":"women","new_price":"50","old_price":80.5}"#,
        )
        .unwrap();
        assert_eq!(request.new_price, 50.0);
        assert_eq!(request.old_price, 80.5);

        let bad = serde_json::from_str::<AddProductRequest>(
            r#"{"name":"dress","image":"x.png","category":"women","new_price":"cheap","old_price":1}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_remove_request_id_forms() {
        let a: RemoveProductRequest = serde_json::from_str(r#"{"id":"5"}"#).unwrap();
        let b: RemoveProductRequest = serde_json::from_str(r#"{"id":5,"name":"boot"}"#).unwrap();
        assert_eq!((a.id, b.id), (5, 5));
        assert!(serde_json::from_str::<RemoveProductRequest>(r#"{"id":"5.5"}"#).is_err());
    }

    #[test]
    fn test_response_carries_hex_object_id() {
        let mut product = Product::new(
            3,
            AddProductRequest {
                name: "a".into(),
                image: "a.png".into(),
                category: "kid".into(),
                new_price: 1.0,
                old_price: 2.0,
            },
        );
        let oid = ObjectId::new();
        product.object_id = Some(oid);

        let json = serde_json::to_value(ProductResponse::from(product)).unwrap();
        assert_eq!(json["_id"], oid.to_hex());
        assert_eq!(json["id"], 3);
    }
}
