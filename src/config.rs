use std::env;
use std::str::FromStr;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_JWT_SECRET: &str = "default-secret-change-me";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDB,
    Memory,
}

/// Token signing settings shared by the login handlers and the auth middleware
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    /// None keeps tokens valid forever
    pub jwt_expiry_hours: Option<i64>,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub auth: AuthSettings,
    pub public_url: String,
    pub legacy_image_hosts: Vec<String>,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_or("PORT", DEFAULT_PORT);

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "mongodb".to_string())
            .to_lowercase()
            .as_str()
        {
            "mongodb" | "mongo" => StoreBackend::MongoDB,
            "memory" => StoreBackend::Memory,
            other => return Err(format!("Invalid STORE_BACKEND: {}. Supported: mongodb, memory", other)),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::MongoDB && database_url.is_none() {
            return Err("DATABASE_URL must be set when STORE_BACKEND=mongodb".to_string());
        }

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("⚠️  JWT_SECRET not set, using the built-in default secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let jwt_expiry_hours = env::var("JWT_EXPIRY_HOURS")
            .ok()
            .and_then(|v| match v.parse::<i64>() {
                Ok(h) if h > 0 => Some(h),
                _ => {
                    log::warn!("⚠️  Ignoring invalid JWT_EXPIRY_HOURS: {}", v);
                    None
                }
            });

        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            host,
            port,
            store_backend,
            database_url,
            auth: AuthSettings {
                jwt_secret,
                jwt_expiry_hours,
                bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST),
            },
            public_url,
            legacy_image_hosts: list_or("LEGACY_IMAGE_HOSTS", &["https://localhost:4000"]),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "upload/images".to_string()),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            allowed_origins: list_or(
                "ALLOWED_ORIGINS",
                &[
                    "https://shopping-frontend-gold.vercel.app",
                    "https://e-commerce-shopping-admin.onrender.com",
                ],
            ),
        })
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("⚠️  Invalid {}: {} (using {})", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn list_or(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(raw) => split_list(&raw),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
impl Config {
    /// In-memory configuration for handler tests
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            store_backend: StoreBackend::Memory,
            database_url: None,
            auth: AuthSettings {
                jwt_secret: "test-secret".to_string(),
                jwt_expiry_hours: None,
                bcrypt_cost: 4,
            },
            public_url: "http://localhost:4000".to_string(),
            legacy_image_hosts: vec!["https://localhost:4000".to_string()],
            upload_dir: std::env::temp_dir()
                .join("storefront-service-tests")
                .to_string_lossy()
                .into_owned(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_origins: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_entries() {
        let list = split_list(" https://a.example/ , ,https://b.example");
        assert_eq!(list, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_split_list_empty() {
        assert!(split_list("").is_empty());
    }
}
