use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

use crate::services::auth_service::AUTH_HEADER;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Service API",
        version = "1.0.0",
        description = "Backend for the storefront and admin frontends.\n\n**Authentication:** cart and wishlist endpoints require the token returned by `/signup` or `/login`, sent in the `auth-token` header.\n\n**Features:**\n- Product catalog and image upload\n- Signup and login\n- Per-user cart and wishlist",
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Catalog
        crate::api::upload::upload_image,
        crate::api::products::add_product,
        crate::api::products::remove_product,
        crate::api::products::all_products,
        crate::api::products::new_collections,
        crate::api::products::popular_in_women,

        // Auth
        crate::api::auth::signup,
        crate::api::auth::login,

        // Cart
        crate::api::cart::add_to_cart,
        crate::api::cart::remove_from_cart,
        crate::api::cart::get_cart,

        // Wishlist
        crate::api::wishlist::add_to_wishlist,
        crate::api::wishlist::remove_from_wishlist,
        crate::api::wishlist::get_wishlist,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::AddProductRequest,
            crate::models::RemoveProductRequest,
            crate::models::ProductResponse,
            crate::models::ItemId,
            crate::models::ItemRequest,
            crate::services::auth_service::SignupRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::TokenResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service status."),
        (name = "Products", description = "Catalog listing, creation, removal and image upload."),
        (name = "Auth", description = "Signup and login. Both return the token used in `auth-token`."),
        (name = "Cart", description = "Per-user quantity table of 300 slots."),
        (name = "Wishlist", description = "Per-user ordered list of product ids."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "auth_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    AUTH_HEADER,
                    "Token returned by /signup or /login",
                ))),
            );
        }
    }
}
