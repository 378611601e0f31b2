pub mod auth;
pub mod cart;
pub mod health;
pub mod products;
pub mod swagger;
pub mod upload;
pub mod wishlist;

use actix_web::{error::InternalError, web, HttpResponse};

use crate::middleware::AuthMiddleware;

/// Registers every route. Shared by `main` and the handler tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("❌ Rejected JSON body: {}", err);
        let response = HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "errors": err.to_string()
        }));
        InternalError::from_response(err, response).into()
    }))
    // Health check
    .route("/health", web::get().to(health::health_check))
    // Catalog
    .route("/upload", web::post().to(upload::upload_image))
    .route("/addproduct", web::post().to(products::add_product))
    .route("/removeproduct", web::post().to(products::remove_product))
    .route("/allproducts", web::get().to(products::all_products))
    .route("/newcollections", web::get().to(products::new_collections))
    .route("/popularinwomen", web::get().to(products::popular_in_women))
    // Auth
    .route("/signup", web::post().to(auth::signup))
    .route("/login", web::post().to(auth::login))
    // Cart & wishlist: require `auth-token`
    .service(
        web::resource("/addtocart")
            .wrap(AuthMiddleware)
            .route(web::post().to(cart::add_to_cart)),
    )
    .service(
        web::resource("/removefromcart")
            .wrap(AuthMiddleware)
            .route(web::post().to(cart::remove_from_cart)),
    )
    .service(
        web::resource("/getcart")
            .wrap(AuthMiddleware)
            .route(web::post().to(cart::get_cart)),
    )
    .service(
        web::resource("/addtowishlist")
            .wrap(AuthMiddleware)
            .route(web::post().to(wishlist::add_to_wishlist)),
    )
    .service(
        web::resource("/removefromwishlist")
            .wrap(AuthMiddleware)
            .route(web::post().to(wishlist::remove_from_wishlist)),
    )
    .service(
        web::resource("/getwishlist")
            .wrap(AuthMiddleware)
            .route(web::post().to(wishlist::get_wishlist)),
    );
}

#[cfg(test)]
pub(crate) mod tests {
    use actix_web::body::MessageBody;
    use actix_web::dev::ServiceResponse;
    use actix_web::test::{self, TestRequest};

    use crate::services::auth_service::AUTH_HEADER;

    /// Builds the full app on top of a fresh in-memory store
    macro_rules! test_app {
        () => {
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data(actix_web::web::Data::new(crate::state::AppState::in_memory()))
                    .configure(crate::api::configure),
            )
            .await
        };
    }
    pub(crate) use test_app;

    pub fn post(path: &str, body: Option<serde_json::Value>, token: Option<&str>) -> TestRequest {
        let mut req = TestRequest::post().uri(path);
        if let Some(body) = body {
            req = req.set_json(body);
        }
        if let Some(token) = token {
            req = req.insert_header((AUTH_HEADER, token));
        }
        req
    }

    pub async fn json_body<B: MessageBody>(res: ServiceResponse<B>) -> serde_json::Value {
        let bytes = test::read_body(res).await;
        serde_json::from_slice(&bytes).expect("response body is not JSON")
    }

    pub async fn text_body<B: MessageBody>(res: ServiceResponse<B>) -> String {
        let bytes = test::read_body(res).await;
        String::from_utf8(bytes.to_vec()).expect("response body is not UTF-8")
    }
}
