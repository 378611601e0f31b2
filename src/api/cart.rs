use actix_web::{web, HttpResponse, Responder, ResponseError};
use crate::{
    middleware::auth::Claims,
    models::ItemRequest,
    services::cart_service,
    state::AppState,
};

/// POST /addtocart - cart[itemId] += 1
#[utoipa::path(
    post,
    path = "/addtocart",
    tag = "Cart",
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Plain text `Added`"),
        (status = 400, description = "itemId is not a cart slot"),
        (status = 401, description = "Missing or invalid auth-token")
    ),
    security(("auth_token" = []))
)]
pub async fn add_to_cart(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    request: web::Json<ItemRequest>,
) -> impl Responder {
    let user_id = &user.user.id;
    log::info!("🛒 POST /addtocart - item {} for user {}", request.item_id, user_id);

    match cart_service::increment_cart_slot(state.users.as_ref(), user_id, &request.item_id).await {
        Ok(()) => HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("Added"),
        Err(e) => {
            log::warn!("❌ Failed to add item {} to cart: {}", request.item_id, e);
            e.error_response()
        }
    }
}

/// POST /removefromcart - cart[itemId] -= 1, never below 0
#[utoipa::path(
    post,
    path = "/removefromcart",
    tag = "Cart",
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Plain text `Removed`"),
        (status = 400, description = "itemId is not a cart slot"),
        (status = 401, description = "Missing or invalid auth-token")
    ),
    security(("auth_token" = []))
)]
pub async fn remove_from_cart(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    request: web::Json<ItemRequest>,
) -> impl Responder {
    let user_id = &user.user.id;
    log::info!("🛒 POST /removefromcart - item {} for user {}", request.item_id, user_id);

    match cart_service::decrement_cart_slot(state.users.as_ref(), user_id, &request.item_id).await {
        Ok(()) => HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("Removed"),
        Err(e) => {
            log::warn!("❌ Failed to remove item {} from cart: {}", request.item_id, e);
            e.error_response()
        }
    }
}

/// POST /getcart - full slot → quantity map
#[utoipa::path(
    post,
    path = "/getcart",
    tag = "Cart",
    responses(
        (status = 200, description = "Object keyed by slot index (\"0\"..\"299\") with quantities"),
        (status = 401, description = "Missing or invalid auth-token")
    ),
    security(("auth_token" = []))
)]
pub async fn get_cart(user: web::ReqData<Claims>, state: web::Data<AppState>) -> impl Responder {
    let user_id = &user.user.id;
    log::info!("🛒 POST /getcart - user {}", user_id);

    match cart_service::get_cart(state.users.as_ref(), user_id).await {
        Ok(cart) => HttpResponse::Ok().json(cart),
        Err(e) => {
            log::error!("❌ Failed to load cart for {}: {}", user_id, e);
            e.error_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{json_body, post, text_body, test_app};
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    #[actix_web::test]
    async fn test_signup_add_and_get_cart() {
        let app = test_app!();
        let signup = json!({ "username": "ana", "email": "a@x.com", "password": "p" });
        let res = test::call_service(&app, post("/signup", Some(signup), None).to_request()).await;
        let token = json_body(res).await["token"].as_str().unwrap().to_string();

        let res = test::call_service(&app, post("/getcart", None, Some(&token)).to_request()).await;
        let cart = json_body(res).await;
        let slots = cart.as_object().unwrap();
        assert_eq!(slots.len(), 300);
        assert!(slots.values().all(|q| q == 0));

        let res = test::call_service(&app, post("/addtocart", Some(json!({ "itemId": 5 })), Some(&token)).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(text_body(res).await, "Added");

        let res = test::call_service(&app, post("/getcart", None, Some(&token)).to_request()).await;
        let cart = json_body(res).await;
        assert_eq!(cart["5"], 1);
        let total: u64 = cart.as_object().unwrap().values().map(|q| q.as_u64().unwrap()).sum();
        assert_eq!(total, 1);
    }

    #[actix_web::test]
    async fn test_remove_from_cart_floors_at_zero() {
        let app = test_app!();
        let signup = json!({ "username": "ana", "email": "a@x.com", "password": "p" });
        let res = test::call_service(&app, post("/signup", Some(signup), None).to_request()).await;
        let token = json_body(res).await["token"].as_str().unwrap().to_string();

        test::call_service(&app, post("/addtocart", Some(json!({ "itemId": "8" })), Some(&token)).to_request()).await;
        for _ in 0..3 {
            let res = test::call_service(&app, post("/removefromcart", Some(json!({ "itemId": 8 })), Some(&token)).to_request()).await;
            assert_eq!(text_body(res).await, "Removed");
        }

        let res = test::call_service(&app, post("/getcart", None, Some(&token)).to_request()).await;
        assert_eq!(json_body(res).await["8"], 0);
    }

    #[actix_web::test]
    async fn test_cart_routes_require_token() {
        let app = test_app!();

        for path in ["/addtocart", "/removefromcart", "/getcart"] {
            let res = test::call_service(&app, post(path, Some(json!({ "itemId": 1 })), None).to_request()).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            let body = json_body(res).await;
            assert_eq!(body["errors"], "Please authenticate using a valid token");
        }
    }

    #[actix_web::test]
    async fn test_rejected_token_does_not_mutate() {
        let app = test_app!();
        let signup = json!({ "username": "ana", "email": "a@x.com", "password": "p" });
        let res = test::call_service(&app, post("/signup", Some(signup), None).to_request()).await;
        let token = json_body(res).await["token"].as_str().unwrap().to_string();

        let forged = format!("{}x", token);
        let res = test::call_service(&app, post("/addtocart", Some(json!({ "itemId": 2 })), Some(&forged)).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = test::call_service(&app, post("/addtocart", Some(json!({ "itemId": 2 })), None).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = test::call_service(&app, post("/getcart", None, Some(&token)).to_request()).await;
        assert_eq!(json_body(res).await["2"], 0);
    }

    #[actix_web::test]
    async fn test_out_of_range_slot_is_400() {
        let app = test_app!();
        let signup = json!({ "username": "ana", "email": "a@x.com", "password": "p" });
        let res = test::call_service(&app, post("/signup", Some(signup), None).to_request()).await;
        let token = json_body(res).await["token"].as_str().unwrap().to_string();

        let res = test::call_service(&app, post("/addtocart", Some(json!({ "itemId": 300 })), Some(&token)).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
