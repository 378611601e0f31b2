use actix_web::{web, HttpResponse, Responder, ResponseError};
use crate::{
    middleware::auth::Claims,
    models::{ItemId, ItemRequest},
    services::cart_service,
    state::AppState,
};

/// POST /addtowishlist - appends itemId (duplicates allowed)
#[utoipa::path(
    post,
    path = "/addtowishlist",
    tag = "Wishlist",
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Plain text `Added`"),
        (status = 401, description = "Missing or invalid auth-token")
    ),
    security(("auth_token" = []))
)]
pub async fn add_to_wishlist(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    request: web::Json<ItemRequest>,
) -> impl Responder {
    let user_id = &user.user.id;
    log::info!("💜 POST /addtowishlist - item {} for user {}", request.item_id, user_id);

    match cart_service::add_wishlist_item(state.users.as_ref(), user_id, &request.item_id).await {
        Ok(()) => HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("Added"),
        Err(e) => {
            log::warn!("❌ Failed to add {} to wishlist: {}", request.item_id, e);
            e.error_response()
        }
    }
}

/// POST /removefromwishlist - drops every occurrence of itemId
#[utoipa::path(
    post,
    path = "/removefromwishlist",
    tag = "Wishlist",
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Plain text `Removed`"),
        (status = 401, description = "Missing or invalid auth-token")
    ),
    security(("auth_token" = []))
)]
pub async fn remove_from_wishlist(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    request: web::Json<ItemRequest>,
) -> impl Responder {
    let user_id = &user.user.id;
    log::info!("💜 POST /removefromwishlist - item {} for user {}", request.item_id, user_id);

    match cart_service::remove_wishlist_item(state.users.as_ref(), user_id, &request.item_id).await {
        Ok(()) => HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("Removed"),
        Err(e) => {
            log::warn!("❌ Failed to remove {} from wishlist: {}", request.item_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/getwishlist",
    tag = "Wishlist",
    responses(
        (status = 200, description = "Wishlist item ids in insertion order", body = [ItemId]),
        (status = 401, description = "Missing or invalid auth-token")
    ),
    security(("auth_token" = []))
)]
pub async fn get_wishlist(user: web::ReqData<Claims>, state: web::Data<AppState>) -> impl Responder {
    let user_id = &user.user.id;
    log::info!("💜 POST /getwishlist - user {}", user_id);

    match cart_service::get_wishlist(state.users.as_ref(), user_id).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => {
            log::error!("❌ Failed to load wishlist for {}: {}", user_id, e);
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
    async fn test_wishlist_add_remove_all_occurrences() {
        let app = test_app!();
        let signup = json!({ "username": "ana", "email": "a@x.com", "password": "p" });
        let res = test::call_service(&app, post("/signup", Some(signup), None).to_request()).await;
        let token = json_body(res).await["token"].as_str().unwrap().to_string();

        for item in [json!(3), json!(9), json!(3)] {
            let res = test::call_service(&app, post("/addtowishlist", Some(json!({ "itemId": item })), Some(&token)).to_request()).await;
            assert_eq!(text_body(res).await, "Added");
        }

        let res = test::call_service(&app, post("/getwishlist", None, Some(&token)).to_request()).await;
        assert_eq!(json_body(res).await, json!([3, 9, 3]));

        let res = test::call_service(&app, post("/removefromwishlist", Some(json!({ "itemId": 3 })), Some(&token)).to_request()).await;
        assert_eq!(text_body(res).await, "Removed");

        let res = test::call_service(&app, post("/getwishlist", None, Some(&token)).to_request()).await;
        assert_eq!(json_body(res).await, json!([9]));
    }

    #[actix_web::test]
    async fn test_wishlist_routes_require_token() {
        let app = test_app!();

        for path in ["/addtowishlist", "/removefromwishlist", "/getwishlist"] {
            let res = test::call_service(&app, post(path, Some(json!({ "itemId": 1 })), None).to_request()).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn test_new_account_wishlist_is_empty() {
        let app = test_app!();
        let signup = json!({ "username": "ana", "email": "a@x.com", "password": "p" });
        let res = test::call_service(&app, post("/signup", Some(signup), None).to_request()).await;
        let token = json_body(res).await["token"].as_str().unwrap().to_string();

        let res = test::call_service(&app, post("/getwishlist", None, Some(&token)).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await, json!([]));
    }

    #[actix_web::test]
    async fn test_rejected_token_leaves_wishlist_untouched() {
        let app = test_app!();
        let signup = json!({ "username": "ana", "email": "a@x.com", "password": "p" });
        let res = test::call_service(&app, post("/signup", Some(signup), None).to_request()).await;
        let token = json_body(res).await["token"].as_str().unwrap().to_string();
        let forged = format!("{}x", token);

        let res = test::call_service(&app, post("/addtowishlist", Some(json!({ "itemId": 4 })), None).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let res = test::call_service(&app, post("/addtowishlist", Some(json!({ "itemId": 4 })), Some(&forged)).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = test::call_service(&app, post("/getwishlist", None, Some(&token)).to_request()).await;
        assert_eq!(json_body(res).await, json!([]));

        test::call_service(&app, post("/addtowishlist", Some(json!({ "itemId": 4 })), Some(&token)).to_request()).await;

        let res = test::call_service(&app, post("/removefromwishlist", Some(json!({ "itemId": 4 })), None).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let res = test::call_service(&app, post("/removefromwishlist", Some(json!({ "itemId": 4 })), Some(&forged)).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = test::call_service(&app, post("/getwishlist", None, Some(&token)).to_request()).await;
        assert_eq!(json_body(res).await, json!([4]));
    }
}
