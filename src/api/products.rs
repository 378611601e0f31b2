use actix_web::{web, HttpResponse, Responder};
use crate::{
    models::{AddProductRequest, ProductResponse, RemoveProductRequest},
    services::product_service,
    state::AppState,
    utils::AppError,
};

fn server_error(context: &str, e: AppError) -> HttpResponse {
    log::error!("❌ Error {}: {}", context, e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "success": false,
        "error": "Server error"
    }))
}

#[utoipa::path(
    post,
    path = "/addproduct",
    tag = "Products",
    request_body = AddProductRequest,
    responses(
        (status = 200, description = "Product saved; returns `{success, name}`"),
        (status = 500, description = "Server error")
    )
)]
pub async fn add_product(
    state: web::Data<AppState>,
    request: web::Json<AddProductRequest>,
) -> impl Responder {
    log::info!("📦 POST /addproduct - {}", request.name);

    match product_service::add_product(state.products.as_ref(), request.into_inner()).await {
        Ok(product) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "name": product.name
        })),
        Err(e) => server_error("saving product", e),
    }
}

/// Echoes the removed product's name, or the name sent by the client when the id
/// matched nothing
#[utoipa::path(
    post,
    path = "/removeproduct",
    tag = "Products",
    request_body = RemoveProductRequest,
    responses(
        (status = 200, description = "Returns `{success, name}`"),
        (status = 500, description = "Server error")
    )
)]
pub async fn remove_product(
    state: web::Data<AppState>,
    request: web::Json<RemoveProductRequest>,
) -> impl Responder {
    log::info!("🗑️  POST /removeproduct - id {}", request.id);

    match product_service::remove_product(state.products.as_ref(), request.id).await {
        Ok(removed) => {
            let name = removed.map(|p| p.name).or_else(|| request.name.clone());
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "name": name
            }))
        }
        Err(e) => server_error("removing product", e),
    }
}

#[utoipa::path(
    get,
    path = "/allproducts",
    tag = "Products",
    responses(
        (status = 200, description = "Whole catalog", body = [ProductResponse]),
        (status = 500, description = "Server error")
    )
)]
pub async fn all_products(state: web::Data<AppState>) -> impl Responder {
    match product_service::all_products(state.products.as_ref(), &state.image_hosts()).await {
        Ok(products) => {
            log::info!("📦 All products fetched ({})", products.len());
            HttpResponse::Ok().json(products)
        }
        Err(e) => server_error("fetching products", e),
    }
}

#[utoipa::path(
    get,
    path = "/newcollections",
    tag = "Products",
    responses(
        (status = 200, description = "Latest 8 products, excluding the first catalog entry", body = [ProductResponse]),
        (status = 500, description = "Server error")
    )
)]
pub async fn new_collections(state: web::Data<AppState>) -> impl Responder {
    match product_service::new_collections(state.products.as_ref(), &state.image_hosts()).await {
        Ok(products) => {
            log::info!("📦 New collections fetched ({})", products.len());
            HttpResponse::Ok().json(products)
        }
        Err(e) => server_error("fetching new collections", e),
    }
}

#[utoipa::path(
    get,
    path = "/popularinwomen",
    tag = "Products",
    responses(
        (status = 200, description = "First 4 products of the women category", body = [ProductResponse]),
        (status = 500, description = "Server error")
    )
)]
pub async fn popular_in_women(state: web::Data<AppState>) -> impl Responder {
    match product_service::popular_in_women(state.products.as_ref(), &state.image_hosts()).await {
        Ok(products) => {
            log::info!("📦 Popular in women fetched ({})", products.len());
            HttpResponse::Ok().json(products)
        }
        Err(e) => server_error("fetching popular in women", e),
    }
}
