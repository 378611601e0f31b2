use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;

use crate::{services::upload_service, state::AppState, utils::AppError};

fn upload_failed(e: &AppError) -> HttpResponse {
    log::warn!("❌ Image upload failed: {}", e);
    HttpResponse::BadRequest().json(serde_json::json!({
        "success": 0,
        "error": "Image upload failed"
    }))
}

/// Stores the `product` file field under the upload dir and returns its public URL
#[utoipa::path(
    post,
    path = "/upload",
    tag = "Products",
    request_body(content_type = "multipart/form-data", description = "File field `product`"),
    responses(
        (status = 200, description = "`{success: 1, image_url}`"),
        (status = 400, description = "`{success: 0, error}`")
    )
)]
pub async fn upload_image(state: web::Data<AppState>, mut payload: Multipart) -> impl Responder {
    let config = &state.config;

    loop {
        let field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return upload_failed(&AppError::Validation(e.to_string())),
        };

        if field.name() != Some(upload_service::IMAGE_FIELD) {
            continue;
        }

        let original = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let file_name = upload_service::image_file_name(
            upload_service::IMAGE_FIELD,
            original.as_deref(),
            chrono::Utc::now().timestamp_millis(),
        );

        return match upload_service::save_image(&config.upload_dir, &file_name, Box::pin(field), config.max_upload_bytes).await {
            Ok(bytes) => {
                let image_url = upload_service::image_url(&config.public_url, &file_name);
                log::info!("🖼️  Image stored: {} ({} bytes)", file_name, bytes);
                HttpResponse::Ok().json(serde_json::json!({
                    "success": 1,
                    "image_url": image_url
                }))
            }
            Err(e) => upload_failed(&e),
        };
    }

    upload_failed(&AppError::Validation(format!(
        "missing `{}` file field",
        upload_service::IMAGE_FIELD
    )))
}
