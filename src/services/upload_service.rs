use actix_web::web::Bytes;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use std::path::Path;
use tokio::io::AsyncWriteExt;

use crate::utils::AppError;

/// Multipart field that carries the product image
pub const IMAGE_FIELD: &str = "product";

/// `<field>_<unix millis><.ext>`, the extension taken from the client's file name
pub fn image_file_name(field_name: &str, original_name: Option<&str>, millis: i64) -> String {
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    format!("{}_{}{}", field_name, millis, extension)
}

pub fn image_url(public_url: &str, file_name: &str) -> String {
    format!("{}/images/{}", public_url, file_name)
}

/// Streams an upload into `dir/file_name`. A partial file is removed when the stream
/// fails or grows past `max_bytes`
pub async fn save_image<S, E>(dir: &str, file_name: &str, mut data: S, max_bytes: usize) -> Result<u64, AppError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload dir {}: {}", dir, e)))?;

    let path = Path::new(dir).join(file_name);
    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create {}: {}", path.display(), e)))?;

    let mut written: usize = 0;
    let result: Result<(), AppError> = async {
        while let Some(chunk) = data.next().await {
            let chunk = chunk.map_err(|e| AppError::Validation(format!("Upload interrupted: {}", e)))?;
            written += chunk.len();
            if written > max_bytes {
                return Err(AppError::Validation(format!("Image exceeds {} bytes", max_bytes)));
            }
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to write image: {}", e)))?;
        }
        file.flush()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write image: {}", e)))
    }
    .await;

    if let Err(e) = result {
        drop(file);
        if let Err(remove_err) = tokio::fs::remove_file(&path).await {
            log::warn!("⚠️  Could not remove partial upload {}: {}", path.display(), remove_err);
        }
        return Err(e);
    }

    Ok(written as u64)
}
