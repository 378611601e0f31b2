use actix_web::{web, HttpResponse, ResponseError};
use crate::services::auth_service::{self, LoginOutcome, LoginRequest, SignupRequest, TokenResponse};
use crate::state::AppState;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Existing user found with same email address"),
        (status = 500, description = "Server error")
    )
)]
pub async fn signup(
    state: web::Data<AppState>,
    request: web::Json<SignupRequest>,
) -> HttpResponse {
    log::info!("📝 POST /signup - email: {}", request.email);

    match auth_service::signup(state.users.as_ref(), &state.config.auth, &request).await {
        Ok(token) => HttpResponse::Ok().json(TokenResponse { success: true, token }),
        Err(e @ AppError::Validation(_)) => {
            log::warn!("❌ Signup rejected: {} - {}", request.email, e);
            e.error_response()
        }
        Err(e) => {
            log::error!("❌ Error during signup: {} - {}", request.email, e);
            e.error_response()
        }
    }
}

/// Wrong email or password answers 200 with `success: false`
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued, or `success: false` with `error`/`errors`", body = TokenResponse),
        (status = 500, description = "Server error")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /login - email: {}", request.email);

    match auth_service::login(state.users.as_ref(), &state.config.auth, &request).await {
        Ok(LoginOutcome::Authenticated(token)) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(TokenResponse { success: true, token })
        }
        Ok(LoginOutcome::WrongPassword) => {
            log::warn!("❌ Login failed (wrong password): {}", request.email);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "error": auth_service::WRONG_PASSWORD_MESSAGE
            }))
        }
        Ok(LoginOutcome::UnknownEmail) => {
            log::warn!("❌ Login failed (unknown email): {}", request.email);
            HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "errors": auth_service::WRONG_EMAIL_MESSAGE
            }))
        }
        Err(e) => {
            log::error!("❌ Error during login: {} - {}", request.email, e);
            e.error_response()
        }
    }
}
