// Routes module: 라우팅 설정
// Routes module: combines all domain routers

use axum::{Router, routing::get};

use crate::domains::media::routes::create_media_router;
use crate::shared::services::AppState;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .nest("/uploads", create_media_router())
}

async fn health_check() -> &'static str {
    "OK"
}
