// 미디어 라우터
// Media router
use axum::{Router, routing::get};

use crate::domains::media::handlers::media_handler;
use crate::shared::services::AppState;

// 미디어 라우터 생성
// Create media router (nested under /uploads)
pub fn create_media_router() -> Router<AppState> {
    Router::new().route("/:folder/:filename", get(media_handler::serve_media))
}
