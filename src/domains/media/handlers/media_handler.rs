use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::shared::services::AppState;

/// 서명된 URL의 쿼리 파라미터
/// Query parameters carried by a signed URL
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SignedUrlQuery {
    /// The compact signed token authorizing this request
    #[serde(rename = "URISigningPackage")]
    pub token: Option<String>,
    /// Cache-busting timestamp from issuance; never verified
    #[serde(rename = "t")]
    pub timestamp: Option<String>,
}

/// 미디어 파일 제공 핸들러
/// Serve (or deny) a media file
#[utoipa::path(
    get,
    path = "/uploads/{folder}/{filename}",
    params(
        ("folder" = String, Path, description = "Upload folder (images, thumbnails, videos)"),
        ("filename" = String, Path, description = "File name within the folder"),
        SignedUrlQuery,
    ),
    responses(
        (status = 200, description = "Full file content"),
        (status = 206, description = "Partial content for a byte-range request"),
        (status = 304, description = "Not modified (public resources only)"),
        (status = 403, description = "Token present but invalid, expired or bound to another resource"),
        (status = 404, description = "Unknown folder, missing file, unsupported type or missing token")
    ),
    tag = "Media"
)]
pub async fn serve_media(
    State(app_state): State<AppState>,
    Path((folder, filename)): Path<(String, String)>,
    Query(query): Query<SignedUrlQuery>,
    headers: HeaderMap,
) -> Response {
    match app_state
        .media_state
        .streamer
        .serve(&folder, &filename, query.token.as_deref(), &headers)
        .await
    {
        Ok(response) => response,
        Err(err) => {
            // The client sees only the coarse status; the specific reason is
            // for operators
            tracing::warn!(%folder, %filename, reason = %err, "media request rejected");
            let (status, message): (StatusCode, String) = err.into();
            (status, message).into_response()
        }
    }
}
