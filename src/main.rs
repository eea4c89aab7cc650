use axum::Router;
use axum::http::Method;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use media_server::routes::create_router;
use media_server::shared::config::Config;
use media_server::shared::services::AppState;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(media_server::domains::media::handlers::media_handler::serve_media),
    tags(
        (name = "Media", description = "Signed-URL media gateway endpoints")
    ),
    info(
        title = "Media Gateway",
        description = "Signed-URL media gateway: short-lived token issuance and range-capable media serving",
        version = "1.0.0"
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("media_server=debug,tower_http=info")
            }),
        )
        .init();

    // 설정 로드: 잘못된 서명 키 설정이면 여기서 프로세스 종료
    // Load configuration; bad signing-key config is fatal at startup
    let config = Config::from_env().expect("Failed to load configuration");

    let app_state = AppState::new(&config).expect("Failed to initialize AppState");

    // Media files may be embedded cross-origin (img/video tags)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD]);

    // Router 생성
    let app = Router::new()
        .merge(create_router())
        .merge(SwaggerUi::new("/api").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind server address");

    info!("Media gateway running on http://{}", bind_addr);
    info!("Swagger UI available at http://{}/api", bind_addr);
    info!("Serving uploads from {}", config.media.uploads_dir.display());

    // 서버 실행
    axum::serve(listener, app).await.unwrap();
}
