//! EnSeñas Gamification API Server
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Client (Android App)                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum Web Server                         │
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                      Routes Layer                        ││
//! │  │  /health /users/* /xp/* /streak /stats/* /quizzes/*     ││
//! │  │  /memory/* /progress                                     ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Services Layer                        ││
//! │  │  XP Engine   Streak Engine   Stats   TokenVerifier      ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Data Layer                            ││
//! │  │  PostgreSQL (users / ledgers / daily aggregates)         ││
//! │  └─────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │            Identity Provider (Firebase, 토큰 검증만)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// 라이브러리에서 가져오기
use ensenas_api::{
    routes,
    services::{FirebaseTokenVerifier, InsecureTokenVerifier, TokenVerifier},
    AppState, Config, Database,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    // RUST_LOG=debug,sqlx=warn 형태로 레벨 제어 가능
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ensenas_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting EnSeñas Gamification API Server");

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("📋 Configuration loaded");

    // 데이터베이스 연결
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("🗄️  Database connected");

    // 마이그레이션 실행
    db.run_migrations().await?;
    tracing::info!("📦 Migrations completed");

    // 토큰 검증기 초기화 (DI — 전역 싱글톤 없음)
    let token_verifier: Arc<dyn TokenVerifier> = match &config.firebase_api_key {
        Some(api_key) => {
            tracing::info!("🔐 Firebase token verifier initialized");
            Arc::new(FirebaseTokenVerifier::new(api_key))
        }
        None => {
            // Config::from_env()가 프로덕션에서는 이 분기를 막음
            tracing::warn!("⚠️  FIREBASE_API_KEY not set, using insecure dev verifier");
            Arc::new(InsecureTokenVerifier)
        }
    };

    // 앱 상태 구성
    let state = AppState {
        db: Arc::new(db),
        token_verifier,
        config: Arc::new(config.clone()),
    };

    // 라우터 구성
    let app = create_router(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🌐 Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 라우터 생성
///
/// # Route Structure
///
/// ```text
/// GET  /health               - 서버 상태 확인
///
/// POST /users/sync           - 사용자 행 동기화 (첫 로그인)
/// GET  /users/me             - 현재 사용자 조회
///
/// POST /xp/award             - XP 지급 (원자적)
/// GET  /xp/level             - 레벨 정보
/// GET  /xp/transactions      - XP 원장 히스토리
///
/// GET  /streak               - 스트릭 정보
/// POST /streak/update        - 일별 활동 갱신
///
/// GET  /stats/summary        - 대시보드 요약
///
/// POST /quizzes/attempt      - 퀴즈 시도 기록 + XP
/// GET  /quizzes/my-attempts  - 시도 히스토리
///
/// POST /memory/attempt       - 메모리 게임 기록 + XP (지급 실패 억제)
///
/// POST /progress             - 모듈 진행도 upsert
/// GET  /progress             - 진행도 조회
/// ```
fn create_router(state: AppState) -> Router {
    // CORS 설정
    // 프로덕션에서는 특정 도메인만 허용
    // 개발 환경에서는 localhost 허용
    let cors = if state.config.is_production() {
        // 프로덕션: 특정 도메인만 허용 (환경변수로 설정)
        let allowed_origins =
            std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "https://ensenas.app".to_string());
        let origins: Vec<axum::http::HeaderValue> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
    } else {
        // 개발: 로컬 클라이언트 허용
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        // Health check
        .route("/health", get(routes::health::health_check))
        // Users
        .route("/users/sync", post(routes::users::sync_user))
        .route("/users/me", get(routes::users::get_me))
        // XP
        .route("/xp/award", post(routes::xp::award_xp))
        .route("/xp/level", get(routes::xp::get_level_info))
        .route("/xp/transactions", get(routes::xp::get_transactions))
        // Streak
        .route("/streak", get(routes::streak::get_streak))
        .route("/streak/update", post(routes::streak::update_daily_activity))
        // Stats
        .route("/stats/summary", get(routes::stats::get_summary))
        // Quizzes
        .route("/quizzes/attempt", post(routes::quizzes::submit_attempt))
        .route("/quizzes/my-attempts", get(routes::quizzes::my_attempts))
        // Memory game
        .route("/memory/attempt", post(routes::memory::submit_run))
        // Progress (같은 경로의 GET/POST는 한 MethodRouter로)
        .route(
            "/progress",
            post(routes::progress::upsert_progress).get(routes::progress::list_progress),
        )
        // 미들웨어
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // 상태 주입
        .with_state(state)
}
