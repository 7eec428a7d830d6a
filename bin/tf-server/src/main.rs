//! TravelFlow Server
//!
//! Production server for the booking platform REST APIs:
//! - Auth APIs: signup, signin, refresh, signout
//! - Booking APIs: owner CRUD, cancel, admin listing and status override
//! - Health endpoint and Swagger UI
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TF_API_PORT` | `8080` | HTTP API port |
//! | `TF_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `TF_MONGO_DB` | `travelflow` | MongoDB database name |
//! | `TF_JWT_SECRET` | - | HMAC secret for session tokens (required in prod) |
//! | `TF_JWT_ISSUER` | `travelflow` | Token issuer claim |
//! | `TF_TOKEN_TTL_SECS` | `86400` | Session token lifetime |
//! | `TF_DEV_MODE` | `false` | Seed the admin account on startup |
//! | `TF_ADMIN_NAME` | `Administrator` | Seeded admin display name |
//! | `TF_ADMIN_EMAIL` | `admin@travelflow.local` | Seeded admin email |
//! | `TF_ADMIN_PASSWORD` | - | Seeded admin password (seeding skipped if unset) |
//! | `RUST_LOG` | `info` | Log level |
//! | `LOG_FORMAT` | text | Set to `json` for structured output |

use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use tf_platform::{
    auth_router, bookings_router, AdminSeeder, AppState, AuthLayer, AuthState, Authenticator,
    BookingService, BookingsState, MongoBookingRepository, MongoUserRepository, PasswordService,
    TokenConfig, TokenService,
};
use tf_platform::{BookingStore, UserStore};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    tf_common::logging::init_logging();

    info!("Starting TravelFlow Server");

    // Configuration from environment
    let api_port: u16 = env_or_parse("TF_API_PORT", 8080);
    let mongo_url = env_or("TF_MONGO_URL", "mongodb://localhost:27017");
    let mongo_db = env_or("TF_MONGO_DB", "travelflow");
    let jwt_issuer = env_or("TF_JWT_ISSUER", "travelflow");
    let token_ttl_secs: i64 = env_or_parse("TF_TOKEN_TTL_SECS", 86_400);

    let jwt_secret = match std::env::var("TF_JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            warn!("TF_JWT_SECRET not set, using an insecure development secret");
            "travelflow-dev-secret".to_string()
        }
    };

    // Connect to MongoDB
    info!("Connecting to MongoDB: {}/{}", mongo_url, mongo_db);
    let mongo_client = mongodb::Client::with_uri_str(&mongo_url).await?;
    let db = mongo_client.database(&mongo_db);

    // Repositories behind the store contracts
    let user_store: Arc<dyn UserStore> = Arc::new(MongoUserRepository::new(&db));
    let booking_store: Arc<dyn BookingStore> = Arc::new(MongoBookingRepository::new(&db));
    info!("Repositories initialized");

    // Services
    let token_service = Arc::new(TokenService::new(TokenConfig {
        secret_key: jwt_secret,
        issuer: jwt_issuer,
        ttl_secs: token_ttl_secs,
    }));
    let password_service = Arc::new(PasswordService::default());
    let authenticator = Arc::new(Authenticator::new(
        user_store.clone(),
        token_service.clone(),
        password_service.clone(),
    ));
    let booking_service = Arc::new(BookingService::new(
        booking_store,
        user_store.clone(),
    ));
    info!("Services initialized");

    // Seed the admin account in dev mode
    let dev_mode = std::env::var("TF_DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    if dev_mode {
        match std::env::var("TF_ADMIN_PASSWORD") {
            Ok(admin_password) if !admin_password.is_empty() => {
                let seeder = AdminSeeder::new(user_store.clone(), password_service.clone());
                let admin_name = env_or("TF_ADMIN_NAME", "Administrator");
                let admin_email = env_or("TF_ADMIN_EMAIL", "admin@travelflow.local");
                if let Err(e) = seeder
                    .seed_admin(&admin_name, &admin_email, &admin_password)
                    .await
                {
                    warn!("Admin seeding failed: {}", e);
                }
            }
            _ => warn!("TF_DEV_MODE set but TF_ADMIN_PASSWORD missing, skipping admin seed"),
        }
    }

    // Per-request auth context
    let app_state = AppState {
        token_service: token_service.clone(),
        user_store: user_store.clone(),
    };

    let auth_state = AuthState {
        authenticator,
        token_service,
        user_store,
    };
    let bookings_state = BookingsState { booking_service };

    // Build the API router with auto-collected OpenAPI paths
    let (router, mut openapi) = OpenApiRouter::new()
        .nest("/api/auth", auth_router(auth_state))
        .nest("/api/bookings", bookings_router(bookings_state))
        .split_for_parts();

    // Schemas referenced through #[serde(flatten)] are not auto-collected
    use utoipa::openapi::{schema::Type, ObjectBuilder};
    if let Some(components) = openapi.components.as_mut() {
        components.schemas.insert(
            "PaginationParams".to_string(),
            ObjectBuilder::new()
                .property("page", ObjectBuilder::new().schema_type(Type::Integer))
                .property("size", ObjectBuilder::new().schema_type(Type::Integer))
                .into(),
        );
    }

    openapi.info.title = "TravelFlow Platform API".to_string();
    openapi.info.version = "1.0.0".to_string();
    openapi.info.description =
        Some("REST APIs for authentication and booking lifecycle management".to_string());

    let app = Router::new()
        .merge(router)
        .route("/health", get(health_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        .layer(AuthLayer::new(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start API server
    let api_addr = format!("0.0.0.0:{}", api_port);
    info!("API server listening on http://{}", api_addr);

    let listener = TcpListener::bind(&api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("TravelFlow Server shutdown complete");
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
