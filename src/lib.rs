//! Donora is a REST backend coordinating blood donations.

mod blog;
pub mod config;
mod database;
mod donation;
pub mod error;
mod funding;
mod middleware;
mod payment;
mod router;
pub mod telemetry;
mod token;
mod user;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{Method, header};
use axum::routing::{get, post};
use axum::{Router, middleware as AxumMiddleware};
pub use error::ServerError;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    token: Option<String>,
    app: Router,
    method: Method,
    path: &str,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    app.oneshot(request.body(axum::body::Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub db: database::Database,
    pub token: token::TokenManager,
    pub payment: payment::PaymentClient,
    pub prometheus: PrometheusHandle,
}

impl AppState {
    pub(crate) fn users(&self) -> user::UserRepository {
        user::UserRepository::new(self.db.postgres.clone())
    }

    pub(crate) fn requests(&self) -> donation::RequestRepository {
        donation::RequestRepository::new(self.db.postgres.clone())
    }

    pub(crate) fn funding(&self) -> funding::FundingRepository {
        funding::FundingRepository::new(self.db.postgres.clone())
    }

    pub(crate) fn blogs(&self) -> blog::BlogRepository {
        blog::BlogRepository::new(self.db.postgres.clone())
    }
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().include_headers(true).level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().include_headers(true).latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        // Remove sensitive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION]))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers(Any)
                .vary([header::AUTHORIZATION]),
        );

    Router::new()
        // `GET /` goes to the public status page.
        .route("/", get(router::status::status))
        // Prometheus exposition.
        .route("/metrics", get(router::status::metrics))
        // `POST /jwt` issues a bearer token.
        .route("/jwt", post(router::auth::issue))
        .nest("/users", router::users::router())
        .nest("/donation-requests", router::donations::router())
        .route(
            "/create-payment-intent",
            post(router::payment::create_intent),
        )
        .nest("/funding", router::funding::router())
        .route("/admin/stats-summary", get(router::stats::summary))
        .route("/search-donors", get(router::search::donors))
        .nest("/blogs", router::blogs::router())
        .route_layer(AxumMiddleware::from_fn(telemetry::track))
        .with_state(state)
        .layer(middleware)
}

/// Initialize the application state.
pub async fn initialize_state() -> Result<AppState, Box<dyn std::error::Error>> {
    let config = Arc::new(config::Config::from_env()?);

    let db = database::Database::new(&config.database_url, config.pool_size).await?;

    // execute migrations scripts on start.
    sqlx::migrate!().run(&db.postgres).await?;

    let token = token::TokenManager::new(&config.token_secret, &config.issuer);
    let payment = payment::PaymentClient::new(&config.payment);
    let prometheus = telemetry::setup_metrics_recorder()?;

    Ok(AppState {
        config,
        db,
        token,
        payment,
        prometheus,
    })
}
