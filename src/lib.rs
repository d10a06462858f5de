//! Cohort is a small membership directory exposing users and groups over HTTP.

pub mod config;
pub mod database;
pub mod enrichment;
pub mod error;
pub mod group;
pub mod router;
pub mod user;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::Method;
use axum::routing::{get, post};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};

use crate::config::Configuration;
use crate::database::Database;
use crate::enrichment::Enricher;
use crate::group::{GroupRepository, GroupService};
use crate::user::{UserRepository, UserService};

pub use crate::error::ServerError;

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use axum::http::header;
    use tower::util::ServiceExt;

    app.oneshot(
        Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Configuration>,
    pub groups: GroupService,
    pub users: UserService,
}

impl AppState {
    /// Assemble the managers over an open pool.
    pub fn new(config: Arc<Configuration>, postgres: PgPool) -> Result<Self, reqwest::Error> {
        let groups = GroupService::new(GroupRepository::new(postgres.clone()));
        let user_repo = UserRepository::new(postgres);
        let enricher = Enricher::new(&config.enrichment, user_repo.clone())?;
        let users = UserService::new(user_repo, enricher);

        Ok(Self {
            config,
            groups,
            users,
        })
    }
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers(Any),
        );

    Router::new()
        // `POST /group` creates, `GET /group` lists every group.
        .route(
            "/group",
            post(router::groups::create::handler).get(router::groups::get::list),
        )
        .route(
            "/group/{group_id}",
            get(router::groups::get::handler)
                .put(router::groups::update::handler)
                .delete(router::groups::delete::handler),
        )
        // `POST /user` creates, `GET /user` lists every user.
        .route(
            "/user",
            post(router::users::create::handler).get(router::users::get::list),
        )
        .route(
            "/user/{user_id}",
            get(router::users::get::handler)
                .put(router::users::update::handler)
                .delete(router::users::delete::handler),
        )
        .with_state(state)
        .layer(middleware)
}

/// Initialize the application state.
pub async fn initialize_state() -> Result<AppState, Box<dyn std::error::Error>> {
    // read configuration file, let it in memory.
    let config = Arc::new(Configuration::default().read()?);

    let db = match config.postgres {
        Some(ref postgres) => Database::connect(postgres).await?,
        None => {
            tracing::error!("missing `postgres` entry on `config.yaml` file");
            std::process::exit(0);
        },
    };

    // execute migrations scripts on start.
    sqlx::migrate!().run(&db.postgres).await?;

    Ok(AppState::new(config, db.postgres)?)
}
