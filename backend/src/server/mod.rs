//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use std::io;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use todo_backend::Trace;
#[cfg(debug_assertions)]
use todo_backend::doc::ApiDoc;
use todo_backend::inbound::http::api_scope;
use todo_backend::inbound::http::health::{HealthState, live, ready};
use todo_backend::inbound::http::state::HttpState;
use todo_backend::outbound::cache::RedisCache;
use todo_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use todo_backend::settings::AppSettings;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use state_builders::build_http_state;

const REDIS_POOL_SIZE: u32 = 16;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api_scope())
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Translate loaded settings into a [`ServerConfig`], connecting to the
/// configured backends and applying migrations.
///
/// # Errors
///
/// Fails on invalid settings, unreachable backends or failed migrations.
pub async fn connect(settings: &AppSettings) -> Result<ServerConfig> {
    let mut config = ServerConfig::new(
        settings.bind_addr()?,
        settings.jwt_secret()?,
        settings.admin_auth_level()?,
    )
    .with_cache_ttl(settings.cache_ttl());

    if let Some(url) = settings.database_url.as_deref() {
        run_migrations(url)
            .await
            .wrap_err("failed to apply database migrations")?;
        let pool = DbPool::new(
            PoolConfig::new(url).with_max_size(settings.db_max_connections()),
        )
        .await
        .wrap_err("failed to build the database pool")?;
        config = config.with_db_pool(pool);
    }

    if let Some(url) = settings.redis_url.as_deref() {
        let cache = RedisCache::connect(url, REDIS_POOL_SIZE)
            .await
            .wrap_err("failed to connect to Redis")?;
        config = config.with_redis(cache);
    }

    Ok(config)
}

/// Construct an Actix HTTP server from the supplied configuration.
///
/// # Errors
///
/// Propagates [`io::Error`] when the state cannot be built or the socket
/// cannot be bound.
pub fn create_server(health_state: web::Data<HealthState>, config: ServerConfig) -> io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config).map_err(io::Error::other)?);
    let server_health_state = health_state.clone();
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "server listening");
    health_state.mark_ready();
    Ok(server)
}
