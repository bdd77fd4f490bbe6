use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use log::{info, warn};

use cb_api::app::{create_app, AppState};
use cb_api::middleware::SessionResolverWrapper;
use cb_core::services::{
    AuthService, AuthServiceConfig, BcryptPasswordHasher, Clock, ContactService,
    ContactServiceConfig, KeyValueUserCache, NoopUserCache, SessionResolver, SystemClock,
    TokenService, TokenServiceConfig, UserCache, UserCacheConfig,
};
use cb_infra::cache::RedisClient;
use cb_infra::database::{DatabasePool, MySqlContactRepository, MySqlUserRepository};
use cb_infra::email::ConfiguredMailer;
use cb_infra::services::RedisRateLimiter;
use cb_infra::storage::CloudinaryAvatarStorage;
use cb_shared::config::{AppConfig, Environment};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Environment-specific file first; plain .env fills whatever it left unset
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.logging.level));
    info!("Starting contact book API ({})", config.environment);
    for warning in config.warnings() {
        warn!("{}", warning);
    }

    let database = DatabasePool::new(config.database.clone())
        .await
        .context("connecting to the database")?;
    database
        .run_migrations()
        .await
        .context("running database migrations")?;
    info!("Database ready: {}", database.get_statistics());

    let user_repository = Arc::new(MySqlUserRepository::new(database.get_pool().clone()));
    let contact_repository = Arc::new(MySqlContactRepository::new(database.get_pool().clone()));

    let redis = if config.cache.enabled {
        match RedisClient::new(config.cache.clone()).await {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!("Redis unreachable, running without cache and rate limits: {}", e);
                None
            }
        }
    } else {
        info!("Cache disabled by configuration");
        None
    };

    let (user_cache, rate_limiter): (Arc<dyn UserCache>, RedisRateLimiter) = match &redis {
        Some(client) => (
            Arc::new(KeyValueUserCache::new(
                Arc::clone(client),
                UserCacheConfig::from(&config.cache),
            )),
            RedisRateLimiter::new(Arc::clone(client)),
        ),
        None => (Arc::new(NoopUserCache), RedisRateLimiter::unavailable()),
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let token_service = Arc::new(TokenService::new(
        TokenServiceConfig::from_jwt_config(&config.jwt)?,
        Arc::clone(&clock),
    )?);

    let mailer = ConfiguredMailer::from_config(config.email.clone())?;
    let avatar_storage = CloudinaryAvatarStorage::new(config.storage.clone())?;

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        Arc::new(BcryptPasswordHasher::default()),
        Arc::clone(&token_service),
        Arc::clone(&user_cache),
        Arc::new(mailer),
        Arc::new(avatar_storage),
        AuthServiceConfig::from_storage(&config.storage),
    ));
    let contact_service = Arc::new(ContactService::new(
        contact_repository,
        Arc::new(rate_limiter),
        clock,
        ContactServiceConfig::default().with_rate_limit(config.rate_limit.clone()),
    ));

    let session_resolver: Arc<dyn SessionResolverWrapper> = Arc::new(SessionResolver::new(
        token_service,
        Arc::clone(&user_cache),
        Arc::clone(&user_repository),
    ));
    let session_resolver = web::Data::from(session_resolver);

    let app_state = web::Data::new(AppState {
        auth_service,
        contact_service,
        user_repository,
        user_cache,
        public_url: config.server.public_url.clone(),
        max_avatar_bytes: config.server.max_payload_size,
    });

    let bind_address = config.server.bind_address();
    info!("Listening on {}", bind_address);

    let cors_config = config.cors.clone();
    let mut server = HttpServer::new(move || {
        create_app(app_state.clone(), session_resolver.clone(), &cors_config)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    server
        .bind(&bind_address)
        .with_context(|| format!("binding {}", bind_address))?
        .run()
        .await?;

    database.close().await;
    Ok(())
}
