use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::api::views::load_templates;
use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::domain::ports::{AuthRepository, LocationRepository, PropertyRepository, UserRepository};
use crate::domain::services::{auth_service::AuthService, navigation::NavigationPolicy, user_service::UserService};
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_location_repo::PostgresLocationRepo,
    postgres_property_repo::PostgresPropertyRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_location_repo::SqliteLocationRepo,
    sqlite_property_repo::SqlitePropertyRepo, sqlite_user_repo::SqliteUserRepo,
};

struct Repositories {
    user: Arc<dyn UserRepository>,
    auth: Arc<dyn AuthRepository>,
    location: Arc<dyn LocationRepository>,
    property: Arc<dyn PropertyRepository>,
}

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().map_err(AppError::Database)?;
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .map_err(AppError::Database)?;

        run_postgres_migrations(&pool).await?;
        postgres_repositories(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(AppError::Database)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(AppError::Database)?;

        run_sqlite_migrations(&pool).await?;
        sqlite_repositories(pool)
    };

    let user_service = UserService::new(repos.user.clone());
    user_service.ensure_bootstrap_admin(&config.bootstrap_admin_username).await?;

    assemble_state(config, repos, user_service)
}

/// State over an already migrated SQLite pool.
pub fn state_from_sqlite_pool(config: &Config, pool: SqlitePool) -> Result<AppState, AppError> {
    let repos = sqlite_repositories(pool);
    let user_service = UserService::new(repos.user.clone());
    assemble_state(config, repos, user_service)
}

fn sqlite_repositories(pool: SqlitePool) -> Repositories {
    Repositories {
        user: Arc::new(SqliteUserRepo::new(pool.clone())),
        auth: Arc::new(SqliteAuthRepo::new(pool.clone())),
        location: Arc::new(SqliteLocationRepo::new(pool.clone())),
        property: Arc::new(SqlitePropertyRepo::new(pool)),
    }
}

fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        user: Arc::new(PostgresUserRepo::new(pool.clone())),
        auth: Arc::new(PostgresAuthRepo::new(pool.clone())),
        location: Arc::new(PostgresLocationRepo::new(pool.clone())),
        property: Arc::new(PostgresPropertyRepo::new(pool)),
    }
}

fn assemble_state(config: &Config, repos: Repositories, user_service: UserService) -> Result<AppState, AppError> {
    let templates = load_templates()
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to load templates: {}", e)))?;
    let auth_service = AuthService::new(repos.auth.clone(), config.clone())?;

    Ok(AppState {
        config: config.clone(),
        auth_repo: repos.auth,
        location_repo: repos.location,
        property_repo: repos.property,
        user_directory: Arc::new(user_service),
        auth_service: Arc::new(auth_service),
        navigation: Arc::new(NavigationPolicy::default()),
        templates: Arc::new(templates),
    })
}

pub async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {}", e)))
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {}", e)))
}
