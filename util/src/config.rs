//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.
//!
//! Most callers should use the free functions at the bottom of this module
//! (`config::port()`, `config::idempotency_ttl_hours()`, ...) rather than holding
//! the read guard themselves.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Which backing store the idempotency cache uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdempotencyBackend {
    /// Process-local TTL cache. Only correct for single-instance deployments.
    Memory,
    /// Shared `idempotency_keys` table, visible to every instance on the same database.
    Database,
}

impl FromStr for IdempotencyBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "database" | "db" => Ok(Self::Database),
            other => Err(format!("unknown idempotency backend '{other}'")),
        }
    }
}

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    pub idempotency_backend: IdempotencyBackend,
    pub idempotency_ttl_hours: u64,
    pub idempotency_max_entries: u64,
    pub bulk_sync_concurrency: usize,
    pub bulk_sync_max_records: usize,
    pub bulk_sync_timeout_ms: u64,
    pub code_validity_hours: i64,
    pub sac_code_length: usize,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// This method is used internally to populate the singleton. It panics
    /// if required variables are missing. Malformed optional values fall back
    /// to their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "attendance-sync".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info,services=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH").expect("DATABASE_PATH is required"),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: var_or("PORT", 3000),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET is required"),
            jwt_duration_minutes: var_or("JWT_DURATION_MINUTES", 60),
            idempotency_backend: var_or("IDEMPOTENCY_BACKEND", IdempotencyBackend::Database),
            idempotency_ttl_hours: var_or("IDEMPOTENCY_TTL_HOURS", 48),
            idempotency_max_entries: var_or("IDEMPOTENCY_MAX_ENTRIES", 1_000_000),
            bulk_sync_concurrency: var_or("BULK_SYNC_CONCURRENCY", 8usize).max(1),
            bulk_sync_max_records: var_or("BULK_SYNC_MAX_RECORDS", 1000),
            bulk_sync_timeout_ms: var_or("BULK_SYNC_TIMEOUT_MS", 30_000),
            code_validity_hours: var_or("CODE_VALIDITY_HOURS", 24),
            sac_code_length: var_or("SAC_CODE_LENGTH", 6usize).clamp(4, 16),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    ///
    /// Used by public per-field setter methods.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_idempotency_backend(value: IdempotencyBackend) {
        AppConfig::set_field(|cfg| cfg.idempotency_backend = value);
    }

    pub fn set_bulk_sync_concurrency(value: usize) {
        AppConfig::set_field(|cfg| cfg.bulk_sync_concurrency = value.max(1));
    }

    pub fn set_bulk_sync_max_records(value: usize) {
        AppConfig::set_field(|cfg| cfg.bulk_sync_max_records = value);
    }

    pub fn set_bulk_sync_timeout_ms(value: u64) {
        AppConfig::set_field(|cfg| cfg.bulk_sync_timeout_ms = value);
    }
}

// --- Free-function accessors ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn idempotency_backend() -> IdempotencyBackend {
    AppConfig::global().idempotency_backend
}

pub fn idempotency_ttl_hours() -> u64 {
    AppConfig::global().idempotency_ttl_hours
}

pub fn idempotency_max_entries() -> u64 {
    AppConfig::global().idempotency_max_entries
}

pub fn bulk_sync_concurrency() -> usize {
    AppConfig::global().bulk_sync_concurrency
}

pub fn bulk_sync_max_records() -> usize {
    AppConfig::global().bulk_sync_max_records
}

pub fn bulk_sync_timeout_ms() -> u64 {
    AppConfig::global().bulk_sync_timeout_ms
}

pub fn code_validity_hours() -> i64 {
    AppConfig::global().code_validity_hours
}

pub fn sac_code_length() -> usize {
    AppConfig::global().sac_code_length
}
