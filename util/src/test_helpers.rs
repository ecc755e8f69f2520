use std::env;

/// Seeds the environment variables that `AppConfig::from_env` requires so
/// tests can touch the global config without a `.env` file.
///
/// Existing values are left alone, which lets a developer point a test run
/// at a different database or secret from the shell.
pub fn setup_test_env() {
    let defaults = [
        ("APP_ENV", "test"),
        ("DATABASE_PATH", "sqlite::memory:"),
        ("JWT_SECRET", "test-secret-do-not-use-in-production"),
        ("JWT_DURATION_MINUTES", "60"),
        ("IDEMPOTENCY_BACKEND", "database"),
    ];

    for (key, value) in defaults {
        if env::var(key).is_err() {
            unsafe {
                env::set_var(key, value);
            }
        }
    }
}
