use crate::auth::password::HashCost;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Secret used when `JWT_SECRET` is not configured. Tokens signed with it are
/// forgeable by anyone who has read this source.
pub const FALLBACK_JWT_SECRET: &str = "vendorify-demo-secret-key-2026";

#[derive(Clone)]
pub struct Config {
    // Store
    pub redis_url: String,

    // Sessions
    pub jwt_secret: String,
    pub jwt_secret_is_fallback: bool,

    // Server
    pub bind_addr: SocketAddr,
    pub production: bool,
    pub static_dir: PathBuf,

    // Limits
    pub max_upload_bytes: usize,

    // Password hashing work factor
    pub hash_cost: HashCost,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_secret_is_fallback", &self.jwt_secret_is_fallback)
            .field("bind_addr", &self.bind_addr)
            .field("production", &self.production)
            .field("static_dir", &self.static_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        let redis_url =
            env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL".to_string()))?;
        if redis_url.is_empty() {
            return Err(ConfigError::InvalidValue(
                "REDIS_URL".to_string(),
                "cannot be empty".to_string(),
            ));
        }

        // A missing secret is not fatal: fall back to the demo constant and flag it.
        let (jwt_secret, jwt_secret_is_fallback) = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => (secret, false),
            _ => (FALLBACK_JWT_SECRET.to_string(), true),
        };

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let static_dir =
            PathBuf::from(env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()));

        // Limits
        let max_upload_bytes = parse_env_or_default("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?;

        // Argon2 work factor
        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_env_or_default("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_env_or_default("ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parse_env_or_default("ARGON2_PARALLELISM", defaults.parallelism)?,
        };
        hash_cost
            .params()
            .map_err(|e| ConfigError::InvalidValue("ARGON2_*".to_string(), e.to_string()))?;

        Ok(Config {
            redis_url,
            jwt_secret,
            jwt_secret_is_fallback,
            bind_addr,
            production,
            static_dir,
            max_upload_bytes,
            hash_cost,
        })
    }
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests mutate process-wide env vars, so they run one at a time.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn lock_test() -> std::sync::MutexGuard<'static, ()> {
        TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn clear_test_env() {
        env::remove_var("REDIS_URL");
        env::remove_var("JWT_SECRET");
        env::remove_var("BIND_ADDR");
        env::remove_var("APP_ENV");
        env::remove_var("STATIC_DIR");
        env::remove_var("MAX_UPLOAD_BYTES");
        env::remove_var("ARGON2_MEMORY_KIB");
        env::remove_var("ARGON2_ITERATIONS");
        env::remove_var("ARGON2_PARALLELISM");
    }

    #[test]
    fn test_parse_env_or_default() {
        let _guard = lock_test();

        env::set_var("TEST_VENDORIFY_U64", "12345");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_VENDORIFY_U64", 100);
        assert_eq!(result.unwrap(), 12345);

        env::remove_var("TEST_VENDORIFY_U64");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_VENDORIFY_U64", 100);
        assert_eq!(result.unwrap(), 100);
    }

    #[test]
    fn test_empty_redis_url() {
        let _guard = lock_test();
        clear_test_env();

        // Empty rather than unset so a local .env cannot fill it back in.
        env::set_var("REDIS_URL", "");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "REDIS_URL"
        ));

        clear_test_env();
    }

    #[test]
    fn test_missing_secret_uses_fallback() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
        env::set_var("JWT_SECRET", "");

        let config = Config::from_env().unwrap();
        assert_eq!(config.jwt_secret, FALLBACK_JWT_SECRET);
        assert!(config.jwt_secret_is_fallback);

        clear_test_env();
    }

    #[test]
    fn test_configured_secret() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
        env::set_var("JWT_SECRET", "a-real-secret");

        let config = Config::from_env().unwrap();
        assert_eq!(config.jwt_secret, "a-real-secret");
        assert!(!config.jwt_secret_is_fallback);

        clear_test_env();
    }

    #[test]
    fn test_invalid_socket_addr() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
        env::set_var("BIND_ADDR", "invalid_address");

        let result = Config::from_env();
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_, _)));

        clear_test_env();
    }

    #[test]
    fn test_production_flag() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
        env::set_var("APP_ENV", "production");
        assert!(Config::from_env().unwrap().production);

        env::set_var("APP_ENV", "development");
        assert!(!Config::from_env().unwrap().production);

        clear_test_env();
    }

    #[test]
    fn test_invalid_hash_cost() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
        env::set_var("ARGON2_ITERATIONS", "0");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "ARGON2_*"
        ));

        clear_test_env();
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://:hunter2@127.0.0.1:6379");
        env::set_var("JWT_SECRET", "top-secret-value");

        let rendered = format!("{:?}", Config::from_env().unwrap());
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("top-secret-value"));

        clear_test_env();
    }

    #[test]
    fn test_config_defaults() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
        env::set_var("JWT_SECRET", "test-secret");
        env::set_var("BIND_ADDR", "0.0.0.0:3000");

        let config = Config::from_env().unwrap();

        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.max_upload_bytes, 5_242_880);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.hash_cost, HashCost::default());

        clear_test_env();
    }
}
