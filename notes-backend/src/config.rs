use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Maximum number of pooled SQLite connections.
    pub const DB_POOL_SIZE: &str = "DB_POOL_SIZE";
    /// Sliding lifetime of a login session, in hours.
    pub const SESSION_TTL_HOURS: &str = "SESSION_TTL_HOURS";
    /// When both are set, an admin account with these credentials is created on boot.
    pub const ADMIN_USERNAME: &str = "NOTES_ADMIN_USERNAME";
    pub const ADMIN_PASSWORD: &str = "NOTES_ADMIN_PASSWORD";
    pub const ADMIN_EMAIL: &str = "NOTES_ADMIN_EMAIL";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const BIND_ADDRESS: &str = "0.0.0.0";
    pub const DATABASE_URL: &str = "./.db/notes.db";
    pub const DB_POOL_SIZE: u32 = 8;
    pub const SESSION_TTL_HOURS: i64 = 24;
    /// Upper bound for SESSION_TTL_HOURS (one year)
    pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;
}

/// Credentials for the bootstrap admin account.
#[derive(Clone, Debug)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub database_url: String,
    pub db_pool_size: u32,
    pub session_ttl_hours: i64,
    pub admin: Option<AdminBootstrap>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: defaults::PORT,
            bind_address: defaults::BIND_ADDRESS.to_string(),
            database_url: defaults::DATABASE_URL.to_string(),
            db_pool_size: defaults::DB_POOL_SIZE,
            session_ttl_hours: defaults::SESSION_TTL_HOURS,
            admin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unparseable numbers fall
    /// back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin = match (
            lookup(env_vars::ADMIN_USERNAME).filter(|v| !v.is_empty()),
            lookup(env_vars::ADMIN_PASSWORD).filter(|v| !v.is_empty()),
        ) {
            (Some(username), Some(password)) => Some(AdminBootstrap {
                email: lookup(env_vars::ADMIN_EMAIL).unwrap_or_default(),
                username,
                password,
            }),
            (Some(_), None) | (None, Some(_)) => {
                log::warn!(
                    "Both {} and {} must be set to bootstrap an admin account",
                    env_vars::ADMIN_USERNAME,
                    env_vars::ADMIN_PASSWORD
                );
                None
            }
            (None, None) => None,
        };

        Self {
            port: parse_or(&lookup, env_vars::PORT, defaults::PORT),
            bind_address: lookup(env_vars::BIND_ADDRESS)
                .unwrap_or_else(|| defaults::BIND_ADDRESS.to_string()),
            database_url: lookup(env_vars::DATABASE_URL)
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            db_pool_size: parse_or(&lookup, env_vars::DB_POOL_SIZE, defaults::DB_POOL_SIZE).max(1),
            session_ttl_hours: parse_or(
                &lookup,
                env_vars::SESSION_TTL_HOURS,
                defaults::SESSION_TTL_HOURS,
            )
            .clamp(1, defaults::MAX_SESSION_TTL_HOURS),
            admin,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            default
        }),
        None => default,
    }
}
