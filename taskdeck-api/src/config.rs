/// Runtime configuration for the API server
///
/// Everything the server needs at runtime arrives through environment
/// variables, read once at startup into one typed struct. A missing required
/// variable or an unusable value stops the process before it binds a socket.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Listener host (default: 0.0.0.0)
/// - `API_PORT`: Listener port (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, or `*` (default: *)
/// - `JWT_SECRET`: Secret key for JWT signing (required, >= 32 bytes)
/// - `TOKEN_TTL_SECS`: Token lifetime in seconds (default: 86400)
/// - `SEED_DEMO_DATA`: Insert demo fixtures at startup (default: false)
/// - `RUST_LOG`: Log filter (default: info)
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Top-level runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    pub api: ApiConfig,

    /// Store settings
    pub database: DatabaseConfig,

    /// Token signing settings
    pub jwt: JwtConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Allowed CORS origins; a `*` entry means permissive
    pub cors_origins: Vec<String>,
}

/// Store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string for the PostgreSQL store
    pub url: String,

    /// Pool size cap
    pub max_connections: u32,

    /// Insert demo fixtures at startup
    pub seed_demo_data: bool,
}

/// Token signing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing key; must be at least 32 bytes
    pub secret: String,

    /// Lifetime of issued tokens in seconds
    pub token_ttl_secs: u64,
}

impl JwtConfig {
    /// Token lifetime as a chrono duration
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_secs as i64)
    }
}

impl Config {
    /// Reads configuration from the environment
    ///
    /// A `.env` file in the working directory is loaded first when present,
    /// so local development does not need exported variables.
    ///
    /// # Errors
    ///
    /// Returns an error when `DATABASE_URL` or `JWT_SECRET` is missing, the
    /// secret is shorter than 32 bytes, or a numeric variable fails to parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api = ApiConfig {
            host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()?,
            cors_origins: parse_cors_origins(
                &env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()?,
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };

        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?,
            token_ttl_secs: env::var("TOKEN_TTL_SECS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse::<u64>()?,
        };

        if jwt.secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        Ok(Self { api, database, jwt })
    }

    /// Returns the address the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Splits a comma-separated origin list, dropping empty entries
fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
