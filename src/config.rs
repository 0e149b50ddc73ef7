use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    /// Token and cookie lifetime in minutes.
    pub jwt_maxage: i64,
    pub port: u16,
    pub media_root: String,
    pub allowed_origins: Vec<String>,
    pub log_level: String,
}

impl Config {
    pub fn init() -> anyhow::Result<Config> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = std::env::var("JWT_SECRET_KEY").context("JWT_SECRET_KEY must be set")?;
        let jwt_maxage = std::env::var("JWT_MAXAGE")
            .context("JWT_MAXAGE must be set")?
            .parse::<i64>()
            .context("JWT_MAXAGE must be a number of minutes")?;

        let port = match std::env::var("PORT") {
            Ok(port) => port.parse::<u16>().context("PORT must be a valid port number")?,
            Err(_) => 8000,
        };

        let database_max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive number")?,
            Err(_) => 10,
        };

        let media_root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());

        let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://localhost:8000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());

        Ok(Config {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_maxage,
            port,
            media_root,
            allowed_origins,
            log_level,
        })
    }
}
