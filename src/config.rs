use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
    pub host: IpAddr,
    pub port: u16,
    pub registration: RegistrationMode,
    pub upload_dir: PathBuf,
    pub max_upload_size: u64,
    pub static_dir: PathBuf,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub admin_seed: Option<AdminSeed>,
}

/// Administrator account created at start-up when its email is not taken.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationMode {
    Open,
    Closed,
}

impl RegistrationMode {
    /// Only the exact values `open` and `closed` are accepted.
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "open" => Ok(RegistrationMode::Open),
            "closed" => Ok(RegistrationMode::Closed),
            other => Err(format!("Invalid JURIDICO_REGISTRATION: {other}")),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let jwt_ttl_minutes: i64 = env_or("JURIDICO_JWT_TTL_MINUTES", "60")
            .parse()
            .map_err(|e| format!("Invalid JURIDICO_JWT_TTL_MINUTES: {e}"))?;
        if jwt_ttl_minutes <= 0 {
            return Err("Invalid JURIDICO_JWT_TTL_MINUTES: must be positive".to_string());
        }

        let host: IpAddr = env_or("JURIDICO_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid JURIDICO_HOST: {e}"))?;

        let port: u16 = env_or("JURIDICO_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid JURIDICO_PORT: {e}"))?;

        let registration = RegistrationMode::parse(&env_or("JURIDICO_REGISTRATION", "open"))?;

        let upload_dir = PathBuf::from(env_or("JURIDICO_UPLOAD_DIR", "uploads"));

        let max_upload_size: u64 = env_or("JURIDICO_MAX_UPLOAD_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid JURIDICO_MAX_UPLOAD_SIZE: {e}"))?;

        let static_dir = PathBuf::from(env_or("JURIDICO_STATIC_DIR", "static"));

        let cors_origins: Vec<String> = env_or("JURIDICO_CORS_ORIGINS", "")
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        let log_level = env_or("JURIDICO_LOG_LEVEL", "info");

        let admin_seed = match (
            std::env::var("JURIDICO_ADMIN_EMAIL").ok(),
            std::env::var("JURIDICO_ADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: env_or("JURIDICO_ADMIN_NAME", "Administrator"),
                email,
                password,
            }),
            (Some(_), None) | (None, Some(_)) => {
                return Err(
                    "JURIDICO_ADMIN_EMAIL and JURIDICO_ADMIN_PASSWORD must be set together"
                        .to_string(),
                );
            }
            (None, None) => None,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            jwt_ttl_minutes,
            host,
            port,
            registration,
            upload_dir,
            max_upload_size,
            static_dir,
            cors_origins,
            log_level,
            admin_seed,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
