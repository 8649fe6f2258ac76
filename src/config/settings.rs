use config::{Config, ConfigError, Environment, File, FileFormat};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::{env, fmt};

pub static SETTINGS: Lazy<Settings> = Lazy::new(|| Settings::new().expect("Failed to setup settings"));

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub http_port: u16,
    pub request_timeout: Option<u64>,
    pub body_limit_mb: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cors {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    pub temp_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Landmark {
    pub endpoint: String,
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Gemini {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tracer {
    pub uri: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: Option<String>,
    pub app: App,
    pub server: Server,
    pub cors: Cors,
    pub storage: Storage,
    pub landmark: Landmark,
    pub gemini: Gemini,
    pub logger: Option<Logger>,
    pub tracer: Option<Tracer>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("conf/config.toml").format(FileFormat::Toml))
            .add_source(File::with_name("conf/default").required(false))
            .add_source(File::with_name(&format!("conf/{run_mode}")).required(false))
            .add_source(File::with_name("conf/local").required(false))
            .add_source(Environment::default().separator("__"));

        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.http_port", port)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn log_level(&self) -> &str {
        self.logger.as_ref().map(|l| l.level.as_str()).unwrap_or("info")
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "http://localhost:{}", &self.http_port)
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        environment: Some("test".to_string()),
        app: App { name: "ai-stylist-svc".to_string() },
        server: Server {
            http_port: 8080,
            request_timeout: Some(5),
            body_limit_mb: Some(1),
        },
        cors: Cors { allowed_origins: vec!["https://yhd-ai.web.app".to_string()] },
        storage: Storage { temp_dir: std::env::temp_dir().join("ai-stylist-test").to_string_lossy().into_owned() },
        landmark: Landmark { endpoint: "http://127.0.0.1:9/v1/landmarks".to_string(), timeout: Some(1) },
        gemini: Gemini {
            base_url: "http://127.0.0.1:9/v1beta/models".to_string(),
            model: "gemini-1.5-flash-001".to_string(),
            api_key: "test".to_string(),
            timeout: Some(1),
        },
        logger: None,
        tracer: None,
    }
}
