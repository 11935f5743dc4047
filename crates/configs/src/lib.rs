use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub recipes: RecipesConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8081, worker_threads: Some(4) }
    }
}

/// Where the catalog's durable slot lives.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_slot")]
    pub slot: String,
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), slot: default_slot(), quota_bytes: default_quota_bytes() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipesConfig {
    #[serde(default = "default_recipes_base_url")]
    pub base_url: String,
    #[serde(default = "default_query")]
    pub default_query: String,
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// JSON array of accepted phrases, fetched once at startup.
    #[serde(default)]
    pub allow_list_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            base_url: default_recipes_base_url(),
            default_query: default_query(),
            min_query_len: default_min_query_len(),
            allow_list_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_notice_ttl_ms")]
    pub notice_ttl_ms: u64,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_ttl_ms: default_notice_ttl_ms(),
            search_debounce_ms: default_search_debounce_ms(),
            frontend_dir: default_frontend_dir(),
        }
    }
}

fn default_data_dir() -> String { "data".into() }
fn default_slot() -> String { "products".into() }
// Roughly what browsers grant a single origin's local storage.
fn default_quota_bytes() -> usize { 5 * 1024 * 1024 }
fn default_recipes_base_url() -> String { "https://forkify-api.herokuapp.com".into() }
fn default_query() -> String { "pizza".into() }
fn default_min_query_len() -> usize { 2 }
fn default_timeout_secs() -> u64 { 10 }
fn default_notice_ttl_ms() -> u64 { 3000 }
fn default_search_debounce_ms() -> u64 { 300 }
fn default_frontend_dir() -> String { "frontend".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file if present, otherwise defaults with `SERVER_HOST`/`SERVER_PORT` applied.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(_) => {
                let mut cfg = AppConfig::default();
                if let Ok(host) = std::env::var("SERVER_HOST") {
                    cfg.server.host = host;
                }
                if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
                    cfg.server.port = port;
                }
                cfg
            }
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.recipes.normalize_and_validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        let slot = self.slot.trim();
        if slot.is_empty() {
            return Err(anyhow!("storage.slot must not be empty"));
        }
        if slot.contains(['/', '\\']) || slot == "." || slot == ".." {
            return Err(anyhow!("storage.slot must be a plain name, got {slot:?}"));
        }
        if self.quota_bytes == 0 {
            return Err(anyhow!("storage.quota_bytes must be > 0"));
        }
        Ok(())
    }
}

impl RecipesConfig {
    fn normalize_and_validate(&mut self) -> Result<()> {
        // 去掉末尾斜杠，拼接 /api/search 时避免出现 //
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("recipes.base_url must start with http:// or https://"));
        }
        if self.default_query.trim().is_empty() {
            return Err(anyhow!("recipes.default_query must not be empty"));
        }
        if self.min_query_len == 0 {
            return Err(anyhow!("recipes.min_query_len must be >= 1"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("recipes.timeout_secs must be a positive number of seconds"));
        }
        if let Some(url) = &self.allow_list_url {
            if url.trim().is_empty() {
                self.allow_list_url = None;
            }
        }
        Ok(())
    }
}
