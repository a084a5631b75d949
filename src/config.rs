use crate::types::DEFAULT_TROLL_PROBABILITY;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Tunables for the session engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Chance per round that troll mode actually triggers, in [0, 1]
    troll_probability: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            troll_probability: DEFAULT_TROLL_PROBABILITY,
        }
    }
}

impl EngineConfig {
    pub fn with_troll_probability(probability: f64) -> Self {
        Self {
            troll_probability: if probability.is_nan() {
                DEFAULT_TROLL_PROBABILITY
            } else {
                probability.clamp(0.0, 1.0)
            },
        }
    }

    pub fn troll_probability(&self) -> f64 {
        self.troll_probability
    }
}

/// Host process configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// JSON catalog file, built-in words are used when unset
    pub catalog_path: Option<PathBuf>,
    pub static_dir: PathBuf,
    pub engine: EngineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 6573)),
            catalog_path: None,
            static_dir: PathBuf::from("static"),
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = std::env::var("BIND_ADDR")
            .ok()
            .and_then(|v| match v.trim().parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!("Ignoring invalid BIND_ADDR '{}': {}", v, e);
                    None
                }
            })
            .unwrap_or(defaults.bind_addr);

        let catalog_path = std::env::var("CATALOG_PATH").ok().and_then(|path| {
            let trimmed = path.trim();
            (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
        });

        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .and_then(|dir| {
                let trimmed = dir.trim();
                (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
            })
            .unwrap_or(defaults.static_dir);

        let engine = std::env::var("TROLL_PROBABILITY")
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .map(EngineConfig::with_troll_probability)
            .unwrap_or_default();

        tracing::info!(
            %bind_addr,
            ?catalog_path,
            troll_probability = engine.troll_probability(),
            "Config loaded"
        );

        Self {
            bind_addr,
            catalog_path,
            static_dir,
            engine,
        }
    }
}
