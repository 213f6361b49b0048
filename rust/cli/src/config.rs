use mathquiz_engine::engine::EngineConfig;
use mathquiz_engine::rules::DEFAULT_FEEDBACK_DELAY_MS;
use mathquiz_engine::state::Mode;
use serde::{Deserialize, Serialize};
use std::fs;

pub const CONFIG_PATH_VAR: &str = "MATHQUIZ_CONFIG";
pub const MODE_VAR: &str = "MATHQUIZ_MODE";
pub const SEED_VAR: &str = "MATHQUIZ_SEED";
pub const FEEDBACK_MS_VAR: &str = "MATHQUIZ_FEEDBACK_MS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub mode: Mode,
    pub seed: Option<u64>,
    pub feedback_ms: u64,
}

impl Config {
    pub fn engine_config(&self) -> EngineConfig {
        let config = EngineConfig::new(self.mode).with_feedback_delay_ms(self.feedback_ms);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub mode: ValueSource,
    pub seed: ValueSource,
    pub feedback_ms: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            mode: ValueSource::Default,
            seed: ValueSource::Default,
            feedback_ms: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Classic,
            seed: None,
            feedback_ms: DEFAULT_FEEDBACK_DELAY_MS,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

/// Resolves the configuration: defaults, then the TOML file named by
/// `MATHQUIZ_CONFIG`, then `MATHQUIZ_*` environment variables. Empty
/// variables are treated as unset.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_PATH_VAR)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.mode {
            cfg.mode = parse_mode(&v)?;
            sources.mode = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.feedback_ms {
            cfg.feedback_ms = v;
            sources.feedback_ms = ValueSource::File;
        }
    }

    if let Ok(mode) = std::env::var(MODE_VAR)
        && !mode.is_empty()
    {
        cfg.mode = parse_mode(&mode)?;
        sources.mode = ValueSource::Env;
    }
    if let Ok(seed) = std::env::var(SEED_VAR)
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed: {}", seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(ms) = std::env::var(FEEDBACK_MS_VAR)
        && !ms.is_empty()
    {
        cfg.feedback_ms = ms
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid feedback delay: {}", ms)))?;
        sources.feedback_ms = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    feedback_ms: Option<u64>,
}

fn parse_mode(s: &str) -> Result<Mode, ConfigError> {
    s.parse()
        .map_err(|e: mathquiz_engine::errors::EngineError| ConfigError::Invalid(e.to_string()))
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.engine_config()
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))
}
