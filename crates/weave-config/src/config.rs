use std::{
    fmt, fs,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::{info, warn};

use crate::{
    annotations::annotate_toml_table,
    error::{ConfigError, Result},
    output::OutputSettings,
    path::xdg_config_home,
};

const DEFAULT_MAX_STATEMENTS: usize = 64;

/// How lint issues are handled while rendering.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LintLevel {
    /// Skip linting
    Off,
    /// Log issues and keep going
    #[default]
    Warn,
    /// Refuse to render statements with lint errors
    Deny,
}

impl fmt::Display for LintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            LintLevel::Off => "off",
            LintLevel::Warn => "warn",
            LintLevel::Deny => "deny",
        };
        f.write_str(level)
    }
}

/// weave configuration
#[derive(Clone, Debug, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// How lint issues are handled while rendering: "off", "warn" or "deny".
    /// Default: "warn"
    pub lint: Option<LintLevel>,

    /// Append `;` to every rendered statement.
    /// Default: true
    pub terminator: Option<bool>,

    /// Upper-case mode keywords (DISTINCT, IGNORE, ...) read from query files.
    /// Default: true
    pub uppercase_modes: Option<bool>,

    /// Maximum number of statements accepted from a single query file.
    /// Default: 64
    pub max_statements: Option<usize>,

    /// Output settings
    pub output: Option<OutputSettings>,
}

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("WEAVE_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("weave").join("config.toml"),
    })
});

/// Path the configuration is read from and written to.
pub fn config_path() -> PathBuf {
    match CONFIG_PATH.read() {
        Ok(path) => path.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Overrides the configuration path, e.g. from the `-c` flag.
pub fn set_config_path(path: PathBuf) {
    match CONFIG_PATH.write() {
        Ok(mut current) => *current = path,
        Err(poisoned) => *poisoned.into_inner() = path,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            lint: Some(LintLevel::Warn),
            terminator: Some(true),
            uppercase_modes: Some(true),
            max_statements: Some(DEFAULT_MAX_STATEMENTS),
            output: Some(OutputSettings {
                comments: Some(false),
                blank_lines: Some(true),
            }),
        }
    }

    /// Creates a new configuration by loading it from the configuration file.
    /// If the configuration file is not found, it uses the default configuration.
    pub fn new() -> Result<Self> {
        let config_path = config_path();

        let mut config = match fs::read_to_string(&config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Config file not found at {}, using defaults",
                    config_path.display()
                );
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn resolve(&mut self) -> Result<()> {
        self.lint.get_or_insert_with(LintLevel::default);
        self.terminator.get_or_insert(true);
        self.uppercase_modes.get_or_insert(true);

        let max_statements = *self.max_statements.get_or_insert(DEFAULT_MAX_STATEMENTS);
        if max_statements == 0 {
            return Err(ConfigError::InvalidMaxStatements(max_statements));
        }

        self.output.get_or_insert_with(OutputSettings::default);

        Ok(())
    }

    pub fn lint_level(&self) -> LintLevel {
        self.lint.unwrap_or_default()
    }

    pub fn terminator(&self) -> bool {
        self.terminator.unwrap_or(true)
    }

    pub fn uppercase_modes(&self) -> bool {
        self.uppercase_modes.unwrap_or(true)
    }

    pub fn max_statements(&self) -> usize {
        self.max_statements.unwrap_or(DEFAULT_MAX_STATEMENTS)
    }

    pub fn output(&self) -> OutputSettings {
        self.output.clone().unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        let config_path = config_path();
        let serialized = toml::to_string_pretty(self)?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, serialized)?;
        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;

        if let Some(output_table) = doc.get_mut("output").and_then(|item| item.as_table_mut()) {
            annotate_toml_table::<OutputSettings>(output_table, false)?;
        }

        Ok(doc)
    }
}

pub fn generate_default_config() -> Result<()> {
    let config_path = config_path();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&config_path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        config_path.display()
    );
    Ok(())
}
