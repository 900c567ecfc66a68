//! Process-wide mixin configuration
//!
//! The configuration is read once. Derived models that do not name their
//! table explicitly resolve it from the installed naming convention the
//! first time their metadata is accessed, so install before touching models.

use std::path::Path;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::naming::NamingConvention;

/// Environment variable selecting the default naming convention
pub const NAMING_ENV: &str = "TENON_TABLE_NAMING";

static INSTALLED: OnceCell<MixinConfig> = OnceCell::new();
static DEFAULT: MixinConfig = MixinConfig {
    naming: NamingConvention::Lowercase,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MixinConfig {
    /// Convention used for models without an explicit table name
    pub naming: NamingConvention,
}

impl MixinConfig {
    pub fn with_naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> ModelResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> ModelResult<Self> {
        let config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Defaults overridden by `TENON_TABLE_NAMING` when it is set
    pub fn from_env() -> ModelResult<Self> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(NAMING_ENV) {
            config.naming = value.parse()?;
        }
        Ok(config)
    }

    /// Install this configuration for the rest of the process.
    ///
    /// Fails if a different configuration was installed already.
    pub fn install(self) -> ModelResult<()> {
        let installed = INSTALLED.get_or_init(|| self.clone());
        if *installed != self {
            tracing::warn!(
                installed = %installed.naming,
                rejected = %self.naming,
                "mixin configuration already installed"
            );
            return Err(ModelError::configuration(
                "a different mixin configuration is already installed",
            ));
        }
        tracing::debug!(naming = %installed.naming, "mixin configuration installed");
        Ok(())
    }
}

/// The installed configuration, or the defaults
pub fn current() -> &'static MixinConfig {
    INSTALLED.get().unwrap_or(&DEFAULT)
}
