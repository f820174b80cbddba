use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{
    catalog::{CatalogError, PricingCatalog},
    fee_schedule::FeeSchedule,
};

pub const BUILTIN_CATALOG: &str = include_str!("../catalog.toml");

const DEFAULT_CATALOG_PATH: &str = "ratecard.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid catalog: {0}")]
    Invalid(#[from] CatalogError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub pricing: PricingCatalog,
    pub fees: FeeSchedule,
}

impl Settings {
    /// Loads the rate card. An explicit path must exist and be valid. Without
    /// one, `ratecard.toml` in the working directory is layered on when it
    /// exists; only a missing file falls back to the built-in catalog.
    pub fn load(config_path: &Option<String>) -> Result<Self, SettingsError> {
        match config_path.as_deref() {
            Some(path) => Self::load_from_file(Path::new(path)),
            None => Self::load_optional(Path::new(DEFAULT_CATALOG_PATH)),
        }
    }

    pub fn builtin() -> Result<Self, SettingsError> {
        Self::from_builder(Self::base())
    }

    fn base() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(BUILTIN_CATALOG, FileFormat::Toml))
    }

    fn load_optional(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            debug!("No {} found, using built-in catalog", path.display());
            return Self::builtin();
        }
        Self::load_from_file(path)
    }

    fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let settings = Self::from_builder(Self::base().add_source(File::from(path).required(true)))
            .inspect_err(|err| warn!("Rejected catalog {}: {err}", path.display()))?;

        info!("Loaded catalog from {}", path.display());

        Ok(settings)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings = builder.build()?.try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        self.pricing.validate()?;
        self.fees.validate()
    }
}
