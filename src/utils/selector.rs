use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use typeshare::typeshare;

#[derive(Debug, Error, PartialEq)]
pub enum SelectorError {
    #[error("Invalid project type: {0} (expected website, app or both)")]
    InvalidProjectType(String),

    #[error("Invalid complexity tier: {0} (expected basic, business, ecommerce or custom)")]
    InvalidComplexityTier(String),

    #[error("Invalid traffic level: {0} (expected low, medium, high or very-high)")]
    InvalidTrafficLevel(String),

    #[error("Invalid price tier: {0} (expected basic, advanced or custom)")]
    InvalidPriceTier(String),

    #[error("Invalid fee mode: {0} (expected gross-to-net or net-to-gross)")]
    InvalidFeeMode(String),
}

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ProjectType {
    Website,
    App,
    Both,
}

impl ProjectType {
    pub const ALL: [ProjectType; 3] = [ProjectType::Website, ProjectType::App, ProjectType::Both];
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectType::Website => "website",
            ProjectType::App => "app",
            ProjectType::Both => "both",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ProjectType {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "website" => Ok(ProjectType::Website),
            "app" => Ok(ProjectType::App),
            "both" => Ok(ProjectType::Both),
            _ => Err(SelectorError::InvalidProjectType(s.to_string())),
        }
    }
}

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ComplexityTier {
    Basic,
    Business,
    Ecommerce,
    Custom,
}

impl ComplexityTier {
    pub const ALL: [ComplexityTier; 4] = [
        ComplexityTier::Basic,
        ComplexityTier::Business,
        ComplexityTier::Ecommerce,
        ComplexityTier::Custom,
    ];
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComplexityTier::Basic => "basic",
            ComplexityTier::Business => "business",
            ComplexityTier::Ecommerce => "ecommerce",
            ComplexityTier::Custom => "custom",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ComplexityTier {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(ComplexityTier::Basic),
            "business" => Ok(ComplexityTier::Business),
            "ecommerce" => Ok(ComplexityTier::Ecommerce),
            "custom" => Ok(ComplexityTier::Custom),
            _ => Err(SelectorError::InvalidComplexityTier(s.to_string())),
        }
    }
}

/// Expected traffic, ordered from lowest to highest.
#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum TrafficLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl TrafficLevel {
    pub const ALL: [TrafficLevel; 4] = [
        TrafficLevel::Low,
        TrafficLevel::Medium,
        TrafficLevel::High,
        TrafficLevel::VeryHigh,
    ];
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrafficLevel::Low => "low",
            TrafficLevel::Medium => "medium",
            TrafficLevel::High => "high",
            TrafficLevel::VeryHigh => "very-high",
        };
        write!(f, "{s}")
    }
}

impl FromStr for TrafficLevel {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(TrafficLevel::Low),
            "medium" => Ok(TrafficLevel::Medium),
            "high" => Ok(TrafficLevel::High),
            "very-high" => Ok(TrafficLevel::VeryHigh),
            _ => Err(SelectorError::InvalidTrafficLevel(s.to_string())),
        }
    }
}

/// Display classification derived from a computed total. Never used for pricing.
#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PriceTier {
    Basic,
    Advanced,
    Custom,
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceTier::Basic => "basic",
            PriceTier::Advanced => "advanced",
            PriceTier::Custom => "custom",
        };
        write!(f, "{s}")
    }
}

impl FromStr for PriceTier {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(PriceTier::Basic),
            "advanced" => Ok(PriceTier::Advanced),
            "custom" => Ok(PriceTier::Custom),
            _ => Err(SelectorError::InvalidPriceTier(s.to_string())),
        }
    }
}

// Map keys reach serde as plain strings when loaded through `config`, so the
// selectors used as catalog keys deserialize via `FromStr`.
macro_rules! try_from_string {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = SelectorError;

                fn try_from(s: String) -> Result<Self, Self::Error> {
                    s.parse()
                }
            }
        )*
    };
}

try_from_string!(ProjectType, ComplexityTier, TrafficLevel, PriceTier);

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FeeMode {
    GrossToNet,
    NetToGross,
}

impl fmt::Display for FeeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeeMode::GrossToNet => "gross-to-net",
            FeeMode::NetToGross => "net-to-gross",
        };
        write!(f, "{s}")
    }
}

impl FromStr for FeeMode {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gross-to-net" => Ok(FeeMode::GrossToNet),
            "net-to-gross" => Ok(FeeMode::NetToGross),
            _ => Err(SelectorError::InvalidFeeMode(s.to_string())),
        }
    }
}
