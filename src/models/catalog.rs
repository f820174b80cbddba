use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use typeshare::typeshare;

use crate::utils::selector::{ComplexityTier, PriceTier, ProjectType, TrafficLevel};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("No base price configured for {project_type} / {complexity_tier}")]
    MissingBasePrice {
        project_type: ProjectType,
        complexity_tier: ComplexityTier,
    },

    #[error("Base price for {project_type} / {complexity_tier} must be a non-negative amount: {amount}")]
    InvalidBasePrice {
        project_type: ProjectType,
        complexity_tier: ComplexityTier,
        amount: f64,
    },

    #[error("No traffic multiplier configured for {0}")]
    MissingTrafficMultiplier(TrafficLevel),

    #[error("Traffic multiplier for {level} must be at least 1.0: {multiplier}")]
    InvalidTrafficMultiplier { level: TrafficLevel, multiplier: f64 },

    #[error("Traffic multiplier for {level} ({multiplier}) is lower than the previous level ({previous})")]
    TrafficNotMonotonic {
        level: TrafficLevel,
        multiplier: f64,
        previous: f64,
    },

    #[error("Included page count must be at least 1")]
    InvalidIncludedPages,

    #[error("Per-page rate must be a non-negative amount: {0}")]
    InvalidPageRate(f64),

    #[error("Unknown feature id: {0}")]
    UnknownFeature(String),

    #[error("Duplicate feature id: {0}")]
    DuplicateFeature(String),

    #[error("Feature {id} must have a non-negative price: {price}")]
    InvalidFeaturePrice { id: String, price: f64 },

    #[error("Core feature {0} is always included and must be priced at 0")]
    PricedCoreFeature(String),

    #[error("Tier thresholds must satisfy 0 <= basic_max < advanced_max (got {basic_max}, {advanced_max})")]
    InvalidTierThresholds { basic_max: f64, advanced_max: f64 },

    #[error("No estimated timeline configured for tier {0}")]
    MissingTimeline(PriceTier),

    #[error("Fee schedule has no payment methods")]
    EmptyFeeSchedule,

    #[error("Unknown payment method: {0}")]
    UnknownFeeMethod(String),

    #[error("Duplicate payment method id: {0}")]
    DuplicateFeeMethod(String),

    #[error("Percentage rate for {id} must be in [0, 100): {rate}")]
    InvalidPercentageRate { id: String, rate: f64 },

    #[error("Fixed fee for {id} must be a non-negative amount: {fee}")]
    InvalidFixedFee { id: String, fee: f64 },

    #[error("Fee cap for {id} must be a non-negative amount: {cap}")]
    InvalidFeeCap { id: String, cap: f64 },
}

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeatureCategory {
    Core,
    Advanced,
    Premium,
}

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Feature {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: FeatureCategory,
    /// Selecting this feature implies ongoing per-transaction processing costs.
    #[serde(default)]
    pub transaction_fees: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PageRates {
    pub included: u32,
    pub per_page: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TierThresholds {
    pub basic_max: f64,
    pub advanced_max: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransactionFeeRules {
    pub note: String,
    #[serde(default)]
    pub complexity_tiers: Vec<ComplexityTier>,
}

/// Static project pricing data. Loaded once, read-only afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PricingCatalog {
    pub base_prices: BTreeMap<ProjectType, BTreeMap<ComplexityTier, f64>>,
    pub traffic: BTreeMap<TrafficLevel, f64>,
    pub pages: PageRates,
    pub features: Vec<Feature>,
    pub tiers: TierThresholds,
    pub timelines: BTreeMap<PriceTier, String>,
    pub transaction_fees: TransactionFeeRules,
}

impl PricingCatalog {
    pub fn base_price(
        &self,
        project_type: ProjectType,
        complexity_tier: ComplexityTier,
    ) -> Result<f64, CatalogError> {
        self.base_prices
            .get(&project_type)
            .and_then(|tiers| tiers.get(&complexity_tier))
            .copied()
            .ok_or(CatalogError::MissingBasePrice {
                project_type,
                complexity_tier,
            })
    }

    pub fn traffic_multiplier(&self, level: TrafficLevel) -> Result<f64, CatalogError> {
        self.traffic
            .get(&level)
            .copied()
            .ok_or(CatalogError::MissingTrafficMultiplier(level))
    }

    pub fn feature(&self, id: &str) -> Result<&Feature, CatalogError> {
        self.features
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| CatalogError::UnknownFeature(id.to_string()))
    }

    pub fn features_in(&self, category: FeatureCategory) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(move |f| f.category == category)
    }

    pub fn timeline(&self, tier: PriceTier) -> Result<&str, CatalogError> {
        self.timelines
            .get(&tier)
            .map(String::as_str)
            .ok_or(CatalogError::MissingTimeline(tier))
    }

    /// Checks every invariant the composers rely on. Run once at load time.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for project_type in ProjectType::ALL {
            for complexity_tier in ComplexityTier::ALL {
                let amount = self.base_price(project_type, complexity_tier)?;
                if !(amount.is_finite() && amount >= 0.0) {
                    return Err(CatalogError::InvalidBasePrice {
                        project_type,
                        complexity_tier,
                        amount,
                    });
                }
            }
        }

        let mut previous: Option<f64> = None;
        for level in TrafficLevel::ALL {
            let multiplier = self.traffic_multiplier(level)?;
            if !(multiplier.is_finite() && multiplier >= 1.0) {
                return Err(CatalogError::InvalidTrafficMultiplier { level, multiplier });
            }
            if let Some(previous) = previous {
                if multiplier < previous {
                    return Err(CatalogError::TrafficNotMonotonic {
                        level,
                        multiplier,
                        previous,
                    });
                }
            }
            previous = Some(multiplier);
        }

        if self.pages.included < 1 {
            return Err(CatalogError::InvalidIncludedPages);
        }
        if !(self.pages.per_page.is_finite() && self.pages.per_page >= 0.0) {
            return Err(CatalogError::InvalidPageRate(self.pages.per_page));
        }

        let mut seen = HashSet::new();
        for feature in &self.features {
            if !seen.insert(feature.id.as_str()) {
                return Err(CatalogError::DuplicateFeature(feature.id.clone()));
            }
            if !(feature.price.is_finite() && feature.price >= 0.0) {
                return Err(CatalogError::InvalidFeaturePrice {
                    id: feature.id.clone(),
                    price: feature.price,
                });
            }
            if feature.category == FeatureCategory::Core && feature.price != 0.0 {
                return Err(CatalogError::PricedCoreFeature(feature.id.clone()));
            }
        }

        let TierThresholds {
            basic_max,
            advanced_max,
        } = self.tiers;
        if !(basic_max.is_finite() && advanced_max.is_finite())
            || basic_max < 0.0
            || basic_max >= advanced_max
        {
            return Err(CatalogError::InvalidTierThresholds {
                basic_max,
                advanced_max,
            });
        }

        for tier in [PriceTier::Basic, PriceTier::Advanced, PriceTier::Custom] {
            self.timeline(tier)?;
        }

        Ok(())
    }
}
