//! Catalog-driven project estimates and payment fee calculations.
//!
//! Everything here is a pure function of a request and the read-only
//! [`config::Settings`] catalog; nothing is persisted between calls.

pub mod config;
pub mod handlers;
pub mod models;
pub mod utils;

pub use config::Settings;
pub use models::{
    catalog::{CatalogError, Feature, FeatureCategory, PricingCatalog},
    estimate::{EstimateRequest, PriceBreakdown},
    fee_result::{FeeRequest, FeeResult},
    fee_schedule::{FeeSchedule, FeeStructure},
};
pub use utils::{
    fee::{FeeError, calculate_fees, compare_methods, gross_to_net, net_to_gross},
    price::{EstimateError, calculate_estimate, classify_tier},
    selector::{ComplexityTier, FeeMode, PriceTier, ProjectType, TrafficLevel},
};
