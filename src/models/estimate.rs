use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::utils::selector::{ComplexityTier, PriceTier, ProjectType, TrafficLevel};

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EstimateRequest {
    pub project_type: ProjectType,
    pub complexity_tier: ComplexityTier,
    pub traffic_level: TrafficLevel,
    /// Selected feature ids. Repeated ids are counted once.
    #[serde(default)]
    pub features: Vec<String>,
    pub page_count: u32,
}

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub extra_pages: u32,
    pub pages_price: f64,
    pub features_price: f64,
    pub subtotal: f64,
    pub traffic_multiplier: f64,
    pub total: f64,
    pub tier: PriceTier,
    pub estimated_timeline: String,
    pub transaction_fee_note: Option<String>,
}
