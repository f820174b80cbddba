use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

use super::selector::PriceTier;
use crate::models::{
    catalog::{CatalogError, PageRates, PricingCatalog, TierThresholds},
    estimate::{EstimateRequest, PriceBreakdown},
};

#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("Page count must be at least 1: {0}")]
    InvalidPageCount(u32),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub fn extra_pages(page_count: u32, pages: &PageRates) -> u32 {
    page_count.saturating_sub(pages.included)
}

pub fn calculate_pages_price(page_count: u32, pages: &PageRates) -> f64 {
    extra_pages(page_count, pages) as f64 * pages.per_page
}

/// Rounds to the nearest whole currency unit, halves away from zero.
pub fn round_to_unit(amount: f64) -> f64 {
    amount.round()
}

pub fn classify_tier(total: f64, tiers: &TierThresholds) -> PriceTier {
    if total <= tiers.basic_max {
        PriceTier::Basic
    } else if total <= tiers.advanced_max {
        PriceTier::Advanced
    } else {
        PriceTier::Custom
    }
}

pub fn calculate_estimate(
    catalog: &PricingCatalog,
    request: &EstimateRequest,
) -> Result<PriceBreakdown, EstimateError> {
    if request.page_count < 1 {
        return Err(EstimateError::InvalidPageCount(request.page_count));
    }

    let base_price = catalog.base_price(request.project_type, request.complexity_tier)?;

    let extra_pages = extra_pages(request.page_count, &catalog.pages);
    let pages_price = calculate_pages_price(request.page_count, &catalog.pages);

    let selected: BTreeSet<&str> = request.features.iter().map(String::as_str).collect();
    let mut features_price = 0.0;
    let mut transaction_fees = catalog
        .transaction_fees
        .complexity_tiers
        .contains(&request.complexity_tier);
    for id in selected {
        let feature = catalog.feature(id)?;
        features_price += feature.price;
        transaction_fees |= feature.transaction_fees;
    }

    let subtotal = base_price + pages_price + features_price;
    let traffic_multiplier = catalog.traffic_multiplier(request.traffic_level)?;
    let total = round_to_unit(subtotal * traffic_multiplier);

    let tier = classify_tier(total, &catalog.tiers);
    let estimated_timeline = catalog.timeline(tier)?.to_string();

    debug!(
        "estimate {}/{} pages={} traffic={}: subtotal={subtotal} total={total} tier={tier}",
        request.project_type, request.complexity_tier, request.page_count, request.traffic_level
    );

    Ok(PriceBreakdown {
        base_price,
        extra_pages,
        pages_price,
        features_price,
        subtotal,
        traffic_multiplier,
        total,
        tier,
        estimated_timeline,
        transaction_fee_note: transaction_fees.then(|| catalog.transaction_fees.note.clone()),
    })
}
