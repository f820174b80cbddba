use std::fmt::Write;
use tracing::info;

use super::{HandlerError, format_amount, new_table};
use crate::{
    config::Settings,
    models::estimate::{EstimateRequest, PriceBreakdown},
    utils::price::calculate_estimate,
};

pub fn handle_estimate(
    settings: &Settings,
    request: &EstimateRequest,
    json: bool,
) -> Result<String, HandlerError> {
    let breakdown = calculate_estimate(&settings.pricing, request)?;

    info!(
        "estimate {} / {}: total {} ({})",
        request.project_type, request.complexity_tier, breakdown.total, breakdown.tier
    );

    if json {
        return Ok(serde_json::to_string_pretty(&breakdown)?);
    }

    render_breakdown(request, &breakdown)
}

fn render_breakdown(
    request: &EstimateRequest,
    breakdown: &PriceBreakdown,
) -> Result<String, HandlerError> {
    let mut table = new_table(&["ITEM", "AMOUNT"]);
    table
        .add_row(vec!["Base price".to_string(), format_amount(breakdown.base_price)])
        .add_row(vec![
            format!("Extra pages ({})", breakdown.extra_pages),
            format_amount(breakdown.pages_price),
        ])
        .add_row(vec!["Features".to_string(), format_amount(breakdown.features_price)])
        .add_row(vec!["Subtotal".to_string(), format_amount(breakdown.subtotal)])
        .add_row(vec![
            "Traffic multiplier".to_string(),
            format!("x{:.2}", breakdown.traffic_multiplier),
        ])
        // Whole units, unlike the two-decimal rows above.
        .add_row(vec!["Total (rounded)".to_string(), format!("{:.0}", breakdown.total)])
        .add_row(vec!["Tier".to_string(), breakdown.tier.to_string()])
        .add_row(vec!["Timeline".to_string(), breakdown.estimated_timeline.clone()]);

    let mut out = String::new();
    writeln!(
        out,
        "Estimate for {} / {} ({} pages, {} traffic)",
        request.project_type, request.complexity_tier, request.page_count, request.traffic_level
    )?;
    writeln!(out, "{table}")?;

    if let Some(note) = &breakdown.transaction_fee_note {
        writeln!(out, "\nNote: {note}")?;
    }

    Ok(out)
}
