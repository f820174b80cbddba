use clap::ValueEnum;
use serde_json::json;
use std::fmt::Write;

use super::{HandlerError, format_amount, new_table};
use crate::{
    config::Settings,
    models::catalog::FeatureCategory,
    utils::selector::{ComplexityTier, ProjectType, TrafficLevel},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogSection {
    Features,
    Prices,
    Methods,
}

pub fn handle_catalog(
    settings: &Settings,
    section: Option<CatalogSection>,
    json: bool,
) -> Result<String, HandlerError> {
    let show = |s: CatalogSection| section.is_none_or(|wanted| wanted == s);

    if json {
        let mut value = json!({});
        if show(CatalogSection::Prices) {
            value["base_prices"] = serde_json::to_value(&settings.pricing.base_prices)?;
            value["traffic"] = serde_json::to_value(&settings.pricing.traffic)?;
            value["pages"] = serde_json::to_value(&settings.pricing.pages)?;
            value["tiers"] = serde_json::to_value(&settings.pricing.tiers)?;
        }
        if show(CatalogSection::Features) {
            value["features"] = serde_json::to_value(&settings.pricing.features)?;
        }
        if show(CatalogSection::Methods) {
            value["methods"] = serde_json::to_value(&settings.fees.methods)?;
        }
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut out = String::new();

    if show(CatalogSection::Prices) {
        let pricing = &settings.pricing;

        let mut headers = vec!["PROJECT".to_string()];
        headers.extend(ComplexityTier::ALL.map(|tier| tier.to_string().to_uppercase()));
        let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
        let mut prices = new_table(&headers);
        for project_type in ProjectType::ALL {
            let mut row = vec![project_type.to_string()];
            for tier in ComplexityTier::ALL {
                row.push(format_amount(pricing.base_price(project_type, tier)?));
            }
            prices.add_row(row);
        }
        writeln!(out, "Base prices\n{prices}")?;

        let mut traffic = new_table(&["TRAFFIC", "MULTIPLIER"]);
        for level in TrafficLevel::ALL {
            traffic.add_row(vec![
                level.to_string(),
                format!("x{:.2}", pricing.traffic_multiplier(level)?),
            ]);
        }
        writeln!(out, "Traffic multipliers\n{traffic}")?;

        writeln!(
            out,
            "Pages: {} included, {} per extra page\n",
            pricing.pages.included,
            format_amount(pricing.pages.per_page)
        )?;
    }

    if show(CatalogSection::Features) {
        let mut features = new_table(&["CATEGORY", "FEATURE", "NAME", "PRICE"]);
        for category in [
            FeatureCategory::Core,
            FeatureCategory::Advanced,
            FeatureCategory::Premium,
        ] {
            for feature in settings.pricing.features_in(category) {
                features.add_row(vec![
                    category_label(category).to_string(),
                    feature.id.clone(),
                    feature.name.clone(),
                    format_amount(feature.price),
                ]);
            }
        }
        writeln!(out, "Features\n{features}\n")?;
    }

    if show(CatalogSection::Methods) {
        let mut methods = new_table(&["METHOD", "NAME", "RATE", "FIXED FEE", "CAP"]);
        for method in &settings.fees.methods {
            methods.add_row(vec![
                method.id.clone(),
                method.name.clone(),
                format!("{}%", method.percentage_rate),
                format_amount(method.fixed_fee),
                method.cap.map(format_amount).unwrap_or_else(|| "none".to_string()),
            ]);
        }
        writeln!(out, "Payment methods\n{methods}")?;
    }

    Ok(out)
}

fn category_label(category: FeatureCategory) -> &'static str {
    match category {
        FeatureCategory::Core => "included",
        FeatureCategory::Advanced => "advanced",
        FeatureCategory::Premium => "premium",
    }
}
