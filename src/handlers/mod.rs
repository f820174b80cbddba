use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use thiserror::Error;

use crate::{
    models::catalog::CatalogError,
    utils::{fee::FeeError, price::EstimateError},
};

pub mod catalog;
pub mod estimate;
pub mod fees;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Estimate(#[from] EstimateError),

    #[error(transparent)]
    Fee(#[from] FeeError),

    #[error("Failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to render result")]
    Render(#[from] std::fmt::Error),
}

pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// An empty bordered table with cyan column headers.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|header| Cell::new(header).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}
