use serde::Serialize;
use std::fmt::Write;
use tracing::{info, warn};

use super::{HandlerError, format_amount, new_table};
use crate::{
    config::Settings,
    models::fee_result::{FeeRequest, FeeResult},
    utils::{
        fee::{FeeError, calculate_fees, compare_methods, parse_amount},
        selector::FeeMode,
    },
};

/// One comparison row as emitted with `--json`: either `result` or `error` is set.
#[derive(Debug, Serialize)]
struct MethodComparison<'a> {
    method: &'a str,
    result: Option<&'a FeeResult>,
    error: Option<String>,
}

fn method_name<'a>(settings: &'a Settings, id: &'a str) -> &'a str {
    settings
        .fees
        .method(id)
        .map(|m| m.name.as_str())
        .unwrap_or(id)
}

fn describe_failure(err: &FeeError) -> String {
    match err {
        FeeError::AmountBelowFees { .. } => "amount does not cover fees".to_string(),
        other => other.to_string(),
    }
}

pub fn handle_fees(
    settings: &Settings,
    mode: FeeMode,
    amount: &str,
    method: &str,
    json: bool,
) -> Result<String, HandlerError> {
    let request = FeeRequest {
        mode,
        amount: parse_amount(amount)?,
        method: method.to_string(),
    };
    let result = calculate_fees(&settings.fees, &request)?;

    info!(
        "{} {} {}: gross {} fees {} net {}",
        request.method, request.mode, request.amount, result.gross_amount, result.fees, result.net_amount
    );

    if json {
        return Ok(serde_json::to_string_pretty(&result)?);
    }

    let mut table = new_table(&["ITEM", "AMOUNT"]);
    table
        .add_row(vec!["Gross amount".to_string(), format_amount(result.gross_amount)])
        .add_row(vec!["Fees".to_string(), format_amount(result.fees)])
        .add_row(vec!["Net amount".to_string(), format_amount(result.net_amount)])
        .add_row(vec![
            "Effective rate".to_string(),
            format!("{:.2}%", result.effective_rate),
        ]);

    let mut out = String::new();
    writeln!(out, "{} ({})", method_name(settings, &result.method), result.mode)?;
    writeln!(out, "{table}")?;
    if result.capped {
        writeln!(out, "Fee cap applied")?;
    }

    Ok(out)
}

pub fn handle_fees_compare(
    settings: &Settings,
    mode: FeeMode,
    amount: &str,
    json: bool,
) -> Result<String, HandlerError> {
    let amount = parse_amount(amount)?;
    let results = compare_methods(&settings.fees, mode, amount)?;

    let failed = results.iter().filter(|(_, outcome)| outcome.is_err()).count();
    if failed > 0 {
        warn!("{failed} of {} payment methods cannot settle {amount} ({mode})", results.len());
    }
    info!("compared {} payment methods for {amount} ({mode})", results.len());

    if json {
        let rows: Vec<_> = results
            .iter()
            .map(|(id, outcome)| MethodComparison {
                method: id,
                result: outcome.as_ref().ok(),
                error: outcome.as_ref().err().map(describe_failure),
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&rows)?);
    }

    render_comparison(settings, mode, amount, &results)
}

fn render_comparison(
    settings: &Settings,
    mode: FeeMode,
    amount: f64,
    results: &[(String, Result<FeeResult, FeeError>)],
) -> Result<String, HandlerError> {
    let mut table = new_table(&["METHOD", "GROSS", "FEES", "NET", "RATE", "NOTE"]);

    for (id, outcome) in results {
        let name = method_name(settings, id).to_string();
        match outcome {
            Ok(result) => table.add_row(vec![
                name,
                format_amount(result.gross_amount),
                format_amount(result.fees),
                format_amount(result.net_amount),
                format!("{:.2}%", result.effective_rate),
                if result.capped { "(capped)" } else { "" }.to_string(),
            ]),
            Err(err) => table.add_row(vec![
                name,
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                describe_failure(err),
            ]),
        };
    }

    let mut out = String::new();
    writeln!(out, "{} for {}", mode, format_amount(amount))?;
    writeln!(out, "{table}")?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gross_to_net_text() {
        let settings = Settings::builtin().unwrap();
        let out = handle_fees(&settings, FeeMode::GrossToNet, "100", "card-domestic", false).unwrap();
        assert!(out.contains("3.20"));
        assert!(out.contains("96.80"));
        assert!(out.contains("3.20%"));
    }

    #[test]
    fn net_to_gross_json_reports_cap() {
        let settings = Settings::builtin().unwrap();
        let out = handle_fees(&settings, FeeMode::NetToGross, "995", "ach", true).unwrap();
        let result: FeeResult = serde_json::from_str(&out).unwrap();
        assert_eq!(result.gross_amount, 1000.0);
        assert!(result.capped);
    }

    #[test]
    fn non_numeric_amount_is_reported() {
        let settings = Settings::builtin().unwrap();
        let err = handle_fees(&settings, FeeMode::GrossToNet, "abc", "ach", false).unwrap_err();
        assert!(matches!(err, HandlerError::Fee(FeeError::InvalidAmount(_))));
        assert!(err.to_string().starts_with("Enter a valid amount"));
    }

    #[test]
    fn comparison_has_a_row_per_method() {
        let settings = Settings::builtin().unwrap();
        let out = handle_fees_compare(&settings, FeeMode::GrossToNet, "1000", false).unwrap();
        for method in &settings.fees.methods {
            assert!(out.contains(&method.name));
        }
        assert!(out.contains("(capped)"));
        assert!(!out.contains("does not cover"));
    }

    #[test]
    fn comparison_marks_methods_that_cannot_settle() {
        let settings = Settings::builtin().unwrap();
        let out = handle_fees_compare(&settings, FeeMode::GrossToNet, "0.25", false).unwrap();

        let row = |name: &str| {
            out.lines()
                .find(|line| line.contains(name))
                .unwrap_or_else(|| panic!("no row for {name}"))
                .to_string()
        };
        assert!(row("Domestic card").contains("amount does not cover fees"));
        assert!(row("American Express").contains("amount does not cover fees"));
        assert!(row("ACH bank transfer").contains("0.25"));
        assert!(!row("ACH bank transfer").contains("does not cover"));
    }

    #[test]
    fn comparison_json_carries_per_method_outcomes() {
        let settings = Settings::builtin().unwrap();
        let out = handle_fees_compare(&settings, FeeMode::GrossToNet, "0.25", true).unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(rows.len(), 4);

        for row in &rows {
            if row["method"] == "ach" {
                assert!(row["error"].is_null());
                let result: FeeResult = serde_json::from_value(row["result"].clone()).unwrap();
                assert!((result.net_amount - 0.248).abs() < 1e-9);
            } else {
                assert!(row["result"].is_null());
                assert_eq!(row["error"], "amount does not cover fees");
            }
        }
    }

    #[test]
    fn comparison_still_rejects_a_bad_amount() {
        let settings = Settings::builtin().unwrap();
        let err = handle_fees_compare(&settings, FeeMode::GrossToNet, "-3", false).unwrap_err();
        assert!(matches!(err, HandlerError::Fee(FeeError::NonPositiveAmount(_))));
    }
}
