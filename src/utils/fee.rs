use thiserror::Error;
use tracing::debug;

use super::selector::FeeMode;
use crate::models::{
    catalog::CatalogError,
    fee_result::{FeeRequest, FeeResult},
    fee_schedule::{FeeSchedule, FeeStructure},
};

#[derive(Debug, Error, PartialEq)]
pub enum FeeError {
    #[error("Enter a valid amount: {0:?} is not a number")]
    InvalidAmount(String),

    #[error("Enter a valid amount: {0} must be a finite number greater than zero")]
    NonPositiveAmount(f64),

    #[error("Amount {gross} does not cover the {fees} in fees")]
    AmountBelowFees { gross: f64, fees: f64 },

    #[error("Effective rate is undefined for a gross amount of {0}")]
    UndefinedEffectiveRate(f64),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Parses user input into an amount accepted by the composers.
pub fn parse_amount(input: &str) -> Result<f64, FeeError> {
    let amount = input
        .trim()
        .parse::<f64>()
        .map_err(|_| FeeError::InvalidAmount(input.to_string()))?;
    validate_amount(amount)
}

pub fn validate_amount(amount: f64) -> Result<f64, FeeError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(FeeError::NonPositiveAmount(amount))
    }
}

/// `fees / gross * 100`, or `None` where that would not be a number.
pub fn effective_rate(fees: f64, gross: f64) -> Option<f64> {
    if gross == 0.0 || !gross.is_finite() || !fees.is_finite() {
        return None;
    }
    Some(fees / gross * 100.0)
}

fn settle(
    method: &FeeStructure,
    mode: FeeMode,
    gross: f64,
    fees: f64,
    capped: bool,
) -> Result<FeeResult, FeeError> {
    let net = gross - fees;
    if net <= 0.0 {
        return Err(FeeError::AmountBelowFees { gross, fees });
    }
    let effective_rate =
        effective_rate(fees, gross).ok_or(FeeError::UndefinedEffectiveRate(gross))?;

    Ok(FeeResult {
        method: method.id.clone(),
        mode,
        gross_amount: gross,
        fees,
        net_amount: net,
        effective_rate,
        capped,
    })
}

pub fn gross_to_net(gross: f64, method: &FeeStructure) -> Result<FeeResult, FeeError> {
    let gross = validate_amount(gross)?;

    let uncapped = method.uncapped_fee(gross);
    let (fees, capped) = match method.cap {
        Some(cap) if uncapped > cap => (cap, true),
        _ => (uncapped, false),
    };

    debug!("{} gross-to-net {gross}: fees={fees} capped={capped}", method.id);

    settle(method, FeeMode::GrossToNet, gross, fees, capped)
}

/// Solves for the gross charge that nets `net` after the method's fees.
///
/// Without a cap the fee is linear in the gross, so the solution is closed-form.
/// With a cap the fee is `min(gross * p + f, cap)`: the linear solution is tried
/// first, and if the fee it implies exceeds the cap the cap is binding and
/// `gross = net + cap`.
pub fn net_to_gross(net: f64, method: &FeeStructure) -> Result<FeeResult, FeeError> {
    let net = validate_amount(net)?;

    let candidate = (net + method.fixed_fee) / (1.0 - method.rate());
    let implied = method.uncapped_fee(candidate);

    let (gross, fees, capped) = match method.cap {
        Some(cap) if implied > cap => (net + cap, cap, true),
        _ => (candidate, implied, false),
    };

    debug!(
        "{} net-to-gross {net}: candidate={candidate} gross={gross} fees={fees} capped={capped}",
        method.id
    );

    settle(method, FeeMode::NetToGross, gross, fees, capped)
}

pub fn calculate_fees(schedule: &FeeSchedule, request: &FeeRequest) -> Result<FeeResult, FeeError> {
    let amount = validate_amount(request.amount)?;
    let method = schedule.method(&request.method)?;

    match request.mode {
        FeeMode::GrossToNet => gross_to_net(amount, method),
        FeeMode::NetToGross => net_to_gross(amount, method),
    }
}

/// Runs one calculation per method, in schedule order, keyed by method id.
///
/// Only an invalid amount fails the whole comparison. A method whose fees
/// swallow the amount reports its own error and the rest still compute.
pub fn compare_methods(
    schedule: &FeeSchedule,
    mode: FeeMode,
    amount: f64,
) -> Result<Vec<(String, Result<FeeResult, FeeError>)>, FeeError> {
    let amount = validate_amount(amount)?;

    Ok(schedule
        .methods
        .iter()
        .map(|method| {
            let outcome = match mode {
                FeeMode::GrossToNet => gross_to_net(amount, method),
                FeeMode::NetToGross => net_to_gross(amount, method),
            };
            (method.id.clone(), outcome)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    const EPS: f64 = 1e-9;

    fn schedule() -> FeeSchedule {
        Settings::builtin().expect("builtin settings").fees
    }

    #[test]
    fn domestic_card_gross_to_net() {
        let s = schedule();
        let r = gross_to_net(100.0, s.method("card-domestic").unwrap()).unwrap();
        assert!((r.fees - 3.20).abs() < EPS);
        assert!((r.net_amount - 96.80).abs() < EPS);
        assert!((r.effective_rate - 3.20).abs() < EPS);
        assert!(!r.capped);
    }

    #[test]
    fn ach_gross_to_net_is_capped() {
        let s = schedule();
        let r = gross_to_net(1000.0, s.method("ach").unwrap()).unwrap();
        assert_eq!(r.fees, 5.0);
        assert_eq!(r.net_amount, 995.0);
        assert!(r.capped);
    }

    #[test]
    fn ach_net_to_gross_detects_binding_cap() {
        let s = schedule();
        let r = net_to_gross(995.0, s.method("ach").unwrap()).unwrap();
        assert_eq!(r.gross_amount, 1000.0);
        assert_eq!(r.fees, 5.0);
        assert_eq!(r.net_amount, 995.0);
        assert!(r.capped);
    }

    #[test]
    fn ach_net_to_gross_below_cap_uses_linear_solution() {
        let s = schedule();
        let ach = s.method("ach").unwrap();
        let r = net_to_gross(100.0, ach).unwrap();
        assert!(!r.capped);
        assert_eq!(r.fees, ach.uncapped_fee(r.gross_amount));
        assert!(r.fees <= 5.0);
        assert!((r.net_amount - 100.0).abs() < 1e-6);
    }

    #[test]
    fn card_net_to_gross_round_trips() {
        let s = schedule();
        let card = s.method("card-domestic").unwrap();
        let inverse = net_to_gross(96.80, card).unwrap();
        assert!((inverse.gross_amount - 100.0).abs() < 1e-6);

        let forward = gross_to_net(inverse.gross_amount, card).unwrap();
        assert!((forward.net_amount - 96.80).abs() < 1e-6);
    }

    #[test]
    fn invalid_amounts_are_rejected_before_computation() {
        assert_eq!(
            parse_amount("ten dollars"),
            Err(FeeError::InvalidAmount("ten dollars".into()))
        );
        assert_eq!(parse_amount("0"), Err(FeeError::NonPositiveAmount(0.0)));
        assert_eq!(parse_amount("-5"), Err(FeeError::NonPositiveAmount(-5.0)));
        assert!(matches!(
            parse_amount("NaN"),
            Err(FeeError::NonPositiveAmount(_))
        ));
        assert!(matches!(
            parse_amount("inf"),
            Err(FeeError::NonPositiveAmount(_))
        ));
        assert_eq!(parse_amount(" 12.50 "), Ok(12.5));
    }

    #[test]
    fn amount_smaller_than_fixed_fee_is_rejected() {
        let s = schedule();
        assert!(matches!(
            gross_to_net(0.25, s.method("card-domestic").unwrap()),
            Err(FeeError::AmountBelowFees { .. })
        ));
    }

    #[test]
    fn effective_rate_is_guarded() {
        assert_eq!(effective_rate(1.0, 0.0), None);
        assert_eq!(effective_rate(1.0, f64::NAN), None);
        assert!(effective_rate(5.0, 1000.0).is_some_and(|r| (r - 0.5).abs() < EPS));
    }

    #[test]
    fn unknown_method_is_a_configuration_error() {
        let request = FeeRequest {
            mode: FeeMode::GrossToNet,
            amount: 10.0,
            method: "barter".into(),
        };
        assert_eq!(
            calculate_fees(&schedule(), &request),
            Err(FeeError::Catalog(CatalogError::UnknownFeeMethod(
                "barter".into()
            )))
        );
    }

    #[test]
    fn compare_covers_every_method_in_order() {
        let s = schedule();
        let results = compare_methods(&s, FeeMode::GrossToNet, 250.0).unwrap();
        let ids: Vec<_> = results.iter().map(|(id, _)| id.as_str()).collect();
        let expected: Vec<_> = s.methods.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, expected);
        for (id, outcome) in &results {
            assert_eq!(&outcome.as_ref().unwrap().method, id);
        }
    }

    #[test]
    fn compare_keeps_methods_that_cover_a_small_amount() {
        let results = compare_methods(&schedule(), FeeMode::GrossToNet, 0.25).unwrap();
        assert_eq!(results.len(), 4);

        for (id, outcome) in &results {
            if id == "ach" {
                let r = outcome.as_ref().unwrap();
                assert!((r.fees - 0.002).abs() < EPS);
                assert!((r.net_amount - 0.248).abs() < EPS);
            } else {
                assert!(
                    matches!(outcome, Err(FeeError::AmountBelowFees { .. })),
                    "{id} should not cover 0.25"
                );
            }
        }
    }

    #[test]
    fn compare_rejects_an_invalid_amount_outright() {
        assert_eq!(
            compare_methods(&schedule(), FeeMode::NetToGross, -1.0),
            Err(FeeError::NonPositiveAmount(-1.0))
        );
    }

    #[test]
    fn cap_below_fixed_fee_always_binds() {
        let m = FeeStructure {
            id: "odd".into(),
            name: "Odd".into(),
            percentage_rate: 1.0,
            fixed_fee: 2.0,
            cap: Some(1.0),
        };
        let r = net_to_gross(50.0, &m).unwrap();
        assert!(r.capped);
        assert_eq!(r.gross_amount, 51.0);
        assert_eq!(gross_to_net(51.0, &m).unwrap().net_amount, 50.0);
    }
}
