use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use typeshare::typeshare;

use super::catalog::CatalogError;

/// Fee formula for one payment method: `amount * percentage_rate / 100 + fixed_fee`,
/// clamped to `cap` when one is set.
#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FeeStructure {
    pub id: String,
    pub name: String,
    pub percentage_rate: f64,
    #[serde(default)]
    pub fixed_fee: f64,
    #[serde(default)]
    pub cap: Option<f64>,
}

impl FeeStructure {
    pub fn rate(&self) -> f64 {
        self.percentage_rate / 100.0
    }

    /// Fee implied by the linear formula, ignoring any cap.
    pub fn uncapped_fee(&self, gross: f64) -> f64 {
        gross * self.rate() + self.fixed_fee
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let rate = self.percentage_rate;
        if !(rate.is_finite() && (0.0..100.0).contains(&rate)) {
            return Err(CatalogError::InvalidPercentageRate {
                id: self.id.clone(),
                rate,
            });
        }
        if !(self.fixed_fee.is_finite() && self.fixed_fee >= 0.0) {
            return Err(CatalogError::InvalidFixedFee {
                id: self.id.clone(),
                fee: self.fixed_fee,
            });
        }
        if let Some(cap) = self.cap {
            if !(cap.is_finite() && cap >= 0.0) {
                return Err(CatalogError::InvalidFeeCap {
                    id: self.id.clone(),
                    cap,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FeeSchedule {
    pub methods: Vec<FeeStructure>,
}

impl FeeSchedule {
    pub fn method(&self, id: &str) -> Result<&FeeStructure, CatalogError> {
        self.methods
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CatalogError::UnknownFeeMethod(id.to_string()))
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.methods.is_empty() {
            return Err(CatalogError::EmptyFeeSchedule);
        }

        let mut seen = HashSet::new();
        for method in &self.methods {
            if !seen.insert(method.id.as_str()) {
                return Err(CatalogError::DuplicateFeeMethod(method.id.clone()));
            }
            method.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ach() -> FeeStructure {
        FeeStructure {
            id: "ach".into(),
            name: "ACH transfer".into(),
            percentage_rate: 0.8,
            fixed_fee: 0.0,
            cap: Some(5.0),
        }
    }

    #[test]
    fn uncapped_fee_ignores_cap() {
        assert!((ach().uncapped_fee(1000.0) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn rate_of_one_hundred_percent_is_rejected() {
        let mut m = ach();
        m.percentage_rate = 100.0;
        assert!(matches!(
            m.validate(),
            Err(CatalogError::InvalidPercentageRate { .. })
        ));
    }

    #[test]
    fn nan_rate_is_rejected() {
        let mut m = ach();
        m.percentage_rate = f64::NAN;
        assert!(matches!(
            m.validate(),
            Err(CatalogError::InvalidPercentageRate { ref id, rate }) if id == "ach" && rate.is_nan()
        ));
    }

    #[test]
    fn negative_fixed_fee_is_rejected() {
        let mut m = ach();
        m.fixed_fee = -0.30;
        assert_eq!(
            m.validate(),
            Err(CatalogError::InvalidFixedFee {
                id: "ach".into(),
                fee: -0.30
            })
        );
    }

    #[test]
    fn negative_cap_is_rejected() {
        let mut m = ach();
        m.cap = Some(-1.0);
        assert!(matches!(m.validate(), Err(CatalogError::InvalidFeeCap { .. })));
    }

    #[test]
    fn schedule_lookup_and_duplicates() {
        let schedule = FeeSchedule {
            methods: vec![ach(), ach()],
        };
        assert_eq!(schedule.method("ach").map(|m| m.cap), Ok(Some(5.0)));
        assert_eq!(
            schedule.method("wire").unwrap_err(),
            CatalogError::UnknownFeeMethod("wire".into())
        );
        assert_eq!(
            schedule.validate(),
            Err(CatalogError::DuplicateFeeMethod("ach".into()))
        );
    }

    #[test]
    fn empty_schedule_is_rejected() {
        let schedule = FeeSchedule { methods: vec![] };
        assert_eq!(schedule.validate(), Err(CatalogError::EmptyFeeSchedule));
    }
}
