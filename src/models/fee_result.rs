use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::utils::selector::FeeMode;

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FeeRequest {
    pub mode: FeeMode,
    pub amount: f64,
    pub method: String,
}

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FeeResult {
    pub method: String,
    pub mode: FeeMode,
    pub gross_amount: f64,
    pub fees: f64,
    pub net_amount: f64,
    /// Fees as a percentage of the gross amount.
    pub effective_rate: f64,
    /// Whether the method's fee cap determined the fee.
    pub capped: bool,
}
