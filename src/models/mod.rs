pub mod catalog;
pub mod estimate;
pub mod fee_result;
pub mod fee_schedule;
