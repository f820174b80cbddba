pub mod fee;
pub mod price;
pub mod selector;
