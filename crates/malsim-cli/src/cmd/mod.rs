pub mod action;
pub mod calc;
pub mod log;
