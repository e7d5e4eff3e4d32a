pub mod core;
pub mod day;
pub mod error;
