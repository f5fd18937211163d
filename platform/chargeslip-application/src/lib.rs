pub mod benchmarking;
pub mod config;
pub mod export;
pub mod form;
pub mod formatting;
pub mod quote;
pub mod snapshot;
