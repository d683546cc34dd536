pub mod adapters;
pub mod config;
pub mod console;
pub mod error;
pub mod study;
