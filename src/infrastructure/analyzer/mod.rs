//! Reasoning service client.

mod client;
pub mod prompt;

pub use client::HttpScenarioAnalyzer;
