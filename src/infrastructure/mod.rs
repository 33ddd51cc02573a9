//! Adapters for the domain ports: configuration, SQLite persistence, the
//! reasoning service client, and Telegram delivery.

pub mod analyzer;
pub mod config;
pub mod database;
pub mod notify;
