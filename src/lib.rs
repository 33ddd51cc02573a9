//! Straitwatch: maritime chokepoint crisis monitor.
//!
//! Reads pre-normalized signals (vessel traffic, crude prices, security
//! advisories, tagged news, shipping indicators) from a SQLite store and
//! turns them into a composite threat level, cooldown-gated alert
//! notifications, and a scenario probability estimate updated by an
//! external reasoning service.
//!
//! Layout is hexagonal: `domain` holds the models and ports,
//! `infrastructure` the SQLite/HTTP adapters, `services` the scoring,
//! trigger, and scenario logic, and `cli` the scheduler-facing entry
//! points.

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;
