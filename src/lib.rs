//! Periodic watcher that samples on-chain circuit telemetry accounts and exports per-tick
//! deltas as Prometheus counters.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod collaborators;
pub mod config;
pub mod metrics;
pub mod model;

mod classifier;
mod delta;
mod error;
mod orchestrator;
mod state;
mod watcher;

#[cfg(any(test, doctest))]
mod fixtures;

pub use crate::{
	config::{WatcherConfig, WatcherConfigBuilder},
	error::{Error, Result},
	watcher::Watcher,
};
