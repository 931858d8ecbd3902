//! Starwalk Deterministic Simulation Harness
//!
//! Walks a simulated player through complete sessions so the core can be
//! exercised end to end without a device:
//! - **Time**: virtual clock advanced one tick per fix
//! - **Position**: a `Walker` heading for the nearest star, with optional
//!   GPS noise and dropouts
//! - **Randomness**: star placement and noise derived from one 64-bit seed
//!
//! # Usage
//!
//! ```ignore
//! use starwalk_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42).run(ScenarioId::NoisyGps);
//! assert!(result.passed);
//! ```

mod config;
mod context;
mod error;
mod exporter;
mod runner;
mod walker;
pub mod scenarios;

pub use config::SimConfig;
pub use context::SimContext;
pub use error::SimError;
pub use exporter::{SimEvent, SimExport, SimFrame, TargetPosition};
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use walker::{apply_offset, enu_offset, Walker};
