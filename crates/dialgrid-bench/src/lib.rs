//! MovingAI benchmark tooling for the dialgrid search.
//!
//! Parses `.map` and `.scen` files, runs every scenario query through a
//! [`Planner`], and writes one CSV row per query plus an optional validation
//! line. The `dialgrid-bench` binary wires these together behind a CLI.

mod error;
mod experiment;
mod map;
mod scenario;

pub use error::LoadError;
pub use experiment::{CSV_HEADER, Planner, ReferencePlanner, Runner, Summary};
pub use map::{load_map, parse_map};
pub use scenario::{Experiment, Scenario, load_scenario, parse_scenario};
