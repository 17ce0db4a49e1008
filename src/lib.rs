//! Workshop slot allocation for the U-Engine ecosystem.
//!
//! Assigns event participants to up to three program sessions ("slots")
//! from their ranked wish lists, subject to program capacity, allowed
//! slots, occurrence limits, participant availability and pinned
//! facilitators.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Program`, `Participant`, `Preference`,
//!   `Allocation`, and the `Problem` arena that owns them
//! - **`input`**: Raw input records and JSON loading
//! - **`validation`**: Input integrity checks (duplicate ids, unknown
//!   programs, facilitator references, continuation slots)
//! - **`optimizer`**: `EagerOptimizer` (six-phase greedy heuristic),
//!   fairness allocation, swap-based repair
//! - **`sanity`**: Post-optimization invariant checks
//! - **`report`**: Statistics and per-entity output records
//! - **`driver`**: Checked runs and the retry-until-sane loop
//!
//! # Example
//!
//! ```
//! use u_workshop::driver::optimize;
//! use u_workshop::models::Problem;
//! use u_workshop::optimizer::OptimizerConfig;
//!
//! let programs = r#"[{"id": 1, "name": "Archery", "minSize": 1, "maxSize": 10,
//!                     "slot1": "TRUE", "slot2": "", "slot3": ""}]"#;
//! let participants = r#"{"anna": {"prog": [1], "present": [true, true, true]}}"#;
//! let problem = Problem::from_json(programs, participants, "[]").unwrap();
//!
//! let (problem, passed) = optimize(problem, &OptimizerConfig::new().with_seed(1));
//! assert!(passed);
//! assert!(problem.participant_by_id("anna").unwrap().allocation(0).is_some());
//! ```
//!
//! # Logging
//!
//! The crate logs through `tracing` and never installs a subscriber.

pub mod driver;
pub mod error;
pub mod input;
pub mod models;
pub mod optimizer;
pub mod report;
pub mod sanity;
pub mod validation;

pub use error::ProblemError;
