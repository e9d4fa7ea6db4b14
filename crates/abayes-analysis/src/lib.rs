//! A/B test analysis of tabular query results.
//!
//! This crate turns a query response (field schema plus result rows) into a
//! complete Bayesian A/B report using [`abayes_stats`]:
//!
//! - [`schema`]: field descriptors and resolution of the variant, visitor and
//!   conversion fields
//! - [`dataset`]: query responses and extraction of the two observed variants
//! - [`config`]: user options with host-compatible defaults
//! - [`seed`]: reproducible simulation seeds
//! - [`statement`]: human-readable win and interval sentences
//! - [`report`]: the end-to-end analysis and its serializable report
//!
//! # Examples
//!
//! ```
//! use abayes_analysis::{
//!     config::VisConfig, dataset::QueryResponse, report::AbTestReport, seed::SimulationSeed,
//! };
//!
//! let response: QueryResponse = serde_json::from_str(r#"{
//!     "fields": {
//!         "dimensions": [{"name": "variant", "type": "string"}],
//!         "measures": [
//!             {"name": "visitors", "type": "number"},
//!             {"name": "conversions", "type": "number"}
//!         ]
//!     },
//!     "data": [
//!         {"variant": {"value": "A"}, "visitors": {"value": 1300}, "conversions": {"value": 120}},
//!         {"variant": {"value": "B"}, "visitors": {"value": 1275}, "conversions": {"value": 125}}
//!     ]
//! }"#).unwrap();
//!
//! let settings = VisConfig::default().settings().unwrap();
//! let report = AbTestReport::analyze(&response, &settings, SimulationSeed::from_u128(1)).unwrap();
//! assert!(report.comparison.prob_b > report.comparison.prob_a);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod report;
pub mod schema;
pub mod seed;
pub mod statement;
