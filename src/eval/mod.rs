//! Evaluation session and report generation.
//!
//! This module provides the core evaluation infrastructure:
//!
//! - [`session::Evaluator`]: Dataset evaluator with progress observer
//! - [`session::EvalConfig`]: Configuration for evaluation
//! - [`report`]: Report types for evaluation results

pub mod report;
pub mod session;

pub use report::{DetailReport, PairRecord, SummaryReport};
pub use session::{EvalConfig, EvalEvent, Evaluator, ObserverFn, SkipReason};
