//! AHP Study - Analytic Hierarchy Process engine
//!
//! This crate models a decision as a goal, a tree of criteria and a global
//! set of alternatives, collects pairwise judgments from invited evaluators,
//! derives priority vectors with consistency checks, and aggregates the
//! evaluators into a single group ranking.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
