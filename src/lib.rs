//! EKS cluster and nodepool lifecycle reconciliation for Tanzu Mission Control
//!
//! The TMC control plane applies EKS mutations asynchronously: a create,
//! update, or delete is acknowledged immediately and settles minutes
//! later. This crate decides which nodepools to create, update, or
//! delete when desired configuration diverges from remote state, and
//! polls the control plane until each operation reaches a terminal
//! phase.
//!
//! # Architecture
//!
//! One apply runs observe → plan → execute:
//! - list the cluster's remote nodepools
//! - inherit cluster-level tags into every desired nodepool
//! - classify each nodepool into disjoint create/update/delete sets
//! - execute the three batches in order, polling after every mutation
//!
//! Execution is sequential with no rollback: a failure aborts the
//! remaining plan and leaves earlier phases applied.
//!
//! # Modules
//!
//! - [`model`] - Cluster/nodepool wire types, phases, and conditions
//! - [`client`] - Trait surface over the TMC EKS API
//! - [`rest`] - reqwest-backed implementation of the client trait
//! - [`compare`] - Order- and nil-insensitive spec equality
//! - [`tags`] - Cluster-to-nodepool tag inheritance
//! - [`plan`] - Nodepool diff planner
//! - [`poll`] - Bounded fixed-interval polling
//! - [`wait`] - User-facing wait policy parsing
//! - [`reconcile`] - Lifecycle orchestrator
//! - [`error`] - Error types and classification

#![deny(missing_docs)]

pub mod client;
pub mod compare;
pub mod error;
pub mod model;
pub mod plan;
pub mod poll;
pub mod reconcile;
pub mod rest;
pub mod tags;
pub mod wait;

pub use client::TmcClient;
pub use error::Error;
pub use reconcile::EksReconciler;
pub use rest::RestClient;
pub use wait::WaitPolicy;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
