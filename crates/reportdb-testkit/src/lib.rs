//! # Reportdb Testkit
//!
//! Testing utilities for reportdb drivers.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Dummy driver**: An in-memory driver with a synthetic, parametric schema history
//! - **Fault injection**: A wrapper failing one chosen upgrade
//! - **Golden vectors**: Mux configurations with their expected composite histories
//! - **Generators**: Proptest strategies for dummy driver parameters
//! - **Fixtures**: A registry with `dummy` and scratch space for file-backed drivers
//!
//! ## Golden Vectors
//!
//! ```rust,no_run
//! use reportdb_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     println!("{}: {} versions", vector.config, vector.expected().len());
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use reportdb_testkit::generators::{dummy_config, dummy_params_list};
//!
//! proptest! {
//!     #[test]
//!     fn config_parses(params in dummy_params_list(4)) {
//!         prop_assert!(dummy_config(&params).parse::<MuxConfig>().is_ok());
//!     }
//! }
//! ```

pub mod dummy;
pub mod faulty;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use dummy::{DummyDriver, DummyParams};
pub use faulty::FaultyDriver;
pub use fixtures::{dummy_registry, upgrade_through_all, walk_len, TestFixture};
pub use generators::{dummy_config, dummy_params, dummy_params_list};
pub use vectors::{all_vectors, GoldenVector};
