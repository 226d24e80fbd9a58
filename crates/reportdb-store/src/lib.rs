//! # Reportdb Store
//!
//! Storage drivers for the CI reporting database, and the registry that
//! constructs them by name.
//!
//! ## Overview
//!
//! Every driver implements [`reportdb_core::Driver`]: it owns a schema
//! history, knows its current version, and upgrades itself one migration at
//! a time.
//!
//! ## Key Types
//!
//! - [`SqliteDriver`] - Relational store on SQLite
//! - [`JsonDriver`] - Flat-file store holding one JSON document
//! - [`NullDriver`] - Discards everything
//! - [`Registry`] - Name → constructor table
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reportdb_core::{Driver, Version};
//! use reportdb_store::Registry;
//!
//! async fn example() {
//!     let registry = Registry::builtin();
//!     let driver = registry.make("sqlite", Some("reports.db")).unwrap();
//!
//!     if !driver.is_initialized().await.unwrap() {
//!         driver.init(Version::new(4, 0)).await.unwrap();
//!     }
//!     driver.upgrade(Version::new(5, 0)).await.unwrap();
//! }
//! ```

pub mod error;
pub mod json;
pub mod migration;
pub mod null;
pub mod registry;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use json::JsonDriver;
pub use null::NullDriver;
pub use registry::{Constructor, Registry};
pub use sqlite::SqliteDriver;
