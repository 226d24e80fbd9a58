//! # Reportdb
//!
//! The CI reporting database: interchangeable storage drivers, each with
//! its own schema history, and a multiplexer running several of them as one.
//!
//! ## Overview
//!
//! - **Drivers**: Each backend owns an ordered history of schema versions,
//!   every one accepting a single version of the shared interchange format
//! - **Registry**: Drivers are constructed by name from a `<name>[:<params>]`
//!   specification
//! - **Mux**: Several drivers behind one composite schema history, upgraded
//!   together one sub-driver step at a time
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reportdb::Client;
//!
//! async fn example() -> reportdb::Result<()> {
//!     let client = Client::open("mux:sqlite:reports.db json:reports.json").await?;
//!
//!     if !client.is_initialized().await? {
//!         client.init(None).await?;
//!     }
//!     let version = client.upgrade(None).await?;
//!     println!("database at {}", version);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `reportdb::core` - Versions, interchange formats, the driver contract
//! - `reportdb::store` - Concrete drivers and the registry
//! - `reportdb::mux` - The multiplexing driver

pub mod client;
pub mod error;

// Re-export component crates
pub use reportdb_core as core;
pub use reportdb_mux as mux;
pub use reportdb_store as store;

// Re-export main types for convenience
pub use client::{Client, MUX};
pub use error::{ClientError, Result};

// Re-export commonly used types
pub use reportdb_core::{Driver, Error, IoVersion, Schemas, Version};
pub use reportdb_mux::MuxDriver;
pub use reportdb_store::Registry;
