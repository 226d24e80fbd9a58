//! # Reportdb Mux
//!
//! A driver that multiplexes a reporting database over several
//! independently versioned sub-drivers.
//!
//! ## Overview
//!
//! Every sub-driver has its own ordered schema history, each version
//! accepting one interchange-format version. The mux presents all of them as
//! a single driver with one composite history:
//!
//! - [`compose`] computes the composite version space by walking the
//!   sub-driver histories together, one sub-driver step at a time
//! - [`orchestrate`] turns a composite upgrade into the ordered sub-driver
//!   upgrades that realize it
//! - [`MuxDriver`] ties both to the [`reportdb_core::Driver`] contract
//!
//! ## Key Types
//!
//! - [`MuxConfig`] - Parsed list of sub-drivers
//! - [`Composer`] - The composite version space
//! - [`Numbering`] - How composite versions are numbered
//! - [`MuxDriver`] - The multiplexing driver itself
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reportdb_core::{Driver, Version};
//! use reportdb_mux::MuxDriver;
//! use reportdb_store::Registry;
//!
//! async fn example() -> reportdb_core::Result<()> {
//!     let mux = MuxDriver::open("sqlite:reports.db json:reports.json", &Registry::builtin()).await?;
//!
//!     if !mux.is_initialized().await? {
//!         mux.init(Version::ZERO).await?;
//!     }
//!     for version in mux.get_schemas().await?.into_keys() {
//!         if version > mux.get_schema().await?.0 {
//!             mux.upgrade(version).await?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod compose;
pub mod config;
pub mod driver;
pub mod orchestrate;

pub use compose::{Composer, Lane, Numbering, Step, Walk};
pub use config::{DriverSpec, MuxConfig};
pub use driver::MuxDriver;
pub use orchestrate::{Move, Plan};
