//! # Reportdb Core
//!
//! Pure primitives for the CI reporting database: schema versions, the
//! interchange-format history, and the driver contract every backend
//! implements.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`Version`] - A `(major, minor)` schema version of a driver
//! - [`IoVersion`] - A version of the shared interchange data format
//! - [`Schemas`] - A driver's ordered version history
//! - [`Driver`] - The async trait all database drivers implement
//! - [`Error`] - The error taxonomy shared by all drivers
//!
//! ## Interchange Formats
//!
//! The known interchange-format versions are listed, oldest first, in
//! [`io::HISTORY`]. Each driver schema version declares the one interchange
//! version it accepts.

pub mod driver;
pub mod error;
pub mod io;
pub mod version;

pub use driver::{check_init, check_upgrade, latest, Driver, Schemas};
pub use error::{Error, Result};
pub use io::IoVersion;
pub use version::Version;
