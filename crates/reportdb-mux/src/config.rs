//! Mux configuration: the list of sub-drivers to compose.
//!
//! The textual form is a whitespace-separated list of entries, each either
//! `<name>` or `<name>:<params>`. Only the first colon splits; the parameter
//! string may contain more.

use std::fmt;
use std::str::FromStr;

use reportdb_core::{Error, Result};

use crate::compose::Numbering;

/// One sub-driver entry of a mux configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverSpec {
    /// Registry name of the driver.
    pub name: String,
    /// Parameter string handed to the driver's constructor.
    pub params: Option<String>,
}

impl DriverSpec {
    /// Parse a single `<name>[:<params>]` entry.
    pub fn parse(entry: &str) -> Result<Self> {
        let (name, params) = match entry.split_once(':') {
            Some((name, params)) => (name, Some(params.to_string())),
            None => (entry, None),
        };
        if name.is_empty() {
            return Err(Error::config(format!("missing driver name in {:?}", entry)));
        }
        Ok(Self {
            name: name.to_string(),
            params,
        })
    }
}

impl fmt::Display for DriverSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.params {
            Some(params) => write!(f, "{}:{}", self.name, params),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Configuration of a multiplexing driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxConfig {
    /// Sub-drivers in configuration order. The order breaks ties when
    /// choosing which driver to upgrade next.
    pub drivers: Vec<DriverSpec>,
    /// How composite versions are numbered.
    pub numbering: Numbering,
}

impl MuxConfig {
    /// Parse a whitespace-separated list of driver entries.
    ///
    /// Any run of whitespace separates entries, including newlines,
    /// carriage returns, tabs and vertical tabs.
    pub fn parse(s: &str) -> Result<Self> {
        let drivers = s
            .split_whitespace()
            .map(DriverSpec::parse)
            .collect::<Result<Vec<_>>>()?;
        if drivers.is_empty() {
            return Err(Error::config("no drivers specified"));
        }
        Ok(Self {
            drivers,
            numbering: Numbering::default(),
        })
    }

    /// Use a different numbering rule.
    pub fn with_numbering(mut self, numbering: Numbering) -> Self {
        self.numbering = numbering;
        self
    }
}

impl FromStr for MuxConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MuxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self.drivers.iter().map(ToString::to_string).collect();
        write!(f, "{}", entries.join(" "))
    }
}
