//! Core types for partdup.
//!
//! This crate provides the data structures shared by the rest of the
//! workspace: geometric signatures, component metadata, scan configuration,
//! and scan results.

mod component;
mod config;
mod error;
mod inventory;
mod signature;

pub use component::{Component, ComponentMetadata, UNKNOWN_PROJECT};
pub use config::{ScanConfig, ScanConfigBuilder, normalize_extension};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use inventory::{DiscoveredFile, Inventory, ScanStats};
pub use signature::{BoundingBox, GeometryHash, HashParseError, Signature};
