//! ACL editing for the Chronik Stream console.
//!
//! Wraps the pure rule model in `chronik-acl` with the admin API client,
//! concurrent batch submission with per-request failure reporting, and the
//! create/update/remove flows of the ACL screens.

pub mod batch;
pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod telemetry;

pub use batch::{apply_difference, ApplyAction, ApplyFailure, ApplyReport, Severity};
pub use client::{AclService, AdminApiClient};
pub use config::{AdminApiConfig, ApplyConfig, ConsoleConfig};
pub use editor::AclEditor;
pub use error::{ConsoleError, Result};
