//! Data models and types for the shell.
//!
//! Contains domain types for:
//! - [`Domain`], [`UserId`], [`WorkspaceId`], [`MAddress`] - validated identifiers
//! - [`Profile`], [`ContactField`] - local profiles and contact information
//! - [`OutputLine`] - terminal output types

mod address;
mod profile;
mod terminal;

pub use address::{AddressError, AddressId, Domain, MAddress, UserId, WorkspaceId};
pub use profile::{ContactField, Profile, REQUIRED_MENSAGO_FIELDS, normalize_field};
pub use terminal::{OutputLine, OutputLineData};
