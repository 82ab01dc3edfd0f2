//! The client collaborator.
//!
//! Commands talk to accounts, servers and local profiles only through the
//! [`Client`] trait. Every operation answers with a [`Status`], so errors
//! from the client reach the user unchanged.
//!
//! - [`OfflineClient`] - in-process implementation with optional JSON
//!   persistence

mod offline;

pub use offline::OfflineClient;

use crate::core::Status;
use crate::models::{Domain, MAddress, Profile, UserId};

/// Account, connection, and profile operations used by the built-in commands.
pub trait Client {
    // --- Connection ---------------------------------------------------------

    fn is_connected(&self) -> bool;

    /// Open a connection to the server for `domain`.
    fn connect(&mut self, domain: &Domain) -> Status;

    fn disconnect(&mut self);

    // --- Accounts -----------------------------------------------------------

    fn is_logged_in(&self) -> bool;

    fn login(&mut self, address: &MAddress) -> Status;

    /// Ends the session; not an error when there is none.
    fn logout(&mut self) -> Status;

    /// Provision a workspace for someone else.
    ///
    /// Success carries `wid`, `regcode`, `domain`, and `uid` when one was
    /// requested.
    fn preregister(&mut self, uid: Option<&UserId>, domain: Option<&Domain>) -> Status;

    /// Create an account and attach it to the active profile.
    fn register(&mut self, domain: &Domain, password: &str, uid: Option<&UserId>) -> Status;

    /// Finish a preregistration and attach it to the active profile.
    fn redeem_regcode(&mut self, address: &MAddress, regcode: &str, password: &str) -> Status;

    // --- Profiles -----------------------------------------------------------

    fn active_profile(&self) -> Result<&Profile, Status>;

    /// Profile names in ascending order.
    fn profiles(&self) -> Vec<String>;

    fn create_profile(&mut self, name: &str) -> Status;

    fn delete_profile(&mut self, name: &str) -> Status;

    fn rename_profile(&mut self, old: &str, new: &str) -> Status;

    fn activate_profile(&mut self, name: &str) -> Status;

    fn set_default_profile(&mut self, name: &str) -> Status;

    // --- Contact fields -----------------------------------------------------

    /// Read one field, or every field when `field` is `*`.
    fn load_field(&self, field: &str) -> Status;

    fn save_field(&mut self, field: &str, value: &str, group: &str) -> Status;

    /// Remove a field; removing a field that is not set succeeds.
    fn delete_field(&mut self, field: &str) -> Status;

    /// Fails with `BadData` and a `missing` list when required fields are unset.
    fn check_fields(&self) -> Status;
}
