//! Core traits for the auto-ipm system
//!
//! These traits define the seams between the reconciliation core and its
//! collaborators; implementations live in their own crates.

pub mod address_set;
pub mod ip_probe;
pub mod notifier;

pub use address_set::{AddressSetClient, TemplateMember};
pub use ip_probe::IpProbe;
pub use notifier::{NoopNotifier, Notifier};
