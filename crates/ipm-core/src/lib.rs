// # ipm-core
//
// Core library for the automatic public-IP allow-list manager.
//
// ## Architecture Overview
//
// This library provides the core functionality for keeping a cloud-side
// address template in sync with the host's public IP:
// - **IpProbe**: Trait for resolving the host's current public IPv4 address
// - **AddressSetClient**: Trait for describing and swapping labeled members
//   of a remote address template
// - **Notifier**: Trait for delivering operator notifications
// - **Reconciler**: discover → compare → conditionally swap → notify,
//   executed once per invocation
// - **ScheduleManager**: idempotent periodic-job entries in a line-oriented
//   schedule store (normally the user crontab)
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Single-Pass**: One reconciliation per process invocation; periodic
//    execution is delegated to the schedule store
// 3. **Label Correlation**: The remote member set is keyed by label, never by
//    address value or list position
// 4. **Library-First**: All core functionality can be used as a library

pub mod config;
pub mod error;
pub mod reconcile;
pub mod schedule;
pub mod traits;

// Re-export core types for convenience
pub use config::{CloudConfig, DiscoveryConfig, IpmConfig, NotifyConfig, TemplateConfig};
pub use error::{Error, Result};
pub use reconcile::{Outcome, Reconciler};
pub use schedule::{
    CrontabStore, MemoryScheduleStore, ScheduleEntry, ScheduleManager, ScheduleStore,
};
pub use traits::{AddressSetClient, IpProbe, NoopNotifier, Notifier, TemplateMember};
