//! One check cycle: fetch every configured listing, evaluate its hours,
//! persist the result, then alert on mismatches.

pub mod live;
pub mod monitor;
pub mod notify;
pub mod store;

pub use live::{
    build_live_monitor, listing_source, load_monitored_locations, BuildError, LiveMonitor,
};
pub use monitor::{CycleReport, FailureStage, LocationFailure, Monitor, MonitorSettings};
pub use notify::{AlertNotifier, LogNotifier, Notifier, NotifyError, WebhookNotifier};
pub use store::{MemoryStore, PgStatusStore, StatusStore, StoreError};
