//! Host-side sink implementations
//!
//! This module contains the render sink that feeds API clients and the
//! notifiers that tell the user a run started or finished.

pub mod notifier;
pub mod publisher;

// Re-export main types
pub use notifier::{completion_message, DesktopNotifier, LogNotifier, NotifierSet};
pub use publisher::SnapshotPublisher;
