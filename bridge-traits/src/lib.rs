//! # Host Bridge Traits
//!
//! Contract between the cross-platform bridge and the native push SDK hosts.
//!
//! ## Overview
//!
//! The native Airship SDK (push delivery, channel registration, message
//! center storage, notification rendering) lives outside this workspace. The
//! bridge reaches it only through the traits and wire types defined here, so
//! every host platform ships one adapter and the rest of the workspace stays
//! platform-independent.
//!
//! ## Traits
//!
//! - [`NativeModule`](native::NativeModule) - Opaque async command interface to the native SDK
//! - [`Clock`](time::Clock) - Time source for attribute timestamps and deterministic tests
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Wire Types
//!
//! - [`NativeCommand`](native::NativeCommand) - One variant per exported native method
//! - [`TagGroupOperation`](operations::TagGroupOperation) and
//!   [`AttributeOperation`](operations::AttributeOperation) - Compacted editor batches
//! - [`InboxMessage`](types::InboxMessage), [`PushReceivedEvent`](types::PushReceivedEvent)
//!   and the notification config objects
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation | Status |
//! |----------|----------------|--------|
//! | Desktop  | `bridge-desktop` (in-memory shim) | ✅ Available |
//! | iOS      | Host ObjC glue | Host-provided |
//! | Android  | Host JNI glue  | Host-provided |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Native promise
//! rejections map to `BridgeError::Rejected` with the native error code.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` on native targets
//! ([`PlatformSendSync`](platform::PlatformSendSync)).

pub mod error;
pub mod native;
pub mod operations;
pub mod platform;
pub mod time;
pub mod types;

pub use error::BridgeError;

// Re-export commonly used types
pub use native::{NativeCommand, NativeModule};
pub use operations::{
    AttributeOperation, AttributeOperationType, AttributeValue, TagGroupOperation,
    TagOperationType,
};
pub use platform::Platform;
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, ManualClock, SystemClock};
pub use types::{
    AuthorizedNotificationSettings, ForegroundPresentationOptions, InboxMessage,
    NotificationConfigAndroid, PushReceivedEvent,
};
