//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `core-service`, `core-editors`). Host applications
//! can depend on `airship-bridge` and enable the documented features without
//! needing to wire each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service::{AirshipService, ServiceError};

#[cfg(feature = "editors")]
pub use core_editors::{AttributeEditor, TagGroupEditor};
