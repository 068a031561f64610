//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the Airship bridge:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Native event delivery (type lookup, payloads, dispatcher, event bus)
//! - Platform capability table
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the facade depends on. It
//! establishes the logging conventions, the start-up configuration contract
//! and the event broadcasting mechanism used throughout the workspace.

pub mod capabilities;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use capabilities::{Capability, CAPABILITY_TABLE};
pub use config::AirshipConfig;
pub use error::{Error, Result};
pub use events::{AirshipEvent, EventDispatcher, EventStream, EventType, Subscription};
