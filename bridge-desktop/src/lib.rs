//! # Desktop Bridge Implementations
//!
//! Default implementation of the native module contract for desktop
//! platforms (macOS, Windows, Linux) and CI.
//!
//! ## Overview
//!
//! There is no native Airship SDK on desktop. This crate provides
//! [`InMemoryNativeModule`], which keeps the state the native SDK would hold
//! (channel, tags, tag groups, attributes, inbox, badge, listener count) in
//! memory and answers every `NativeCommand` from it. It lets the facade and
//! host applications run end-to-end without a device.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use bridge_desktop::InMemoryNativeModule;
//! use core_runtime::config::AirshipConfig;
//!
//! let config = AirshipConfig::builder()
//!     .native_module(Arc::new(InMemoryNativeModule::new()))
//!     .build()?;
//! ```
//!
//! `core-runtime` injects this module automatically when its
//! `desktop-shims` feature is enabled and no module was provided.

mod native;

pub use native::{InMemoryNativeModule, COMMAND_LOG_CAPACITY};
