//! # Bridge Configuration
//!
//! Provides configuration management for the Airship bridge.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct an
//! [`AirshipConfig`] holding the native module and the settings the facade
//! applies at start-up. Validation is fail-fast: `build()` refuses a config
//! the service could not honor.
//!
//! ## Required Dependencies
//!
//! - `NativeModule` - the host's command interface to the native SDK
//!
//! When the `desktop-shims` feature is enabled, an in-memory native module is
//! injected automatically if none is provided.
//!
//! ## Optional Settings (with defaults)
//!
//! | Setting | Default |
//! |---------|---------|
//! | `platform` | `Platform::current()` |
//! | `clock` | `SystemClock` |
//! | `event_buffer_size` | 100 |
//! | `android_notification_config` | not sent |
//! | `foreground_presentation_options` | not sent (iOS only) |
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::Platform;
//! use core_runtime::config::AirshipConfig;
//! use std::sync::Arc;
//!
//! let config = AirshipConfig::builder()
//!     .native_module(Arc::new(MyNativeModule))
//!     .platform(Platform::Android)
//!     .event_buffer_size(256)
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! Without the `desktop-shims` feature a missing native module is reported
//! as [`Error::CapabilityMissing`] with an actionable message. Options a
//! platform cannot honor fail with [`Error::UnsupportedOnPlatform`].

use std::fmt;
use std::sync::Arc;

use bridge_traits::time::{Clock, SystemClock};
use bridge_traits::types::{ForegroundPresentationOptions, NotificationConfigAndroid};
use bridge_traits::{NativeModule, Platform};

use crate::capabilities::{require, Capability};
use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;

/// Largest accepted event buffer.
pub const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Bridge configuration. Use [`AirshipConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct AirshipConfig {
    /// Command interface to the native SDK (required)
    pub native_module: Arc<dyn NativeModule>,

    /// Host platform; decides which capabilities are available
    pub platform: Platform,

    /// Time source for attribute timestamps
    pub clock: Arc<dyn Clock>,

    /// Events buffered per stream subscriber before it lags
    pub event_buffer_size: usize,

    /// Sent to the native module when the service starts
    pub android_notification_config: Option<NotificationConfigAndroid>,

    /// Sent to the native module when the service starts (iOS)
    pub foreground_presentation_options: Option<ForegroundPresentationOptions>,
}

impl fmt::Debug for AirshipConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirshipConfig")
            .field("native_module", &"NativeModule { ... }")
            .field("platform", &self.platform)
            .field("clock", &"Clock { ... }")
            .field("event_buffer_size", &self.event_buffer_size)
            .field(
                "android_notification_config",
                &self.android_notification_config,
            )
            .field(
                "foreground_presentation_options",
                &self.foreground_presentation_options,
            )
            .finish()
    }
}

impl AirshipConfig {
    pub fn builder() -> AirshipConfigBuilder {
        AirshipConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// This checks:
    /// - Event buffer size is within `1..=10_000`
    /// - Foreground presentation options are only set where supported
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        if self.foreground_presentation_options.is_some() {
            require(Capability::ForegroundPresentationOptions, self.platform)?;
        }

        Ok(())
    }
}

#[cfg_attr(feature = "desktop-shims", allow(dead_code))]
fn native_module_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "NativeModule".to_string(),
        message: "NativeModule implementation is required to reach the native SDK. \
                 Desktop: enable the 'desktop-shims' feature to use the in-memory module. \
                 Mobile: inject the host's bridged Airship module."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_native_module() -> Result<Arc<dyn NativeModule>> {
    use bridge_desktop::InMemoryNativeModule;

    let module: Arc<dyn NativeModule> = Arc::new(InMemoryNativeModule::new());
    Ok(module)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_native_module() -> Result<Arc<dyn NativeModule>> {
    Err(native_module_missing_error())
}

/// Builder for constructing [`AirshipConfig`] instances.
#[derive(Default)]
pub struct AirshipConfigBuilder {
    native_module: Option<Arc<dyn NativeModule>>,
    platform: Option<Platform>,
    clock: Option<Arc<dyn Clock>>,
    event_buffer_size: Option<usize>,
    android_notification_config: Option<NotificationConfigAndroid>,
    foreground_presentation_options: Option<ForegroundPresentationOptions>,
}

impl AirshipConfigBuilder {
    /// Sets the native module (required unless `desktop-shims` is enabled).
    pub fn native_module(mut self, module: Arc<dyn NativeModule>) -> Self {
        self.native_module = Some(module);
        self
    }

    /// Overrides the platform detected from the compilation target.
    ///
    /// # Examples
    ///
    /// ```
    /// use bridge_traits::Platform;
    /// use core_runtime::config::AirshipConfig;
    ///
    /// let builder = AirshipConfig::builder().platform(Platform::Ios);
    /// ```
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the event stream buffer size.
    ///
    /// Default: 100
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    pub fn android_notification_config(mut self, config: NotificationConfigAndroid) -> Self {
        self.android_notification_config = Some(config);
        self
    }

    /// iOS only; `build()` fails on other platforms.
    pub fn foreground_presentation_options(
        mut self,
        options: ForegroundPresentationOptions,
    ) -> Self {
        self.foreground_presentation_options = Some(options);
        self
    }

    /// Builds and validates the final `AirshipConfig`.
    ///
    /// # Returns
    ///
    /// Returns an error if:
    /// - No native module is provided and no default is available
    /// - Configuration values are invalid
    /// - An option is set that the platform does not support
    pub fn build(self) -> Result<AirshipConfig> {
        let native_module = match self.native_module {
            Some(module) => module,
            None => provide_default_native_module()?,
        };

        let config = AirshipConfig {
            native_module,
            platform: self.platform.unwrap_or_else(Platform::current),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            android_notification_config: self.android_notification_config,
            foreground_presentation_options: self.foreground_presentation_options,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::time::ManualClock;
    use bridge_traits::NativeCommand;
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    struct NullNativeModule;

    #[async_trait]
    impl NativeModule for NullNativeModule {
        async fn call(&self, _command: NativeCommand) -> BridgeResult<Value> {
            Ok(Value::Null)
        }

        fn post(&self, _command: NativeCommand) {}
    }

    fn builder() -> AirshipConfigBuilder {
        AirshipConfig::builder().native_module(Arc::new(NullNativeModule))
    }

    #[test]
    fn test_builder_defaults() {
        let config = builder().build().unwrap();
        assert_eq!(config.platform, Platform::current());
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
        assert!(config.android_notification_config.is_none());
        assert!(config.foreground_presentation_options.is_none());
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_native_module() {
        let err = AirshipConfig::builder().build().unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, Error::CapabilityMissing { .. }));
        assert!(message.contains("NativeModule"));
        assert!(message.contains("desktop-shims"));
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_build_with_desktop_default_module() {
        let config = AirshipConfig::builder()
            .build()
            .expect("desktop default should succeed");
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
    }

    #[test]
    fn test_missing_module_error_is_actionable() {
        let message = native_module_missing_error().to_string();
        assert!(message.contains("Capability missing: NativeModule"));
    }

    #[test]
    fn test_validate_rejects_zero_buffer() {
        let err = builder().event_buffer_size(0).build().unwrap_err();
        assert!(err.to_string().contains("must be greater than 0"));
    }

    #[test]
    fn test_validate_rejects_excessive_buffer() {
        let err = builder().event_buffer_size(20_000).build().unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));

        assert!(builder()
            .event_buffer_size(MAX_EVENT_BUFFER_SIZE)
            .build()
            .is_ok());
    }

    #[test]
    fn test_foreground_options_require_ios() {
        let options = ForegroundPresentationOptions {
            alert: Some(true),
            sound: Some(false),
            badge: None,
        };

        let err = builder()
            .platform(Platform::Android)
            .foreground_presentation_options(options)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedOnPlatform {
                capability: Capability::ForegroundPresentationOptions,
                platform: Platform::Android,
            }
        ));

        let config = builder()
            .platform(Platform::Ios)
            .foreground_presentation_options(options)
            .build()
            .unwrap();
        assert_eq!(config.foreground_presentation_options, Some(options));
    }

    #[test]
    fn test_custom_clock_is_kept() {
        let start = Utc.with_ymd_and_hms(2024, 2, 29, 8, 0, 0).unwrap();
        let config = builder()
            .clock(Arc::new(ManualClock::new(start)))
            .build()
            .unwrap();
        assert_eq!(config.clock.now(), start);
    }

    #[test]
    fn test_debug_hides_trait_objects() {
        let config = builder()
            .android_notification_config(NotificationConfigAndroid {
                icon: Some("ic_notification".to_string()),
                ..Default::default()
            })
            .build()
            .unwrap();
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("NativeModule { ... }"));
        assert!(rendered.contains("ic_notification"));
    }
}
