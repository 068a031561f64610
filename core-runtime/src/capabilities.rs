//! # Platform Capabilities
//!
//! Several native SDK features exist on only one host platform. Rather than
//! scattering `if platform == ...` checks through the facade, every such
//! feature is listed once in [`CAPABILITY_TABLE`] and checked with
//! [`require`] before a command is forwarded.
//!
//! | Capability | iOS | Android | Desktop |
//! |------------|-----|---------|---------|
//! | Foreground presentation options | ✅ | ❌ | ❌ |
//! | Autobadge | ✅ | ❌ | ❌ |
//! | Badge number | ✅ | ❌ | ❌ |
//! | Native listener bookkeeping | ❌ | ✅ | ❌ |

use std::fmt;

use bridge_traits::Platform;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// A platform-restricted feature of the native SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// Controlling how notifications are presented while the app is in the
    /// foreground.
    ForegroundPresentationOptions,
    Autobadge,
    BadgeNumber,
    /// The native module tracks how many JS listeners exist per event and
    /// must be told about every addition and removal.
    NativeListenerBookkeeping,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ForegroundPresentationOptions => "foreground presentation options",
            Capability::Autobadge => "autobadge",
            Capability::BadgeNumber => "badge number",
            Capability::NativeListenerBookkeeping => "native listener bookkeeping",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which platforms provide each capability.
pub const CAPABILITY_TABLE: &[(Capability, &[Platform])] = &[
    (Capability::ForegroundPresentationOptions, &[Platform::Ios]),
    (Capability::Autobadge, &[Platform::Ios]),
    (Capability::BadgeNumber, &[Platform::Ios]),
    (Capability::NativeListenerBookkeeping, &[Platform::Android]),
];

pub fn is_supported(capability: Capability, platform: Platform) -> bool {
    CAPABILITY_TABLE
        .iter()
        .find(|(entry, _)| *entry == capability)
        .map(|(_, platforms)| platforms.contains(&platform))
        .unwrap_or(false)
}

/// Returns [`Error::UnsupportedOnPlatform`] when `platform` lacks
/// `capability`. The rejection is logged at `warn`.
pub fn require(capability: Capability, platform: Platform) -> Result<()> {
    if is_supported(capability, platform) {
        return Ok(());
    }

    warn!(%capability, %platform, "Capability not supported on this platform");
    Err(Error::UnsupportedOnPlatform {
        capability,
        platform,
    })
}
