//! Data transfer types exchanged with the native SDK.
//!
//! Field names follow the camelCase names the native modules emit.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Message center inbox message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxMessage {
    /// Needed to display, mark as read, or delete the message.
    pub id: String,
    pub title: String,
    /// Sent date in milliseconds since the epoch.
    pub sent_date: i64,
    #[serde(default)]
    pub list_icon_url: Option<String>,
    pub is_read: bool,
    pub is_deleted: bool,
    #[serde(default)]
    pub extras: HashMap<String, String>,
}

/// A received push notification.
///
/// Also returned by `getActiveNotifications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushReceivedEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub notification_id: String,
    #[serde(default)]
    pub extras: Map<String, Value>,
}

/// Android notification config. Unset values fall back to the values in the
/// Airship config options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfigAndroid {
    /// Icon resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Large icon resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_icon: Option<String>,
    /// Default notification channel ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_channel_id: Option<String>,
}

/// Foreground presentation options (iOS). `None` leaves the option as the
/// native SDK has it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForegroundPresentationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<bool>,
}

/// Authorized notification settings reported with opt-in status changes (iOS).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorizedNotificationSettings {
    pub alert: bool,
    pub sound: bool,
    pub badge: bool,
    pub car_play: bool,
    pub lock_screen: bool,
    pub notification_center: bool,
}
