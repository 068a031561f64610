//! Native SDK Command Interface
//!
//! The native push SDK is reached only through [`NativeModule`], an opaque
//! asynchronous command interface. Each [`NativeCommand`] corresponds to one
//! function exported by the platform module; the bridge never interprets what
//! the native side does with it.
//!
//! Commands serialize as `{ "method": "<name>", "args": <payload> }`, the
//! shape hosts marshal across the JS/JNI/ObjC boundary.

use serde::Serialize;
use serde_json::Value;

use crate::{
    error::Result,
    operations::{AttributeOperation, TagGroupOperation},
    platform::PlatformSendSync,
    types::{ForegroundPresentationOptions, NotificationConfigAndroid},
};

/// A single call into the native module.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", content = "args", rename_all = "camelCase")]
pub enum NativeCommand {
    SetAndroidNotificationConfig(NotificationConfigAndroid),
    SetUserNotificationsEnabled(bool),
    IsUserNotificationsEnabled,
    SetDataCollectionEnabled(bool),
    IsDataCollectionEnabled,
    SetPushTokenRegistrationEnabled(bool),
    IsPushTokenRegistrationEnabled,
    EnableUserPushNotifications,
    EnableChannelCreation,
    IsUserNotificationsOptedIn,
    /// `None` clears the named user.
    SetNamedUser(Option<String>),
    GetNamedUser,
    AddTag(String),
    RemoveTag(String),
    GetTags,
    EditNamedUserTagGroups(Vec<TagGroupOperation>),
    EditChannelTagGroups(Vec<TagGroupOperation>),
    EditChannelAttributes(Vec<AttributeOperation>),
    EditNamedUserAttributes(Vec<AttributeOperation>),
    SetAnalyticsEnabled(bool),
    IsAnalyticsEnabled,
    TrackScreen(String),
    GetChannelId,
    GetRegistrationToken,
    AssociateIdentifier {
        key: String,
        id: Option<String>,
    },
    RunAction {
        name: String,
        value: Option<Value>,
    },
    SetForegroundPresentationOptions(ForegroundPresentationOptions),
    /// Tells the Android module a JS listener exists for the wire event name.
    AddAndroidListener(String),
    /// Tells the Android module `count` listeners went away.
    RemoveAndroidListeners(u32),
    SetAutobadgeEnabled(bool),
    IsAutobadgeEnabled,
    SetBadgeNumber(i64),
    GetBadgeNumber,
    DisplayMessageCenter,
    DismissMessageCenter,
    DisplayMessage(String),
    DismissMessage,
    GetInboxMessages,
    DeleteInboxMessage(String),
    MarkInboxMessageRead(String),
    RefreshInbox,
    SetAutoLaunchDefaultMessageCenter(bool),
    GetActiveNotifications,
    ClearNotifications,
    ClearNotification(String),
}

impl NativeCommand {
    /// Native method name, identical to the serialized `method` tag.
    pub fn method(&self) -> &'static str {
        match self {
            NativeCommand::SetAndroidNotificationConfig(_) => "setAndroidNotificationConfig",
            NativeCommand::SetUserNotificationsEnabled(_) => "setUserNotificationsEnabled",
            NativeCommand::IsUserNotificationsEnabled => "isUserNotificationsEnabled",
            NativeCommand::SetDataCollectionEnabled(_) => "setDataCollectionEnabled",
            NativeCommand::IsDataCollectionEnabled => "isDataCollectionEnabled",
            NativeCommand::SetPushTokenRegistrationEnabled(_) => "setPushTokenRegistrationEnabled",
            NativeCommand::IsPushTokenRegistrationEnabled => "isPushTokenRegistrationEnabled",
            NativeCommand::EnableUserPushNotifications => "enableUserPushNotifications",
            NativeCommand::EnableChannelCreation => "enableChannelCreation",
            NativeCommand::IsUserNotificationsOptedIn => "isUserNotificationsOptedIn",
            NativeCommand::SetNamedUser(_) => "setNamedUser",
            NativeCommand::GetNamedUser => "getNamedUser",
            NativeCommand::AddTag(_) => "addTag",
            NativeCommand::RemoveTag(_) => "removeTag",
            NativeCommand::GetTags => "getTags",
            NativeCommand::EditNamedUserTagGroups(_) => "editNamedUserTagGroups",
            NativeCommand::EditChannelTagGroups(_) => "editChannelTagGroups",
            NativeCommand::EditChannelAttributes(_) => "editChannelAttributes",
            NativeCommand::EditNamedUserAttributes(_) => "editNamedUserAttributes",
            NativeCommand::SetAnalyticsEnabled(_) => "setAnalyticsEnabled",
            NativeCommand::IsAnalyticsEnabled => "isAnalyticsEnabled",
            NativeCommand::TrackScreen(_) => "trackScreen",
            NativeCommand::GetChannelId => "getChannelId",
            NativeCommand::GetRegistrationToken => "getRegistrationToken",
            NativeCommand::AssociateIdentifier { .. } => "associateIdentifier",
            NativeCommand::RunAction { .. } => "runAction",
            NativeCommand::SetForegroundPresentationOptions(_) => {
                "setForegroundPresentationOptions"
            }
            NativeCommand::AddAndroidListener(_) => "addAndroidListener",
            NativeCommand::RemoveAndroidListeners(_) => "removeAndroidListeners",
            NativeCommand::SetAutobadgeEnabled(_) => "setAutobadgeEnabled",
            NativeCommand::IsAutobadgeEnabled => "isAutobadgeEnabled",
            NativeCommand::SetBadgeNumber(_) => "setBadgeNumber",
            NativeCommand::GetBadgeNumber => "getBadgeNumber",
            NativeCommand::DisplayMessageCenter => "displayMessageCenter",
            NativeCommand::DismissMessageCenter => "dismissMessageCenter",
            NativeCommand::DisplayMessage(_) => "displayMessage",
            NativeCommand::DismissMessage => "dismissMessage",
            NativeCommand::GetInboxMessages => "getInboxMessages",
            NativeCommand::DeleteInboxMessage(_) => "deleteInboxMessage",
            NativeCommand::MarkInboxMessageRead(_) => "markInboxMessageRead",
            NativeCommand::RefreshInbox => "refreshInbox",
            NativeCommand::SetAutoLaunchDefaultMessageCenter(_) => {
                "setAutoLaunchDefaultMessageCenter"
            }
            NativeCommand::GetActiveNotifications => "getActiveNotifications",
            NativeCommand::ClearNotifications => "clearNotifications",
            NativeCommand::ClearNotification(_) => "clearNotification",
        }
    }

    /// Serialize to the `{ method, args }` envelope.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Native module trait
///
/// Implemented by each host (iOS via ObjC glue, Android via JNI glue, the
/// desktop shim for CI). The bridge forwards commands verbatim and hands
/// results back undecoded; decoding happens in the facade.
///
/// # Platform Support
///
/// - **iOS**: `UARCTModule` exported methods
/// - **Android**: `UrbanAirshipReactModule` methods
/// - **Desktop**: `bridge_desktop::InMemoryNativeModule`
///
/// # Example
///
/// ```ignore
/// use bridge_traits::native::{NativeCommand, NativeModule};
///
/// async fn channel_id(module: &dyn NativeModule) -> Option<String> {
///     let value = module.call(NativeCommand::GetChannelId).await.ok()?;
///     value.as_str().map(str::to_string)
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait NativeModule: PlatformSendSync {
    /// Invoke a promise-returning native method and wait for its result.
    async fn call(&self, command: NativeCommand) -> Result<Value>;

    /// Invoke a void native method without waiting for completion.
    ///
    /// Implementations must not block; failures are the native layer's to
    /// report.
    fn post(&self, command: NativeCommand);
}
