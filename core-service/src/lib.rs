//! Core service façade.
//!
//! [`AirshipService`] is the single entry point host applications use. It
//! wires a validated [`AirshipConfig`] into the shared Rust core:
//!
//! - every native SDK method is exposed as a typed method; void methods post
//!   a command, promise methods await and decode the native result
//! - tag group and attribute editors are handed out with sinks that post the
//!   compacted batch to the native module
//! - native events are routed through an owned [`EventDispatcher`]
//! - iOS-only methods are gated by the capability table and fail with
//!   `UnsupportedOnPlatform` elsewhere, without reaching the native module
//!
//! Desktop apps typically enable the `desktop-shims` feature, which supplies
//! an in-memory native module when none is configured.
//!
//! ```ignore
//! use core_runtime::config::AirshipConfig;
//! use core_service::AirshipService;
//!
//! let service = AirshipService::new(AirshipConfig::builder().build()?)?;
//! let mut editor = service.edit_channel_tag_groups();
//! editor.add_tags("loyalty", ["gold"])?;
//! editor.apply();
//! ```

pub mod custom_event;
pub mod error;
pub mod message_view;

pub use custom_event::CustomEvent;
pub use error::{Result, ServiceError};
pub use message_view::{MessageLoadError, MessageViewCallbacks, MessageViewEvent};

#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
pub use bridge_desktop::InMemoryNativeModule;

use std::sync::Arc;

use bridge_traits::{
    error::BridgeError,
    types::{ForegroundPresentationOptions, InboxMessage, NotificationConfigAndroid, PushReceivedEvent},
    AttributeOperation, NativeCommand, NativeModule, Platform, TagGroupOperation,
};
use core_editors::{AttributeEditor, TagGroupEditor};
use core_runtime::{
    capabilities::{self, Capability},
    config::AirshipConfig,
    events::{AirshipEvent, EventDispatcher, EventStream, EventType, Subscription},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::custom_event::ADD_CUSTOM_EVENT_ACTION;

/// Primary façade exposed to host applications.
///
/// Cheap to clone; clones share the native module and the dispatcher.
#[derive(Clone)]
pub struct AirshipService {
    config: Arc<AirshipConfig>,
    dispatcher: EventDispatcher,
}

impl AirshipService {
    /// Create a new service from the provided configuration.
    ///
    /// Posts the configured Android notification config and foreground
    /// presentation options to the native module.
    pub fn new(config: AirshipConfig) -> Result<Self> {
        config.validate()?;

        let dispatcher = EventDispatcher::new(
            config.platform,
            config.event_buffer_size,
            Some(Arc::clone(&config.native_module)),
        );
        let service = Self {
            config: Arc::new(config),
            dispatcher,
        };

        if let Some(android) = service.config.android_notification_config.clone() {
            service.post(NativeCommand::SetAndroidNotificationConfig(android));
        }
        if let Some(options) = service.config.foreground_presentation_options {
            service.post(NativeCommand::SetForegroundPresentationOptions(options));
        }

        info!(platform = %service.config.platform, "Airship service started");
        Ok(service)
    }

    /// Access the configuration being used by the service.
    pub fn config(&self) -> &AirshipConfig {
        &self.config
    }

    pub fn platform(&self) -> Platform {
        self.config.platform
    }

    /// Whether the current platform provides `capability`.
    pub fn supports(&self, capability: Capability) -> bool {
        capabilities::is_supported(capability, self.config.platform)
    }

    fn native(&self) -> &dyn NativeModule {
        self.config.native_module.as_ref()
    }

    fn post(&self, command: NativeCommand) {
        debug!(method = command.method(), "Posting native command");
        self.native().post(command);
    }

    async fn call<T: DeserializeOwned>(&self, command: NativeCommand) -> Result<T> {
        let method = command.method();
        debug!(method, "Calling native command");
        let value = self.native().call(command).await?;
        serde_json::from_value(value).map_err(|source| {
            warn!(method, error = %source, "Native command resolved with unexpected value");
            ServiceError::InvalidResponse {
                method: method.to_string(),
                source,
            }
        })
    }

    fn require(&self, capability: Capability) -> Result<()> {
        capabilities::require(capability, self.config.platform)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub fn set_android_notification_config(&self, config: NotificationConfigAndroid) {
        self.post(NativeCommand::SetAndroidNotificationConfig(config));
    }

    pub fn set_user_notifications_enabled(&self, enabled: bool) {
        self.post(NativeCommand::SetUserNotificationsEnabled(enabled));
    }

    pub async fn is_user_notifications_enabled(&self) -> Result<bool> {
        self.call(NativeCommand::IsUserNotificationsEnabled).await
    }

    /// Enables user notifications, prompting for permission where the
    /// platform requires it. Resolves to whether notifications are allowed.
    pub async fn enable_user_push_notifications(&self) -> Result<bool> {
        self.call(NativeCommand::EnableUserPushNotifications).await
    }

    pub async fn is_user_notifications_opted_in(&self) -> Result<bool> {
        self.call(NativeCommand::IsUserNotificationsOptedIn).await
    }

    /// iOS only.
    pub fn set_foreground_presentation_options(
        &self,
        options: ForegroundPresentationOptions,
    ) -> Result<()> {
        self.require(Capability::ForegroundPresentationOptions)?;
        self.post(NativeCommand::SetForegroundPresentationOptions(options));
        Ok(())
    }

    /// Notifications currently shown in the notification center.
    pub async fn get_active_notifications(&self) -> Result<Vec<PushReceivedEvent>> {
        self.call(NativeCommand::GetActiveNotifications).await
    }

    pub fn clear_notifications(&self) {
        self.post(NativeCommand::ClearNotifications);
    }

    /// Clears one notification by its `notification_id`.
    pub fn clear_notification(&self, identifier: impl Into<String>) {
        self.post(NativeCommand::ClearNotification(identifier.into()));
    }

    // ------------------------------------------------------------------
    // Privacy
    // ------------------------------------------------------------------

    pub fn set_data_collection_enabled(&self, enabled: bool) {
        self.post(NativeCommand::SetDataCollectionEnabled(enabled));
    }

    pub async fn is_data_collection_enabled(&self) -> Result<bool> {
        self.call(NativeCommand::IsDataCollectionEnabled).await
    }

    pub fn set_push_token_registration_enabled(&self, enabled: bool) {
        self.post(NativeCommand::SetPushTokenRegistrationEnabled(enabled));
    }

    pub async fn is_push_token_registration_enabled(&self) -> Result<bool> {
        self.call(NativeCommand::IsPushTokenRegistrationEnabled).await
    }

    pub fn set_analytics_enabled(&self, enabled: bool) {
        self.post(NativeCommand::SetAnalyticsEnabled(enabled));
    }

    pub async fn is_analytics_enabled(&self) -> Result<bool> {
        self.call(NativeCommand::IsAnalyticsEnabled).await
    }

    // ------------------------------------------------------------------
    // Channel
    // ------------------------------------------------------------------

    /// Creates the channel when the app was configured to delay it.
    pub fn enable_channel_creation(&self) {
        self.post(NativeCommand::EnableChannelCreation);
    }

    /// `None` until the channel has been created.
    pub async fn get_channel_id(&self) -> Result<Option<String>> {
        self.call(NativeCommand::GetChannelId).await
    }

    /// The APNs or FCM token, if registration has completed.
    pub async fn get_registration_token(&self) -> Result<Option<String>> {
        self.call(NativeCommand::GetRegistrationToken).await
    }

    pub fn add_tag(&self, tag: impl Into<String>) {
        self.post(NativeCommand::AddTag(tag.into()));
    }

    pub fn remove_tag(&self, tag: impl Into<String>) {
        self.post(NativeCommand::RemoveTag(tag.into()));
    }

    pub async fn get_tags(&self) -> Result<Vec<String>> {
        self.call(NativeCommand::GetTags).await
    }

    /// Associates the channel with a named user. `None` clears it.
    pub fn set_named_user(&self, named_user: Option<&str>) {
        self.post(NativeCommand::SetNamedUser(named_user.map(str::to_string)));
    }

    pub async fn get_named_user(&self) -> Result<Option<String>> {
        self.call(NativeCommand::GetNamedUser).await
    }

    /// Associates an identifier for the Connect data stream. `None` removes
    /// the association for `key`.
    pub fn associate_identifier(&self, key: impl Into<String>, id: Option<&str>) {
        self.post(NativeCommand::AssociateIdentifier {
            key: key.into(),
            id: id.map(str::to_string),
        });
    }

    // ------------------------------------------------------------------
    // Editors
    // ------------------------------------------------------------------

    pub fn edit_channel_tag_groups(&self) -> TagGroupEditor {
        let native = Arc::clone(&self.config.native_module);
        TagGroupEditor::new(move |operations: Vec<TagGroupOperation>| {
            forward_batch(native.as_ref(), NativeCommand::EditChannelTagGroups(operations));
        })
    }

    pub fn edit_named_user_tag_groups(&self) -> TagGroupEditor {
        let native = Arc::clone(&self.config.native_module);
        TagGroupEditor::new(move |operations: Vec<TagGroupOperation>| {
            forward_batch(native.as_ref(), NativeCommand::EditNamedUserTagGroups(operations));
        })
    }

    /// Attribute timestamps come from the configured clock.
    pub fn edit_channel_attributes(&self) -> AttributeEditor {
        let native = Arc::clone(&self.config.native_module);
        AttributeEditor::with_clock(
            Arc::clone(&self.config.clock),
            move |operations: Vec<AttributeOperation>| {
                forward_batch(native.as_ref(), NativeCommand::EditChannelAttributes(operations));
            },
        )
    }

    pub fn edit_named_user_attributes(&self) -> AttributeEditor {
        let native = Arc::clone(&self.config.native_module);
        AttributeEditor::with_clock(
            Arc::clone(&self.config.clock),
            move |operations: Vec<AttributeOperation>| {
                forward_batch(
                    native.as_ref(),
                    NativeCommand::EditNamedUserAttributes(operations),
                );
            },
        )
    }

    // ------------------------------------------------------------------
    // Analytics and actions
    // ------------------------------------------------------------------

    pub fn track_screen(&self, screen: impl Into<String>) {
        self.post(NativeCommand::TrackScreen(screen.into()));
    }

    /// Records a custom event through the native custom event action.
    pub async fn add_custom_event(&self, event: &CustomEvent) -> Result<()> {
        if event.name().trim().is_empty() {
            warn!("Rejected custom event without a name");
            return Err(ServiceError::ActionRejected(
                "custom event name must not be empty".to_string(),
            ));
        }

        self.run_action(ADD_CUSTOM_EVENT_ACTION, Some(event.to_action_value()))
            .await?;
        Ok(())
    }

    /// Runs a native action and returns its result value.
    ///
    /// A native rejection (unknown action, rejected argument) is reported as
    /// [`ServiceError::ActionRejected`].
    pub async fn run_action(&self, name: &str, value: Option<Value>) -> Result<Value> {
        let command = NativeCommand::RunAction {
            name: name.to_string(),
            value,
        };
        debug!(action = name, "Running native action");
        match self.native().call(command).await {
            Ok(result) => Ok(result),
            Err(BridgeError::Rejected { code, message }) => {
                warn!(action = name, %code, "Native action rejected");
                Err(ServiceError::ActionRejected(format!(
                    "{} ({}): {}",
                    name, code, message
                )))
            }
            Err(err) => Err(err.into()),
        }
    }

    // ------------------------------------------------------------------
    // Badging (iOS)
    // ------------------------------------------------------------------

    pub fn set_autobadge_enabled(&self, enabled: bool) -> Result<()> {
        self.require(Capability::Autobadge)?;
        self.post(NativeCommand::SetAutobadgeEnabled(enabled));
        Ok(())
    }

    pub async fn is_autobadge_enabled(&self) -> Result<bool> {
        self.require(Capability::Autobadge)?;
        self.call(NativeCommand::IsAutobadgeEnabled).await
    }

    pub fn set_badge_number(&self, badge_number: i64) -> Result<()> {
        self.require(Capability::BadgeNumber)?;
        self.post(NativeCommand::SetBadgeNumber(badge_number));
        Ok(())
    }

    pub async fn get_badge_number(&self) -> Result<i64> {
        self.require(Capability::BadgeNumber)?;
        self.call(NativeCommand::GetBadgeNumber).await
    }

    // ------------------------------------------------------------------
    // Message center
    // ------------------------------------------------------------------

    pub fn display_message_center(&self) {
        self.post(NativeCommand::DisplayMessageCenter);
    }

    pub fn dismiss_message_center(&self) {
        self.post(NativeCommand::DismissMessageCenter);
    }

    /// Displays an inbox message in the native message view.
    pub async fn display_message(&self, message_id: impl Into<String>) -> Result<bool> {
        self.call(NativeCommand::DisplayMessage(message_id.into()))
            .await
    }

    pub fn dismiss_message(&self) {
        self.post(NativeCommand::DismissMessage);
    }

    /// Messages currently in the inbox, deleted ones excluded.
    pub async fn get_inbox_messages(&self) -> Result<Vec<InboxMessage>> {
        self.call(NativeCommand::GetInboxMessages).await
    }

    pub async fn delete_inbox_message(&self, message_id: impl Into<String>) -> Result<bool> {
        self.call(NativeCommand::DeleteInboxMessage(message_id.into()))
            .await
    }

    pub async fn mark_inbox_message_read(&self, message_id: impl Into<String>) -> Result<bool> {
        self.call(NativeCommand::MarkInboxMessageRead(message_id.into()))
            .await
    }

    /// Forces an inbox refresh. Resolves once the native side has finished.
    pub async fn refresh_inbox(&self) -> Result<bool> {
        self.call(NativeCommand::RefreshInbox).await
    }

    /// When disabled, `showInbox` events are left to the app instead of
    /// opening the default message center.
    pub fn set_auto_launch_default_message_center(&self, enabled: bool) {
        self.post(NativeCommand::SetAutoLaunchDefaultMessageCenter(enabled));
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_listener<F>(&self, event_type: EventType, listener: F) -> Subscription
    where
        F: Fn(&AirshipEvent) + Send + Sync + 'static,
    {
        self.dispatcher.add_listener(event_type, listener)
    }

    pub fn remove_subscription(&self, subscription: &Subscription) -> bool {
        self.dispatcher.remove_subscription(subscription)
    }

    pub fn remove_all_listeners(&self, event_type: EventType) -> usize {
        self.dispatcher.remove_all_listeners(event_type)
    }

    /// Stream of every event dispatched after this call.
    pub fn subscribe(&self) -> EventStream {
        self.dispatcher.subscribe()
    }

    /// Entry point for events emitted by the native module.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch_native_event(&self, wire_name: &str, body: Value) -> Result<usize> {
        Ok(self.dispatcher.dispatch(wire_name, body)?)
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }
}

impl std::fmt::Debug for AirshipService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirshipService")
            .field("config", &self.config)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

fn forward_batch(native: &dyn NativeModule, command: NativeCommand) {
    debug!(method = command.method(), "Posting editor batch");
    native.post(command);
}
