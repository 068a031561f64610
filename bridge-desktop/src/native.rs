//! In-memory native SDK simulation

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    native::{NativeCommand, NativeModule},
    operations::{
        AttributeOperation, AttributeOperationType, AttributeValue, TagGroupOperation,
        TagOperationType,
    },
    types::{ForegroundPresentationOptions, InboxMessage, NotificationConfigAndroid, PushReceivedEvent},
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

/// Most recent commands kept for inspection; older ones are dropped.
pub const COMMAND_LOG_CAPACITY: usize = 256;

/// Actions the simulated action registry knows about.
const KNOWN_ACTIONS: &[&str] = &[
    "add_custom_event_action",
    "add_tags_action",
    "remove_tags_action",
    "deep_link_action",
    "open_external_url_action",
];

#[derive(Debug, Clone, PartialEq)]
struct StoredAttribute {
    value: AttributeValue,
    timestamp: DateTime<Utc>,
}

#[derive(Debug)]
struct NativeState {
    user_notifications_enabled: bool,
    data_collection_enabled: bool,
    push_token_registration_enabled: bool,
    analytics_enabled: bool,
    channel_id: Option<String>,
    registration_token: Option<String>,
    named_user: Option<String>,
    tags: BTreeSet<String>,
    channel_tag_groups: HashMap<String, BTreeSet<String>>,
    named_user_tag_groups: HashMap<String, BTreeSet<String>>,
    channel_attributes: HashMap<String, StoredAttribute>,
    named_user_attributes: HashMap<String, StoredAttribute>,
    /// Latest removal time per key, so an older set cannot resurrect it.
    channel_attribute_tombstones: HashMap<String, DateTime<Utc>>,
    named_user_attribute_tombstones: HashMap<String, DateTime<Utc>>,
    associated_identifiers: HashMap<String, String>,
    tracked_screens: Vec<String>,
    custom_events: Vec<Value>,
    android_notification_config: Option<NotificationConfigAndroid>,
    foreground_presentation_options: Option<ForegroundPresentationOptions>,
    autobadge_enabled: bool,
    badge_number: i64,
    android_listener_count: i64,
    inbox: Vec<InboxMessage>,
    message_center_visible: bool,
    displayed_message: Option<String>,
    auto_launch_message_center: bool,
    active_notifications: Vec<PushReceivedEvent>,
    commands: VecDeque<NativeCommand>,
}

impl Default for NativeState {
    fn default() -> Self {
        Self {
            user_notifications_enabled: false,
            data_collection_enabled: true,
            push_token_registration_enabled: true,
            analytics_enabled: true,
            channel_id: Some(Uuid::new_v4().to_string()),
            registration_token: None,
            named_user: None,
            tags: BTreeSet::new(),
            channel_tag_groups: HashMap::new(),
            named_user_tag_groups: HashMap::new(),
            channel_attributes: HashMap::new(),
            named_user_attributes: HashMap::new(),
            channel_attribute_tombstones: HashMap::new(),
            named_user_attribute_tombstones: HashMap::new(),
            associated_identifiers: HashMap::new(),
            tracked_screens: Vec::new(),
            custom_events: Vec::new(),
            android_notification_config: None,
            foreground_presentation_options: None,
            autobadge_enabled: false,
            badge_number: 0,
            android_listener_count: 0,
            inbox: Vec::new(),
            message_center_visible: false,
            displayed_message: None,
            auto_launch_message_center: true,
            active_notifications: Vec::new(),
            commands: VecDeque::with_capacity(COMMAND_LOG_CAPACITY),
        }
    }
}

/// Native module that keeps SDK state in memory
///
/// Stands in for the iOS/Android Airship module on desktop and in tests:
/// - The last [`COMMAND_LOG_CAPACITY`] commands are kept in arrival order
/// - Tag groups and attributes are applied the way the native SDK applies
///   them (attributes resolve conflicts by timestamp)
/// - Inbox messages and active notifications can be seeded
///
/// No network traffic, push delivery or UI takes place.
#[derive(Debug, Default)]
pub struct InMemoryNativeModule {
    state: Mutex<NativeState>,
}

impl InMemoryNativeModule {
    /// Create a module with a freshly generated channel id
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a module whose channel only exists after
    /// `enableChannelCreation`
    pub fn with_delayed_channel_creation() -> Self {
        let module = Self::new();
        module.state().channel_id = None;
        module
    }

    fn state(&self) -> MutexGuard<'_, NativeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_registration_token(&self, token: impl Into<String>) {
        self.state().registration_token = Some(token.into());
    }

    pub fn add_inbox_message(&self, message: InboxMessage) {
        self.state().inbox.push(message);
    }

    pub fn add_active_notification(&self, notification: PushReceivedEvent) {
        self.state().active_notifications.push(notification);
    }

    /// Most recent commands, oldest first
    pub fn commands(&self) -> Vec<NativeCommand> {
        self.state().commands.iter().cloned().collect()
    }

    pub fn channel_id(&self) -> Option<String> {
        self.state().channel_id.clone()
    }

    pub fn tags(&self) -> BTreeSet<String> {
        self.state().tags.clone()
    }

    pub fn channel_tag_group(&self, group: &str) -> BTreeSet<String> {
        self.state()
            .channel_tag_groups
            .get(group)
            .cloned()
            .unwrap_or_default()
    }

    pub fn named_user_tag_group(&self, group: &str) -> BTreeSet<String> {
        self.state()
            .named_user_tag_groups
            .get(group)
            .cloned()
            .unwrap_or_default()
    }

    pub fn channel_attribute(&self, key: &str) -> Option<AttributeValue> {
        self.state()
            .channel_attributes
            .get(key)
            .map(|stored| stored.value.clone())
    }

    pub fn named_user_attribute(&self, key: &str) -> Option<AttributeValue> {
        self.state()
            .named_user_attributes
            .get(key)
            .map(|stored| stored.value.clone())
    }

    pub fn associated_identifier(&self, key: &str) -> Option<String> {
        self.state().associated_identifiers.get(key).cloned()
    }

    pub fn tracked_screens(&self) -> Vec<String> {
        self.state().tracked_screens.clone()
    }

    /// Arguments of every `add_custom_event_action` run
    pub fn custom_events(&self) -> Vec<Value> {
        self.state().custom_events.clone()
    }

    /// Listener count the module believes the JS side holds
    pub fn android_listener_count(&self) -> i64 {
        self.state().android_listener_count
    }

    pub fn android_notification_config(&self) -> Option<NotificationConfigAndroid> {
        self.state().android_notification_config.clone()
    }

    pub fn foreground_presentation_options(&self) -> Option<ForegroundPresentationOptions> {
        self.state().foreground_presentation_options
    }

    pub fn is_message_center_visible(&self) -> bool {
        self.state().message_center_visible
    }

    pub fn displayed_message(&self) -> Option<String> {
        self.state().displayed_message.clone()
    }

    pub fn auto_launch_message_center(&self) -> bool {
        self.state().auto_launch_message_center
    }

    fn execute(&self, command: NativeCommand) -> Result<Value> {
        let mut state = self.state();
        if state.commands.len() == COMMAND_LOG_CAPACITY {
            state.commands.pop_front();
        }
        state.commands.push_back(command.clone());
        debug!(method = command.method(), "In-memory native command");

        let result = match command {
            NativeCommand::SetAndroidNotificationConfig(config) => {
                state.android_notification_config = Some(config);
                Value::Null
            }
            NativeCommand::SetUserNotificationsEnabled(enabled) => {
                state.user_notifications_enabled = enabled;
                Value::Null
            }
            NativeCommand::IsUserNotificationsEnabled => json!(state.user_notifications_enabled),
            NativeCommand::SetDataCollectionEnabled(enabled) => {
                state.data_collection_enabled = enabled;
                if !enabled {
                    // Disabling data collection wipes collected identity.
                    state.named_user = None;
                    state.tags.clear();
                    state.channel_tag_groups.clear();
                    state.channel_attributes.clear();
                    state.associated_identifiers.clear();
                }
                Value::Null
            }
            NativeCommand::IsDataCollectionEnabled => json!(state.data_collection_enabled),
            NativeCommand::SetPushTokenRegistrationEnabled(enabled) => {
                state.push_token_registration_enabled = enabled;
                Value::Null
            }
            NativeCommand::IsPushTokenRegistrationEnabled => {
                json!(state.push_token_registration_enabled)
            }
            NativeCommand::EnableUserPushNotifications => {
                state.user_notifications_enabled = true;
                json!(true)
            }
            NativeCommand::EnableChannelCreation => {
                if state.channel_id.is_none() {
                    state.channel_id = Some(Uuid::new_v4().to_string());
                }
                Value::Null
            }
            NativeCommand::IsUserNotificationsOptedIn => {
                json!(state.user_notifications_enabled && state.channel_id.is_some())
            }
            NativeCommand::SetNamedUser(named_user) => {
                let named_user = named_user.filter(|id| !id.trim().is_empty());
                if state.named_user != named_user {
                    state.named_user_tag_groups.clear();
                    state.named_user_attributes.clear();
                    state.named_user_attribute_tombstones.clear();
                }
                state.named_user = named_user;
                Value::Null
            }
            NativeCommand::GetNamedUser => json!(state.named_user),
            NativeCommand::AddTag(tag) => {
                state.tags.insert(tag);
                Value::Null
            }
            NativeCommand::RemoveTag(tag) => {
                state.tags.remove(&tag);
                Value::Null
            }
            NativeCommand::GetTags => json!(state.tags),
            NativeCommand::EditChannelTagGroups(operations) => {
                apply_tag_operations(&mut state.channel_tag_groups, &operations);
                Value::Null
            }
            NativeCommand::EditNamedUserTagGroups(operations) => {
                if state.named_user.is_none() {
                    return Err(BridgeError::NotAvailable(
                        "named user tag groups require a named user".to_string(),
                    ));
                }
                apply_tag_operations(&mut state.named_user_tag_groups, &operations);
                Value::Null
            }
            NativeCommand::EditChannelAttributes(operations) => {
                let NativeState {
                    channel_attributes,
                    channel_attribute_tombstones,
                    ..
                } = &mut *state;
                apply_attribute_operations(
                    channel_attributes,
                    channel_attribute_tombstones,
                    &operations,
                );
                Value::Null
            }
            NativeCommand::EditNamedUserAttributes(operations) => {
                if state.named_user.is_none() {
                    return Err(BridgeError::NotAvailable(
                        "named user attributes require a named user".to_string(),
                    ));
                }
                let NativeState {
                    named_user_attributes,
                    named_user_attribute_tombstones,
                    ..
                } = &mut *state;
                apply_attribute_operations(
                    named_user_attributes,
                    named_user_attribute_tombstones,
                    &operations,
                );
                Value::Null
            }
            NativeCommand::SetAnalyticsEnabled(enabled) => {
                state.analytics_enabled = enabled;
                Value::Null
            }
            NativeCommand::IsAnalyticsEnabled => json!(state.analytics_enabled),
            NativeCommand::TrackScreen(screen) => {
                if state.analytics_enabled {
                    state.tracked_screens.push(screen);
                }
                Value::Null
            }
            NativeCommand::GetChannelId => json!(state.channel_id),
            NativeCommand::GetRegistrationToken => {
                if state.push_token_registration_enabled {
                    json!(state.registration_token)
                } else {
                    Value::Null
                }
            }
            NativeCommand::AssociateIdentifier { key, id } => {
                match id {
                    Some(id) => state.associated_identifiers.insert(key, id),
                    None => state.associated_identifiers.remove(&key),
                };
                Value::Null
            }
            NativeCommand::RunAction { name, value } => run_action(&mut state, &name, value)?,
            NativeCommand::SetForegroundPresentationOptions(options) => {
                state.foreground_presentation_options = Some(options);
                Value::Null
            }
            NativeCommand::AddAndroidListener(_) => {
                state.android_listener_count += 1;
                Value::Null
            }
            NativeCommand::RemoveAndroidListeners(count) => {
                state.android_listener_count =
                    (state.android_listener_count - i64::from(count)).max(0);
                Value::Null
            }
            NativeCommand::SetAutobadgeEnabled(enabled) => {
                state.autobadge_enabled = enabled;
                Value::Null
            }
            NativeCommand::IsAutobadgeEnabled => json!(state.autobadge_enabled),
            NativeCommand::SetBadgeNumber(number) => {
                state.badge_number = number;
                Value::Null
            }
            NativeCommand::GetBadgeNumber => json!(state.badge_number),
            NativeCommand::DisplayMessageCenter => {
                state.message_center_visible = true;
                Value::Null
            }
            NativeCommand::DismissMessageCenter => {
                state.message_center_visible = false;
                Value::Null
            }
            NativeCommand::DisplayMessage(message_id) => {
                let message = state
                    .inbox
                    .iter_mut()
                    .find(|message| message.id == message_id && !message.is_deleted)
                    .ok_or_else(|| {
                        BridgeError::rejected(
                            "MESSAGE_NOT_AVAILABLE",
                            format!("Message {} is not available", message_id),
                        )
                    })?;
                message.is_read = true;
                state.displayed_message = Some(message_id);
                json!(true)
            }
            NativeCommand::DismissMessage => {
                state.displayed_message = None;
                Value::Null
            }
            NativeCommand::GetInboxMessages => {
                let visible: Vec<&InboxMessage> =
                    state.inbox.iter().filter(|message| !message.is_deleted).collect();
                serde_json::to_value(visible)?
            }
            NativeCommand::DeleteInboxMessage(message_id) => {
                let message = find_message(&mut state.inbox, &message_id)?;
                message.is_deleted = true;
                json!(true)
            }
            NativeCommand::MarkInboxMessageRead(message_id) => {
                let message = find_message(&mut state.inbox, &message_id)?;
                message.is_read = true;
                json!(true)
            }
            NativeCommand::RefreshInbox => json!(true),
            NativeCommand::SetAutoLaunchDefaultMessageCenter(enabled) => {
                state.auto_launch_message_center = enabled;
                Value::Null
            }
            NativeCommand::GetActiveNotifications => {
                serde_json::to_value(&state.active_notifications)?
            }
            NativeCommand::ClearNotifications => {
                state.active_notifications.clear();
                Value::Null
            }
            NativeCommand::ClearNotification(identifier) => {
                state
                    .active_notifications
                    .retain(|notification| notification.notification_id != identifier);
                Value::Null
            }
        };

        Ok(result)
    }
}

#[async_trait]
impl NativeModule for InMemoryNativeModule {
    async fn call(&self, command: NativeCommand) -> Result<Value> {
        self.execute(command)
    }

    fn post(&self, command: NativeCommand) {
        let method = command.method();
        if let Err(err) = self.execute(command) {
            warn!(method, error = %err, "In-memory native command failed");
        }
    }
}

fn find_message<'a>(inbox: &'a mut [InboxMessage], message_id: &str) -> Result<&'a mut InboxMessage> {
    inbox
        .iter_mut()
        .find(|message| message.id == message_id && !message.is_deleted)
        .ok_or_else(|| {
            BridgeError::rejected(
                "MESSAGE_NOT_FOUND",
                format!("Message {} not found", message_id),
            )
        })
}

fn apply_tag_operations(
    groups: &mut HashMap<String, BTreeSet<String>>,
    operations: &[TagGroupOperation],
) {
    for operation in operations {
        let group = groups.entry(operation.group.clone()).or_default();
        for tag in &operation.tags {
            match operation.operation_type {
                TagOperationType::Add => group.insert(tag.clone()),
                TagOperationType::Remove => group.remove(tag),
            };
        }
    }
    groups.retain(|_, tags| !tags.is_empty());
}

fn apply_attribute_operations(
    attributes: &mut HashMap<String, StoredAttribute>,
    tombstones: &mut HashMap<String, DateTime<Utc>>,
    operations: &[AttributeOperation],
) {
    for operation in operations {
        let latest = attributes
            .get(&operation.key)
            .map(|stored| stored.timestamp)
            .into_iter()
            .chain(tombstones.get(&operation.key).copied())
            .max();
        if latest.is_some_and(|latest| operation.timestamp < latest) {
            debug!(key = %operation.key, "Ignoring stale attribute operation");
            continue;
        }

        match (operation.operation_type, &operation.value) {
            (AttributeOperationType::Set, Some(value)) => {
                tombstones.remove(&operation.key);
                attributes.insert(
                    operation.key.clone(),
                    StoredAttribute {
                        value: value.clone(),
                        timestamp: operation.timestamp,
                    },
                );
            }
            (AttributeOperationType::Set, None) => {
                warn!(key = %operation.key, "Attribute set without a value");
            }
            (AttributeOperationType::Remove, _) => {
                attributes.remove(&operation.key);
                tombstones.insert(operation.key.clone(), operation.timestamp);
            }
        }
    }
}

fn run_action(state: &mut NativeState, name: &str, value: Option<Value>) -> Result<Value> {
    if !KNOWN_ACTIONS.contains(&name) {
        return Err(BridgeError::rejected(
            "ACTION_NOT_FOUND",
            format!("Action {} not found", name),
        ));
    }

    match name {
        "add_custom_event_action" => {
            let args = value.unwrap_or(Value::Null);
            let has_name = args
                .get("event_name")
                .and_then(Value::as_str)
                .is_some_and(|name| !name.is_empty());
            if !has_name {
                return Err(BridgeError::rejected(
                    "ACTION_REJECTED",
                    "Custom event requires an event_name",
                ));
            }
            if state.analytics_enabled {
                state.custom_events.push(args);
            }
            Ok(Value::Null)
        }
        "add_tags_action" | "remove_tags_action" => {
            let tags: Vec<String> = match value {
                Some(Value::String(tag)) => vec![tag],
                Some(value) => serde_json::from_value(value)?,
                None => Vec::new(),
            };
            for tag in tags {
                if name == "add_tags_action" {
                    state.tags.insert(tag);
                } else {
                    state.tags.remove(&tag);
                }
            }
            Ok(Value::Null)
        }
        _ => Ok(value.unwrap_or(Value::Null)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn inbox_message(id: &str) -> InboxMessage {
        InboxMessage {
            id: id.to_string(),
            title: format!("Message {}", id),
            sent_date: 1_700_000_000_000,
            list_icon_url: None,
            is_read: false,
            is_deleted: false,
            extras: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_records_commands_in_order() {
        let module = InMemoryNativeModule::new();
        module.post(NativeCommand::AddTag("a".to_string()));
        module.call(NativeCommand::GetTags).await.unwrap();

        assert_eq!(
            module.commands(),
            vec![NativeCommand::AddTag("a".to_string()), NativeCommand::GetTags]
        );
    }

    #[test]
    fn test_command_log_is_bounded() {
        let module = InMemoryNativeModule::new();
        for badge in 0..(COMMAND_LOG_CAPACITY as i64 + 10) {
            module.post(NativeCommand::SetBadgeNumber(badge));
        }

        let commands = module.commands();
        assert_eq!(commands.len(), COMMAND_LOG_CAPACITY);
        assert_eq!(commands[0], NativeCommand::SetBadgeNumber(10));
        assert_eq!(
            commands.last(),
            Some(&NativeCommand::SetBadgeNumber(COMMAND_LOG_CAPACITY as i64 + 9))
        );
    }

    #[tokio::test]
    async fn test_tags_round_trip() {
        let module = InMemoryNativeModule::new();
        module.post(NativeCommand::AddTag("b".to_string()));
        module.post(NativeCommand::AddTag("a".to_string()));
        module.post(NativeCommand::RemoveTag("b".to_string()));

        let tags = module.call(NativeCommand::GetTags).await.unwrap();
        assert_eq!(tags, json!(["a"]));
    }

    #[tokio::test]
    async fn test_channel_creation_can_be_delayed() {
        let module = InMemoryNativeModule::with_delayed_channel_creation();
        assert_eq!(module.call(NativeCommand::GetChannelId).await.unwrap(), Value::Null);

        module.post(NativeCommand::EnableChannelCreation);
        let channel = module.call(NativeCommand::GetChannelId).await.unwrap();
        assert!(channel.as_str().is_some());
    }

    #[test]
    fn test_tag_group_operations_apply_in_order() {
        let module = InMemoryNativeModule::new();
        module.post(NativeCommand::EditChannelTagGroups(vec![
            TagGroupOperation::add("vip", vec!["a".to_string(), "b".to_string()]),
            TagGroupOperation::remove("vip", vec!["b".to_string()]),
        ]));

        assert_eq!(
            module.channel_tag_group("vip"),
            BTreeSet::from(["a".to_string()])
        );
    }

    #[tokio::test]
    async fn test_named_user_edits_require_named_user() {
        let module = InMemoryNativeModule::new();
        let err = module
            .call(NativeCommand::EditNamedUserTagGroups(vec![TagGroupOperation::add(
                "g",
                vec!["x".to_string()],
            )]))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::NotAvailable(_)));

        module.post(NativeCommand::SetNamedUser(Some("ada".to_string())));
        module
            .call(NativeCommand::EditNamedUserTagGroups(vec![TagGroupOperation::add(
                "g",
                vec!["x".to_string()],
            )]))
            .await
            .unwrap();
        assert_eq!(module.named_user_tag_group("g").len(), 1);
    }

    #[test]
    fn test_changing_named_user_clears_its_data() {
        let module = InMemoryNativeModule::new();
        module.post(NativeCommand::SetNamedUser(Some("ada".to_string())));
        module.post(NativeCommand::EditNamedUserAttributes(vec![AttributeOperation::set(
            "tier",
            AttributeValue::from("gold"),
            at(0),
        )]));
        assert!(module.named_user_attribute("tier").is_some());

        module.post(NativeCommand::SetNamedUser(None));
        assert!(module.named_user_attribute("tier").is_none());
    }

    #[test]
    fn test_attributes_resolve_by_timestamp() {
        let module = InMemoryNativeModule::new();
        module.post(NativeCommand::EditChannelAttributes(vec![AttributeOperation::set(
            "age",
            AttributeValue::from(31),
            at(10),
        )]));
        // An older write arriving late does not win.
        module.post(NativeCommand::EditChannelAttributes(vec![AttributeOperation::set(
            "age",
            AttributeValue::from(30),
            at(5),
        )]));
        assert_eq!(
            module.channel_attribute("age"),
            Some(AttributeValue::Number(31.0))
        );

        module.post(NativeCommand::EditChannelAttributes(vec![AttributeOperation::remove(
            "age",
            at(20),
        )]));
        module.post(NativeCommand::EditChannelAttributes(vec![AttributeOperation::set(
            "age",
            AttributeValue::from(29),
            at(15),
        )]));
        assert_eq!(module.channel_attribute("age"), None);
    }

    #[tokio::test]
    async fn test_inbox_lifecycle() {
        let module = InMemoryNativeModule::new();
        module.add_inbox_message(inbox_message("m-1"));
        module.add_inbox_message(inbox_message("m-2"));

        assert_eq!(
            module
                .call(NativeCommand::MarkInboxMessageRead("m-1".to_string()))
                .await
                .unwrap(),
            json!(true)
        );
        module
            .call(NativeCommand::DeleteInboxMessage("m-2".to_string()))
            .await
            .unwrap();

        let messages: Vec<InboxMessage> =
            serde_json::from_value(module.call(NativeCommand::GetInboxMessages).await.unwrap())
                .unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_read);

        let err = module
            .call(NativeCommand::DisplayMessage("m-2".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Rejected { ref code, .. } if code == "MESSAGE_NOT_AVAILABLE"));
    }

    #[tokio::test]
    async fn test_run_action() {
        let module = InMemoryNativeModule::new();

        let err = module
            .call(NativeCommand::RunAction {
                name: "teleport_action".to_string(),
                value: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Rejected { ref code, .. } if code == "ACTION_NOT_FOUND"));

        module
            .call(NativeCommand::RunAction {
                name: "add_custom_event_action".to_string(),
                value: Some(json!({"event_name": "purchase", "event_value": 9.99})),
            })
            .await
            .unwrap();
        assert_eq!(module.custom_events().len(), 1);

        module
            .call(NativeCommand::RunAction {
                name: "add_tags_action".to_string(),
                value: Some(json!(["x", "y"])),
            })
            .await
            .unwrap();
        assert_eq!(module.tags().len(), 2);
    }

    #[test]
    fn test_android_listener_count_never_negative() {
        let module = InMemoryNativeModule::new();
        module.post(NativeCommand::AddAndroidListener("com.urbanairship.deep_link".to_string()));
        module.post(NativeCommand::RemoveAndroidListeners(3));
        assert_eq!(module.android_listener_count(), 0);
    }

    #[tokio::test]
    async fn test_active_notifications() {
        let module = InMemoryNativeModule::new();
        for id in ["n-1", "n-2"] {
            module.add_active_notification(PushReceivedEvent {
                alert: Some("hello".to_string()),
                title: None,
                notification_id: id.to_string(),
                extras: Default::default(),
            });
        }

        module.post(NativeCommand::ClearNotification("n-1".to_string()));
        let active = module.call(NativeCommand::GetActiveNotifications).await.unwrap();
        assert_eq!(active.as_array().map(Vec::len), Some(1));

        module.post(NativeCommand::ClearNotifications);
        let active = module.call(NativeCommand::GetActiveNotifications).await.unwrap();
        assert_eq!(active, json!([]));
    }
}
