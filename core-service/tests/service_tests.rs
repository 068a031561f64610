//! Integration tests for the service façade

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_desktop::InMemoryNativeModule;
use bridge_traits::{
    AttributeOperation, AttributeValue, BridgeError, ForegroundPresentationOptions, InboxMessage,
    ManualClock, NativeCommand, NativeModule, NotificationConfigAndroid, Platform,
    TagGroupOperation,
};
use chrono::{Duration, TimeZone, Utc};
use core_runtime::capabilities::Capability;
use core_runtime::config::AirshipConfig;
use core_runtime::events::{AirshipEvent, EventType};
use core_service::{AirshipService, CustomEvent, ServiceError};
use mockall::{mock, predicate::eq};
use serde_json::{json, Value};

mock! {
    pub Native {}

    #[async_trait]
    impl NativeModule for Native {
        async fn call(&self, command: NativeCommand) -> bridge_traits::error::Result<Value>;
        fn post(&self, command: NativeCommand);
    }
}

fn service_with(native: Arc<dyn NativeModule>, platform: Platform) -> AirshipService {
    let config = AirshipConfig::builder()
        .native_module(native)
        .platform(platform)
        .build()
        .unwrap();
    AirshipService::new(config).unwrap()
}

fn in_memory(platform: Platform) -> (Arc<InMemoryNativeModule>, AirshipService) {
    let native = Arc::new(InMemoryNativeModule::new());
    let service = service_with(native.clone(), platform);
    (native, service)
}

fn tags(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|tag| tag.to_string()).collect()
}

#[test]
fn test_start_up_posts_configured_options() {
    let android = NotificationConfigAndroid {
        icon: Some("ic_notification".to_string()),
        ..Default::default()
    };
    let options = ForegroundPresentationOptions {
        alert: Some(true),
        sound: Some(true),
        badge: Some(false),
    };

    let mut native = MockNative::new();
    native
        .expect_post()
        .with(eq(NativeCommand::SetAndroidNotificationConfig(android.clone())))
        .times(1)
        .return_const(());
    native
        .expect_post()
        .with(eq(NativeCommand::SetForegroundPresentationOptions(options)))
        .times(1)
        .return_const(());

    let config = AirshipConfig::builder()
        .native_module(Arc::new(native))
        .platform(Platform::Ios)
        .android_notification_config(android)
        .foreground_presentation_options(options)
        .build()
        .unwrap();
    AirshipService::new(config).unwrap();
}

#[tokio::test]
async fn test_ios_only_methods_never_reach_native_elsewhere() {
    let mut native = MockNative::new();
    native.expect_post().never();
    native.expect_call().never();
    let service = service_with(Arc::new(native), Platform::Android);

    assert!(!service.supports(Capability::BadgeNumber));
    for result in [
        service.set_badge_number(4),
        service.set_autobadge_enabled(true),
        service.set_foreground_presentation_options(ForegroundPresentationOptions::default()),
    ] {
        assert!(matches!(
            result,
            Err(ServiceError::Runtime(core_runtime::Error::UnsupportedOnPlatform {
                platform: Platform::Android,
                ..
            }))
        ));
    }
    assert!(service.get_badge_number().await.is_err());
    assert!(service.is_autobadge_enabled().await.is_err());
}

#[tokio::test]
async fn test_promise_results_are_decoded() {
    let mut native = MockNative::new();
    native
        .expect_call()
        .with(eq(NativeCommand::GetChannelId))
        .times(1)
        .returning(|_| Ok(json!("channel-1")));
    native
        .expect_call()
        .with(eq(NativeCommand::GetNamedUser))
        .times(1)
        .returning(|_| Ok(Value::Null));
    native
        .expect_call()
        .with(eq(NativeCommand::GetTags))
        .times(1)
        .returning(|_| Ok(json!(42)));
    let service = service_with(Arc::new(native), Platform::Desktop);

    assert_eq!(
        service.get_channel_id().await.unwrap(),
        Some("channel-1".to_string())
    );
    assert_eq!(service.get_named_user().await.unwrap(), None);

    let err = service.get_tags().await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidResponse { ref method, .. } if method == "getTags"));
}

#[tokio::test]
async fn test_native_rejections_propagate() {
    let mut native = MockNative::new();
    native
        .expect_call()
        .returning(|_| Err(BridgeError::rejected("MESSAGE_NOT_FOUND", "gone")));
    let service = service_with(Arc::new(native), Platform::Android);

    let err = service.mark_inbox_message_read("m-1").await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Bridge(BridgeError::Rejected { ref code, .. }) if code == "MESSAGE_NOT_FOUND"
    ));

    let err = service.run_action("deep_link_action", None).await.unwrap_err();
    assert!(matches!(err, ServiceError::ActionRejected(ref reason) if reason.contains("deep_link_action")));
}

#[tokio::test]
async fn test_channel_round_trip() {
    let (native, service) = in_memory(Platform::Desktop);

    service.add_tag("news");
    service.add_tag("sports");
    service.remove_tag("news");
    service.set_named_user(Some("ada"));
    service.associate_identifier("crm", Some("42"));

    assert_eq!(service.get_tags().await.unwrap(), vec!["sports".to_string()]);
    assert_eq!(service.get_named_user().await.unwrap(), Some("ada".to_string()));
    assert_eq!(native.associated_identifier("crm"), Some("42".to_string()));
    assert!(service.get_channel_id().await.unwrap().is_some());

    service.set_named_user(None);
    assert_eq!(service.get_named_user().await.unwrap(), None);
}

#[tokio::test]
async fn test_privacy_flags() {
    let (_native, service) = in_memory(Platform::Desktop);

    assert!(service.is_data_collection_enabled().await.unwrap());
    service.set_data_collection_enabled(false);
    service.set_analytics_enabled(false);
    service.set_push_token_registration_enabled(false);

    assert!(!service.is_data_collection_enabled().await.unwrap());
    assert!(!service.is_analytics_enabled().await.unwrap());
    assert!(!service.is_push_token_registration_enabled().await.unwrap());
}

#[tokio::test]
async fn test_user_notifications() {
    let (_native, service) = in_memory(Platform::Android);

    assert!(!service.is_user_notifications_enabled().await.unwrap());
    assert!(service.enable_user_push_notifications().await.unwrap());
    assert!(service.is_user_notifications_enabled().await.unwrap());
    assert!(service.is_user_notifications_opted_in().await.unwrap());
}

#[tokio::test]
async fn test_delayed_channel_creation() {
    let native = Arc::new(InMemoryNativeModule::with_delayed_channel_creation());
    let service = service_with(native, Platform::Ios);

    assert_eq!(service.get_channel_id().await.unwrap(), None);
    service.enable_channel_creation();
    assert!(service.get_channel_id().await.unwrap().is_some());
}

#[test]
fn test_tag_group_editor_posts_compacted_batch() {
    let (native, service) = in_memory(Platform::Desktop);

    let mut editor = service.edit_channel_tag_groups();
    editor.add_tags("vip", ["a", "b"]).unwrap();
    editor.remove_tags("vip", ["b"]).unwrap();
    editor.apply();

    assert_eq!(
        native.commands(),
        vec![NativeCommand::EditChannelTagGroups(vec![
            TagGroupOperation::add("vip", vec!["a".to_string()]),
            TagGroupOperation::remove("vip", vec!["b".to_string()]),
        ])]
    );
    assert_eq!(native.channel_tag_group("vip"), tags(&["a"]));
}

#[test]
fn test_empty_editor_posts_nothing() {
    let (native, service) = in_memory(Platform::Desktop);

    service.edit_channel_tag_groups().apply();
    service.edit_named_user_attributes().apply();

    assert!(native.commands().is_empty());
}

#[test]
fn test_rejected_editor_input_leaves_batch_intact() {
    let (native, service) = in_memory(Platform::Desktop);

    let mut editor = service.edit_channel_tag_groups();
    editor.add_tags("loyalty", ["gold"]).unwrap();
    assert!(editor.add_tags("", ["x"]).is_err());
    editor.apply();

    assert_eq!(native.channel_tag_group("loyalty"), tags(&["gold"]));
}

#[test]
fn test_named_user_editors_target_named_user() {
    let (native, service) = in_memory(Platform::Desktop);
    service.set_named_user(Some("ada"));

    let mut editor = service.edit_named_user_tag_groups();
    editor.add_tags("interests", ["jazz"]).unwrap();
    editor.apply();

    let mut editor = service.edit_named_user_attributes();
    editor.set_attribute("tier", "gold").unwrap();
    editor.apply();

    assert_eq!(native.named_user_tag_group("interests"), tags(&["jazz"]));
    assert!(native.channel_tag_group("interests").is_empty());
    assert_eq!(
        native.named_user_attribute("tier"),
        Some(AttributeValue::String("gold".to_string()))
    );
}

#[test]
fn test_attribute_editor_uses_configured_clock() {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let native = Arc::new(InMemoryNativeModule::new());
    let config = AirshipConfig::builder()
        .native_module(native.clone())
        .platform(Platform::Desktop)
        .clock(clock.clone())
        .build()
        .unwrap();
    let service = AirshipService::new(config).unwrap();

    let mut editor = service.edit_channel_attributes();
    editor.set_attribute("age", 30).unwrap();
    clock.advance(Duration::seconds(1));
    editor.set_attribute("age", 31).unwrap();
    clock.advance(Duration::seconds(1));
    editor.set_attribute("city", "Oslo").unwrap();
    editor.remove_attribute("city").unwrap();
    editor.apply();

    assert_eq!(
        native.commands(),
        vec![NativeCommand::EditChannelAttributes(vec![
            AttributeOperation::set(
                "age",
                AttributeValue::Number(31.0),
                start + Duration::seconds(1)
            ),
            AttributeOperation::remove("city", start + Duration::seconds(2)),
        ])]
    );
    assert_eq!(native.channel_attribute("age"), Some(AttributeValue::Number(31.0)));
    assert_eq!(native.channel_attribute("city"), None);
}

/// Replays `log` one call at a time and through a single compacted batch,
/// starting from the same native state, and compares the results.
fn assert_batch_equivalent(initial: &[&str], log: &[(bool, &[&str])]) {
    let (sequential, sequential_service) = in_memory(Platform::Desktop);
    let (batched, batched_service) = in_memory(Platform::Desktop);

    for service in [&sequential_service, &batched_service] {
        if initial.is_empty() {
            break;
        }
        let mut seed = service.edit_channel_tag_groups();
        seed.add_tags("vip", initial.iter().copied()).unwrap();
        seed.apply();
    }

    for (add, tags) in log {
        let mut editor = sequential_service.edit_channel_tag_groups();
        if *add {
            editor.add_tags("vip", tags.iter().copied()).unwrap();
        } else {
            editor.remove_tags("vip", tags.iter().copied()).unwrap();
        }
        editor.apply();
    }

    let mut editor = batched_service.edit_channel_tag_groups();
    for (add, tags) in log {
        if *add {
            editor.add_tags("vip", tags.iter().copied()).unwrap();
        } else {
            editor.remove_tags("vip", tags.iter().copied()).unwrap();
        }
    }
    editor.apply();

    assert_eq!(
        batched.channel_tag_group("vip"),
        sequential.channel_tag_group("vip"),
        "initial {:?}, log {:?}",
        initial,
        log
    );
}

#[test]
fn test_compacted_tag_batch_matches_sequential_native_application() {
    const A: &[&str] = &["a"];
    const B: &[&str] = &["b"];
    const C: &[&str] = &["c"];
    const AB: &[&str] = &["a", "b"];
    const AC: &[&str] = &["a", "c"];
    const ABC: &[&str] = &["a", "b", "c"];

    let logs: Vec<Vec<(bool, &[&str])>> = vec![
        vec![(true, AB), (false, B)],
        vec![(false, A), (true, A)],
        vec![(true, A), (false, AC), (true, C)],
        vec![(false, ABC)],
        vec![(true, C), (true, B), (false, C), (false, B)],
    ];

    for initial in [&[][..], B, ABC] {
        for log in &logs {
            assert_batch_equivalent(initial, log);
        }
    }
}

#[tokio::test]
async fn test_custom_event_runs_action() {
    let (native, service) = in_memory(Platform::Desktop);

    let event = CustomEvent::new("purchase")
        .with_value(12.5)
        .with_transaction_id("tx-1")
        .with_property("sku", "B-42");
    service.add_custom_event(&event).await.unwrap();

    assert_eq!(
        native.custom_events(),
        vec![json!({
            "event_name": "purchase",
            "event_value": 12.5,
            "transaction_id": "tx-1",
            "properties": {"sku": "B-42"}
        })]
    );

    let err = service
        .add_custom_event(&CustomEvent::new("  "))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ActionRejected(_)));
}

#[tokio::test]
async fn test_unknown_action_is_rejected() {
    let (_native, service) = in_memory(Platform::Desktop);

    let err = service.run_action("teleport_action", None).await.unwrap_err();
    assert!(matches!(err, ServiceError::ActionRejected(ref reason) if reason.contains("ACTION_NOT_FOUND")));

    let result = service
        .run_action("deep_link_action", Some(json!("app://home")))
        .await
        .unwrap();
    assert_eq!(result, json!("app://home"));
}

#[tokio::test]
async fn test_message_center_flow() {
    let (native, service) = in_memory(Platform::Ios);
    for id in ["m-1", "m-2"] {
        native.add_inbox_message(InboxMessage {
            id: id.to_string(),
            title: format!("Title {}", id),
            sent_date: 1_700_000_000_000,
            list_icon_url: None,
            is_read: false,
            is_deleted: false,
            extras: Default::default(),
        });
    }

    assert!(service.refresh_inbox().await.unwrap());
    assert!(service.display_message("m-1").await.unwrap());
    assert_eq!(native.displayed_message(), Some("m-1".to_string()));
    service.dismiss_message();
    assert_eq!(native.displayed_message(), None);

    assert!(service.delete_inbox_message("m-2").await.unwrap());
    let messages = service.get_inbox_messages().await.unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].is_read);

    service.display_message_center();
    assert!(native.is_message_center_visible());
    service.dismiss_message_center();
    assert!(!native.is_message_center_visible());

    service.set_auto_launch_default_message_center(false);
    assert!(!native.auto_launch_message_center());
}

#[tokio::test]
async fn test_badging_on_ios() {
    let (_native, service) = in_memory(Platform::Ios);

    service.set_autobadge_enabled(true).unwrap();
    service.set_badge_number(7).unwrap();

    assert!(service.is_autobadge_enabled().await.unwrap());
    assert_eq!(service.get_badge_number().await.unwrap(), 7);
}

#[tokio::test]
async fn test_notifications_and_screens() {
    let (native, service) = in_memory(Platform::Android);

    service.set_android_notification_config(NotificationConfigAndroid {
        default_channel_id: Some("alerts".to_string()),
        ..Default::default()
    });
    service.track_screen("home");
    service.clear_notifications();

    assert_eq!(native.tracked_screens(), vec!["home".to_string()]);
    assert_eq!(
        native
            .android_notification_config()
            .and_then(|config| config.default_channel_id),
        Some("alerts".to_string())
    );
    assert!(service.get_active_notifications().await.unwrap().is_empty());
}

#[test]
fn test_native_events_reach_listeners_and_bookkeeping() {
    let (native, service) = in_memory(Platform::Android);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let recorder = Arc::clone(&seen);
    let registration = service.add_listener(EventType::Registration, move |event| {
        if let AirshipEvent::Registration(payload) = event {
            recorder.lock().unwrap().push(payload.channel_id.clone());
        }
    });
    service.add_listener(EventType::DeepLink, |_| {});
    service.add_listener(EventType::DeepLink, |_| {});
    assert_eq!(native.android_listener_count(), 3);

    let invoked = service
        .dispatch_native_event(
            "com.urbanairship.registration",
            json!({"channelId": "channel-9"}),
        )
        .unwrap();
    assert_eq!(invoked, 1);
    assert_eq!(*seen.lock().unwrap(), vec!["channel-9".to_string()]);

    assert!(service.remove_subscription(&registration));
    assert!(!service.remove_subscription(&registration));
    assert_eq!(native.android_listener_count(), 2);

    assert_eq!(service.remove_all_listeners(EventType::DeepLink), 2);
    assert_eq!(native.android_listener_count(), 0);

    let err = service
        .dispatch_native_event("com.urbanairship.unknown", json!({}))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Runtime(core_runtime::Error::UnknownEventType(_))
    ));
}

#[tokio::test]
async fn test_event_stream_receives_dispatched_events() {
    let (_native, service) = in_memory(Platform::Ios);
    let mut stream = service.subscribe();

    service
        .dispatch_native_event(
            "com.urbanairship.deep_link",
            json!({"deepLink": "app://settings"}),
        )
        .unwrap();

    let event = stream.recv().await.unwrap();
    assert!(matches!(event, AirshipEvent::DeepLink(ref payload) if payload.deep_link == "app://settings"));
}

#[cfg(feature = "desktop-shims")]
#[tokio::test]
async fn test_default_desktop_module() {
    let config = AirshipConfig::builder()
        .platform(Platform::Desktop)
        .build()
        .unwrap();
    let service = AirshipService::new(config).unwrap();

    service.add_tag("desktop");
    assert_eq!(service.get_tags().await.unwrap(), vec!["desktop".to_string()]);
}
