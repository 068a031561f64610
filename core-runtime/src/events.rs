//! # Event Delivery
//!
//! Routes events emitted by the native SDK to application listeners.
//!
//! ## Overview
//!
//! The event system consists of:
//! - **Event Types**: public [`EventType`] names and the native
//!   [`InternalEventType`] wire names, mapped by [`EVENT_TYPE_TABLE`]
//! - **Payloads**: one typed struct per event, wrapped in [`AirshipEvent`]
//! - **EventDispatcher**: listener registry with subscription handles
//! - **EventBus / EventStream**: broadcast channel for async consumers
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  dispatch(wire name, body)  ┌─────────────────┐
//! │ Native SDK   ├────────────────────────────>│ EventDispatcher │
//! └──────────────┘                             │   decode        │
//!                                              │   listeners ────┼──> Fn(&AirshipEvent)
//!                                              │   EventBus ─────┼──> EventStream
//!                                              └─────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bridge_traits::Platform;
//! use core_runtime::events::{AirshipEvent, EventDispatcher, EventType};
//! use serde_json::json;
//!
//! let dispatcher = EventDispatcher::new(Platform::Desktop, 100, None);
//! let subscription = dispatcher.add_listener(EventType::DeepLink, |event| {
//!     if let AirshipEvent::DeepLink(link) = event {
//!         println!("open {}", link.deep_link);
//!     }
//! });
//!
//! let delivered = dispatcher
//!     .dispatch("com.urbanairship.deep_link", json!({"deepLink": "app://home"}))
//!     .unwrap();
//! assert_eq!(delivered, 1);
//!
//! dispatcher.remove_subscription(&subscription);
//! ```
//!
//! ## Native Listener Bookkeeping
//!
//! On platforms with
//! [`Capability::NativeListenerBookkeeping`](crate::capabilities::Capability)
//! the native module only emits an event while it believes a listener exists.
//! The dispatcher posts `addAndroidListener` for every added listener and
//! `removeAndroidListeners(n)` for every removal, so both sides agree on the
//! count.
//!
//! ## Error Handling
//!
//! - Unknown wire names fail with [`Error::UnknownEventType`].
//! - Bodies that do not match the payload shape fail with
//!   [`Error::InvalidEventPayload`]; no listener is invoked.
//! - Stream subscribers that fall behind get `RecvError::Lagged(n)`, which is
//!   non-fatal. `RecvError::Closed` signals shutdown.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bridge_traits::types::{AuthorizedNotificationSettings, PushReceivedEvent};
use bridge_traits::{NativeCommand, NativeModule, Platform};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::capabilities::{is_supported, Capability};
use crate::config::MAX_EVENT_BUFFER_SIZE;
use crate::error::{Error, Result};

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Event Types
// ============================================================================

/// Event names exposed to applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    NotificationResponse,
    PushReceived,
    /// Preferred name for channel registration events.
    Registration,
    /// Older alias of [`Registration`](Self::Registration).
    Register,
    DeepLink,
    NotificationOptInStatus,
    InboxUpdated,
    ShowInbox,
}

/// Event names used on the native wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InternalEventType {
    #[serde(rename = "com.urbanairship.registration")]
    Registration,
    #[serde(rename = "com.urbanairship.notification_response")]
    NotificationResponse,
    #[serde(rename = "com.urbanairship.push_received")]
    PushReceived,
    #[serde(rename = "com.urbanairship.deep_link")]
    DeepLink,
    #[serde(rename = "com.urbanairship.inbox_updated")]
    InboxUpdated,
    #[serde(rename = "com.urbanairship.notification_opt_in_status")]
    NotificationOptInStatus,
    #[serde(rename = "com.urbanairship.show_inbox")]
    ShowInbox,
}

/// Public to wire mapping, indexed by `EventType` discriminant.
pub const EVENT_TYPE_TABLE: [(EventType, InternalEventType); 8] = [
    (
        EventType::NotificationResponse,
        InternalEventType::NotificationResponse,
    ),
    (EventType::PushReceived, InternalEventType::PushReceived),
    (EventType::Registration, InternalEventType::Registration),
    (EventType::Register, InternalEventType::Registration),
    (EventType::DeepLink, InternalEventType::DeepLink),
    (
        EventType::NotificationOptInStatus,
        InternalEventType::NotificationOptInStatus,
    ),
    (EventType::InboxUpdated, InternalEventType::InboxUpdated),
    (EventType::ShowInbox, InternalEventType::ShowInbox),
];

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::NotificationResponse => "notificationResponse",
            EventType::PushReceived => "pushReceived",
            EventType::Registration => "registration",
            EventType::Register => "register",
            EventType::DeepLink => "deepLink",
            EventType::NotificationOptInStatus => "notificationOptInStatus",
            EventType::InboxUpdated => "inboxUpdated",
            EventType::ShowInbox => "showInbox",
        }
    }

    /// The wire event this name listens to.
    pub fn internal(self) -> InternalEventType {
        EVENT_TYPE_TABLE[self as usize].1
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EVENT_TYPE_TABLE
            .iter()
            .map(|(public, _)| *public)
            .find(|public| public.as_str() == s)
            .ok_or_else(|| Error::UnknownEventType(s.to_string()))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InternalEventType {
    pub const ALL: [InternalEventType; 7] = [
        InternalEventType::Registration,
        InternalEventType::NotificationResponse,
        InternalEventType::PushReceived,
        InternalEventType::DeepLink,
        InternalEventType::InboxUpdated,
        InternalEventType::NotificationOptInStatus,
        InternalEventType::ShowInbox,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            InternalEventType::Registration => "com.urbanairship.registration",
            InternalEventType::NotificationResponse => "com.urbanairship.notification_response",
            InternalEventType::PushReceived => "com.urbanairship.push_received",
            InternalEventType::DeepLink => "com.urbanairship.deep_link",
            InternalEventType::InboxUpdated => "com.urbanairship.inbox_updated",
            InternalEventType::NotificationOptInStatus => {
                "com.urbanairship.notification_opt_in_status"
            }
            InternalEventType::ShowInbox => "com.urbanairship.show_inbox",
        }
    }

    /// Preferred public name. Registration maps back to
    /// [`EventType::Registration`], never the `Register` alias.
    pub fn public(&self) -> EventType {
        match self {
            InternalEventType::Registration => EventType::Registration,
            InternalEventType::NotificationResponse => EventType::NotificationResponse,
            InternalEventType::PushReceived => EventType::PushReceived,
            InternalEventType::DeepLink => EventType::DeepLink,
            InternalEventType::InboxUpdated => EventType::InboxUpdated,
            InternalEventType::NotificationOptInStatus => EventType::NotificationOptInStatus,
            InternalEventType::ShowInbox => EventType::ShowInbox,
        }
    }
}

impl FromStr for InternalEventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|internal| internal.wire_name() == s)
            .ok_or_else(|| Error::UnknownEventType(s.to_string()))
    }
}

impl fmt::Display for InternalEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

// ============================================================================
// Event Payloads
// ============================================================================

/// A channel was created or its registration token changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationEvent {
    pub channel_id: String,
    /// APNs device token or FCM registration token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_token: Option<String>,
}

/// The user interacted with a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponseEvent {
    pub notification: PushReceivedEvent,
    /// Notification action button ID, absent for a tap on the notification
    /// itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    /// Whether the action launched the application.
    pub is_foreground: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepLinkEvent {
    pub deep_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptInStatusEvent {
    pub opt_in: bool,
    /// iOS only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_notification_settings: Option<AuthorizedNotificationSettings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxUpdatedEvent {
    pub message_unread_count: u32,
    pub message_count: u32,
}

/// The app should show its inbox, optionally opened to one message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowInboxEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

/// A decoded native event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum AirshipEvent {
    Registration(RegistrationEvent),
    NotificationResponse(NotificationResponseEvent),
    PushReceived(PushReceivedEvent),
    DeepLink(DeepLinkEvent),
    NotificationOptInStatus(NotificationOptInStatusEvent),
    InboxUpdated(InboxUpdatedEvent),
    ShowInbox(ShowInboxEvent),
}

impl AirshipEvent {
    /// Decodes a native event body into the payload for `event_type`.
    pub fn decode(event_type: InternalEventType, body: Value) -> Result<Self> {
        fn parse<T: serde::de::DeserializeOwned>(
            event_type: InternalEventType,
            body: Value,
        ) -> Result<T> {
            serde_json::from_value(body).map_err(|source| Error::InvalidEventPayload {
                event: event_type.wire_name().to_string(),
                source,
            })
        }

        Ok(match event_type {
            InternalEventType::Registration => {
                AirshipEvent::Registration(parse(event_type, body)?)
            }
            InternalEventType::NotificationResponse => {
                AirshipEvent::NotificationResponse(parse(event_type, body)?)
            }
            InternalEventType::PushReceived => {
                AirshipEvent::PushReceived(parse(event_type, body)?)
            }
            InternalEventType::DeepLink => AirshipEvent::DeepLink(parse(event_type, body)?),
            InternalEventType::NotificationOptInStatus => {
                AirshipEvent::NotificationOptInStatus(parse(event_type, body)?)
            }
            InternalEventType::InboxUpdated => {
                AirshipEvent::InboxUpdated(parse(event_type, body)?)
            }
            // The native side may send no body at all.
            InternalEventType::ShowInbox if body.is_null() => {
                AirshipEvent::ShowInbox(ShowInboxEvent::default())
            }
            InternalEventType::ShowInbox => AirshipEvent::ShowInbox(parse(event_type, body)?),
        })
    }

    pub fn event_type(&self) -> InternalEventType {
        match self {
            AirshipEvent::Registration(_) => InternalEventType::Registration,
            AirshipEvent::NotificationResponse(_) => InternalEventType::NotificationResponse,
            AirshipEvent::PushReceived(_) => InternalEventType::PushReceived,
            AirshipEvent::DeepLink(_) => InternalEventType::DeepLink,
            AirshipEvent::NotificationOptInStatus(_) => {
                InternalEventType::NotificationOptInStatus
            }
            AirshipEvent::InboxUpdated(_) => InternalEventType::InboxUpdated,
            AirshipEvent::ShowInbox(_) => InternalEventType::ShowInbox,
        }
    }

    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &'static str {
        match self {
            AirshipEvent::Registration(_) => "Channel registration updated",
            AirshipEvent::NotificationResponse(_) => "User responded to a notification",
            AirshipEvent::PushReceived(_) => "Push notification received",
            AirshipEvent::DeepLink(_) => "Deep link received",
            AirshipEvent::NotificationOptInStatus(_) => "Notification opt-in status changed",
            AirshipEvent::InboxUpdated(_) => "Message center inbox updated",
            AirshipEvent::ShowInbox(_) => "Inbox display requested",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast channel carrying every dispatched event.
///
/// Slow subscribers receive `RecvError::Lagged` but never block the
/// dispatcher.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AirshipEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Example
    ///
    /// ```rust
    /// use core_runtime::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    /// ```
    ///
    /// `capacity` is clamped to `1..=MAX_EVENT_BUFFER_SIZE`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.clamp(1, MAX_EVENT_BUFFER_SIZE));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: AirshipEvent) -> std::result::Result<usize, SendError<AirshipEvent>> {
        self.sender.send(event)
    }

    /// Creates a new receiver. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<AirshipEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&AirshipEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{AirshipEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let inbox_only = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, AirshipEvent::InboxUpdated(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<AirshipEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<AirshipEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events that match `predicate` will be returned.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&AirshipEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n`
    /// events, `RecvError::Closed` once the bus is gone.
    pub async fn recv(&mut self) -> std::result::Result<AirshipEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no matching event is currently available.
    pub fn try_recv(&mut self) -> Option<std::result::Result<AirshipEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    fn accepts(&self, event: &AirshipEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

type Listener = Arc<dyn Fn(&AirshipEvent) + Send + Sync>;

/// Handle returned by [`EventDispatcher::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: Uuid,
    event_type: InternalEventType,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_type(&self) -> InternalEventType {
        self.event_type
    }
}

struct DispatcherInner {
    platform: Platform,
    native: Option<Arc<dyn NativeModule>>,
    listeners: Mutex<HashMap<InternalEventType, Vec<(Uuid, Listener)>>>,
    bus: EventBus,
}

/// Listener registry for native events.
///
/// Cheap to clone; clones share the same registry and bus. Listeners run on
/// the dispatching thread, outside the registry lock, so a listener may add
/// or remove subscriptions.
#[derive(Clone)]
pub struct EventDispatcher {
    inner: Arc<DispatcherInner>,
}

impl EventDispatcher {
    /// Creates a dispatcher.
    ///
    /// `native` receives listener bookkeeping commands when `platform`
    /// requires them; pass `None` when no native module is attached.
    /// `event_buffer_size` is clamped like [`EventBus::new`].
    pub fn new(
        platform: Platform,
        event_buffer_size: usize,
        native: Option<Arc<dyn NativeModule>>,
    ) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                platform,
                native,
                listeners: Mutex::new(HashMap::new()),
                bus: EventBus::new(event_buffer_size),
            }),
        }
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<InternalEventType, Vec<(Uuid, Listener)>>> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn post_bookkeeping(&self, command: NativeCommand) {
        if !is_supported(Capability::NativeListenerBookkeeping, self.inner.platform) {
            return;
        }
        if let Some(native) = &self.inner.native {
            trace!(method = command.method(), "Posting listener bookkeeping");
            native.post(command);
        }
    }

    /// Registers `listener` for `event_type`.
    pub fn add_listener<F>(&self, event_type: EventType, listener: F) -> Subscription
    where
        F: Fn(&AirshipEvent) + Send + Sync + 'static,
    {
        let internal = event_type.internal();
        let subscription = Subscription {
            id: Uuid::new_v4(),
            event_type: internal,
        };

        self.registry()
            .entry(internal)
            .or_default()
            .push((subscription.id, Arc::new(listener)));

        debug!(event = %internal, subscription = %subscription.id, "Added event listener");
        self.post_bookkeeping(NativeCommand::AddAndroidListener(
            internal.wire_name().to_string(),
        ));
        subscription
    }

    /// Removes one listener. Returns `false` if it was already removed.
    pub fn remove_subscription(&self, subscription: &Subscription) -> bool {
        let removed = {
            let mut registry = self.registry();
            match registry.get_mut(&subscription.event_type) {
                Some(listeners) => {
                    let before = listeners.len();
                    listeners.retain(|(id, _)| *id != subscription.id);
                    listeners.len() < before
                }
                None => false,
            }
        };

        if removed {
            debug!(
                event = %subscription.event_type,
                subscription = %subscription.id,
                "Removed event listener"
            );
            self.post_bookkeeping(NativeCommand::RemoveAndroidListeners(1));
        }
        removed
    }

    /// Removes every listener for `event_type` and returns how many there
    /// were.
    pub fn remove_all_listeners(&self, event_type: EventType) -> usize {
        let internal = event_type.internal();
        let removed = self
            .registry()
            .remove(&internal)
            .map(|listeners| listeners.len())
            .unwrap_or(0);

        debug!(event = %internal, removed, "Removed all event listeners");
        if removed > 0 {
            let count = u32::try_from(removed).unwrap_or(u32::MAX);
            self.post_bookkeeping(NativeCommand::RemoveAndroidListeners(count));
        }
        removed
    }

    pub fn listener_count(&self, event_type: EventType) -> usize {
        self.registry()
            .get(&event_type.internal())
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Opens a stream of every event dispatched from now on.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.inner.bus.subscribe())
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    /// Decodes a native event and delivers it.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, wire_name: &str, body: Value) -> Result<usize> {
        let event_type = InternalEventType::from_str(wire_name)?;
        let event = AirshipEvent::decode(event_type, body)?;
        Ok(self.dispatch_event(event))
    }

    /// Delivers an already decoded event to listeners in registration order,
    /// then to stream subscribers.
    pub fn dispatch_event(&self, event: AirshipEvent) -> usize {
        let event_type = event.event_type();
        let listeners: Vec<Listener> = self
            .registry()
            .get(&event_type)
            .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();

        for listener in &listeners {
            listener(&event);
        }

        // No stream subscribers is not an error.
        let streamed = self.inner.bus.emit(event).unwrap_or(0);
        debug!(
            event = %event_type,
            listeners = listeners.len(),
            streamed,
            "Dispatched event"
        );
        listeners.len()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<InternalEventType, usize> = self
            .registry()
            .iter()
            .map(|(event, listeners)| (*event, listeners.len()))
            .collect();
        f.debug_struct("EventDispatcher")
            .field("platform", &self.inner.platform)
            .field("listeners", &counts)
            .field("bus", &self.inner.bus)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
