//! Logging system demonstration
//!
//! Initializes logging, then routes a few native events through an
//! [`EventDispatcher`] so the runtime's own log lines show up.
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run --example logging_demo
//!
//! # JSON format
//! cargo run --example logging_demo -- json
//!
//! # Compact format with a custom filter
//! cargo run --example logging_demo -- compact "core_runtime=trace"
//! ```

use std::env;

use bridge_traits::{time::LogLevel, Platform};
use core_runtime::events::{AirshipEvent, EventDispatcher, EventType};
use core_runtime::logging::{init_logging, redact_if_sensitive, LogFormat, LoggingConfig};
use serde_json::json;
use tracing::{error, info, info_span, warn};

#[tokio::main]
async fn main() -> core_runtime::Result<()> {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_pii_redaction(true)
        .with_spans(true);
    if let Some(filter) = args.get(2) {
        config = config.with_filter(filter.clone());
    }
    init_logging(config)?;

    info!(format = ?format, "=== Logging Demo ===");

    let dispatcher = EventDispatcher::new(Platform::current(), 16, None);
    let mut stream = dispatcher.subscribe();

    dispatcher.add_listener(EventType::Registration, |event| {
        if let AirshipEvent::Registration(registration) = event {
            info!(
                channel_id = %redact_if_sensitive("channel_id", &registration.channel_id),
                "Channel registered"
            );
        }
    });
    dispatcher.add_listener(EventType::DeepLink, |event| {
        if let AirshipEvent::DeepLink(link) = event {
            info!(deep_link = %link.deep_link, "Deep link received");
        }
    });

    {
        let _span = info_span!("native_events").entered();
        dispatcher.dispatch(
            "com.urbanairship.registration",
            json!({"channelId": "5d3b1a2e-0000-4000-8000-000000000000"}),
        )?;
        dispatcher.dispatch(
            "com.urbanairship.deep_link",
            json!({"deepLink": "app://settings"}),
        )?;

        if let Err(err) = dispatcher.dispatch("com.urbanairship.unknown", json!({})) {
            warn!(error = %err, "Dropped native event");
        }
        if let Err(err) = dispatcher.dispatch("com.urbanairship.deep_link", json!({})) {
            error!(error = %err, "Malformed native event");
        }
    }

    while let Some(Ok(event)) = stream.try_recv() {
        info!(event = event.description(), "Streamed event");
    }

    info!(
        email = %redact_if_sensitive("identifier", "user@example.com"),
        token = %redact_if_sensitive("registration_token", "apns-abc"),
        "PII redaction"
    );
    info!("=== Demo Complete ===");
    Ok(())
}
