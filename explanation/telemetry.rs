use std::{fmt, sync::Arc};

use serde_json::{json, Value};
use shared_event_bus::{BusEvent, EventPublisher};
use shared_logging::{JsonLogger, LogLevel, LogRecord};

const COMPONENT: &str = "explanation";

/// Best-effort telemetry for explanation resolution.
///
/// Sink failures are swallowed; a resolution result never depends on
/// whether telemetry could be written.
#[derive(Clone, Default)]
pub struct ExplanationTelemetry {
    logger: Option<Arc<JsonLogger>>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl fmt::Debug for ExplanationTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplanationTelemetry")
            .field("logger", &self.logger.is_some())
            .field("events", &self.events.is_some())
            .finish()
    }
}

impl ExplanationTelemetry {
    /// Creates telemetry with no sinks attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a structured log sink.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<JsonLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Attaches an event publisher.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(publisher);
        self
    }

    /// Writes a structured log record.
    pub fn log(&self, level: LogLevel, message: &str, fields: Value) {
        if let Some(logger) = &self.logger {
            let record = LogRecord::new(COMPONENT, level, message).with_fields(fields);
            let _ = logger.log(&record);
        }
    }

    /// Records one failed source attempt.
    pub async fn source_failed(&self, source: &str, error: &str) {
        self.log(
            LogLevel::Warn,
            "knowledge source failed, trying next",
            json!({ "source": source, "error": error }),
        );
        if let Some(publisher) = &self.events {
            let _ = publisher
                .publish(BusEvent::new(
                    COMPONENT,
                    "explanation.source.failed",
                    json!({ "source": source, "error": error }),
                ))
                .await;
        }
    }

    /// Records a completed resolution.
    pub async fn resolved(&self, term: &str, provenance: &str) {
        self.log(
            LogLevel::Debug,
            "explanation resolved",
            json!({ "term": term, "provenance": provenance }),
        );
        if let Some(publisher) = &self.events {
            let _ = publisher
                .publish(BusEvent::new(
                    COMPONENT,
                    "explanation.resolve.complete",
                    json!({ "term": term, "provenance": provenance }),
                ))
                .await;
        }
    }
}
