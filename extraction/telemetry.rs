use std::{fmt, sync::Arc};

use serde_json::{json, Value};
use shared_event_bus::{BusEvent, EventPublisher};
use shared_logging::{JsonLogger, LogLevel, LogRecord};

const COMPONENT: &str = "extraction";

/// Best-effort telemetry for the extraction pipeline.
///
/// Both sinks are optional and all failures are swallowed: telemetry
/// must never change an aggregation result.
#[derive(Clone, Default)]
pub struct ExtractionTelemetry {
    logger: Option<Arc<JsonLogger>>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl fmt::Debug for ExtractionTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionTelemetry")
            .field("logger", &self.logger.is_some())
            .field("events", &self.events.is_some())
            .finish()
    }
}

impl ExtractionTelemetry {
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

    /// Publishes an operational event.
    pub async fn event(&self, kind: &str, payload: Value) {
        if let Some(publisher) = &self.events {
            let _ = publisher.publish(BusEvent::new(COMPONENT, kind, payload)).await;
        }
    }

    /// Records one failed oracle invocation.
    pub async fn oracle_failed(&self, oracle: &str, error: &str) {
        self.log(
            LogLevel::Warn,
            "oracle failed, continuing with remaining oracles",
            json!({ "oracle": oracle, "error": error }),
        );
        self.event(
            "extraction.oracle.failed",
            json!({ "oracle": oracle, "error": error }),
        )
        .await;
    }
}
