use std::{str::Utf8Error, time::Duration};

use planboard_utils::time_get_millis;
use rdkafka::producer::FutureRecord;
use serde_json::Value;
use tracing::error;

use super::SyncWorkerController;
use crate::models::dlq::{dlq_invalid_utf8, dlq_processing_error};

impl SyncWorkerController {
  /// Send a message to the DLQ when UTF-8 parsing fails
  pub(super) async fn send_utf8_error_to_dlq(&self, payload_bytes: &[u8], utf8_err: Utf8Error) {
    let body = dlq_invalid_utf8(payload_bytes, &utf8_err.to_string(), time_get_millis());
    self.publish_dlq(body).await;
  }

  /// Send a message to the DLQ when decoding or handling fails
  pub(super) async fn send_processing_error_to_dlq(&self, payload_str: &str, error_msg: &str) {
    let body = dlq_processing_error(payload_str, error_msg, time_get_millis());
    self.publish_dlq(body).await;
  }

  async fn publish_dlq(&self, body: Value) {
    let dlq_topic = &self.config.topics.identity_events_dlq;
    let timeout = Duration::from_millis(self.config.sync.dlq_timeout_ms);
    let payload = body.to_string();

    match self.producer.send(FutureRecord::to(dlq_topic).payload(&payload).key(""), timeout).await {
      Ok(_) => self.metrics.record_dlq_message(),
      Err((err, _)) => error!("Failed to publish to DLQ topic {}: {}", dlq_topic, err),
    }
  }
}
