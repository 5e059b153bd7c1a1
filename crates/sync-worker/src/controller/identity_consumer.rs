use std::str::from_utf8;
use std::time::Duration;

use rdkafka::{
  consumer::{CommitMode, Consumer},
  message::BorrowedMessage,
  Message,
};
use tokio::{select, time::sleep};
use tracing::{debug, error, info};

use super::{event_processor::identity_event_processor, SyncWorkerController};

impl SyncWorkerController {
  /// Consume identity events one at a time, in delivery order. Every message
  /// is committed once it has been applied, skipped or dead-lettered; nothing
  /// is retried here.
  pub async fn identity_consumer(&self) {
    let consumer = self.consumer.clone();
    let shutdown_notify = self.shutdown_notify.clone();

    loop {
      select! {
        _ = shutdown_notify.notified() => {
          info!("Shutdown requested, breaking consumption loop.");
          break;
        }
        maybe_msg = consumer.recv() => {
          match maybe_msg {
            Err(e) => {
              error!("Kafka receive error: {}", e);
              sleep(Duration::from_secs(1)).await;
            }
            Ok(msg) => {
              self.handle_message(&msg).await;
              self.commit(&msg);
            }
          }
        }
      }
    }
  }

  async fn handle_message(&self, msg: &BorrowedMessage<'_>) {
    let Some(payload_bytes) = msg.payload() else {
      debug!("Skipping empty payload at {}[{}] @ {}", msg.topic(), msg.partition(), msg.offset());
      return;
    };

    let payload_str = match from_utf8(payload_bytes) {
      Ok(s) => s,
      Err(utf8_err) => {
        error!("Invalid UTF-8 in message: {}", utf8_err);
        self.metrics.record_event_failed("unknown", "invalid_utf8");
        self.send_utf8_error_to_dlq(payload_bytes, utf8_err).await;
        return;
      }
    };

    let db = self.sql_db.as_ref();
    match identity_event_processor(payload_str, &**db).await {
      Ok(report) => {
        self.metrics.record_event_received(&report.name);
        self.metrics.record_event_processed(&report.name, &report.outcome.to_string());
        self.metrics.observe_handler_duration(&report.name, report.elapsed_secs);
      }
      Err(failure) => {
        error!(
          "Processing failed for message {}[{}] @ {}: {}",
          msg.topic(),
          msg.partition(),
          msg.offset(),
          failure
        );
        self.metrics.record_event_received(&failure.name);
        self.metrics.record_event_failed(&failure.name, failure.err_type.as_label());
        self.send_processing_error_to_dlq(payload_str, &failure.to_string()).await;
      }
    }
  }

  fn commit(&self, msg: &BorrowedMessage<'_>) {
    match self.consumer.commit_message(msg, CommitMode::Async) {
      Ok(()) => {
        self.metrics.record_offset_committed();
        debug!("Committed offset {} for {}[{}]", msg.offset(), msg.topic(), msg.partition());
      }
      Err(e) => error!("Failed to commit offset {}: {}", msg.offset(), e),
    }
  }
}
