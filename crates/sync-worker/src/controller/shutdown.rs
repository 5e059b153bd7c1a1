use rdkafka::consumer::Consumer;
use tokio::{signal::ctrl_c, spawn};
use tracing::{error, info};

use super::SyncWorkerController;

impl SyncWorkerController {
  /// Start listening for shutdown signal (Ctrl+C). The message in flight is
  /// finished and committed before the loop exits.
  pub fn shutdown_listener(&self) {
    let shutdown_notify = self.shutdown_notify.clone();

    spawn(async move {
      if let Err(err) = ctrl_c().await {
        error!("Error waiting for ctrl_c: {}", err);
        return;
      }

      info!("Shutdown signal received (Ctrl+C). Stopping identity event consumer...");
      shutdown_notify.notify_one();
    });
  }

  /// Leave the consumer group once the loop has stopped
  pub fn consumer_shutdown(&self) {
    self.consumer.unsubscribe();
    info!("Identity event consumer unsubscribed");
  }
}
