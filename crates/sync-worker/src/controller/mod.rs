pub mod dead_letter;
pub mod event_processor;
pub mod identity_consumer;
pub mod shutdown;

use std::sync::Arc;

use planboard_config::Settings;
use planboard_database::DatabaseSql;
use planboard_result::{BoxedErr, ErrorType, InternalError};
use rdkafka::{
  consumer::{Consumer, StreamConsumer},
  producer::FutureProducer,
  ClientConfig,
};
use tokio::sync::Notify;
use tracing::info;

use crate::server::observability::MetricsCollector;

pub struct SyncWorkerControllerArgs {
  pub(crate) sql_db: Arc<DatabaseSql>,
  pub(crate) config: Arc<Settings>,
  pub(crate) metrics: Arc<MetricsCollector>,
}

pub(crate) struct SyncWorkerController {
  pub(super) sql_db: Arc<DatabaseSql>,
  pub(super) config: Arc<Settings>,
  pub(super) metrics: Arc<MetricsCollector>,
  pub(super) consumer: Arc<StreamConsumer>,
  pub(super) producer: FutureProducer,
  pub(super) shutdown_notify: Arc<Notify>,
}

/// Base client configuration shared by the consumer and the DLQ producer
pub(crate) fn kafka_client_config(config: &Settings) -> ClientConfig {
  let kafka = &config.kafka;
  let mut client_config = ClientConfig::new();
  client_config.set("bootstrap.servers", kafka.brokers.join(","));

  if let Some(protocol) = &kafka.security_protocol {
    client_config.set("security.protocol", protocol);
  }
  if let Some(mechanism) = &kafka.sasl_mechanism {
    client_config.set("sasl.mechanism", mechanism);
  }
  if let Some(username) = &kafka.username {
    client_config.set("sasl.username", username);
  }
  if let Some(password) = &kafka.password {
    client_config.set("sasl.password", password);
  }

  client_config
}

impl SyncWorkerController {
  pub fn new(args: SyncWorkerControllerArgs) -> Result<SyncWorkerController, BoxedErr> {
    let ie = |msg: &str, err: BoxedErr| {
      let path = "sync-worker.controller.new".into();
      InternalError { err_type: ErrorType::BrokerError, temp: true, err, msg: msg.into(), path }
    };

    let topic = args.config.topics.identity_events.clone();

    // offsets are committed manually once a message is handled or dead-lettered
    let consumer: StreamConsumer = kafka_client_config(&args.config)
      .set("group.id", &args.config.sync.consumer_group)
      .set("auto.offset.reset", "earliest")
      .set("enable.auto.commit", "false")
      .create()
      .map_err(|e| ie("failed to create kafka consumer", Box::new(e)))?;

    consumer
      .subscribe(&[&topic])
      .map_err(|e| ie("failed to subscribe to identity events", Box::new(e)))?;

    let producer: FutureProducer = kafka_client_config(&args.config)
      .set("message.timeout.ms", "5000")
      .create()
      .map_err(|e| ie("failed to create kafka producer", Box::new(e)))?;

    info!("Identity event consumer subscribed to topic: {}", topic);

    Ok(SyncWorkerController {
      sql_db: args.sql_db,
      config: args.config,
      metrics: args.metrics,
      consumer: Arc::new(consumer),
      producer,
      shutdown_notify: Arc::new(Notify::new()),
    })
  }

  /// Run the worker until a shutdown signal is received
  pub async fn run(self) -> Result<(), BoxedErr> {
    self.shutdown_listener();
    self.identity_consumer().await;
    self.consumer_shutdown();
    Ok(())
  }
}
