use std::{io::ErrorKind, sync::Arc};

use planboard_config::{config, Settings};
use planboard_database::{DatabaseInfoSql, DatabaseSql};
use planboard_result::{BoxedErr, ErrorType, SimpleError};
use tokio::spawn;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::{
  controller::{SyncWorkerController, SyncWorkerControllerArgs},
  server::observability::{MetricsCollector, MetricsCollectorArgs},
};

pub mod observability;

pub struct SyncWorkerServer {
  pub(super) sql_db: Arc<DatabaseSql>,
  pub(super) config: Arc<Settings>,
  pub(super) metrics: Arc<MetricsCollector>,
}

impl SyncWorkerServer {
  pub async fn new() -> Result<SyncWorkerServer, BoxedErr> {
    let se = |err: BoxedErr, typ: ErrorType, msg: &str| SimpleError {
      err,
      err_type: typ,
      message: msg.to_string(),
    };

    SyncWorkerServer::setup_logging()?;
    let config = config().await;
    config.preflight_checks();

    let metrics = MetricsCollector::new(MetricsCollectorArgs { config: Arc::new(config.clone()) })?;

    let sql_db = DatabaseInfoSql::Auto.connect().await.map_err(|err| {
      let msg = "failed to connect to the database";
      se(Box::new(std::io::Error::new(ErrorKind::NotConnected, err)), ErrorType::DBConnectionError, msg)
    })?;

    if let DatabaseSql::Reference(_) = sql_db {
      info!("Using the in-memory reference database");
    }

    Ok(SyncWorkerServer {
      sql_db: Arc::new(sql_db),
      config: Arc::new(config),
      metrics: Arc::new(metrics),
    })
  }

  /// Start the metrics server and block on the identity event consumer
  pub async fn run(&self) -> Result<(), BoxedErr> {
    let ctr_args = SyncWorkerControllerArgs {
      sql_db: self.sql_db.clone(),
      config: self.config.clone(),
      metrics: self.metrics.clone(),
    };

    let metrics_clone = self.metrics.clone();
    spawn(async move {
      if let Err(e) = metrics_clone.run().await {
        error!("Metrics server failed: {:?}", e);
      }
    });

    let controller = SyncWorkerController::new(ctr_args)?;
    controller.run().await?; // this will block

    Ok(())
  }

  fn setup_logging() -> Result<(), BoxedErr> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber =
      tracing_subscriber::registry().with(env_filter).with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
  }
}
