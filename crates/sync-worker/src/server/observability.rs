use std::{convert::Infallible, sync::Arc};

use http_body_util::Full;
use hyper::{
  body::{Bytes, Incoming},
  header::{HeaderValue, CONTENT_TYPE},
  server::conn::http1::Builder,
  service::service_fn,
  Request, Response, StatusCode,
};
use hyper_util::rt::tokio::TokioIo;
use opentelemetry::metrics::{Counter, MeterProvider as _};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use planboard_config::Settings;
use planboard_result::{BoxedErr, ErrorType, InternalError};
use prometheus::{CounterVec, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder};
use tokio::{net::TcpListener, spawn};

/// Prometheus metrics collector for the sync worker
#[derive(Clone)]
pub struct MetricsCollector {
  config: Arc<Settings>,
  registry: Arc<Registry>,
  /// Dropping the provider shuts the OpenTelemetry pipeline down
  _provider: Arc<SdkMeterProvider>,
  pub offsets_committed: Counter<u64>,
  pub events_received_total: CounterVec,
  pub events_processed_total: CounterVec,
  pub events_failed_total: CounterVec,
  pub dlq_messages_total: IntCounter,
  pub handler_duration_seconds: HistogramVec,
}

impl std::fmt::Debug for MetricsCollector {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MetricsCollector").finish()
  }
}

pub struct MetricsCollectorArgs {
  pub config: Arc<Settings>,
}

impl MetricsCollector {
  pub fn new(args: MetricsCollectorArgs) -> Result<Self, BoxedErr> {
    let ie = |msg: &str, err: BoxedErr| {
      let path = "sync-worker.server.observability".into();
      InternalError { err_type: ErrorType::InternalError, temp: false, err, msg: msg.into(), path }
    };

    let registry = Registry::new();

    let exporter = opentelemetry_prometheus::exporter()
      .with_registry(registry.clone())
      .build()
      .map_err(|err| ie("failed to initialize prometheus exporter", Box::new(err)))?;
    let provider = SdkMeterProvider::builder().with_reader(exporter).build();
    let meter = provider.meter("planboard-sync-worker");
    let offsets_committed = meter
      .u64_counter("sync_offsets_committed")
      .with_description("Consumer offsets committed after a message was settled")
      .build();

    let events_received_total = CounterVec::new(
      Opts::new("sync_events_received_total", "Identity events received from the bus"),
      &["event"],
    )
    .map_err(|err| ie("failed to create events_received_total counter", Box::new(err)))?;
    registry
      .register(Box::new(events_received_total.clone()))
      .map_err(|err| ie("failed to register events_received_total", Box::new(err)))?;

    let events_processed_total = CounterVec::new(
      Opts::new("sync_events_processed_total", "Identity events handled successfully"),
      &["event", "outcome"],
    )
    .map_err(|err| ie("failed to create events_processed_total counter", Box::new(err)))?;
    registry
      .register(Box::new(events_processed_total.clone()))
      .map_err(|err| ie("failed to register events_processed_total", Box::new(err)))?;

    let events_failed_total = CounterVec::new(
      Opts::new("sync_events_failed_total", "Identity events whose handling failed"),
      &["event", "error"],
    )
    .map_err(|err| ie("failed to create events_failed_total counter", Box::new(err)))?;
    registry
      .register(Box::new(events_failed_total.clone()))
      .map_err(|err| ie("failed to register events_failed_total", Box::new(err)))?;

    let dlq_messages_total =
      IntCounter::new("sync_dlq_messages_total", "Messages published to the dead-letter topic")
        .map_err(|err| ie("failed to create dlq_messages_total counter", Box::new(err)))?;
    registry
      .register(Box::new(dlq_messages_total.clone()))
      .map_err(|err| ie("failed to register dlq_messages_total", Box::new(err)))?;

    let handler_duration_seconds = HistogramVec::new(
      HistogramOpts::new("sync_handler_duration_seconds", "Event handler duration in seconds"),
      &["event"],
    )
    .map_err(|err| ie("failed to create handler_duration histogram", Box::new(err)))?;
    registry
      .register(Box::new(handler_duration_seconds.clone()))
      .map_err(|err| ie("failed to register handler_duration_seconds", Box::new(err)))?;

    Ok(MetricsCollector {
      config: args.config,
      registry: Arc::new(registry),
      _provider: Arc::new(provider),
      offsets_committed,
      events_received_total,
      events_processed_total,
      events_failed_total,
      dlq_messages_total,
      handler_duration_seconds,
    })
  }

  /// Start HTTP server to expose metrics for Prometheus
  pub async fn run(&self) -> Result<(), BoxedErr> {
    let url = self.config.hosts.sync_metrics.clone();

    let listener = TcpListener::bind(&url).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Sync worker metrics server listening on {}", addr);

    loop {
      let (socket, _) = listener.accept().await?;
      let io = TokioIo::new(socket);

      let connection_registry = self.registry.clone();

      spawn(async move {
        let svc = service_fn(move |req: Request<Incoming>| {
          let request_registry = connection_registry.clone();
          async move { Ok::<_, Infallible>(metrics_response(req.uri().path(), &request_registry)) }
        });

        if let Err(err) = Builder::new().serve_connection(io, svc).await {
          tracing::error!("Error serving metrics: {}", err);
        }
      });
    }
  }

  /// Prometheus text exposition of the current registry
  pub fn gather_text(&self) -> String {
    encode_registry(&self.registry)
  }

  pub fn record_event_received(&self, event: &str) {
    self.events_received_total.with_label_values(&[event]).inc();
  }

  pub fn record_event_processed(&self, event: &str, outcome: &str) {
    self.events_processed_total.with_label_values(&[event, outcome]).inc();
  }

  pub fn record_event_failed(&self, event: &str, error: &str) {
    self.events_failed_total.with_label_values(&[event, error]).inc();
  }

  pub fn record_offset_committed(&self) {
    self.offsets_committed.add(1, &[]);
  }

  pub fn record_dlq_message(&self) {
    self.dlq_messages_total.inc();
  }

  pub fn observe_handler_duration(&self, event: &str, duration_secs: f64) {
    self.handler_duration_seconds.with_label_values(&[event]).observe(duration_secs);
  }
}

fn encode_registry(registry: &Registry) -> String {
  TextEncoder::new().encode_to_string(&registry.gather()).unwrap_or_default()
}

fn metrics_response(path: &str, registry: &Registry) -> Response<Full<Bytes>> {
  match path {
    "/metrics" => {
      let mut response = Response::new(Full::new(Bytes::from(encode_registry(registry))));
      response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
      );
      response
    }
    "/health" => Response::new(Full::new(Bytes::from_static(b"OK"))),
    _ => {
      let mut response = Response::new(Full::new(Bytes::from_static(b"Not Found")));
      *response.status_mut() = StatusCode::NOT_FOUND;
      response
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn collector() -> MetricsCollector {
    MetricsCollector::new(MetricsCollectorArgs { config: Arc::new(Settings::default()) }).unwrap()
  }

  #[test]
  fn test_counters_show_up_in_exposition() {
    let metrics = collector();
    metrics.record_event_received("clerk/user.created");
    metrics.record_event_processed("clerk/user.created", "applied");
    metrics.record_event_failed("clerk/user.deleted", "not_found");
    metrics.record_dlq_message();
    metrics.record_offset_committed();

    let text = metrics.gather_text();
    assert!(text.contains("sync_events_received_total"));
    assert!(text.contains("outcome=\"applied\""));
    assert!(text.contains("error=\"not_found\""));
    assert!(text.contains("sync_dlq_messages_total 1"));
    assert!(text.contains("sync_offsets_committed"));
  }

  #[test]
  fn test_metrics_routes() {
    let registry = Registry::new();
    assert_eq!(metrics_response("/health", &registry).status(), StatusCode::OK);
    assert_eq!(metrics_response("/metrics", &registry).status(), StatusCode::OK);
    assert_eq!(metrics_response("/nope", &registry).status(), StatusCode::NOT_FOUND);
  }
}
