use std::{sync::Arc, time::Instant};

use planboard_database::AbstractDatabaseSql;
use planboard_result::{BoxedErr, Context, ErrorType, InternalError};
use planboard_utils::time_get_millis;
use tracing::{info, warn};

use crate::{
  models::events::{EventEnvelope, IdentityEvent},
  sync::{dispatch, SyncOutcome},
};

/// What happened to a single bus message
#[derive(Debug, Clone, PartialEq)]
pub struct EventReport {
  pub request_id: String,
  pub name: String,
  pub outcome: SyncOutcome,
  pub elapsed_secs: f64,
}

/// A message that could not be applied, with the label used for metrics
#[derive(Debug)]
pub struct EventFailure {
  pub name: String,
  pub err_type: ErrorType,
  pub err: BoxedErr,
}

impl std::fmt::Display for EventFailure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} failed ({}): {}", self.name, self.err_type, self.err)
  }
}

/// Decode one identity event and apply it to the database. Unknown event
/// names are acknowledged as skipped.
pub async fn identity_event_processor(
  payload: &str,
  db: &dyn AbstractDatabaseSql,
) -> Result<EventReport, EventFailure> {
  let ie = |err: BoxedErr, msg: String| InternalError {
    err_type: ErrorType::JsonUnmarshal,
    temp: false,
    err,
    msg,
    path: "sync-worker.controller.event_processor".into(),
  };

  let envelope: EventEnvelope = serde_json::from_str(payload).map_err(|err| {
    let msg = format!("failed to deserialize event envelope: {}", err);
    EventFailure {
      name: "unknown".to_string(),
      err_type: ErrorType::JsonUnmarshal,
      err: Box::new(ie(Box::new(err), msg)),
    }
  })?;

  let received_at = time_get_millis();
  let ctx = Arc::new(Context::new(
    envelope.id.clone().unwrap_or_default(),
    envelope.name.clone(),
    "sync-worker.identity_consumer",
    received_at,
  ));
  let start = Instant::now();

  let event = IdentityEvent::from_envelope(&envelope).map_err(|err| {
    let msg = format!("failed to deserialize {} payload: {}", envelope.name, err);
    EventFailure {
      name: envelope.name.clone(),
      err_type: ErrorType::JsonUnmarshal,
      err: Box::new(ie(Box::new(err), msg)),
    }
  })?;

  let Some(event) = event else {
    warn!(request_id = %ctx.request_id, event = %envelope.name, "ignoring unknown identity event");
    return Ok(EventReport {
      request_id: ctx.request_id.clone(),
      name: envelope.name,
      outcome: SyncOutcome::Skipped,
      elapsed_secs: start.elapsed().as_secs_f64(),
    });
  };

  let outcome = dispatch(ctx.clone(), db, &event).await.map_err(|err| EventFailure {
    name: envelope.name.clone(),
    err_type: err.err_type(),
    err: Box::new(err),
  })?;

  info!(request_id = %ctx.request_id, event = %envelope.name, %outcome, "identity event synced");

  Ok(EventReport {
    request_id: ctx.request_id.clone(),
    name: envelope.name,
    outcome,
    elapsed_secs: start.elapsed().as_secs_f64(),
  })
}
