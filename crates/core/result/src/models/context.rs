use ulid::Ulid;

/// Per-event (or per-request) context threaded through repository calls
#[derive(Debug, Clone, Default)]
pub struct Context {
  pub request_id: String,
  pub event_name: String,
  pub path: String,
  pub received_at: i64,
}

impl Context {
  pub fn new(
    request_id: impl Into<String>,
    event_name: impl Into<String>,
    path: impl Into<String>,
    received_at: i64,
  ) -> Self {
    let request_id: String = request_id.into();
    let request_id = if request_id.is_empty() { Ulid::new().to_string() } else { request_id };

    Self { request_id, event_name: event_name.into(), path: path.into(), received_at }
  }

  pub fn request_id(&self) -> &str {
    &self.request_id
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_context_generates_request_id_when_missing() {
    let ctx = Context::new("", "clerk/user.created", "sync", 0);
    assert_eq!(ctx.request_id().len(), 26);

    let ctx = Context::new("evt_1", "clerk/user.created", "sync", 0);
    assert_eq!(ctx.request_id(), "evt_1");
  }
}
