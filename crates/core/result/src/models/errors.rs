use std::{error::Error, fmt};

pub type BoxedErr = Box<dyn Error + Sync + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
  // General errors
  NotFound,

  // Validation errors
  InvalidData,

  // Existence & uniqueness
  ResourceExists,

  // Database errors
  DatabaseError,
  DBConnectionError,
  DBSelectError,
  DBInsertError,
  DBUpdateError,
  DBDeleteError,

  // External service errors
  InternalError,
  BrokerError,

  // JSON errors
  JsonUnmarshal,
}

impl ErrorType {
  /// Short, stable label used for metrics and structured logs
  pub fn as_label(&self) -> &'static str {
    match self {
      ErrorType::NotFound => "not_found",
      ErrorType::InvalidData => "invalid_data",
      ErrorType::ResourceExists => "resource_exists",
      ErrorType::DatabaseError => "database_error",
      ErrorType::DBConnectionError => "db_connection_error",
      ErrorType::DBSelectError => "db_select_error",
      ErrorType::DBInsertError => "db_insert_error",
      ErrorType::DBUpdateError => "db_update_error",
      ErrorType::DBDeleteError => "db_delete_error",
      ErrorType::InternalError => "internal_error",
      ErrorType::BrokerError => "broker_error",
      ErrorType::JsonUnmarshal => "json_unmarshal",
    }
  }
}

impl fmt::Display for ErrorType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ErrorType::NotFound => write!(f, "Resource not found"),
      ErrorType::InvalidData => write!(f, "Invalid data"),
      ErrorType::ResourceExists => write!(f, "Resource already exists"),
      ErrorType::DatabaseError => write!(f, "Database error"),
      ErrorType::DBConnectionError => write!(f, "Database connection error"),
      ErrorType::DBSelectError => write!(f, "Database select error"),
      ErrorType::DBInsertError => write!(f, "Database insert error"),
      ErrorType::DBUpdateError => write!(f, "Database update error"),
      ErrorType::DBDeleteError => write!(f, "Database delete error"),
      ErrorType::InternalError => write!(f, "Internal error"),
      ErrorType::BrokerError => write!(f, "Message broker error"),
      ErrorType::JsonUnmarshal => write!(f, "JSON unmarshaling error"),
    }
  }
}

#[derive(Debug)]
pub struct DBError {
  pub err_type: ErrorType,
  pub err: BoxedErr,
  pub msg: String,
  pub path: String,
}

impl Default for DBError {
  fn default() -> Self {
    Self {
      err_type: ErrorType::DatabaseError,
      err: Box::new(std::io::Error::new(std::io::ErrorKind::Other, "Database error")),
      msg: String::new(),
      path: String::new(),
    }
  }
}

impl fmt::Display for DBError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut parts = Vec::new();

    if !self.path.is_empty() {
      parts.push(format!("path: {}", self.path));
    }
    parts.push(format!("err_type: {}", self.err_type));
    if !self.msg.is_empty() {
      parts.push(format!("msg: {}", self.msg));
    }
    parts.push(format!("err: {}", self.err));

    write!(f, "{}", parts.join(", "))
  }
}

impl Error for DBError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(self.err.as_ref())
  }
}

impl DBError {
  pub fn not_found(path: impl Into<String>, msg: impl Into<String>) -> Self {
    Self { err_type: ErrorType::NotFound, msg: msg.into(), path: path.into(), ..Default::default() }
  }

  pub fn exists(path: impl Into<String>, msg: impl Into<String>) -> Self {
    let err_type = ErrorType::ResourceExists;
    Self { err_type, msg: msg.into(), path: path.into(), ..Default::default() }
  }

  pub fn is_not_found(&self) -> bool {
    self.err_type == ErrorType::NotFound
  }
}

#[derive(Debug)]
pub struct SimpleError {
  pub message: String,
  pub err_type: ErrorType,
  pub err: BoxedErr,
}

impl fmt::Display for SimpleError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.err_type, self.message)
  }
}

impl Error for SimpleError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(self.err.as_ref())
  }
}

/// An error raised by infrastructure code (broker, metrics, bootstrapping)
/// rather than by a repository call
#[derive(Debug)]
pub struct InternalError {
  pub err_type: ErrorType,
  /// Whether the failure is transient
  pub temp: bool,
  pub err: BoxedErr,
  pub msg: String,
  pub path: String,
}

impl fmt::Display for InternalError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "path: {}, err_type: {}, msg: {}, err: {}", self.path, self.err_type, self.msg, self.err)
  }
}

impl Error for InternalError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(self.err.as_ref())
  }
}
