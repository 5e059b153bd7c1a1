pub mod dlq;
pub mod events;
