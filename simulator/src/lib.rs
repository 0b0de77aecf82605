//! A Confluent Cloud simulator.
//!
//! Serves the control-plane API under `/api` and the per-cluster Kafka API under
//! `/2.0/kafka`, backed by in-memory state.

pub mod server;
pub mod testing;
