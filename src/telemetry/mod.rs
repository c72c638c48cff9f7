//! Telemetry side of the node: validated value types, the 24-byte wire frame
//! and the orchestrator merging producer data on the transmit cadence.
pub mod frame;
pub mod orchestrator;
pub mod types;
