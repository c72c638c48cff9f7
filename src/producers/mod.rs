//! Producers feeding the orchestrator: the navigation sentence parser and the
//! environmental reading conversion. Both only ever post validated values,
//! with latest-value semantics, into their mailbox.
pub mod environment;
pub mod gps;
