//! `telemetry-node` library: the firmware core of a battery-powered telemetry
//! node in a `no_std` environment. The crate exposes the telemetry
//! orchestrator (latest-value merge of GPS fixes and environmental samples,
//! fixed-cadence frame assembly), the RFM69HCW radio link driver, the
//! producers feeding them and the hardware seams they depend on.
#![no_std]
//==================================================================================
/// Timing constants and radio link configuration.
pub mod config;
/// Domain and low-level errors (radio bus, producer validation, frame
/// decoding).
pub mod error;
/// Byte codec and inter-task mailboxes.
pub mod infra;
/// GPS sentence parsing and environmental reading conversion.
pub mod producers;
/// Transceiver driver, register map and SPI transport.
pub mod radio;
/// Telemetry value types, wire frame and orchestrator.
pub mod telemetry;
/// Hardware abstraction traits (radio bus, timer, clock, sensor).
pub mod traits;
//==================================================================================
