//! Abstraction traits for the hardware the core depends on (radio bus, timer,
//! real-time clock, environmental sensor).
pub mod clock_authority;
pub mod environment_sensor;
pub mod node_timer;
pub mod radio_bus;
