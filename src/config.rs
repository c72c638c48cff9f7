//! Node timing constants and radio configuration.
//!
//! ## Cadences
//!
//! Every component runs a cooperative loop ending with a fixed delay. The
//! delays below are the only yield points of the node, together with the
//! bounded bus polls of the radio driver.

/// Orchestrator loop period (ms).
///
/// Sensor mailboxes are drained and the transmit accumulator advanced once per
/// period. Anything between 200 and 250 ms keeps the frame cadence accurate to
/// a quarter second while leaving the core idle most of the time.
pub const ORCHESTRATOR_PERIOD_MS: u32 = 200;

/// Interval between two telemetry frames (ms).
pub const TRANSMIT_INTERVAL_MS: u32 = 5_000;

/// Radio driver loop period (ms).
pub const RADIO_CYCLE_MS: u32 = 500;

/// Number of radio cycles between two transmissions (10 × 500 ms = 5 s).
pub const RADIO_TRANSMIT_EVERY_CYCLES: u8 = 10;

/// Producer loop period for the environmental sensor (ms).
pub const SENSOR_PERIOD_MS: u32 = 1_000;

/// Maximum number of mode-ready / packet-sent polls, one per millisecond.
///
/// A wedged transceiver therefore costs at most 100 ms of bus time per
/// transition before the driver gives up and retries on its next cycle.
pub const MODE_POLL_LIMIT: u16 = 100;

/// Hold time on each edge of the reset pulse (ms).
pub const RESET_HOLD_MS: u32 = 15;

//==================================================================================RADIO_CONFIG

/// Transceiver crystal frequency (Hz).
pub const CRYSTAL_HZ: u32 = 32_000_000;

/// Carrier and deviation register step (Hz), i.e. 32 MHz / 2^19 rounded.
pub const FREQUENCY_STEP_HZ: u32 = 61;

/// Over-the-air bit rate (bit/s).
pub const BIT_RATE_BPS: u32 = 4_800;

/// FSK frequency deviation (Hz).
pub const FREQUENCY_DEVIATION_HZ: u32 = 5_000;

/// Lowest transmit power accepted by the PA0 output stage (dBm).
pub const TX_POWER_MIN_DBM: i8 = -18;

/// Highest transmit power accepted by the PA0 output stage (dBm).
pub const TX_POWER_MAX_DBM: i8 = 13;

/// Largest payload the receive path accepts (bytes).
pub const MAX_PAYLOAD_LEN: usize = 60;

/// Runtime configuration of the radio link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioConfig {
    /// Carrier frequency in kHz (915000 = 915.000 MHz).
    pub frequency_khz: u32,
    /// Requested output power; clamped to the PA range when programmed.
    pub tx_power_dbm: i8,
    /// Preamble length in bytes.
    pub preamble_len: u16,
    /// Sync word bytes, sent MSB first.
    pub sync_words: [u8; 2],
    /// Driver cycles between two transmissions.
    pub transmit_every_cycles: u8,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            frequency_khz: 915_000,
            tx_power_dbm: 10,
            preamble_len: 44,
            sync_words: [0x2D, 0xD4],
            transmit_every_cycles: RADIO_TRANSMIT_EVERY_CYCLES,
        }
    }
}
