//! Radio link: RFM69HCW-class transceiver driver and its SPI bus adapter.
//!
//! The driver only depends on the [`RadioBus`](crate::traits::radio_bus::RadioBus)
//! register capability and a [`NodeTimer`](crate::traits::node_timer::NodeTimer),
//! so the whole mode/transmit protocol runs unchanged against a simulated bus.
pub mod driver;
pub mod registers;
pub mod spi_bus;

use registers::{OPMODE_MODE_RX, OPMODE_MODE_STANDBY, OPMODE_MODE_TX};

/// Operating mode the driver may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioMode {
    /// Standby: oscillator running, ready to load the FIFO.
    Idle,
    Rx,
    Tx,
}

impl RadioMode {
    /// Mode bits of the op-mode register.
    pub fn op_mode_bits(self) -> u8 {
        match self {
            Self::Idle => OPMODE_MODE_STANDBY,
            Self::Rx => OPMODE_MODE_RX,
            Self::Tx => OPMODE_MODE_TX,
        }
    }
}

/// Mode recorded by the driver. `Unknown` until the transceiver has been
/// identified and configured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioState {
    #[default]
    Unknown,
    Idle,
    Rx,
    Tx,
}

impl From<RadioMode> for RadioState {
    fn from(mode: RadioMode) -> Self {
        match mode {
            RadioMode::Idle => Self::Idle,
            RadioMode::Rx => Self::Rx,
            RadioMode::Tx => Self::Tx,
        }
    }
}

/// How a transmission ended. Packets are never acknowledged, so `Sent` only
/// means the transceiver reported the packet as shifted out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxOutcome {
    Sent,
    /// Packet-sent flag never rose within the poll budget.
    Unconfirmed,
}
