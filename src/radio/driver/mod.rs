//! RFM69HCW link driver: reset and identification, register configuration,
//! the mode state machine and the FIFO transmit/receive paths.
//!
//! Every hardware wait is a bounded poll (one bus read per millisecond, at
//! most [`MODE_POLL_LIMIT`] times), so a silent transceiver costs a bounded
//! amount of time and the cycle loop simply retries on its next period. No
//! failure is fatal: the recorded [`RadioState`] only changes after the
//! transceiver confirmed the transition.
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use futures_util::{future::select, future::Either, pin_mut};
use heapless::Vec;

use crate::config::{
    RadioConfig, BIT_RATE_BPS, CRYSTAL_HZ, FREQUENCY_DEVIATION_HZ, FREQUENCY_STEP_HZ,
    MAX_PAYLOAD_LEN, MODE_POLL_LIMIT, RADIO_CYCLE_MS, RESET_HOLD_MS, TX_POWER_MAX_DBM,
    TX_POWER_MIN_DBM,
};
use crate::error::RadioError;
use crate::infra::mailbox::Mailbox;
use crate::radio::{registers::*, RadioMode, RadioState, TxOutcome};
use crate::telemetry::frame::TelemetryFrame;
use crate::traits::{node_timer::NodeTimer, radio_bus::RadioBus};

/// Received packet, length byte included.
pub type Payload = Vec<u8, MAX_PAYLOAD_LEN>;

//==================================================================================REGISTER_ENCODERS
/// Largest value the 24-bit carrier register holds.
const FRF_MAX: u64 = 0x00FF_FFFF;

/// Carrier registers (MSB, MID, LSB) for a frequency in kHz:
/// `round(khz * 1000 / 61)`. `None` when the result does not fit 24 bits.
pub fn frequency_registers(frequency_khz: u32) -> Option<[u8; 3]> {
    let step = u64::from(FREQUENCY_STEP_HZ);
    let frf = (u64::from(frequency_khz) * 1000 + step / 2) / step;
    if frf > FRF_MAX {
        return None;
    }
    Some([(frf >> 16) as u8, (frf >> 8) as u8, frf as u8])
}

/// PA level register for a requested power, clamped to -18..=13 dBm.
pub fn power_level_register(power_dbm: i8) -> u8 {
    let clamped = power_dbm.clamp(TX_POWER_MIN_DBM, TX_POWER_MAX_DBM);
    let level = (i16::from(clamped) - i16::from(TX_POWER_MIN_DBM)) as u8;
    PALEVEL_PA0_ON | (level & PALEVEL_OUTPUT_POWER)
}

/// Bit rate registers (MSB, LSB): `round(32 MHz / bps)`.
pub fn bit_rate_registers(bit_rate_bps: u32) -> [u8; 2] {
    let divider = (CRYSTAL_HZ + bit_rate_bps / 2) / bit_rate_bps.max(1);
    [(divider >> 8) as u8, divider as u8]
}

/// Frequency deviation registers (MSB, LSB): `round(deviation / 61)`.
pub fn deviation_registers(deviation_hz: u32) -> [u8; 2] {
    let steps = (deviation_hz + FREQUENCY_STEP_HZ / 2) / FREQUENCY_STEP_HZ;
    [((steps >> 8) & 0x3F) as u8, steps as u8]
}

//==================================================================================RADIO_DRIVER
/// Driver context. Owns the bus, the recorded mode and the receive buffer.
pub struct RadioDriver<'a, B: RadioBus, T: NodeTimer> {
    bus: B,
    timer: T,
    config: RadioConfig,
    /// Frames queued by the orchestrator.
    frames: &'a Mailbox<TelemetryFrame>,
    state: RadioState,
    /// Cycles since the last transmit slot.
    cycle_count: u8,
    received: Payload,
    /// A complete packet sits in `received`.
    receive_ready: bool,
}

impl<'a, B: RadioBus, T: NodeTimer> RadioDriver<'a, B, T> {
    /// Create a driver in the `Unknown` state. Nothing touches the bus until
    /// [`initialize`](Self::initialize) or the first [`run_cycle`](Self::run_cycle).
    pub fn new(bus: B, timer: T, config: RadioConfig, frames: &'a Mailbox<TelemetryFrame>) -> Self {
        Self {
            bus,
            timer,
            config,
            frames,
            state: RadioState::Unknown,
            cycle_count: 0,
            received: Vec::new(),
            receive_ready: false,
        }
    }

    pub fn state(&self) -> RadioState {
        self.state
    }

    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    /// Cycles counted towards the next transmit slot.
    pub fn cycle_count(&self) -> u8 {
        self.cycle_count
    }

    /// Access the underlying bus (inspection in tests and simulations).
    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Reset, identify and configure the transceiver.
    ///
    /// On success the radio sits in `Idle`. On any failure the recorded state
    /// is `Unknown`, so the cycle loop will retry the whole sequence.
    pub async fn initialize(&mut self) -> Result<(), RadioError<B::Error>> {
        self.state = RadioState::Unknown;
        let result = self.reset_and_configure().await;
        match result {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("Radio initialized at {} kHz", self.config.frequency_khz);
            }
            Err(ref _err) => {
                self.state = RadioState::Unknown;
                #[cfg(feature = "defmt")]
                defmt::warn!("Radio initialization failed: {}", defmt::Debug2Format(_err));
            }
        }
        result
    }

    async fn reset_and_configure(&mut self) -> Result<(), RadioError<B::Error>> {
        self.bus.assert_reset().map_err(RadioError::Bus)?;
        self.timer.delay_ms(RESET_HOLD_MS).await;
        self.bus.release_reset().map_err(RadioError::Bus)?;
        self.timer.delay_ms(RESET_HOLD_MS).await;

        let version = self.read(REG_VERSION).await?;
        if version != CHIP_VERSION {
            return Err(RadioError::DeviceNotFound { version });
        }

        self.set_mode(RadioMode::Idle).await?;

        self.write(REG_FIFOTHRESH, FIFOTHRESH_DEFAULT).await?;
        self.write(REG_TESTDAGC, TESTDAGC_IMPROVED_LOW_BETA_OFF).await?;
        self.write(REG_TESTPA1, TESTPA1_NORMAL).await?;
        self.write(REG_TESTPA2, TESTPA2_NORMAL).await?;

        self.set_sync_words().await?;
        self.set_modem_config().await?;
        self.set_preamble_length(self.config.preamble_len).await?;
        self.set_frequency(self.config.frequency_khz).await?;
        self.disable_encryption().await?;
        self.set_tx_power(self.config.tx_power_dbm).await
    }

    /// Request `target` and wait for the mode-ready flag.
    ///
    /// Timing out leaves the recorded state untouched.
    pub async fn set_mode(&mut self, target: RadioMode) -> Result<(), RadioError<B::Error>> {
        let op_mode = self.read(REG_OPMODE).await?;
        let op_mode = (op_mode & !OPMODE_MODE_MASK) | (target.op_mode_bits() & OPMODE_MODE_MASK);
        self.write(REG_OPMODE, op_mode).await?;

        if !self.poll_flag(REG_IRQFLAGS1, IRQFLAGS1_MODE_READY).await? {
            #[cfg(feature = "defmt")]
            defmt::warn!("Mode {} not ready after {} polls", target, MODE_POLL_LIMIT);
            return Err(RadioError::ModeTimeout { target });
        }
        self.state = target.into();
        Ok(())
    }

    /// Program the carrier frequency. Nothing is written when the frequency
    /// is beyond the carrier register range.
    pub async fn set_frequency(&mut self, frequency_khz: u32) -> Result<(), RadioError<B::Error>> {
        let [msb, mid, lsb] = frequency_registers(frequency_khz)
            .ok_or(RadioError::FrequencyOutOfRange { frequency_khz })?;
        self.write(REG_FRF_MSB, msb).await?;
        self.write(REG_FRF_MID, mid).await?;
        self.write(REG_FRF_LSB, lsb).await
    }

    /// Program the PA0 output power (clamped).
    pub async fn set_tx_power(&mut self, power_dbm: i8) -> Result<(), RadioError<B::Error>> {
        self.write(REG_PALEVEL, power_level_register(power_dbm)).await
    }

    async fn set_sync_words(&mut self) -> Result<(), RadioError<B::Error>> {
        let sync_config = self.read(REG_SYNCCONFIG).await?;
        let sync_words = self.config.sync_words;
        for (offset, word) in (0u8..).zip(sync_words) {
            self.write(REG_SYNCVALUE1 + offset, word).await?;
        }
        // Size field holds the word count minus one.
        let size = ((sync_words.len() as u8 - 1) << 3) & SYNCCONFIG_SYNC_SIZE;
        let sync_config = (sync_config & !SYNCCONFIG_SYNC_SIZE) | size | SYNCCONFIG_SYNC_ON;
        self.write(REG_SYNCCONFIG, sync_config).await
    }

    async fn set_modem_config(&mut self) -> Result<(), RadioError<B::Error>> {
        self.write(
            REG_DATAMODUL,
            DATAMODUL_PACKET_MODE | DATAMODUL_FSK | DATAMODUL_SHAPING_BT1_0,
        )
        .await?;

        let [msb, lsb] = bit_rate_registers(BIT_RATE_BPS);
        self.write(REG_BITRATE_MSB, msb).await?;
        self.write(REG_BITRATE_LSB, lsb).await?;

        let [msb, lsb] = deviation_registers(FREQUENCY_DEVIATION_HZ);
        self.write(REG_FDEV_MSB, msb).await?;
        self.write(REG_FDEV_LSB, lsb).await?;

        self.write(REG_RXBW, RXBW_DEFAULT).await?;
        self.write(REG_AFCBW, RXBW_DEFAULT).await?;

        self.write(
            REG_PACKETCONFIG1,
            PACKETCONFIG1_VARIABLE_LENGTH
                | PACKETCONFIG1_DCFREE_WHITENING
                | PACKETCONFIG1_CRC_ON
                | PACKETCONFIG1_NO_ADDRESS_FILTER,
        )
        .await?;
        // Upper bound for variable-length reception.
        self.write(REG_PAYLOAD_LENGTH, MAX_PAYLOAD_LEN as u8).await
    }

    async fn set_preamble_length(&mut self, length: u16) -> Result<(), RadioError<B::Error>> {
        let [msb, lsb] = length.to_be_bytes();
        self.write(REG_PREAMBLE_MSB, msb).await?;
        self.write(REG_PREAMBLE_LSB, lsb).await
    }

    async fn disable_encryption(&mut self) -> Result<(), RadioError<B::Error>> {
        let config = self.read(REG_PACKETCONFIG2).await?;
        self.write(REG_PACKETCONFIG2, config & !PACKETCONFIG2_AES_ON).await
    }

    //==============================================================================RECEIVE
    /// Switch to receive and report whether a packet is waiting in
    /// [`take_received`](Self::take_received).
    pub async fn data_available(&mut self) -> Result<bool, RadioError<B::Error>> {
        self.set_mode(RadioMode::Rx).await?;
        Ok(self.receive_ready)
    }

    /// Service the payload interrupt. Returns `true` when a packet was
    /// latched.
    pub async fn handle_interrupt(&mut self) -> Result<bool, RadioError<B::Error>> {
        Self::service_interrupt(&mut self.bus, &mut self.received, &mut self.receive_ready).await
    }

    /// Interrupt path on borrowed fields only, so the cycle delay can stay
    /// pending on the timer while a packet is drained.
    async fn service_interrupt(
        bus: &mut B,
        received: &mut Payload,
        receive_ready: &mut bool,
    ) -> Result<bool, RadioError<B::Error>> {
        let flags = bus
            .read_register(REG_IRQFLAGS2)
            .await
            .map_err(RadioError::Bus)?;
        if flags & IRQFLAGS2_PAYLOAD_READY == 0 {
            return Ok(false);
        }
        *received = Self::read_payload(bus).await?;
        *receive_ready = true;
        Ok(true)
    }

    /// Drain one packet from the FIFO. The first byte is the packet length,
    /// counting itself, as in [`TelemetryFrame`].
    async fn read_payload(bus: &mut B) -> Result<Payload, RadioError<B::Error>> {
        let mut length = [0u8; 1];
        bus.read_fifo(&mut length).await.map_err(RadioError::Bus)?;
        let len = length[0];
        if len == 0 || usize::from(len) > MAX_PAYLOAD_LEN {
            return Err(RadioError::PayloadTooLong { len });
        }

        let mut packet = [0u8; MAX_PAYLOAD_LEN];
        packet[0] = len;
        bus.read_fifo(&mut packet[1..usize::from(len)])
            .await
            .map_err(RadioError::Bus)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Received {} byte packet", len);
        Vec::from_slice(&packet[..usize::from(len)]).map_err(|_| RadioError::PayloadTooLong { len })
    }

    /// Hand out the latched packet and clear the latch.
    pub fn take_received(&mut self) -> Option<Payload> {
        if !self.receive_ready {
            return None;
        }
        self.receive_ready = false;
        Some(core::mem::take(&mut self.received))
    }

    //==============================================================================TRANSMIT
    /// Send one frame and return to `Idle`.
    ///
    /// The return to `Idle` is attempted on every path once the FIFO was
    /// loaded. A missing packet-sent flag is reported as
    /// [`TxOutcome::Unconfirmed`], not as an error.
    pub async fn transmit(
        &mut self,
        frame: &TelemetryFrame,
    ) -> Result<TxOutcome, RadioError<B::Error>> {
        self.bus
            .write_fifo(frame.as_bytes())
            .await
            .map_err(RadioError::Bus)?;

        if let Err(err) = self.set_mode(RadioMode::Tx).await {
            let _ = self.set_mode(RadioMode::Idle).await;
            return Err(err);
        }

        let sent = self.poll_flag(REG_IRQFLAGS2, IRQFLAGS2_PACKET_SENT).await;
        let idle = self.set_mode(RadioMode::Idle).await;
        let outcome = if sent? {
            TxOutcome::Sent
        } else {
            TxOutcome::Unconfirmed
        };
        idle?;

        #[cfg(feature = "defmt")]
        defmt::info!("Frame transmitted: {}", outcome);
        Ok(outcome)
    }

    //==============================================================================CYCLE
    /// One driver period: initialize when needed, and on every transmit slot
    /// send at most one queued frame.
    pub async fn run_cycle(&mut self) -> Result<Option<TxOutcome>, RadioError<B::Error>> {
        self.cycle_count = self.cycle_count.saturating_add(1);

        if self.state == RadioState::Unknown {
            self.initialize().await?;
        }

        if self.state == RadioState::Idle && self.cycle_count >= self.config.transmit_every_cycles
        {
            self.cycle_count = 0;
            if let Some(frame) = self.frames.try_take() {
                return self.transmit(&frame).await.map(Some);
            }
        }
        Ok(None)
    }

    /// Task loop: run a cycle every [`RADIO_CYCLE_MS`] and service the
    /// payload interrupt as soon as `irq` is signalled.
    ///
    /// The cycle delay keeps running while interrupts are serviced, so a busy
    /// interrupt line never postpones the next cycle.
    pub async fn run(&mut self, irq: &Signal<CriticalSectionRawMutex, ()>) {
        loop {
            {
                let delay = self.timer.delay_ms(RADIO_CYCLE_MS);
                pin_mut!(delay);
                loop {
                    let wait = irq.wait();
                    pin_mut!(wait);
                    match select(wait, delay.as_mut()).await {
                        Either::Left(_) => {
                            let serviced = Self::service_interrupt(
                                &mut self.bus,
                                &mut self.received,
                                &mut self.receive_ready,
                            )
                            .await;
                            if let Err(ref _err) = serviced {
                                #[cfg(feature = "defmt")]
                                defmt::warn!("Radio interrupt failed: {}", defmt::Debug2Format(_err));
                            }
                        }
                        Either::Right(_) => break,
                    }
                }
            }

            if let Err(ref _err) = self.run_cycle().await {
                #[cfg(feature = "defmt")]
                defmt::warn!("Radio cycle failed: {}", defmt::Debug2Format(_err));
            }
        }
    }

    //==============================================================================BUS_HELPERS
    async fn read(&mut self, addr: u8) -> Result<u8, RadioError<B::Error>> {
        self.bus.read_register(addr).await.map_err(RadioError::Bus)
    }

    async fn write(&mut self, addr: u8, value: u8) -> Result<(), RadioError<B::Error>> {
        self.bus
            .write_register(addr, value)
            .await
            .map_err(RadioError::Bus)
    }

    /// Poll `addr` until `mask` is set, once per millisecond, at most
    /// [`MODE_POLL_LIMIT`] reads.
    async fn poll_flag(&mut self, addr: u8, mask: u8) -> Result<bool, RadioError<B::Error>> {
        for _ in 0..MODE_POLL_LIMIT {
            if self.read(addr).await? & mask != 0 {
                return Ok(true);
            }
            self.timer.delay_ms(1).await;
        }
        Ok(false)
    }
}
