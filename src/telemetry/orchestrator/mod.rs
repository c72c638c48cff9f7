//! Telemetry orchestrator: merges the latest fix and sample, keeps the clock
//! authority in sync and emits one frame per transmit interval.
//!
//! The orchestrator never talks to the radio. Producers post into the fix and
//! sample mailboxes, the orchestrator drains them on its own cadence and
//! offers finished frames to the outbound mailbox read by the radio driver.
//! Every mailbox access is zero-timeout: a busy peer costs a dropped or
//! replaced message, never a stalled task.
use crate::config::{ORCHESTRATOR_PERIOD_MS, TRANSMIT_INTERVAL_MS};
use crate::error::CodecError;
use crate::infra::mailbox::{Delivery, Mailbox};
use crate::telemetry::frame::TelemetryFrame;
use crate::telemetry::types::{EnvironmentalSample, LocationTimeFix};
use crate::traits::{clock_authority::ClockAuthority, node_timer::NodeTimer};

/// Result of one frame assembly attempt. None of these are errors: the next
/// interval simply tries again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssemblyOutcome {
    /// Frame handed to the outbound mailbox.
    Queued,
    /// Outbound mailbox still held the previous frame; this one was discarded.
    Dropped,
    /// No fix received yet.
    MissingFix,
    /// No sample received yet.
    MissingSample,
    /// Clock authority could not be read; nothing was changed.
    ClockUnavailable,
    /// Frame layout did not fit the frame buffer.
    EncodeFailed(CodecError),
}

/// Latest-value merge of producer data, driven by [`Orchestrator::tick`].
pub struct Orchestrator<'a, C: ClockAuthority> {
    /// Authoritative wall clock (RTC).
    clock: C,
    /// Inbound fixes from the navigation receiver.
    fixes: &'a Mailbox<LocationTimeFix>,
    /// Inbound environmental samples.
    samples: &'a Mailbox<EnvironmentalSample>,
    /// Outbound frames for the radio driver.
    frames: &'a Mailbox<TelemetryFrame>,
    latest_fix: Option<LocationTimeFix>,
    latest_sample: Option<EnvironmentalSample>,
    /// Milliseconds accumulated since the last assembly attempt.
    elapsed_ms: u32,
}

impl<'a, C: ClockAuthority> Orchestrator<'a, C> {
    /// Create an orchestrator with nothing received yet.
    pub fn new(
        clock: C,
        fixes: &'a Mailbox<LocationTimeFix>,
        samples: &'a Mailbox<EnvironmentalSample>,
        frames: &'a Mailbox<TelemetryFrame>,
    ) -> Self {
        Self {
            clock,
            fixes,
            samples,
            frames,
            latest_fix: None,
            latest_sample: None,
            elapsed_ms: 0,
        }
    }

    /// Store a new fix and push its date/time to the clock authority.
    ///
    /// The fix is kept even when the clock rejects the update; the error is
    /// returned so the caller can report it, and the next fix retries.
    pub fn on_fix_received(&mut self, fix: LocationTimeFix) -> Result<(), C::Error> {
        self.latest_fix = Some(fix);
        let result = self.clock.set(&fix.datetime());
        if let Err(ref _err) = result {
            #[cfg(feature = "defmt")]
            defmt::warn!("Clock update failed: {}", defmt::Debug2Format(_err));
        }
        result
    }

    /// Store a new sample.
    pub fn on_sample_received(&mut self, sample: EnvironmentalSample) {
        self.latest_sample = Some(sample);
    }

    /// Advance the transmit accumulator by `elapsed_ms`.
    ///
    /// Once [`TRANSMIT_INTERVAL_MS`] is reached one assembly is attempted and
    /// its outcome returned. The overshoot past the interval boundary is kept,
    /// so ticks that do not divide the interval do not drift the cadence. A
    /// single tick never triggers two frames.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<AssemblyOutcome> {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms < TRANSMIT_INTERVAL_MS {
            return None;
        }
        self.elapsed_ms %= TRANSMIT_INTERVAL_MS;
        Some(self.assemble_and_send())
    }

    /// Build a frame from the latest sample and fix, stamped with the clock
    /// authority's time, and offer it to the radio driver.
    pub fn assemble_and_send(&mut self) -> AssemblyOutcome {
        let Some(fix) = self.latest_fix else {
            #[cfg(feature = "defmt")]
            defmt::debug!("Skipping frame: no fix yet");
            return AssemblyOutcome::MissingFix;
        };
        let Some(sample) = self.latest_sample else {
            #[cfg(feature = "defmt")]
            defmt::debug!("Skipping frame: no sample yet");
            return AssemblyOutcome::MissingSample;
        };

        let now = match self.clock.get() {
            Ok(now) => now,
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Clock read failed: {}", defmt::Debug2Format(&_err));
                return AssemblyOutcome::ClockUnavailable;
            }
        };

        let fix = fix.with_datetime(now);
        self.latest_fix = Some(fix);

        let frame = match TelemetryFrame::encode(&sample, &fix) {
            Ok(frame) => frame,
            Err(err) => return AssemblyOutcome::EncodeFailed(err),
        };

        match self.frames.try_post(frame) {
            Delivery::Dropped => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Outbound frame mailbox full, frame dropped");
                AssemblyOutcome::Dropped
            }
            Delivery::Accepted | Delivery::Replaced => {
                #[cfg(feature = "defmt")]
                defmt::info!("Frame queued for transmission");
                AssemblyOutcome::Queued
            }
        }
    }

    /// Drain whatever the producers posted since the last call.
    pub fn poll_inputs(&mut self) {
        if let Some(fix) = self.fixes.try_take() {
            // Clock failures are already reported and retried on the next fix.
            let _ = self.on_fix_received(fix);
        }
        if let Some(sample) = self.samples.try_take() {
            self.on_sample_received(sample);
        }
    }

    /// Task loop: drain inputs, advance the cadence, sleep one period.
    pub async fn run<T: NodeTimer>(&mut self, timer: &mut T) {
        loop {
            self.poll_inputs();
            let _outcome = self.tick(ORCHESTRATOR_PERIOD_MS);
            timer.delay_ms(ORCHESTRATOR_PERIOD_MS).await;
        }
    }

    /// Most recent fix, with the date/time of the last assembly if any.
    pub fn latest_fix(&self) -> Option<LocationTimeFix> {
        self.latest_fix
    }

    pub fn latest_sample(&self) -> Option<EnvironmentalSample> {
        self.latest_sample
    }

    /// Milliseconds accumulated towards the next assembly.
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Access the clock authority (e.g. to inspect a simulated RTC).
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
