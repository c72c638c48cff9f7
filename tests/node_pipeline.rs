//! End-to-end: producers feed the orchestrator, which hands frames to the
//! radio driver, which pushes them into the transceiver FIFO.
mod helpers;

use helpers::{datetime, CountingTimer, MockClock, MockRadioBus};
use static_cell::StaticCell;
use telemetry_node::config::{RadioConfig, ORCHESTRATOR_PERIOD_MS, RADIO_CYCLE_MS};
use telemetry_node::infra::mailbox::Mailbox;
use telemetry_node::producers::{environment::from_compensated, gps::SentenceAssembler};
use telemetry_node::radio::driver::RadioDriver;
use telemetry_node::radio::TxOutcome;
use telemetry_node::telemetry::frame::TelemetryFrame;
use telemetry_node::telemetry::orchestrator::{AssemblyOutcome, Orchestrator};
use telemetry_node::telemetry::types::{
    DateTime, EnvironmentalSample, Hemisphere, LocationTimeFix,
};

static FIXES: StaticCell<Mailbox<LocationTimeFix>> = StaticCell::new();
static SAMPLES: StaticCell<Mailbox<EnvironmentalSample>> = StaticCell::new();
static FRAMES: StaticCell<Mailbox<TelemetryFrame>> = StaticCell::new();

const SENTENCE: &[u8] =
    b"$GPRMC,225446.00,A,4916.4500,N,12311.1200,W,000.5,054.7,191194,020.3,E,A*2B\r\n";

#[tokio::test]
async fn sentence_and_sample_reach_the_fifo() {
    let fixes: &'static Mailbox<LocationTimeFix> = FIXES.init(Mailbox::new());
    let samples: &'static Mailbox<EnvironmentalSample> = SAMPLES.init(Mailbox::new());
    let frames: &'static Mailbox<TelemetryFrame> = FRAMES.init(Mailbox::new());

    let clock = MockClock::new();
    let mut orchestrator = Orchestrator::new(clock.clone(), fixes, samples, frames);
    let bus = MockRadioBus::new();
    let mut driver = RadioDriver::new(bus.clone(), CountingTimer::new(), RadioConfig::default(), frames);

    // Producers.
    let mut assembler = SentenceAssembler::new();
    assert!(assembler.feed(SENTENCE, fixes).is_some());
    samples.post_latest(from_compensated(2157, 101_325, 45_678).unwrap());

    // The GPS time reached the RTC; let it advance before the frame is built.
    orchestrator.poll_inputs();
    assert_eq!(clock.with(|s| s.now), Some(fix_time()));
    clock.with(|s| s.now = Some(datetime(22, 54, 50)));

    // 5 s of orchestrator periods: exactly one frame.
    let mut outcomes = Vec::new();
    for _ in 0..(5_000 / ORCHESTRATOR_PERIOD_MS) {
        orchestrator.poll_inputs();
        outcomes.extend(orchestrator.tick(ORCHESTRATOR_PERIOD_MS));
    }
    assert_eq!(outcomes, vec![AssemblyOutcome::Queued]);

    // 5 s of radio cycles: initialization, then one transmission.
    let mut sent = Vec::new();
    for _ in 0..(5_000 / RADIO_CYCLE_MS) {
        if let Some(outcome) = driver.run_cycle().await.expect("radio cycle") {
            sent.push(outcome);
        }
    }
    assert_eq!(sent, vec![TxOutcome::Sent]);
    assert!(frames.is_empty());

    let bursts = bus.with(|s| s.tx_bursts.clone());
    assert_eq!(bursts.len(), 1);
    let (sample, fix) = TelemetryFrame::decode(&bursts[0]).unwrap();
    assert_eq!(sample.temperature(), 215);
    assert_eq!(sample.pressure(), 10_132);
    assert_eq!(sample.humidity(), 456);
    assert_eq!(fix.datetime(), datetime(22, 54, 50));
    assert_eq!(
        (fix.latitude().degrees(), fix.latitude().minutes(), fix.latitude().seconds()),
        (49, 16, 27)
    );
    assert_eq!(fix.longitude().hemisphere(), Hemisphere::West);
}

fn fix_time() -> DateTime {
    DateTime::new(94, 11, 19, 22, 54, 46).unwrap()
}
