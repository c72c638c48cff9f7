//! Simulated telemetry node on the host: a GPS replaying a sentence, an
//! environmental sensor drifting slowly, the orchestrator and the radio driver
//! running their real task loops against an in-memory RFM69.
//!
//! Run with `cargo run --example simulated_node`; it stops after 11 seconds,
//! i.e. two transmit intervals.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use static_cell::StaticCell;
use telemetry_node::config::RadioConfig;
use telemetry_node::infra::mailbox::Mailbox;
use telemetry_node::producers::{environment, gps::SentenceAssembler};
use telemetry_node::radio::driver::RadioDriver;
use telemetry_node::radio::registers::{
    CHIP_VERSION, IRQFLAGS1_MODE_READY, IRQFLAGS2_PACKET_SENT, REG_IRQFLAGS1, REG_IRQFLAGS2,
    REG_VERSION,
};
use telemetry_node::telemetry::frame::TelemetryFrame;
use telemetry_node::telemetry::orchestrator::Orchestrator;
use telemetry_node::telemetry::types::{DateTime, EnvironmentalSample, LocationTimeFix};
use telemetry_node::traits::{
    clock_authority::ClockAuthority,
    environment_sensor::{CompensatedReading, EnvironmentSensor},
    node_timer::NodeTimer,
    radio_bus::RadioBus,
};
use tokio::time::{sleep, Duration};

static FIXES: StaticCell<Mailbox<LocationTimeFix>> = StaticCell::new();
static SAMPLES: StaticCell<Mailbox<EnvironmentalSample>> = StaticCell::new();
static FRAMES: StaticCell<Mailbox<TelemetryFrame>> = StaticCell::new();
static RADIO_IRQ: Signal<CriticalSectionRawMutex, ()> = Signal::new();

const SENTENCE: &[u8] =
    b"$GPRMC,225446.00,A,4916.4500,N,12311.1200,W,000.5,054.7,191194,020.3,E,A*2B\r\n";

/// Timer backed by tokio.
struct TokioTimer;

impl NodeTimer for TokioTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(u64::from(millis))).await;
    }
}

/// RTC that simply stores what it is told.
struct SimulatedRtc(Option<DateTime>);

impl ClockAuthority for SimulatedRtc {
    type Error = &'static str;

    fn set(&mut self, now: &DateTime) -> Result<(), Self::Error> {
        self.0 = Some(*now);
        Ok(())
    }

    fn get(&mut self) -> Result<DateTime, Self::Error> {
        self.0.ok_or("rtc not set")
    }
}

/// Transceiver that is always ready and prints every packet it sends.
struct SimulatedRadio {
    registers: [u8; 128],
}

impl RadioBus for SimulatedRadio {
    type Error = core::convert::Infallible;

    async fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error> {
        Ok(match addr {
            REG_VERSION => CHIP_VERSION,
            REG_IRQFLAGS1 => IRQFLAGS1_MODE_READY,
            REG_IRQFLAGS2 => IRQFLAGS2_PACKET_SENT,
            _ => self.registers[usize::from(addr & 0x7F)],
        })
    }

    async fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Self::Error> {
        self.registers[usize::from(addr & 0x7F)] = value;
        Ok(())
    }

    async fn read_fifo<'a>(&'a mut self, buffer: &'a mut [u8]) -> Result<(), Self::Error> {
        buffer.fill(0);
        Ok(())
    }

    async fn write_fifo<'a>(&'a mut self, data: &'a [u8]) -> Result<(), Self::Error> {
        println!("[radio] on air: {:02X?}", data);
        match TelemetryFrame::decode(data) {
            Ok((sample, fix)) => println!("[radio]   {:?}\n[radio]   {:?}", sample, fix),
            Err(err) => println!("[radio]   undecodable frame: {}", err),
        }
        Ok(())
    }

    fn assert_reset(&mut self) -> Result<(), Self::Error> {
        println!("[radio] reset");
        Ok(())
    }

    fn release_reset(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Sensor warming by 0.05 °C per measurement.
struct SimulatedSensor {
    temperature_centi_c: i32,
}

impl EnvironmentSensor for SimulatedSensor {
    type Error = core::convert::Infallible;

    async fn measure(&mut self) -> Result<CompensatedReading, Self::Error> {
        self.temperature_centi_c += 5;
        Ok(CompensatedReading {
            temperature_centi_c: self.temperature_centi_c,
            pressure_pa: 101_325,
            humidity_milli_percent: 45_678,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== Simulated telemetry node ===\n");

    let fixes: &'static Mailbox<LocationTimeFix> = FIXES.init(Mailbox::new());
    let samples: &'static Mailbox<EnvironmentalSample> = SAMPLES.init(Mailbox::new());
    let frames: &'static Mailbox<TelemetryFrame> = FRAMES.init(Mailbox::new());

    let mut orchestrator = Orchestrator::new(SimulatedRtc(None), fixes, samples, frames);
    let radio = SimulatedRadio {
        registers: [0; 128],
    };
    let mut driver = RadioDriver::new(radio, TokioTimer, RadioConfig::default(), frames);
    let mut sensor = SimulatedSensor {
        temperature_centi_c: 2100,
    };

    let gps = async {
        let mut assembler = SentenceAssembler::new();
        loop {
            if let Some(delivery) = assembler.feed(SENTENCE, fixes) {
                println!("[gps] fix posted: {:?}", delivery);
            }
            sleep(Duration::from_secs(1)).await;
        }
    };

    let mut sensor_timer = TokioTimer;
    let mut orchestrator_timer = TokioTimer;
    let node = async {
        tokio::join!(
            gps,
            environment::run(&mut sensor, &mut sensor_timer, samples),
            orchestrator.run(&mut orchestrator_timer),
            driver.run(&RADIO_IRQ),
        )
    };

    let _ = tokio::time::timeout(Duration::from_secs(11), node).await;
    println!("\n=== Done ===");
}
