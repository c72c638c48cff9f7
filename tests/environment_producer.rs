//! Environmental producer: measurement, conversion and latest-value posting.
mod helpers;

use helpers::CountingTimer;
use telemetry_node::error::{SampleError, SensorError};
use telemetry_node::infra::mailbox::{Delivery, Mailbox};
use telemetry_node::producers::environment::{run, sample_once};
use telemetry_node::telemetry::types::EnvironmentalSample;
use telemetry_node::traits::environment_sensor::{CompensatedReading, EnvironmentSensor};
use tokio::time::Duration;

/// Sensor replaying a fixed reading; `None` simulates a bus failure.
struct FixedSensor {
    reading: Option<CompensatedReading>,
    measurements: u32,
}

impl EnvironmentSensor for FixedSensor {
    type Error = ();

    async fn measure(&mut self) -> Result<CompensatedReading, Self::Error> {
        self.measurements += 1;
        self.reading.ok_or(())
    }
}

fn reading(temperature_centi_c: i32, pressure_pa: u32) -> CompensatedReading {
    CompensatedReading {
        temperature_centi_c,
        pressure_pa,
        humidity_milli_percent: 45_678,
    }
}

#[tokio::test]
async fn sample_once_posts_latest() {
    let samples: Mailbox<EnvironmentalSample> = Mailbox::new();
    let mut sensor = FixedSensor {
        reading: Some(reading(2157, 101_325)),
        measurements: 0,
    };

    assert_eq!(sample_once(&mut sensor, &samples).await.unwrap(), Delivery::Accepted);
    sensor.reading = Some(reading(2260, 101_325));
    assert_eq!(sample_once(&mut sensor, &samples).await.unwrap(), Delivery::Replaced);

    let sample = samples.try_take().unwrap();
    assert_eq!(sample.temperature(), 226);
    assert_eq!(sample.pressure(), 10_132);
    assert_eq!(sample.humidity(), 456);
}

#[tokio::test]
async fn sample_once_reports_failures() {
    let samples: Mailbox<EnvironmentalSample> = Mailbox::new();
    let mut sensor = FixedSensor {
        reading: None,
        measurements: 0,
    };
    assert!(matches!(
        sample_once(&mut sensor, &samples).await,
        Err(SensorError::Sensor(()))
    ));

    sensor.reading = Some(reading(2000, 50_000));
    assert!(matches!(
        sample_once(&mut sensor, &samples).await,
        Err(SensorError::Sample(SampleError::Pressure(5000)))
    ));
    assert!(samples.is_empty());
}

#[tokio::test]
async fn run_measures_once_per_period() {
    let samples: Mailbox<EnvironmentalSample> = Mailbox::new();
    let mut sensor = FixedSensor {
        reading: Some(reading(2157, 101_325)),
        measurements: 0,
    };
    let mut timer = CountingTimer::new();

    let stopped = tokio::time::timeout(
        Duration::from_millis(20),
        run(&mut sensor, &mut timer, &samples),
    )
    .await;
    assert!(stopped.is_err());

    assert!(sensor.measurements >= 1);
    // One 1 s delay after every measurement (the last may still be pending).
    assert!(timer.calls() + 1 >= sensor.measurements);
    assert_eq!(timer.total_ms(), timer.calls() * 1000);
    assert_eq!(samples.try_take().map(|s| s.temperature()), Some(215));
}
