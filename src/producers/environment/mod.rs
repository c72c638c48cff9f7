//! Environmental producer: converts compensated sensor readings into
//! [`EnvironmentalSample`]s and posts them once per [`SENSOR_PERIOD_MS`].
//!
//! Conversions truncate towards zero: 0.01 °C to 0.1 °C, Pa to 0.1 mbar
//! (10 Pa) and 0.001 % to 0.1 %.
use crate::config::SENSOR_PERIOD_MS;
use crate::error::{SampleError, SensorError};
use crate::infra::mailbox::{Delivery, Mailbox};
use crate::telemetry::types::EnvironmentalSample;
use crate::traits::environment_sensor::{CompensatedReading, EnvironmentSensor};
use crate::traits::node_timer::NodeTimer;

/// Convert compensated units into a validated sample.
pub fn from_compensated(
    temperature_centi_c: i32,
    pressure_pa: u32,
    humidity_milli_percent: u32,
) -> Result<EnvironmentalSample, SampleError> {
    let temperature = temperature_centi_c / 10;
    let pressure = pressure_pa / 10;
    let humidity = humidity_milli_percent / 100;

    let temperature =
        i16::try_from(temperature).map_err(|_| SampleError::Temperature(temperature))?;
    let pressure = u16::try_from(pressure).map_err(|_| SampleError::Pressure(pressure))?;
    let humidity = u16::try_from(humidity).map_err(|_| SampleError::Humidity(humidity))?;
    EnvironmentalSample::new(temperature, pressure, humidity)
}

impl TryFrom<CompensatedReading> for EnvironmentalSample {
    type Error = SampleError;

    fn try_from(reading: CompensatedReading) -> Result<Self, Self::Error> {
        from_compensated(
            reading.temperature_centi_c,
            reading.pressure_pa,
            reading.humidity_milli_percent,
        )
    }
}

/// Take one measurement and post it with latest-value semantics.
pub async fn sample_once<S: EnvironmentSensor>(
    sensor: &mut S,
    samples: &Mailbox<EnvironmentalSample>,
) -> Result<Delivery, SensorError<S::Error>> {
    let reading = sensor.measure().await.map_err(SensorError::Sensor)?;
    let sample = EnvironmentalSample::try_from(reading)?;
    Ok(samples.post_latest(sample))
}

/// Producer task loop: measure, post, sleep one sensor period.
pub async fn run<S: EnvironmentSensor, T: NodeTimer>(
    sensor: &mut S,
    timer: &mut T,
    samples: &Mailbox<EnvironmentalSample>,
) {
    loop {
        if let Err(_err) = sample_once(sensor, samples).await {
            #[cfg(feature = "defmt")]
            defmt::warn!("Environmental sample skipped: {}", defmt::Debug2Format(&_err));
        }
        timer.delay_ms(SENSOR_PERIOD_MS).await;
    }
}
