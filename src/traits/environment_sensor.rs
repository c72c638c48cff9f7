//! Environmental sensor seam (BME280-class device on target).
use futures_util::Future;

/// Compensated reading as produced by the sensor's integer compensation
/// formulas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompensatedReading {
    /// Temperature in 0.01 °C.
    pub temperature_centi_c: i32,
    /// Pressure in Pa.
    pub pressure_pa: u32,
    /// Relative humidity in 0.001 %.
    pub humidity_milli_percent: u32,
}

/// Contract for a device able to run one forced measurement.
pub trait EnvironmentSensor {
    type Error: core::fmt::Debug;

    /// Trigger a measurement and wait for the compensated result.
    fn measure<'a>(
        &'a mut self,
    ) -> impl Future<Output = Result<CompensatedReading, Self::Error>> + 'a;
}
