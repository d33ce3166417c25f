//! Sensor boundary for the monitoring loop.
//!
//! The control loop depends on three read operations, one per physical
//! input: an analog temperature sensor, an analog light sensor, and a
//! single-wire digital humidity sensor. Concrete drivers are vendor
//! specific and live outside this crate; they plug in through the traits
//! below, the same way network transports plug in through [`crate::net`].
//!
//! A humidity read is allowed to fail transiently. The loop records that
//! cycle's humidity as absent and carries on, so [`Reading`] models
//! humidity as an `Option` rather than erroring the whole cycle.

pub mod convert;

/// A common error type for sensor adapters.
///
/// Portable and payload-free so it stays cheap to copy and match in
/// `no_std` environments. Adapters with richer diagnostics should map
/// them down to one of these at the boundary.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The underlying measurement call failed.
    ReadFailed,
    /// The sensor has not finished powering up or settling.
    NotReady,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::ReadFailed => defmt::write!(f, "ReadFailed"),
            Error::NotReady => defmt::write!(f, "NotReady"),
        }
    }
}

/// One sampling cycle's measurements in physical units.
///
/// Produced once per cycle and never retained across cycles.
/// `humidity_percent` is `None` when the humidity sensor failed for that
/// cycle; see [`crate::quality`] for how classification treats an absent
/// humidity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Air temperature in degrees Celsius.
    pub temperature_celsius: f32,
    /// Darkness as a percentage; 100.0 is fully dark.
    pub darkness_percent: f32,
    /// Relative humidity percentage, absent on a failed read.
    pub humidity_percent: Option<f32>,
}

/// An analog temperature input.
///
/// Implementations are expected to block for their settle delay before
/// sampling (see [`convert::SETTLE_DELAY_MS`] for the LM35 figure).
pub trait TemperatureSensor {
    /// Associated error type.
    type Error: core::fmt::Debug;
    /// Sample the sensor and return degrees Celsius.
    fn read_celsius(&mut self) -> Result<f32, Self::Error>;
}

/// An ambient light input, reported as inverse brightness.
pub trait LightSensor {
    /// Associated error type.
    type Error: core::fmt::Debug;
    /// Sample the sensor and return darkness in percent, 0–100.
    fn read_darkness(&mut self) -> Result<f32, Self::Error>;
}

/// A relative humidity input.
///
/// Single-wire humidity sensors fail transiently under timing jitter, so
/// callers must treat an error here as recoverable within the cycle.
pub trait HumiditySensor {
    /// Associated error type.
    type Error: core::fmt::Debug;
    /// Sample the sensor and return relative humidity in percent.
    fn read_humidity(&mut self) -> Result<f32, Self::Error>;
}
