//! Sleep-quality classification.
//!
//! Maps one cycle's temperature, darkness and humidity readings onto an
//! ordinal three-level verdict. Classification is a total pure function:
//! no side effects, no error path, no state carried between cycles.
//!
//! The rules are evaluated in a fixed order and short-circuit; reordering
//! them changes the verdict for boundary inputs, so [`Thresholds::classify`]
//! preserves the sequence exactly rather than just the rule set.
//!
//! # Example
//!
//! ```
//! use sleepsense::quality::{SleepQuality, Thresholds};
//!
//! let thresholds = Thresholds::default();
//! assert_eq!(thresholds.classify(20.0, 80.0, Some(50.0)), SleepQuality::Good);
//! assert_eq!(thresholds.classify(20.0, 30.0, Some(50.0)), SleepQuality::Poor);
//! ```

/// Ordinal sleep-quality verdict for one sampling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SleepQuality {
    /// At least one reading is outside the acceptable envelope.
    Poor,
    /// Acceptable but not ideal conditions.
    Average,
    /// All three readings sit inside the ideal band.
    Good,
}

#[cfg(feature = "defmt")]
impl defmt::Format for SleepQuality {
    fn format(&self, f: defmt::Formatter) {
        match self {
            SleepQuality::Poor => defmt::write!(f, "Poor"),
            SleepQuality::Average => defmt::write!(f, "Average"),
            SleepQuality::Good => defmt::write!(f, "Good"),
        }
    }
}

impl SleepQuality {
    /// Lowercase label used as the telemetry feed value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SleepQuality::Poor => "poor",
            SleepQuality::Average => "average",
            SleepQuality::Good => "good",
        }
    }

    /// Human-readable description of the verdict.
    pub fn description(&self) -> &'static str {
        match self {
            SleepQuality::Poor => "Sleep quality is poor",
            SleepQuality::Average => "Sleep quality is average",
            SleepQuality::Good => "Sleep quality is good",
        }
    }
}

/// Classification thresholds.
///
/// The defaults are the envelope the verdict was tuned against; most
/// callers should use [`Thresholds::default`] (or the free [`classify`]).
/// The acceptable band rejects a reading outright, the ideal band is the
/// narrower window all three readings must hit for a `Good` verdict.
#[derive(Debug, Clone)]
pub struct Thresholds {
    /// Temperature below this is Poor, °C.
    pub temperature_min: f32,
    /// Temperature above this is Poor, °C.
    pub temperature_max: f32,
    /// Darkness below this is Poor (the room is too bright), percent.
    pub darkness_min: f32,
    /// Humidity below this is Poor, percent.
    pub humidity_min: f32,
    /// Humidity above this is Poor, percent.
    pub humidity_max: f32,
    /// Lower bound of the ideal temperature band, °C.
    pub ideal_temperature_min: f32,
    /// Upper bound of the ideal temperature band, °C.
    pub ideal_temperature_max: f32,
    /// Minimum darkness for a Good verdict, percent.
    pub ideal_darkness_min: f32,
    /// Lower bound of the ideal humidity band, percent.
    pub ideal_humidity_min: f32,
    /// Upper bound of the ideal humidity band, percent.
    pub ideal_humidity_max: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temperature_min: 16.0,
            temperature_max: 28.0,
            darkness_min: 50.0,
            humidity_min: 25.0,
            humidity_max: 75.0,
            ideal_temperature_min: 18.0,
            ideal_temperature_max: 25.0,
            ideal_darkness_min: 70.0,
            ideal_humidity_min: 45.0,
            ideal_humidity_max: 55.0,
        }
    }
}

impl Thresholds {
    /// Classify one cycle's readings.
    ///
    /// Rules short-circuit in this order:
    ///
    /// 1. temperature outside the acceptable band → `Poor`
    /// 2. darkness below [`Thresholds::darkness_min`] → `Poor`, a bright
    ///    room fails regardless of the other readings
    /// 3. humidity (when present) outside the acceptable band → `Poor`
    /// 4. all three readings inside the ideal band → `Good`
    /// 5. otherwise → `Average`
    ///
    /// An absent humidity skips rule 3 and disqualifies rule 4: the cycle
    /// can still fail on temperature or brightness, but without a humidity
    /// reading the verdict is capped at `Average`, never `Good`.
    pub fn classify(
        &self,
        temperature_celsius: f32,
        darkness_percent: f32,
        humidity_percent: Option<f32>,
    ) -> SleepQuality {
        if temperature_celsius < self.temperature_min || temperature_celsius > self.temperature_max
        {
            return SleepQuality::Poor;
        }
        if darkness_percent < self.darkness_min {
            return SleepQuality::Poor;
        }
        if let Some(humidity) = humidity_percent {
            if humidity < self.humidity_min || humidity > self.humidity_max {
                return SleepQuality::Poor;
            }
            if temperature_celsius >= self.ideal_temperature_min
                && temperature_celsius <= self.ideal_temperature_max
                && darkness_percent >= self.ideal_darkness_min
                && humidity >= self.ideal_humidity_min
                && humidity <= self.ideal_humidity_max
            {
                return SleepQuality::Good;
            }
        }
        SleepQuality::Average
    }
}

/// Classify with the default [`Thresholds`].
pub fn classify(
    temperature_celsius: f32,
    darkness_percent: f32,
    humidity_percent: Option<f32>,
) -> SleepQuality {
    Thresholds::default().classify(temperature_celsius, darkness_percent, humidity_percent)
}
