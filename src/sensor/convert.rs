//! Raw-count to physical-unit conversions.
//!
//! The target board samples both analog inputs through a 16-bit ADC read
//! that mirrors a 12-bit converter behind a 3.3 V reference. These helpers
//! keep the conversion math pure so it can be unit tested without
//! hardware; adapters call them from their `read_*` implementations.

/// Scale from the 16-bit ADC read down to the native 12-bit count range.
pub const ADC_SCALE: f32 = 4095.0 / 65535.0;

/// Volts per 12-bit ADC count at a 3.3 V reference.
pub const VOLT_PER_ADC: f32 = 3.3 / 4095.0;

/// Settle delay the temperature adapter blocks for before sampling, in
/// milliseconds.
pub const SETTLE_DELAY_MS: u32 = 2000;

/// Full-scale value of the raw 16-bit light-sensor count.
const LIGHT_FULL_SCALE: f32 = 65535.0;

/// Convert a raw 16-bit ADC count from the LM35 input to degrees Celsius.
///
/// The LM35 transfer curve is linear: 0.5 V at 0 °C rising 10 mV/°C, i.e.
/// 0.5 V over the 50 °C span. The count is scaled to 12 bits, to volts,
/// then shifted and divided by that slope.
///
/// ```
/// use sleepsense::sensor::convert::adc_to_celsius;
///
/// // 0.5 V reads as 0 °C.
/// let raw = (0.5 / (3.3 / 4095.0) / (4095.0 / 65535.0)) as u16;
/// assert!(adc_to_celsius(raw).abs() < 0.5);
/// ```
pub fn adc_to_celsius(raw: u16) -> f32 {
    let volt = raw as f32 * ADC_SCALE * VOLT_PER_ADC;
    (volt - 0.5) / (0.5 / 50.0)
}

/// Convert a raw 16-bit light-sensor count to a darkness percentage.
///
/// Darkness is the normalized inverse of brightness as the divider is
/// wired: a fully covered sensor reads full scale, so 65535 maps to
/// 100.00. Rounded to two decimal places.
pub fn counts_to_darkness(raw: u16) -> f32 {
    round2(raw as f32 / LIGHT_FULL_SCALE * 100.0)
}

/// Round a non-negative percentage to two decimal places.
fn round2(value: f32) -> f32 {
    ((value * 100.0 + 0.5) as u32) as f32 / 100.0
}
