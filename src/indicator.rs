//! Tri-state indicator driver.
//!
//! The verdict surfaces on three mutually exclusive binary outputs, one
//! per verdict level (red for `Poor`, yellow for `Average`, green for
//! `Good`). The invariant: after every update exactly one output is
//! active and it corresponds to the last verdict displayed.

use embedded_hal::digital::OutputPin;

use crate::quality::SleepQuality;

/// Errors from driving the indicator outputs.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An output pin refused the level change.
    Pin,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Pin => defmt::write!(f, "Pin"),
        }
    }
}

/// Something that can display a sleep-quality verdict.
///
/// The seam the control loop drives through, so tests can substitute a
/// recording fake for real pins.
pub trait Indicator {
    /// Display `quality`, deactivating whatever was shown before.
    fn set_quality(&mut self, quality: SleepQuality) -> Result<(), Error>;
    /// Deactivate all outputs.
    fn clear(&mut self) -> Result<(), Error>;
}

/// Three-pin indicator panel over `embedded-hal` output pins.
///
/// Updates deactivate all three lines before activating the new one. The
/// transient all-off window between those steps is not observable in this
/// system (nothing samples indicator state mid-update), so the update is
/// deliberately not atomic.
#[derive(Debug)]
pub struct IndicatorPanel<R, Y, G> {
    red: R,
    yellow: Y,
    green: G,
    active: Option<SleepQuality>,
}

impl<R, Y, G> IndicatorPanel<R, Y, G>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
{
    /// Build a panel from the three verdict pins.
    ///
    /// Pin levels are untouched until the first [`Indicator::set_quality`]
    /// or [`Indicator::clear`].
    pub fn new(red: R, yellow: Y, green: G) -> Self {
        Self {
            red,
            yellow,
            green,
            active: None,
        }
    }

    /// The verdict currently displayed, if any.
    pub fn active(&self) -> Option<SleepQuality> {
        self.active
    }

    /// Tear the panel down and hand the pins back.
    pub fn release(self) -> (R, Y, G) {
        (self.red, self.yellow, self.green)
    }

    fn all_off(&mut self) -> Result<(), Error> {
        self.red.set_low().map_err(|_| Error::Pin)?;
        self.yellow.set_low().map_err(|_| Error::Pin)?;
        self.green.set_low().map_err(|_| Error::Pin)?;
        Ok(())
    }
}

impl<R, Y, G> Indicator for IndicatorPanel<R, Y, G>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
{
    fn set_quality(&mut self, quality: SleepQuality) -> Result<(), Error> {
        self.all_off()?;
        match quality {
            SleepQuality::Poor => self.red.set_high().map_err(|_| Error::Pin),
            SleepQuality::Average => self.yellow.set_high().map_err(|_| Error::Pin),
            SleepQuality::Good => self.green.set_high().map_err(|_| Error::Pin),
        }?;
        self.active = Some(quality);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Error> {
        self.all_off()?;
        self.active = None;
        Ok(())
    }
}
