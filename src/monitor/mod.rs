//! The control loop.
//!
//! [`Monitor`] owns the sensor handles, the indicator panel, the alive
//! LED and the delay provider — everything is passed in at construction,
//! no ambient globals. Each iteration reads the three sensors
//! sequentially, classifies, drives the panel, hands the cycle to the
//! telemetry sink, then sleeps the sample interval. The loop is otherwise
//! infinite; it leaves [`State::Running`] only when the supplied
//! [`CancelToken`] fires, at which point the alive LED is cleared and the
//! sink torn down.
//!
//! Everything blocks the single thread of control: sensor settle delays,
//! the inter-message publish delay, the interval sleep. A hung sensor
//! hangs the system; supervised restart is an operational concern outside
//! this crate.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::indicator::Indicator;
use crate::quality::{SleepQuality, Thresholds};
use crate::sensor::{HumiditySensor, LightSensor, Reading, TemperatureSensor};
use crate::telemetry::TelemetrySink;

/// Default pause between sampling cycles, in milliseconds.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 5000;

/// Lifecycle state of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The loop is executing cycles.
    Running,
    /// The loop has not started, or has been cancelled and cleaned up.
    Stopped,
}

#[cfg(feature = "defmt")]
impl defmt::Format for State {
    fn format(&self, f: defmt::Formatter) {
        match self {
            State::Running => defmt::write!(f, "Running"),
            State::Stopped => defmt::write!(f, "Stopped"),
        }
    }
}

/// Fatal faults that end the loop.
///
/// A humidity failure is recoverable (the cycle carries an absent
/// reading) and a telemetry failure is logged and swallowed, so neither
/// appears here.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CycleError {
    /// The temperature sensor failed.
    Temperature,
    /// The light sensor failed.
    Light,
    /// The indicator panel refused the verdict.
    Indicator,
    /// The alive output could not be driven.
    Alive,
}

#[cfg(feature = "defmt")]
impl defmt::Format for CycleError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            CycleError::Temperature => defmt::write!(f, "Temperature"),
            CycleError::Light => defmt::write!(f, "Light"),
            CycleError::Indicator => defmt::write!(f, "Indicator"),
            CycleError::Alive => defmt::write!(f, "Alive"),
        }
    }
}

/// Operator-requested cancellation, checked once per iteration.
pub trait CancelToken {
    /// Whether cancellation has been requested.
    fn is_cancelled(&self) -> bool;
}

/// Atomic-flag token, settable from an interrupt handler.
///
/// The handler calls [`CancelFlag::cancel`]; the loop observes it at the
/// top of the next iteration.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    /// A fresh, uncancelled flag.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

impl CancelToken for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl<T: CancelToken> CancelToken for &T {
    fn is_cancelled(&self) -> bool {
        (*self).is_cancelled()
    }
}

/// The sampling loop with its owned hardware handles.
#[derive(Debug)]
pub struct Monitor<T, L, H, I, A, D> {
    temperature: T,
    light: L,
    humidity: H,
    indicator: I,
    alive: A,
    delay: D,
    thresholds: Thresholds,
    sample_interval_ms: u32,
    state: State,
}

impl<T, L, H, I, A, D> Monitor<T, L, H, I, A, D>
where
    T: TemperatureSensor,
    L: LightSensor,
    H: HumiditySensor,
    I: Indicator,
    A: OutputPin,
    D: DelayNs,
{
    /// Build a monitor around its collaborators.
    ///
    /// `alive` is the output that signals the loop is running; it is
    /// raised on entry to [`State::Running`] and cleared on exit.
    pub fn new(temperature: T, light: L, humidity: H, indicator: I, alive: A, delay: D) -> Self {
        Self {
            temperature,
            light,
            humidity,
            indicator,
            alive,
            delay,
            thresholds: Thresholds::default(),
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            state: State::Stopped,
        }
    }

    /// Replace the default classification thresholds.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Replace the default sample interval.
    pub fn with_sample_interval_ms(mut self, interval_ms: u32) -> Self {
        self.sample_interval_ms = interval_ms;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Read the three sensors sequentially into one [`Reading`].
    ///
    /// Temperature and light faults are fatal; a humidity fault is logged
    /// and recorded as an absent reading for this cycle.
    pub fn sample(&mut self) -> Result<Reading, CycleError> {
        let temperature_celsius = self
            .temperature
            .read_celsius()
            .map_err(|_| CycleError::Temperature)?;
        let darkness_percent = self.light.read_darkness().map_err(|_| CycleError::Light)?;
        let humidity_percent = match self.humidity.read_humidity() {
            Ok(humidity) => Some(humidity),
            Err(_error) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("humidity read failed, carrying absent value this cycle");
                None
            }
        };
        Ok(Reading {
            temperature_celsius,
            darkness_percent,
            humidity_percent,
        })
    }

    /// Execute one cycle: sample, classify, drive the panel, report.
    ///
    /// A sink failure is logged and swallowed; the cycle still counts as
    /// successful and the reading and verdict are returned.
    pub fn run_cycle<S: TelemetrySink>(
        &mut self,
        sink: &mut S,
    ) -> Result<(Reading, SleepQuality), CycleError> {
        let reading = self.sample()?;
        let quality = self.thresholds.classify(
            reading.temperature_celsius,
            reading.darkness_percent,
            reading.humidity_percent,
        );
        self.indicator
            .set_quality(quality)
            .map_err(|_| CycleError::Indicator)?;
        if let Err(_error) = sink.report(&reading, quality, &mut self.delay) {
            #[cfg(feature = "defmt")]
            defmt::warn!("telemetry publish failed, continuing without sending");
        }
        Ok((reading, quality))
    }

    /// Run cycles until `token` cancels or a fatal fault occurs.
    ///
    /// On entry the alive output is raised and the state becomes
    /// [`State::Running`]. On exit — cancellation or fault alike — the
    /// alive output is cleared best-effort, the sink is shut down (tearing
    /// down any open broker connection), and the state returns to
    /// [`State::Stopped`].
    pub fn run<K, S>(&mut self, token: K, sink: S) -> Result<State, CycleError>
    where
        K: CancelToken,
        S: TelemetrySink,
    {
        self.alive.set_high().map_err(|_| CycleError::Alive)?;
        self.state = State::Running;
        #[cfg(feature = "defmt")]
        defmt::info!("monitor running");

        let mut sink = sink;
        let outcome = loop {
            if token.is_cancelled() {
                break Ok(());
            }
            if let Err(error) = self.run_cycle(&mut sink) {
                break Err(error);
            }
            self.delay.delay_ms(self.sample_interval_ms);
        };

        // Cleanup runs on cancellation and on fault alike; no rollback
        // semantics beyond clearing the alive output and closing the sink.
        let _ = self.alive.set_low();
        if let Err(_error) = sink.shutdown() {
            #[cfg(feature = "defmt")]
            defmt::warn!("telemetry shutdown failed");
        }
        self.state = State::Stopped;
        #[cfg(feature = "defmt")]
        defmt::info!("monitor stopped");

        outcome.map(|_| State::Stopped)
    }

    /// Tear the monitor down and hand the collaborators back.
    pub fn release(self) -> (T, L, H, I, A, D) {
        (
            self.temperature,
            self.light,
            self.humidity,
            self.indicator,
            self.alive,
            self.delay,
        )
    }
}
