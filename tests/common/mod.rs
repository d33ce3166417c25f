//! Shared fakes for the integration tests: pins, delays, sensors,
//! connections, and a wire-level publish decoder.

#![allow(dead_code)] // each test binary uses a subset

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use sleepsense::monitor::CancelToken;
use sleepsense::net::{Close, Connection, Read, Write};
use sleepsense::quality::SleepQuality;
use sleepsense::sensor::{self, HumiditySensor, LightSensor, TemperatureSensor};
use sleepsense::telemetry::TelemetrySink;
use sleepsense::{Reading, net};

// --- pins -----------------------------------------------------------------

/// Observer handle onto a mock pin's level.
#[derive(Clone, Default)]
pub struct PinState(Rc<Cell<bool>>);

impl PinState {
    pub fn is_high(&self) -> bool {
        self.0.get()
    }
}

/// Infallible output pin whose level stays observable after the pin is
/// moved into a panel or monitor.
#[derive(Default)]
pub struct MockPin {
    state: PinState,
}

impl MockPin {
    pub fn new() -> (Self, PinState) {
        let state = PinState::default();
        (
            Self {
                state: state.clone(),
            },
            state,
        )
    }
}

impl ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state.0.set(true);
        Ok(())
    }
}

// --- delay ----------------------------------------------------------------

/// Delay provider that only accumulates requested time.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

// --- sensors --------------------------------------------------------------

/// Sensor that always reports the same value.
pub struct ConstSensor(pub f32);

impl TemperatureSensor for ConstSensor {
    type Error = sensor::Error;
    fn read_celsius(&mut self) -> Result<f32, Self::Error> {
        Ok(self.0)
    }
}

impl LightSensor for ConstSensor {
    type Error = sensor::Error;
    fn read_darkness(&mut self) -> Result<f32, Self::Error> {
        Ok(self.0)
    }
}

impl HumiditySensor for ConstSensor {
    type Error = sensor::Error;
    fn read_humidity(&mut self) -> Result<f32, Self::Error> {
        Ok(self.0)
    }
}

/// Sensor that always fails.
pub struct FailingSensor;

impl TemperatureSensor for FailingSensor {
    type Error = sensor::Error;
    fn read_celsius(&mut self) -> Result<f32, Self::Error> {
        Err(sensor::Error::ReadFailed)
    }
}

impl LightSensor for FailingSensor {
    type Error = sensor::Error;
    fn read_darkness(&mut self) -> Result<f32, Self::Error> {
        Err(sensor::Error::ReadFailed)
    }
}

impl HumiditySensor for FailingSensor {
    type Error = sensor::Error;
    fn read_humidity(&mut self) -> Result<f32, Self::Error> {
        Err(sensor::Error::ReadFailed)
    }
}

// --- cancellation ---------------------------------------------------------

/// Token that cancels after a fixed number of loop iterations.
pub struct CountdownToken(Cell<u32>);

impl CountdownToken {
    pub fn new(cycles: u32) -> Self {
        Self(Cell::new(cycles))
    }
}

impl CancelToken for CountdownToken {
    fn is_cancelled(&self) -> bool {
        let left = self.0.get();
        if left == 0 {
            true
        } else {
            self.0.set(left - 1);
            false
        }
    }
}

// --- telemetry sink -------------------------------------------------------

/// Sink that records what the monitor reports.
pub struct RecordingSink {
    pub reports: Rc<RefCell<Vec<(Reading, SleepQuality)>>>,
    pub shutdowns: Rc<Cell<u32>>,
    pub fail_reports: bool,
}

impl RecordingSink {
    pub fn new() -> (Self, Rc<RefCell<Vec<(Reading, SleepQuality)>>>, Rc<Cell<u32>>) {
        let reports = Rc::new(RefCell::new(Vec::new()));
        let shutdowns = Rc::new(Cell::new(0));
        (
            Self {
                reports: reports.clone(),
                shutdowns: shutdowns.clone(),
                fail_reports: false,
            },
            reports,
            shutdowns,
        )
    }
}

impl TelemetrySink for RecordingSink {
    type Error = sleepsense::telemetry::Error;

    fn report(
        &mut self,
        reading: &Reading,
        quality: SleepQuality,
        _delay: &mut impl DelayNs,
    ) -> Result<(), Self::Error> {
        if self.fail_reports {
            return Err(sleepsense::telemetry::Error::Publish);
        }
        self.reports.borrow_mut().push((*reading, quality));
        Ok(())
    }

    fn shutdown(self) -> Result<(), Self::Error> {
        self.shutdowns.set(self.shutdowns.get() + 1);
        Ok(())
    }
}

// --- connection -----------------------------------------------------------

/// Observer handle onto everything written through a [`MockConnection`].
#[derive(Clone, Default)]
pub struct WireLog(Rc<RefCell<Vec<u8>>>);

impl WireLog {
    pub fn bytes(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }
}

/// Connection fake: scripted bytes to read, writes recorded in a
/// [`WireLog`] that outlives the connection, fault injection for writes.
pub struct MockConnection {
    read_data: Vec<u8>,
    read_pos: usize,
    log: WireLog,
    fail_writes: Rc<Cell<bool>>,
    closed: Rc<Cell<bool>>,
}

/// Observer/control handles for a [`MockConnection`].
pub struct ConnectionHandles {
    pub log: WireLog,
    pub fail_writes: Rc<Cell<bool>>,
    pub closed: Rc<Cell<bool>>,
}

impl MockConnection {
    pub fn new(read_data: &[u8]) -> (Self, ConnectionHandles) {
        let log = WireLog::default();
        let fail_writes = Rc::new(Cell::new(false));
        let closed = Rc::new(Cell::new(false));
        (
            Self {
                read_data: read_data.to_vec(),
                read_pos: 0,
                log: log.clone(),
                fail_writes: fail_writes.clone(),
                closed: closed.clone(),
            },
            ConnectionHandles {
                log,
                fail_writes,
                closed,
            },
        )
    }

    /// Connection scripted to accept an MQTT handshake.
    pub fn accepting() -> (Self, ConnectionHandles) {
        // CONNACK, session-present 0, return code 0 (accepted)
        Self::new(&[0x20, 2, 0, 0])
    }

    /// Connection scripted to refuse the handshake (bad credentials).
    pub fn refusing() -> (Self, ConnectionHandles) {
        Self::new(&[0x20, 2, 0, 5])
    }
}

impl Read for MockConnection {
    type Error = net::error::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.read_pos >= self.read_data.len() {
            return Ok(0);
        }
        let remaining = self.read_data.len() - self.read_pos;
        let to_read = buf.len().min(remaining);
        buf[..to_read].copy_from_slice(&self.read_data[self.read_pos..self.read_pos + to_read]);
        self.read_pos += to_read;
        Ok(to_read)
    }
}

impl Write for MockConnection {
    type Error = net::error::Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_writes.get() {
            return Err(net::error::Error::WriteError);
        }
        self.log.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MockConnection {
    type Error = net::error::Error;

    fn close(self) -> Result<(), Self::Error> {
        self.closed.set(true);
        Ok(())
    }
}

impl Connection for MockConnection {}

// --- wire decoding --------------------------------------------------------

/// A PUBLISH packet recovered from a [`WireLog`].
#[derive(Debug, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Walk a captured byte stream and collect every PUBLISH packet,
/// skipping CONNECT/DISCONNECT and anything else.
pub fn decode_publishes(mut bytes: &[u8]) -> Vec<PublishedMessage> {
    let mut out = Vec::new();
    while !bytes.is_empty() {
        let packet_type = bytes[0];
        let mut idx = 1;
        let mut len = 0usize;
        let mut multiplier = 1;
        loop {
            let byte = bytes[idx];
            len += (byte as usize & 127) * multiplier;
            multiplier *= 128;
            idx += 1;
            if byte & 0x80 == 0 {
                break;
            }
        }
        let body = &bytes[idx..idx + len];
        if packet_type & 0xF0 == 0x30 {
            let topic_len = u16::from_be_bytes([body[0], body[1]]) as usize;
            out.push(PublishedMessage {
                topic: String::from_utf8(body[2..2 + topic_len].to_vec()).unwrap(),
                payload: body[2 + topic_len..].to_vec(),
            });
        }
        bytes = &bytes[idx + len..];
    }
    out
}
