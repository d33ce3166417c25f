//! Telemetry publishing.
//!
//! The final stage of a sampling cycle forwards the readings to a remote
//! broker as four independent key/value messages — temperature, humidity,
//! darkness, and the verdict — each string-encoded on its own topic, with
//! a fixed delay between messages so slow broker frontends are not
//! flooded. A transport fault surfaces as one [`Error`] for the whole
//! cycle; the control loop logs it and carries on without retry, backoff,
//! or queuing of unsent data.

pub mod mqtt;

use core::fmt::Write as _;

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::net::Connection;
use crate::quality::SleepQuality;
use crate::sensor::Reading;
use mqtt::{Client, Options, QoS};

/// Delay between the four per-cycle messages, in milliseconds.
pub const INTER_MESSAGE_DELAY_MS: u32 = 200;

/// Errors from the telemetry publisher.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The broker handshake failed.
    Connect,
    /// A message could not be sent.
    Publish,
    /// A reading did not fit its string encoding.
    Encode,
    /// Teardown of the broker connection failed.
    Close,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Connect => defmt::write!(f, "Connect"),
            Error::Publish => defmt::write!(f, "Publish"),
            Error::Encode => defmt::write!(f, "Encode"),
            Error::Close => defmt::write!(f, "Close"),
        }
    }
}

/// The four fixed topic paths one cycle publishes to.
#[derive(Debug, Clone)]
pub struct FeedTopics<'a> {
    /// Topic for the temperature reading.
    pub temperature: &'a str,
    /// Topic for the humidity reading.
    pub humidity: &'a str,
    /// Topic for the darkness reading.
    pub darkness: &'a str,
    /// Topic for the sleep-quality verdict.
    pub quality: &'a str,
}

/// Where a cycle's readings and verdict go.
///
/// The control loop is generic over this seam so it runs identically with
/// a broker attached or without one: [`Telemetry`] implements it over a
/// live connection, and `()` is the no-op sink for standalone operation.
pub trait TelemetrySink {
    /// Associated error type.
    type Error: core::fmt::Debug;

    /// Forward one cycle's readings and verdict.
    fn report(
        &mut self,
        reading: &Reading,
        quality: SleepQuality,
        delay: &mut impl DelayNs,
    ) -> Result<(), Self::Error>;

    /// Tear the sink down; called once when the loop stops.
    fn shutdown(self) -> Result<(), Self::Error>;
}

/// No-op sink for running the monitor without a network link.
impl TelemetrySink for () {
    type Error = core::convert::Infallible;

    fn report(
        &mut self,
        _reading: &Reading,
        _quality: SleepQuality,
        _delay: &mut impl DelayNs,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn shutdown(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// MQTT-backed telemetry publisher.
#[derive(Debug)]
pub struct Telemetry<'a, C: Connection> {
    client: Client<C>,
    topics: FeedTopics<'a>,
}

impl<'a, C: Connection> Telemetry<'a, C> {
    /// Connect to the broker over an established transport connection.
    pub fn connect(
        connection: C,
        options: Options<'_>,
        topics: FeedTopics<'a>,
    ) -> Result<Self, Error> {
        let client = Client::connect(connection, options).map_err(|_| Error::Connect)?;
        Ok(Self { client, topics })
    }

    fn publish_value(&mut self, topic: &str, value: f32) -> Result<(), Error> {
        let mut encoded: String<64> = String::new();
        write!(encoded, "{value:.2}").map_err(|_| Error::Encode)?;
        self.client
            .publish(topic, encoded.as_bytes(), QoS::AtMostOnce)
            .map_err(|_| Error::Publish)
    }
}

impl<C: Connection> TelemetrySink for Telemetry<'_, C> {
    type Error = Error;

    /// Publish the cycle as four messages, skipping the humidity feed
    /// when that reading is absent.
    fn report(
        &mut self,
        reading: &Reading,
        quality: SleepQuality,
        delay: &mut impl DelayNs,
    ) -> Result<(), Self::Error> {
        let topics = self.topics.clone();

        self.publish_value(topics.temperature, reading.temperature_celsius)?;
        delay.delay_ms(INTER_MESSAGE_DELAY_MS);

        if let Some(humidity) = reading.humidity_percent {
            self.publish_value(topics.humidity, humidity)?;
            delay.delay_ms(INTER_MESSAGE_DELAY_MS);
        }

        self.publish_value(topics.darkness, reading.darkness_percent)?;
        delay.delay_ms(INTER_MESSAGE_DELAY_MS);

        self.client
            .publish(topics.quality, quality.as_str().as_bytes(), QoS::AtMostOnce)
            .map_err(|_| Error::Publish)?;
        delay.delay_ms(INTER_MESSAGE_DELAY_MS);

        Ok(())
    }

    fn shutdown(self) -> Result<(), Self::Error> {
        self.client.disconnect().map_err(|_| Error::Close)
    }
}
