//! Static device settings.
//!
//! The broker address, credentials, feed topics and sample interval come
//! from a statically-edited JSON blob baked into the firmware image (or
//! read from a settings partition). Parsed once at startup; nothing is
//! watched, reloaded, or persisted.
//!
//! ```
//! use sleepsense::config::Config;
//!
//! let json = br#"{
//!     "broker": {
//!         "host": "io.adafruit.com",
//!         "port": 1883,
//!         "username": "user",
//!         "key": "aio_key",
//!         "client_id": "bedroom-monitor"
//!     },
//!     "feeds": {
//!         "temperature": "user/feeds/temperature",
//!         "humidity": "user/feeds/humidity",
//!         "darkness": "user/feeds/light",
//!         "quality": "user/feeds/sleep-quality"
//!     }
//! }"#;
//!
//! let config = Config::from_json(json).unwrap();
//! assert_eq!(config.broker.port, 1883);
//! assert_eq!(config.sample_interval_ms, 5000);
//! ```

use heapless::String;
use serde::Deserialize;

use crate::monitor::DEFAULT_SAMPLE_INTERVAL_MS;
use crate::telemetry::FeedTopics;
use crate::telemetry::mqtt::{Credentials, Options};

/// Keep-alive sent to the broker, in seconds.
const KEEP_ALIVE_SECONDS: u16 = 60;

/// Errors from settings parsing.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The blob is not valid JSON or does not match the schema.
    Parse,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Parse => defmt::write!(f, "Parse"),
        }
    }
}

/// Broker endpoint and authentication.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerSettings {
    /// Broker host name or address.
    pub host: String<64>,
    /// Broker TCP port.
    pub port: u16,
    /// Account user name.
    pub username: String<64>,
    /// Account key or password.
    pub key: String<64>,
    /// MQTT client identifier, 1–23 bytes.
    pub client_id: String<23>,
}

/// The four feed topic paths.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
    /// Temperature feed topic.
    pub temperature: String<64>,
    /// Humidity feed topic.
    pub humidity: String<64>,
    /// Darkness feed topic.
    pub darkness: String<64>,
    /// Sleep-quality feed topic.
    pub quality: String<64>,
}

/// Complete device settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Broker endpoint and authentication.
    pub broker: BrokerSettings,
    /// Feed topic paths.
    pub feeds: FeedSettings,
    /// Pause between sampling cycles, in milliseconds.
    #[serde(default = "default_sample_interval")]
    pub sample_interval_ms: u32,
}

fn default_sample_interval() -> u32 {
    DEFAULT_SAMPLE_INTERVAL_MS
}

impl Config {
    /// Parse settings from a JSON blob.
    pub fn from_json(json: &[u8]) -> Result<Self, Error> {
        serde_json_core::from_slice(json)
            .map(|(config, _rest)| config)
            .map_err(|_| Error::Parse)
    }

    /// Borrow the feed topics for the telemetry publisher.
    pub fn feed_topics(&self) -> FeedTopics<'_> {
        FeedTopics {
            temperature: &self.feeds.temperature,
            humidity: &self.feeds.humidity,
            darkness: &self.feeds.darkness,
            quality: &self.feeds.quality,
        }
    }

    /// Borrow the MQTT connection options.
    pub fn mqtt_options(&self) -> Options<'_> {
        Options {
            client_id: &self.broker.client_id,
            keep_alive_seconds: KEEP_ALIVE_SECONDS,
            clean_session: true,
            credentials: Some(Credentials {
                username: &self.broker.username,
                password: &self.broker.key,
            }),
        }
    }
}
