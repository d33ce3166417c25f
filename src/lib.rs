//! # sleepsense
//!
//! A small library for bedroom environment monitoring on embedded devices.
//! It samples temperature, ambient light and humidity once per cycle,
//! classifies the readings into a three-level sleep-quality verdict, drives
//! a tri-state indicator panel, and optionally publishes each cycle's
//! readings to an MQTT broker. The library is `no_std` by default and is
//! connection- and hardware-agnostic: sensors, indicator pins, delays and
//! the network transport all enter through traits.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │ monitor::Monitor — one sampling cycle per fixed interval  │
//! └───────────────────────────────────────────────────────────┘
//!       │ reads                │ classifies        │ drives / reports
//!       ▼                      ▼                   ▼
//! sensor::{Temperature,   quality::Thresholds  indicator::IndicatorPanel
//!   Light, Humidity}Sensor                     telemetry::Telemetry (MQTT)
//! ```
//!
//! Everything is sequential and synchronous; a cycle blocks for the sensor
//! settle delays and the inter-message publish delay, and the loop exits
//! only through a [`monitor::CancelToken`].
//!
//! ## Example
//!
//! Classification is a pure function and can be used standalone:
//!
//! ```
//! use sleepsense::{classify, SleepQuality};
//!
//! assert_eq!(classify(20.0, 80.0, Some(50.0)), SleepQuality::Good);
//! assert_eq!(classify(20.0, 60.0, Some(50.0)), SleepQuality::Average);
//! assert_eq!(classify(30.0, 80.0, Some(50.0)), SleepQuality::Poor);
//! ```
//!
//! ## Optional features
//!
//! - `std`: enable standard library support (default: disabled)
//! - `defmt`: enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Sensor boundary: adapter traits, the per-cycle [`sensor::Reading`], and
/// the raw-count unit conversions.
pub mod sensor;

/// Sleep-quality classification: the ordinal verdict and its thresholds.
pub mod quality;

/// Tri-state indicator driver over `embedded-hal` output pins.
pub mod indicator;

/// Transport abstraction for the telemetry uplink.
pub mod net;

/// MQTT telemetry: wire client and the per-cycle feed publisher.
pub mod telemetry;

/// The control loop: state machine, cancellation, and cycle orchestration.
pub mod monitor;

/// Static device settings parsed from a JSON blob.
pub mod config;

pub use quality::{SleepQuality, Thresholds, classify};
pub use sensor::Reading;
