//! Transport abstraction for the telemetry uplink.
//!
//! The MQTT client in [`crate::telemetry`] is transport agnostic: it
//! drives any established connection through the traits below. Firmware
//! supplies the concrete socket (wifi stack, modem, TLS wrapper); tests
//! supply an in-memory fake.

pub mod error;

/// Re-exports of the transport traits.
pub mod prelude {
    pub use super::{Close, Connect, Connection, Read, Write};
}

/// Blocking read half of a connection.
pub trait Read {
    /// Associated error type.
    type Error: core::fmt::Debug;
    /// Read data from the connection.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Blocking write half of a connection.
pub trait Write {
    /// Associated error type.
    type Error: core::fmt::Debug;
    /// Write data to the connection.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Connection teardown.
pub trait Close {
    /// Associated error type.
    type Error: core::fmt::Debug;
    /// Close the connection.
    fn close(self) -> Result<(), Self::Error>;
}

/// An established, synchronous, bidirectional connection.
pub trait Connection: Read + Write + Close {}

/// An outbound connector.
///
/// The monitor only ever dials out to a single fixed broker address;
/// there is no server half.
pub trait Connect {
    /// Associated connection type.
    type Connection: Connection;
    /// Associated error type.
    type Error: core::fmt::Debug;
    /// Open a connection to `remote` (`host:port`).
    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error>;
}
