//! Minimal MQTT 3.1.1 client for the telemetry uplink.
//!
//! Publish-only: the monitor pushes readings to fixed topics and never
//! subscribes, so this client implements exactly the packets the uplink
//! needs — CONNECT (with username/password authentication, as
//! token-authenticated brokers require), PUBLISH, and DISCONNECT. Fixed
//! size buffers throughout for predictable memory usage, and it works
//! over any [`Connection`].
//!
//! # Example
//!
//! ```rust,no_run
//! use sleepsense::telemetry::mqtt::{Client, Credentials, Options, QoS};
//! # use sleepsense::net::Connection;
//! # struct MockConnection;
//! # impl Connection for MockConnection {}
//! # impl sleepsense::net::Read for MockConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl sleepsense::net::Write for MockConnection {
//! #     type Error = ();
//! #     fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> { Ok(0) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl sleepsense::net::Close for MockConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! let connection = MockConnection;
//! let options = Options {
//!     client_id: "bedroom_monitor",
//!     keep_alive_seconds: 60,
//!     clean_session: true,
//!     credentials: Some(Credentials {
//!         username: "aio_user",
//!         password: "aio_key",
//!     }),
//! };
//!
//! // let mut client = Client::connect(connection, options)?;
//! // client.publish("feeds/temperature", b"21.50", QoS::AtMostOnce)?;
//! // client.disconnect()?;
//! ```

use heapless::Vec;

use crate::net::error::Error;
use crate::net::Connection;

// Fixed-header packet type values from the MQTT 3.1.1 specification.
const CONNECT: u8 = 0x10;
const CONNACK: u8 = 0x20;
const PUBLISH: u8 = 0x30;
const DISCONNECT: u8 = 0xE0;

const PROTOCOL_NAME: &[u8] = b"MQTT";
const PROTOCOL_LEVEL: u8 = 4; // MQTT 3.1.1

// CONNECT flag bits.
const FLAG_CLEAN_SESSION: u8 = 0x02;
const FLAG_PASSWORD: u8 = 0x40;
const FLAG_USERNAME: u8 = 0x80;

/// Quality of Service levels for published messages.
///
/// Telemetry readings are ambient data where a lost sample is harmless,
/// so the publisher uses [`QoS::AtMostOnce`]; the higher levels are
/// encoded for completeness.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum QoS {
    /// At most once delivery; fire and forget.
    AtMostOnce = 0,
    /// At least once delivery; duplicates possible.
    AtLeastOnce = 1,
    /// Exactly once delivery.
    ExactlyOnce = 2,
}

/// Username/password pair sent in the CONNECT payload.
///
/// Token-authenticated brokers such as Adafruit IO put the account name
/// in `username` and the API key in `password`.
#[derive(Debug, Clone)]
pub struct Credentials<'a> {
    /// Account or device user name.
    pub username: &'a str,
    /// Password or API key.
    pub password: &'a str,
}

/// Configuration options for the MQTT connection.
#[derive(Debug, Clone)]
pub struct Options<'a> {
    /// The client identifier, must be unique within the broker.
    pub client_id: &'a str,
    /// Keep-alive interval in seconds; 0 disables keep-alive.
    pub keep_alive_seconds: u16,
    /// Whether the broker should discard previous session state.
    pub clean_session: bool,
    /// Optional authentication; `None` connects anonymously.
    pub credentials: Option<Credentials<'a>>,
}

/// A publish-only MQTT 3.1.1 client.
#[derive(Debug)]
pub struct Client<C: Connection> {
    connection: C,
}

impl<C: Connection> Client<C> {
    /// Perform the MQTT connection handshake over an established
    /// connection.
    ///
    /// Sends CONNECT and waits for CONNACK. Any broker return code other
    /// than accepted maps to [`Error::ConnectionRefused`].
    pub fn connect(mut connection: C, options: Options<'_>) -> Result<Self, Error> {
        // --- Variable Header ---
        let mut vh: Vec<u8, 10> = Vec::new();
        push_u16(&mut vh, PROTOCOL_NAME.len() as u16)?;
        push_slice(&mut vh, PROTOCOL_NAME)?;
        push_byte(&mut vh, PROTOCOL_LEVEL)?;

        let mut connect_flags = 0;
        if options.clean_session {
            connect_flags |= FLAG_CLEAN_SESSION;
        }
        if options.credentials.is_some() {
            connect_flags |= FLAG_USERNAME | FLAG_PASSWORD;
        }
        push_byte(&mut vh, connect_flags)?;
        push_u16(&mut vh, options.keep_alive_seconds)?;

        // --- Payload: client id, then username and password when present ---
        let mut payload: Vec<u8, 512> = Vec::new();
        push_str(&mut payload, options.client_id)?;
        if let Some(credentials) = &options.credentials {
            push_str(&mut payload, credentials.username)?;
            push_str(&mut payload, credentials.password)?;
        }

        let remaining_len = vh.len() + payload.len();

        // --- Fixed Header ---
        let mut fixed_header: Vec<u8, 5> = Vec::new();
        push_byte(&mut fixed_header, CONNECT)?;
        encode_remaining_length(&mut fixed_header, remaining_len)?;

        connection
            .write(&fixed_header)
            .map_err(|_| Error::WriteError)?;
        connection.write(&vh).map_err(|_| Error::WriteError)?;
        connection.write(&payload).map_err(|_| Error::WriteError)?;
        connection.flush().map_err(|_| Error::WriteError)?;

        // Wait for and parse CONNACK
        let mut connack_buf = [0u8; 4];
        let mut total_read = 0;
        while total_read < connack_buf.len() {
            match connection.read(&mut connack_buf[total_read..]) {
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => total_read += n,
                Err(_) => return Err(Error::ReadError),
            }
        }

        if connack_buf[0] != CONNACK || connack_buf[1] != 2 {
            return Err(Error::ProtocolError);
        }

        match connack_buf[3] {
            0 => Ok(Self { connection }),
            1..=5 => Err(Error::ConnectionRefused),
            _ => Err(Error::ProtocolError),
        }
    }

    /// Publish a message to `topic`.
    pub fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS) -> Result<(), Error> {
        let mut fixed_header: Vec<u8, 5> = Vec::new();
        let mut packet: Vec<u8, 1024> = Vec::new();

        // --- Variable Header ---
        push_str(&mut packet, topic)?;

        // --- Payload ---
        push_slice(&mut packet, payload)?;

        // --- Fixed Header ---
        let mut flags = PUBLISH;
        if qos == QoS::AtLeastOnce || qos == QoS::ExactlyOnce {
            flags |= (qos as u8) << 1;
        }
        push_byte(&mut fixed_header, flags)?;
        encode_remaining_length(&mut fixed_header, packet.len())?;

        self.connection
            .write(&fixed_header)
            .map_err(|_| Error::WriteError)?;
        self.connection
            .write(&packet)
            .map_err(|_| Error::WriteError)?;
        self.connection.flush().map_err(|_| Error::WriteError)?;

        Ok(())
    }

    /// Send DISCONNECT and close the underlying connection.
    pub fn disconnect(self) -> Result<(), Error> {
        let Self { mut connection } = self;
        // DISCONNECT has no variable header or payload.
        connection
            .write(&[DISCONNECT, 0])
            .map_err(|_| Error::WriteError)?;
        connection.flush().map_err(|_| Error::WriteError)?;
        connection.close().map_err(|_| Error::ConnectionClosed)?;
        Ok(())
    }
}

fn push_byte<const N: usize>(buf: &mut Vec<u8, N>, byte: u8) -> Result<(), Error> {
    buf.push(byte).map_err(|_| Error::ProtocolError)
}

fn push_slice<const N: usize>(buf: &mut Vec<u8, N>, bytes: &[u8]) -> Result<(), Error> {
    buf.extend_from_slice(bytes).map_err(|_| Error::ProtocolError)
}

fn push_u16<const N: usize>(buf: &mut Vec<u8, N>, value: u16) -> Result<(), Error> {
    push_slice(buf, &value.to_be_bytes())
}

/// Append a UTF-8 string in MQTT's length-prefixed encoding.
fn push_str<const N: usize>(buf: &mut Vec<u8, N>, s: &str) -> Result<(), Error> {
    let bytes = s.as_bytes();
    if bytes.len() > u16::MAX as usize {
        return Err(Error::ProtocolError);
    }
    push_u16(buf, bytes.len() as u16)?;
    push_slice(buf, bytes)
}

/// Encode the variable-length remaining-length field.
///
/// Each byte carries 7 bits of the value; the high bit marks a
/// continuation. Values up to 268,435,455 fit in the 4-byte maximum.
fn encode_remaining_length(buf: &mut Vec<u8, 5>, mut len: usize) -> Result<(), Error> {
    loop {
        let mut byte = (len % 128) as u8;
        len /= 128;
        if len > 0 {
            byte |= 0x80;
        }
        push_byte(buf, byte)?;
        if len == 0 {
            break;
        }
    }
    Ok(())
}
