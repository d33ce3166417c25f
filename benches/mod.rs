use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use sleepsense::net::{Close, Connection, Read, Write, error};
use sleepsense::quality::Thresholds;
use sleepsense::telemetry::mqtt::{Client, Options, QoS};

/// Connection that accepts the handshake and discards writes.
struct NullConnection {
    connack: &'static [u8],
    read_pos: usize,
}

impl NullConnection {
    fn accepting() -> Self {
        Self {
            connack: &[0x20, 2, 0, 0],
            read_pos: 0,
        }
    }
}

impl Read for NullConnection {
    type Error = error::Error;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.read_pos >= self.connack.len() {
            return Ok(0);
        }
        let to_read = buf.len().min(self.connack.len() - self.read_pos);
        buf[..to_read].copy_from_slice(&self.connack[self.read_pos..self.read_pos + to_read]);
        self.read_pos += to_read;
        Ok(to_read)
    }
}

impl Write for NullConnection {
    type Error = error::Error;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for NullConnection {
    type Error = error::Error;
    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for NullConnection {}

fn bench_classify(c: &mut Criterion) {
    let thresholds = Thresholds::default();
    c.bench_function("classify", |b| {
        b.iter(|| {
            thresholds.classify(
                black_box(20.0),
                black_box(80.0),
                black_box(Some(50.0)),
            )
        })
    });
}

fn bench_publish_encode(c: &mut Criterion) {
    let options = Options {
        client_id: "sleepsense-bench",
        keep_alive_seconds: 60,
        clean_session: true,
        credentials: None,
    };
    let mut client =
        Client::connect(NullConnection::accepting(), options).expect("Failed to connect");
    c.bench_function("publish_encode", |b| {
        b.iter(|| {
            client
                .publish("u/feeds/temperature", black_box(b"21.50"), QoS::AtMostOnce)
                .expect("Failed to publish");
        })
    });
}

criterion_group!(benches, bench_classify, bench_publish_encode);
criterion_main!(benches);
