/*!
 * Encoding Benchmarks
 * Throughput of the record encoder and the string registry fast path
 */

use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use tracewire::record::catalog;
use tracewire::{FieldValue, MonitoringRecord, RegistryListener, StringRegistry, WriterError};

struct NullSink;

impl RegistryListener for NullSink {
    fn on_assigned(&mut self, _value: &str, _id: u32) -> Result<(), WriterError> {
        Ok(())
    }
}

fn bench_encode_record(c: &mut Criterion) {
    let schema = catalog::before_operation();
    let record = MonitoringRecord::new(
        Arc::clone(&schema),
        1_700_000_000_000_000_000,
        vec![
            FieldValue::Int64(42),
            FieldValue::Int64(7),
            FieldValue::Int32(3),
            FieldValue::from("shop.catalog.Cart"),
            FieldValue::from("addItem(long, int)"),
        ],
    )
    .unwrap();

    let registry = StringRegistry::new();
    let mut sink = NullSink;
    let mut buf = BytesMut::with_capacity(1 << 20);

    c.bench_function("encode_record", |b| {
        b.iter(|| {
            buf.clear();
            tracewire::encode_record(black_box(&record), &registry, &mut sink, &mut buf)
                .unwrap();
        })
    });
}

fn bench_registry_lookup(c: &mut Criterion) {
    let registry = StringRegistry::new();
    let mut sink = NullSink;
    for i in 0..1_000 {
        registry
            .get_or_assign(&format!("signature{i}()"), &mut sink)
            .unwrap();
    }

    c.bench_function("registry_hit", |b| {
        b.iter(|| {
            registry
                .get_or_assign(black_box("signature500()"), &mut sink)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_encode_record, bench_registry_lookup);
criterion_main!(benches);
