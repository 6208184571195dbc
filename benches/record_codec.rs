use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evrep::record::{CaptureRecord, RecordReader, RecordWriter};
use std::io::Cursor;

fn synthetic_log(records: usize) -> String {
    let mut writer = RecordWriter::new(Vec::new());
    for i in 0..records {
        writer
            .write_record(&CaptureRecord {
                delta_micros: if i == 0 { 0 } else { (i as i64 % 9) * 125 },
                device: format!("event{}", i % 4),
                event_type: 1,
                code: 30 + (i as u16 % 8),
                value: (i % 2) as i32,
            })
            .unwrap();
    }
    String::from_utf8(writer.into_inner()).unwrap()
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_write");
    for count in [100, 1000, 10000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(synthetic_log(count)));
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_parse");
    for count in [100, 1000, 10000] {
        let log = synthetic_log(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &log, |b, log| {
            b.iter(|| {
                let reader = RecordReader::new(Cursor::new(log.as_bytes().to_vec()));
                let records: Vec<_> = reader.map(|r| r.unwrap()).collect();
                black_box(records)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_write, bench_parse);
criterion_main!(benches);
