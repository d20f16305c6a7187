use criterion::{black_box, criterion_group, Criterion};
use smithy_codec::SerialWriter;

fn bench_append(c: &mut Criterion) {
    for count in [100, 10_000] {
        let records = super::records(count);
        c.bench_function(&format!("{}/records={count}", module_path!()), |b| {
            b.iter(|| {
                let mut writer = SerialWriter::new();
                for record in &records {
                    writer.append(record).unwrap();
                }
                black_box(writer.into_vec())
            });
        });
    }
}

fn bench_append_formatted(c: &mut Criterion) {
    c.bench_function(&format!("{}/formatted", module_path!()), |b| {
        b.iter(|| {
            let mut writer = SerialWriter::with_capacity(1 << 16);
            for i in 0..1_000u32 {
                writer.append_formatted(format_args!("entry {i}")).unwrap();
            }
            black_box(writer.len())
        });
    });
}

criterion_group!(benches, bench_append, bench_append_formatted);
