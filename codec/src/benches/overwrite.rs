use criterion::{black_box, criterion_group, Criterion};
use smithy_codec::SerialWriter;

fn bench_overwrite(c: &mut Criterion) {
    let mut writer = SerialWriter::new();
    let handles: Vec<_> = (0..10_000u64)
        .map(|i| writer.append(&vec![i; 16]).unwrap())
        .collect();
    let replacement = vec![7u64; 16];

    c.bench_function(module_path!(), |b| {
        b.iter(|| {
            for handle in &handles {
                if writer.can_overwrite(*handle, &replacement) {
                    black_box(writer.overwrite(*handle, &replacement));
                }
            }
        });
    });
}

criterion_group!(benches, bench_overwrite);
