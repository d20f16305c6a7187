use criterion::{black_box, criterion_group, Criterion};
use smithy_codec::SerialWriter;

fn bench_read(c: &mut Criterion) {
    for count in [100, 10_000] {
        let records = super::records(count);
        let mut writer = SerialWriter::new();
        for record in &records {
            writer.append(record).unwrap();
        }
        let buf = writer.into_vec();

        c.bench_function(&format!("{}/records={count}", module_path!()), |b| {
            b.iter(|| {
                let mut reader = smithy_codec::SerialReader::new(&buf);
                for _ in 0..count {
                    black_box(reader.next::<(u32, Option<u64>, Vec<u16>, &str)>());
                }
            });
        });
    }
}

criterion_group!(benches, bench_read);
