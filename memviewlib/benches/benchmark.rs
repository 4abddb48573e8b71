use criterion::{Criterion, criterion_group, criterion_main};
use memviewlib::range::{self, SearchStrategy};
use memviewlib::{ByteRange, Color, Endianness, NumericFormat, NumericType, codec};

fn make_ranges(count: usize) -> Vec<ByteRange> {
    (0..count)
        .map(|i| ByteRange::new(i * 16, i * 16 + 12, Color::new(0, 128, 255, 255)))
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    for count in [64, 1024, 16384] {
        let ranges = make_ranges(count);
        let span = count * 16;

        c.bench_function(&format!("classify_linear_{count}"), |b| {
            b.iter(|| {
                for addr in (0..span).step_by(7) {
                    std::hint::black_box(range::classify_with(
                        std::hint::black_box(&ranges),
                        addr,
                        SearchStrategy::Linear,
                    ));
                }
            });
        });

        c.bench_function(&format!("classify_binary_{count}"), |b| {
            b.iter(|| {
                for addr in (0..span).step_by(7) {
                    std::hint::black_box(range::classify_with(
                        std::hint::black_box(&ranges),
                        addr,
                        SearchStrategy::Binary,
                    ));
                }
            });
        });
    }
}

fn bench_decode(c: &mut Criterion) {
    let data: Vec<u8> = (0..=255).cycle().take(4096).collect();

    for format in NumericFormat::ALL {
        c.bench_function(&format!("decode_all_types_{format}"), |b| {
            b.iter(|| {
                for ntype in NumericType::ALL {
                    std::hint::black_box(codec::decode(
                        std::hint::black_box(&data),
                        0x100,
                        ntype,
                        format,
                        Endianness::Big,
                    ))
                    .ok();
                }
            });
        });
    }
}

criterion_group!(
    name = memviewlib_benches;
    config = Criterion::default().sample_size(20);
    targets = bench_classify, bench_decode
);
criterion_main!(memviewlib_benches);
