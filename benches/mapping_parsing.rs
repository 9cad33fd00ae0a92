use criterion::{black_box, criterion_group, criterion_main, Criterion};
use golden_retrace::{GoldenMapping, MappingIndex};

fn synthetic_mapping(classes: usize, members: usize) -> String {
    let mut mapping = String::new();
    for class in 0..classes {
        mapping.push_str(&format!("com.example.Class{class} -> p.c{class}:\n"));
        for member in 0..members {
            mapping.push_str(&format!("    int field{member} -> f{member}\n"));
            mapping.push_str(&format!(
                "    1:4:void method{member}(int) -> m{member}\n"
            ));
        }
    }
    mapping
}

fn criterion_benchmark(c: &mut Criterion) {
    let mapping = synthetic_mapping(1_000, 10);

    c.bench_function("mapping index", |b| {
        b.iter(|| MappingIndex::parse(black_box(&GoldenMapping::new(&mapping))))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(25);
    targets = criterion_benchmark
}
criterion_main!(benches);
