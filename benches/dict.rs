use criterion::{criterion_group, criterion_main, Bencher, Criterion, Throughput};
use quickdict::dict::Dict;

const INSERT_COUNT: u64 = 10_000;

fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("dict_insert");
    group.throughput(Throughput::Elements(INSERT_COUNT));
    group.bench_function("ordered insert", ordered_insert);
    group.bench_function("ordered insert with expand hint", ordered_insert_with_expand);
    group.finish()
}

fn ordered_insert(b: &mut Bencher) {
    b.iter(|| {
        let mut dict = Dict::with_default_type();
        for i in 0..INSERT_COUNT {
            dict.add(i, i).unwrap();
        }
    });
}

fn ordered_insert_with_expand(b: &mut Bencher) {
    b.iter(|| {
        let mut dict = Dict::with_default_type();
        dict.expand(INSERT_COUNT as usize);
        for i in 0..INSERT_COUNT {
            dict.add(i, i).unwrap();
        }
    });
}

fn lookup(c: &mut Criterion) {
    let mut dict = Dict::with_default_type();
    for i in 0..INSERT_COUNT {
        dict.add(i, i).unwrap();
    }
    let mut group = c.benchmark_group("dict_lookup");
    group.throughput(Throughput::Elements(INSERT_COUNT));
    group.bench_function("find existing keys", |b| {
        b.iter(|| {
            for i in 0..INSERT_COUNT {
                assert!(dict.find(&i).is_some());
            }
        });
    });
    group.finish();
}

criterion_group!(benches, insert, lookup);
criterion_main!(benches);
