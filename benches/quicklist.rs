use bytes::Bytes;
use criterion::{criterion_group, criterion_main, Bencher, Criterion, Throughput};
use quickdict::quicklist::{Direction, Quicklist};

const PUSH_COUNT: u64 = 10_000;

fn push(c: &mut Criterion) {
    let mut group = c.benchmark_group("quicklist_push");
    group.throughput(Throughput::Elements(PUSH_COUNT));
    group.bench_function("push tail, default fill", push_tail);
    group.bench_function("push tail, compressed", push_tail_compressed);
    group.finish()
}

fn push_tail(b: &mut Bencher) {
    b.iter(|| {
        let mut ql = Quicklist::create();
        for i in 0..PUSH_COUNT {
            ql.push_tail(Bytes::copy_from_slice(&i.to_le_bytes()));
        }
    });
}

fn push_tail_compressed(b: &mut Bencher) {
    b.iter(|| {
        let mut ql = Quicklist::new(-2, 1);
        for i in 0..PUSH_COUNT {
            ql.push_tail(Bytes::copy_from_slice(&i.to_le_bytes()));
        }
    });
}

fn iterate(c: &mut Criterion) {
    let mut ql = Quicklist::create();
    for i in 0..PUSH_COUNT {
        ql.push_tail(Bytes::copy_from_slice(&i.to_le_bytes()));
    }
    let mut group = c.benchmark_group("quicklist_iterate");
    group.throughput(Throughput::Elements(PUSH_COUNT));
    group.bench_function("forward iteration", |b| {
        b.iter(|| {
            let mut iter = ql.get_iterator(Direction::Head);
            while iter.next(&mut ql).is_some() {}
            iter.release(&mut ql);
        });
    });
    group.finish()
}

criterion_group!(benches, push, iterate);
criterion_main!(benches);
