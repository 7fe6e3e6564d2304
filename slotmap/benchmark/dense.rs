use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dense_slotmap::DenseSlotMap;

#[allow(clippy::many_single_char_names)]
pub fn dense(c: &mut Criterion) {
    c.bench_function("dense insertion", |b| {
        b.iter(|| {
            let mut map = DenseSlotMap::new();
            let map = black_box(&mut map);
            map.insert(())
        })
    });
    c.bench_function("dense re-insertion", |b| {
        let mut map = DenseSlotMap::new();
        b.iter(|| {
            let map = black_box(&mut map);
            let a = map.insert(());
            let b = map.insert(());
            let c = map.insert(());
            let d = map.insert(());
            let e = map.insert(());

            let (a, b, c, d, e) = black_box((a, b, c, d, e));

            map.remove(b);
            map.remove(d);
            map.remove(a);
            map.remove(c);
            map.remove(e);

            let _ = black_box((a, b, c, d, e));
        })
    });
    c.bench_function("dense lookup", |b| {
        let mut map = DenseSlotMap::new();
        let keys = (0..1000).map(|i| map.insert(i)).collect::<Vec<_>>();

        b.iter(|| keys.iter().map(|&key| black_box(&map)[key]).sum::<i32>())
    });
    c.bench_function("dense iteration after removal", |b| {
        let mut map = DenseSlotMap::new();
        let keys = (0..1000).map(|i| map.insert(i)).collect::<Vec<_>>();

        for key in keys.into_iter().filter(|key| key.index() % 2 == 0 || key.index() % 11 == 0) {
            map.remove(key);
        }

        b.iter(|| black_box(&map).iter().sum::<i32>())
    });
    c.bench_function("dense iteration packed", |b| {
        let mut map = DenseSlotMap::new();

        for i in 0..545 {
            map.insert(i);
        }

        b.iter(|| black_box(&map).iter().sum::<i32>())
    });
    c.bench_function("dense clear", |b| {
        let mut map = DenseSlotMap::new();

        b.iter(|| {
            for i in 0..100 {
                map.insert(i);
            }
            black_box(&mut map).clear();
        })
    });
}

criterion_group!(benches, dense);
criterion_main!(benches);
