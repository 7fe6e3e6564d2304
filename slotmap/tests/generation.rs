use dense_slotmap::{DenseSlotMap, Generation, Key};

type TinyKey = Key<(), u8>;

#[test]
fn tiny_generation_exhaustion() {
    let mut map = DenseSlotMap::<_, (), u8>::tagged();
    let a: TinyKey = map.insert(0);
    let ai = a.index();

    let mut key = a;
    let mut generations = vec![*a.generation()];
    while *key.generation() < u8::MAX - 2 {
        let value = map.remove(key);
        key = map.insert(value);
        assert_eq!(key.index(), ai);
        generations.push(*key.generation());
    }

    // every occupancy got a fresh, odd generation
    assert_eq!(generations.len(), 127);
    assert!(generations.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(generations.iter().all(|generation| generation.is_occupied()));

    // the slot is retired instead of wrapping back to generation 1
    let value = map.remove(key);
    let b: TinyKey = map.insert(value);
    assert_ne!(ai, b.index());

    for &generation in &generations {
        assert!(!map.contains(Key::new(ai, generation)));
    }
}

#[test]
fn retired_slots_stay_out_of_clear() {
    let mut map = DenseSlotMap::<_, (), u8>::tagged();
    let mut key = map.insert(());
    for _ in 1..127 {
        map.remove(key);
        key = map.insert(());
    }
    map.remove(key);

    map.insert(());
    map.insert(());
    map.clear();

    let indices = (0..3).map(|_| map.insert(()).index()).collect::<Vec<_>>();
    assert_eq!(indices, [2, 3, 4]);
}

#[test]
fn default_generation_never_repeats() {
    let mut map = DenseSlotMap::new();
    let mut seen = Vec::new();

    let mut key = map.insert(0u64);
    for i in 1..1000 {
        seen.push(key);
        map.remove(key);
        key = map.insert(i);
    }

    for stale in seen {
        assert_eq!(stale.index(), key.index());
        assert!(stale.generation() < key.generation());
        assert_eq!(map.get(stale), None);
    }
    assert_eq!(map[key], 999);
}
