#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use monitree_core::{collect_flat, Mode, Registry, Snapshot};

#[test]
fn concurrent_get_or_create_yields_one_node() {
    let root = Arc::new(Registry::root("root").unwrap());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let root = Arc::clone(&root);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                root.get_or_create_registry("a.b.c").unwrap()
            })
        })
        .collect();

    let nodes: Vec<Arc<Registry>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for n in &nodes {
        assert!(Arc::ptr_eq(n, &nodes[0]));
    }
    assert!(Arc::ptr_eq(&nodes[0], &root.get_registry("a.b.c").unwrap()));
}

#[test]
fn concurrent_registration_of_one_name_has_a_single_winner() {
    let root = Arc::new(Registry::root("root").unwrap());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let root = Arc::clone(&root);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                root.new_int("shared.counter", None).is_ok()
            })
        })
        .collect();

    let wins = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();
    assert_eq!(wins, 1);
}

#[test]
fn iteration_tolerates_concurrent_mutation() {
    let root = Arc::new(Registry::root("root").unwrap());
    let stable = root.new_int("stable.count", Some(Mode::Reported)).unwrap();
    stable.set(5);

    let stop = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let root = Arc::clone(&root);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut i = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    let name = format!("w{t}.n{}", i % 16);
                    if let Ok(v) = root.new_uint(&name, Some(Mode::Reported)) {
                        v.add(1);
                    }
                    if i % 3 == 0 {
                        root.remove(&name);
                    }
                    if i % 50 == 0 {
                        root.remove(&format!("w{t}"));
                    }
                    i += 1;
                }
            })
        })
        .collect();

    for _ in 0..200 {
        let snap = collect_flat(&root, Mode::Reported);
        assert_eq!(snap.get("stable.count"), Some(&Snapshot::Int(5)));
        let mut seen = HashSet::new();
        root.do_each(Mode::Full, |name, _| {
            assert!(seen.insert(name.to_string()), "visited {name} twice");
        });
        assert!(seen.contains("stable.count"));
    }

    stop.store(true, Ordering::Relaxed);
    for w in writers {
        w.join().unwrap();
    }
}

#[test]
fn counters_are_consistent_under_contention() {
    let root = Arc::new(Registry::root("root").unwrap());
    root.new_int("hits", None).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let root = Arc::clone(&root);
            thread::spawn(move || {
                let hits = root.get_as::<monitree_core::Int>("hits").unwrap();
                for _ in 0..1000 {
                    hits.inc();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(root.get_snapshot("hits"), Some(Snapshot::Int(8000)));
}
