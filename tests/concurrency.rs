//! Concurrency Integration Tests
//!
//! Tests that concurrent writers never lose updates and readers always see
//! a consistent snapshot.

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use libris::{BorrowLedger, Catalog, Document, User};

const THREADS: usize = 8;
const PER_THREAD: usize = 50;

fn doc(title: String) -> Document {
    Document::builder()
        .title(title)
        .author("Anon")
        .category("Load")
        .build()
        .unwrap()
}

#[test]
fn test_concurrent_adds_are_not_lost() {
    let catalog = Arc::new(Catalog::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let catalog = Arc::clone(&catalog);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..PER_THREAD {
                    catalog.add(doc(format!("t{}-{}", t, i))).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(catalog.len().unwrap(), THREADS * PER_THREAD);

    let ids: HashSet<_> = catalog.all().unwrap().iter().map(|d| d.id()).collect();
    assert_eq!(ids.len(), THREADS * PER_THREAD);
}

#[test]
fn test_concurrent_duplicate_add_succeeds_once() {
    let catalog = Arc::new(Catalog::new());
    let shared = Arc::new(doc("Shared".to_string()));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            let shared = Arc::clone(&shared);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                catalog.add(shared).is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 1);
    assert_eq!(catalog.len().unwrap(), 1);
}

#[test]
fn test_readers_see_insertion_ordered_prefixes() {
    let catalog = Arc::new(Catalog::new());

    let writer = {
        let catalog = Arc::clone(&catalog);
        thread::spawn(move || {
            for i in 0..200 {
                catalog.add(doc(format!("{:04}", i))).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                for _ in 0..100 {
                    let snapshot = catalog.all().unwrap();
                    // Every snapshot is exactly the first N documents added
                    for (i, d) in snapshot.iter().enumerate() {
                        assert_eq!(d.title(), format!("{:04}", i));
                    }

                    let grouped = catalog.group_by(|d| d.category().to_string()).unwrap();
                    assert!(grouped.total() <= 200);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(catalog.len().unwrap(), 200);
}

#[test]
fn test_concurrent_borrowing() {
    let catalog = Arc::new(Catalog::new());
    let doc = catalog.add(doc("Java Guide".to_string())).unwrap();
    let ledger = Arc::new(BorrowLedger::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let ledger = Arc::clone(&ledger);
            let doc = Arc::clone(&doc);
            thread::spawn(move || {
                let user = User::student(format!("user{}", t)).unwrap();
                for _ in 0..PER_THREAD {
                    ledger.borrow(&user, &doc);
                }
                for _ in 0..PER_THREAD / 2 {
                    ledger.return_item(&user, &doc).unwrap();
                }
                user
            })
        })
        .collect();

    for handle in handles {
        let user = handle.join().unwrap();
        assert_eq!(ledger.loans(&user).len(), PER_THREAD - PER_THREAD / 2);
    }
}
