//! Demonstrates using ConcurrentMap as a worker registry shared between threads.
//!
//! Run with: cargo run --example registry

use sovran_tsmap::ConcurrentMap;
use std::sync::Arc;
use std::thread;

#[derive(Clone)]
struct Registry {
    names: Arc<ConcurrentMap<u32, String>>,
    jobs: Arc<ConcurrentMap<u32, u32>>,
}

impl Registry {
    fn new() -> Self {
        Self {
            names: Arc::new(ConcurrentMap::new()),
            jobs: Arc::new(ConcurrentMap::new()),
        }
    }

    /// Claims an id; fails if someone else already holds it
    fn register(&self, id: u32, name: &str) -> bool {
        self.names.put_unique(id, name.to_string())
    }

    // A single put; reading the old count first and writing it back would race.
    fn report(&self, id: u32, jobs_done: u32) {
        self.jobs.put(id, jobs_done);
    }
}

fn main() {
    let registry = Registry::new();

    let handles: Vec<_> = (0..4u32)
        .map(|n| {
            let registry = registry.clone();
            thread::spawn(move || {
                // Two threads compete for each id
                let id = n / 2;
                if registry.register(id, &format!("worker-{}", n)) {
                    registry.report(id, 10 * (n + 1));
                    println!("thread {} registered id {}", n, id);
                } else {
                    println!("thread {} lost the race for id {}", n, id);
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("a worker thread panicked");
        }
    }

    let mut ids = registry.names.keys();
    ids.sort();
    for id in ids {
        if let Some(name) = registry.names.get(&id) {
            let jobs = registry.jobs.get(&id).unwrap_or(0);
            println!("{}: {} ({} jobs)", id, name, jobs);
        }
    }
}
