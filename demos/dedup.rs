//! Demonstrates deduplicating work items across threads with put_unique.
//!
//! Run with: cargo run --example dedup

use sovran_tsmap::ConcurrentMap;
use std::thread;

fn main() {
    let urls = [
        "https://example.com/a",
        "https://example.com/b",
        "https://example.com/a",
        "https://example.com/c",
        "https://example.com/b",
    ];

    let seen = ConcurrentMap::<&'static str, usize>::new();

    let handles: Vec<_> = (0..3)
        .map(|crawler| {
            let seen = seen.clone();
            thread::spawn(move || {
                let mut fetched = 0;
                for url in urls {
                    if seen.put_unique(url, crawler) {
                        fetched += 1;
                    }
                }
                fetched
            })
        })
        .collect();

    let mut total = 0;
    for handle in handles {
        total += handle.join().unwrap_or(0);
    }

    println!("fetched {} distinct urls", total);
    for url in seen.keys() {
        if let Some(crawler) = seen.get(&url) {
            println!("  {} claimed by crawler {}", url, crawler);
        }
    }
}
