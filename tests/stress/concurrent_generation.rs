//! Stress test: many threads generate and parse keys at once. Nothing is
//! shared between calls, so every result must be independently valid and
//! no two generated keys may collide.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;

use wg_keys::crypto::{derive_public, is_clamped};
use wg_keys::{generate_key_pair, generate_pre_key, Key};

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

#[test]
fn stress_concurrent_key_pairs_unique_and_consistent() {
    let seen = Arc::new(Mutex::new(HashSet::new()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let seen = Arc::clone(&seen);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let (private, public) = generate_key_pair(None)
                        .expect("generation should succeed")
                        .into_result()
                        .expect("fresh pair cannot fail");

                    let private_key = Key::from_base64(&private).unwrap();
                    assert!(is_clamped(private_key.as_bytes()), "thread {t} iter {i}");
                    assert_eq!(derive_public(&private_key).to_base64(), public);

                    let fresh = seen.lock().unwrap().insert(private);
                    assert!(fresh, "duplicate private key in thread {t} iter {i}");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    assert_eq!(seen.lock().unwrap().len(), THREADS * PER_THREAD);
}

#[test]
fn stress_concurrent_pre_keys_unique() {
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            thread::spawn(|| {
                (0..PER_THREAD)
                    .map(|_| generate_pre_key().expect("generation should succeed"))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut all = HashSet::new();
    for handle in handles {
        for psk in handle.join().expect("worker thread panicked") {
            assert!(all.insert(psk), "duplicate preshared key");
        }
    }
    assert_eq!(all.len(), THREADS * PER_THREAD);
}

#[test]
fn stress_concurrent_parse_same_key_is_deterministic() {
    let (private, public) = generate_key_pair(None).unwrap().into_result().unwrap();
    let private = Arc::new(private);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let private = Arc::clone(&private);
            thread::spawn(move || {
                (0..PER_THREAD)
                    .map(|_| {
                        generate_key_pair(Some(&private))
                            .unwrap()
                            .public_key()
                            .map(str::to_owned)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for derived in handle.join().unwrap() {
            assert_eq!(derived.as_deref(), Some(public.as_str()));
        }
    }
}
