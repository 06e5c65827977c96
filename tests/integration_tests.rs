//! End-to-end tests exercising full channel lifecycles.

use std::sync::Arc;
use std::thread;

use seqchan::{Channel, ChannelError, ChannelMode};

/// A capacity-16 SPSC channel round-trips a full batch of items in order.
#[test]
fn spsc_round_trips_a_full_batch_in_order() {
    let ch: Channel<u32> = Channel::new(16, ChannelMode::Spsc).unwrap();
    for i in 0..16 {
        ch.try_send(i).unwrap();
    }
    assert!(ch.is_full());
    for i in 0..16 {
        assert_eq!(ch.try_receive(), Some(i));
    }
    assert!(ch.is_empty());
}

/// A capacity-4 SPSC channel rejects sends once full and accepts again
/// only after a receive frees a slot.
#[test]
fn spsc_fill_then_overflow_then_recover() {
    let ch: Channel<u32> = Channel::new(4, ChannelMode::Spsc).unwrap();
    for i in 0..4 {
        ch.try_send(i).unwrap();
    }
    assert_eq!(ch.try_send(99), Err(99));
    assert_eq!(ch.try_receive(), Some(0));
    ch.try_send(99).unwrap();
    assert_eq!(ch.try_receive(), Some(1));
    assert_eq!(ch.try_receive(), Some(2));
    assert_eq!(ch.try_receive(), Some(3));
    assert_eq!(ch.try_receive(), Some(99));
}

/// Two threads (one producer, one consumer) move a million items through
/// an SPSC channel with no loss, duplication, or reordering.
#[test]
fn spsc_two_threads_move_a_million_items_in_fifo_order() {
    const N: u64 = 1_000_000;
    let ch: Arc<Channel<u64>> = Arc::new(Channel::new(256, ChannelMode::Spsc).unwrap());

    let producer_ch = ch.clone();
    let producer = thread::spawn(move || {
        for i in 0..N {
            while producer_ch.try_send(i).is_err() {
                thread::yield_now();
            }
        }
    });

    let consumer = thread::spawn(move || {
        let mut next_expected = 0u64;
        while next_expected < N {
            if let Some(v) = ch.try_receive() {
                assert_eq!(v, next_expected);
                next_expected += 1;
            } else {
                thread::yield_now();
            }
        }
    });

    producer.join().unwrap();
    consumer.join().unwrap();
}

/// Four producer threads and one consumer on an MPSC channel deliver every
/// item exactly once, with each producer's own items staying in FIFO
/// order relative to each other.
#[test]
fn mpsc_four_producers_one_consumer_is_a_deterministic_multiset() {
    const PRODUCERS: u64 = 4;
    const PER_PRODUCER: u64 = 20_000;

    let ch: Arc<Channel<(u64, u64)>> = Arc::new(Channel::new(512, ChannelMode::Mpsc).unwrap());

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let ch = ch.clone();
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    while ch.try_send((p, seq)).is_err() {
                        thread::yield_now();
                    }
                }
            })
        })
        .collect();

    let mut last_seen = [None; PRODUCERS as usize];
    let mut received = Vec::with_capacity((PRODUCERS * PER_PRODUCER) as usize);
    while (received.len() as u64) < PRODUCERS * PER_PRODUCER {
        if let Some((p, seq)) = ch.try_receive() {
            if let Some(prev) = last_seen[p as usize] {
                assert!(seq > prev, "producer {p} delivered out of order: {prev} then {seq}");
            }
            last_seen[p as usize] = Some(seq);
            received.push((p, seq));
        } else {
            thread::yield_now();
        }
    }
    for p in producers {
        p.join().unwrap();
    }

    received.sort_unstable();
    received.dedup();
    assert_eq!(received.len() as u64, PRODUCERS * PER_PRODUCER);
}

/// An async `send` on a full channel suspends, then resolves once the
/// consumer frees a slot; an async `recv` on an empty channel suspends
/// until an item arrives.
#[tokio::test]
async fn async_send_suspends_on_full_and_resumes_after_drain() {
    let ch: Arc<Channel<u32>> = Arc::new(Channel::new(1, ChannelMode::Spsc).unwrap());
    ch.try_send(1).unwrap();

    let sender = ch.clone();
    let send_task = tokio::spawn(async move {
        sender.send(2).await;
    });

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    assert!(!send_task.is_finished(), "send should still be backing off on a full channel");

    assert_eq!(ch.try_receive(), Some(1));
    send_task.await.unwrap();
    assert_eq!(ch.try_receive(), Some(2));
}

/// Requested sizes map to the documented power-of-two capacities.
#[test]
fn requested_sizes_round_up_to_documented_capacities() {
    let cases = [(0, 1), (1, 1), (2, 2), (3, 4), (7, 8), (8, 8), (9, 16), (1000, 1024)];
    for (requested, expected) in cases {
        let ch: Channel<u8> = Channel::new(requested, ChannelMode::Spsc).unwrap();
        assert_eq!(ch.capacity(), expected, "requested {requested} should round to {expected}");
    }
}

/// The two implemented modes always construct successfully; `ChannelMode`
/// being `#[non_exhaustive]` means any mode this crate adds later without
/// an implementation goes through the same `ChannelError::UnsupportedMode`
/// path rather than silently degrading to SPSC or MPSC.
#[test]
fn implemented_modes_construct_successfully() {
    assert!(Channel::<u8>::new(4, ChannelMode::Spsc).is_ok());
    assert!(Channel::<u8>::new(4, ChannelMode::Mpsc).is_ok());
    let _: fn(ChannelMode) -> Result<Channel<u8>, ChannelError> = |m| Channel::new(4, m);
}
