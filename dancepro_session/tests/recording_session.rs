// Integration test for recording sessions and the payload store.
//
// Drives a `Recorder` through the device flow: button press, a stream of
// sensor polls faster than the beat spacing, button press again. The
// published payload is checked as a reader would see it, from a separate
// thread holding its own `NoteStore` clone, including while sessions are
// being published concurrently.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use dancepro_music::composition::Section;
use dancepro_music::sequencer::Position;
use dancepro_music::{Engine, EngineConfig, EventLog, OrientationSample, Vec3};
use dancepro_session::{NoteStore, Recorder};

/// Sensor poll at a calm 40 degree tilt.
fn poll_sample(timestamp_ms: u64) -> OrientationSample {
    let r = 40f32.to_radians();
    OrientationSample::from_raw(
        timestamp_ms,
        Vec3::new(r.sin(), 0.0, r.cos()),
        Vec3::new(90.0, 20.0, 0.0),
        Vec3::new(30.0, 0.0, -40.0),
    )
}

fn recorder(seed: u64, store: NoteStore) -> Recorder {
    Recorder::new(Engine::with_seed(EngineConfig::default(), seed), store)
}

/// Poll every 20 ms from `from` for `duration` ms. Returns events emitted.
fn poll_for(rec: &mut Recorder, from: u64, duration: u64) -> usize {
    (from..from + duration)
        .step_by(20)
        .filter_map(|t| rec.poll(&poll_sample(t)))
        .count()
}

#[test]
fn fast_polls_are_paced_by_min_spacing() {
    let store = NoteStore::new();
    let mut rec = recorder(1, store.clone());
    rec.toggle(0);

    // 20 ms polls: events land on 0, 260, 520, ... (first poll at or past
    // 250 ms after the previous event)
    let emitted = poll_for(&mut rec, 0, 3_000);
    assert_eq!(emitted, 12);
    rec.toggle(3_000);

    let published = EventLog::from_json(&store.latest()).unwrap();
    assert_eq!(published.len(), emitted);
    assert_eq!(&published, rec.log());
}

#[test]
fn each_session_starts_at_the_top() {
    let store = NoteStore::new();
    let mut rec = recorder(2, store.clone());

    rec.start(0);
    poll_for(&mut rec, 0, 4_000);
    rec.stop(4_000);
    assert_ne!(rec.engine().state().position().measure, 0);

    // immediately start again, well inside the idle timeout
    rec.start(4_100);
    assert!(rec.log().is_empty());
    rec.poll(&poll_sample(4_100)).unwrap();
    let expected = Position {
        section: Section::A,
        measure: 0,
        beat: 1,
    };
    assert_eq!(rec.engine().state().position(), expected);
}

#[test]
fn store_keeps_last_session_until_next_stop() {
    let store = NoteStore::new();
    let mut rec = recorder(3, store.clone());

    rec.start(0);
    poll_for(&mut rec, 0, 1_000);
    rec.stop(1_000);
    let first = store.snapshot();
    assert_eq!(first.updated_at_ms, Some(1_000));

    // a running session does not touch the published payload
    rec.start(2_000);
    poll_for(&mut rec, 2_000, 2_000);
    assert_eq!(store.snapshot(), first);

    rec.stop(4_000);
    assert_ne!(store.latest(), first.payload);
    assert_eq!(store.snapshot().updated_at_ms, Some(4_000));
}

#[test]
fn concurrent_readers_only_see_whole_payloads() {
    let store = NoteStore::new();
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let store = store.clone();
            let done = done.clone();
            thread::spawn(move || {
                let mut reads = 0usize;
                while !done.load(Ordering::Acquire) {
                    let payload = store.latest();
                    let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();
                    assert!(parsed.is_array());
                    reads += 1;
                }
                reads
            })
        })
        .collect();

    let mut rec = recorder(4, store.clone());
    let mut now = 0;
    for _ in 0..20 {
        rec.start(now);
        poll_for(&mut rec, now, 1_500);
        now += 1_500;
        rec.stop(now);
        now += 100;
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(EventLog::from_json(&store.latest()).unwrap(), *rec.log());
}
