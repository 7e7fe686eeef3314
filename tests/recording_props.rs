use proptest::prelude::*;

use drumkit::pipeline::mapping::DRUM_KIT;
use drumkit::pipeline::persistence::MemoryStore;
use drumkit::timing::ManualClock;
use drumkit::{DrumKit, InputEvent};

fn pad_key() -> impl Strategy<Value = char> {
    prop::sample::select(DRUM_KIT.iter().map(|d| d.default_key).collect::<Vec<_>>())
}

proptest! {
    // every hit made while armed is kept, in order, with non-decreasing stamps
    #[test]
    fn recording_keeps_every_hit_in_order(
        hits in prop::collection::vec((pad_key(), 0u64..400), 0..40),
        start in 0u64..10_000,
    ) {
        let clock = ManualClock::new();
        let mut kit = DrumKit::new(Box::new(clock.clone()), Box::new(MemoryStore::new()));
        clock.set_ms(start);
        kit.handle_input(InputEvent::StartRecording);
        for (key, gap) in &hits {
            clock.advance_ms(*gap);
            kit.handle_input(InputEvent::KeyPress(*key));
        }
        kit.handle_input(InputEvent::StopRecording);

        let events = kit.recording().events();
        prop_assert_eq!(events.len(), hits.len());
        let keys: Vec<char> = events.iter().map(|e| e.key.as_char()).collect();
        let expected: Vec<char> = hits.iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(keys, expected);
        prop_assert!(events.windows(2).all(|w| w[0].timestamp_ms <= w[1].timestamp_ms));

        let total: u64 = hits.iter().map(|(_, gap)| gap).sum();
        prop_assert_eq!(kit.recording().duration_ms(), if hits.is_empty() { 0 } else { total });
    }

    #[test]
    fn idle_hits_are_never_recorded(keys in prop::collection::vec(pad_key(), 1..20)) {
        let mut kit = DrumKit::new(Box::new(ManualClock::new()), Box::new(MemoryStore::new()));
        for key in keys {
            kit.handle_input(InputEvent::KeyPress(key));
        }
        prop_assert!(kit.recording().is_empty());
    }
}
