use drumkit::pipeline::mapping::{KeyMapping, PadKey};
use drumkit::pipeline::persistence::{
    BPM_ENTRY, JsonFileStore, KeyValueStore, VOLUME_ENTRY, settings_file_path,
};
use drumkit::timing::ManualClock;
use drumkit::{DrumKit, InputEvent};

fn open_kit(dir: &std::path::Path) -> DrumKit {
    DrumKit::new(
        Box::new(ManualClock::new()),
        Box::new(JsonFileStore::open(dir)),
    )
}

#[test]
fn settings_and_mapping_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut kit = open_kit(dir.path());
        kit.handle_input(InputEvent::SetVolume(0.35));
        kit.handle_input(InputEvent::SetBpm(95));
        kit.handle_input(InputEvent::ApplyMapping(vec![
            ("z".to_string(), "kick-bass".into()),
            ("x".to_string(), "snare".into()),
        ]));
    }
    assert!(settings_file_path(dir.path()).exists());

    let kit = open_kit(dir.path());
    let ds = kit.display_state();
    assert!((ds.volume - 0.35).abs() < 1e-6);
    assert_eq!(ds.bpm, 95);
    assert_eq!(
        kit.mapping(),
        &KeyMapping::from_entries([("z", "kick-bass"), ("x", "snare")])
    );
}

#[test]
fn out_of_range_values_are_stored_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let mut kit = open_kit(dir.path());
    kit.handle_input(InputEvent::SetBpm(500));
    kit.handle_input(InputEvent::SetVolume(3.0));

    let store = JsonFileStore::open(dir.path());
    assert_eq!(store.get(BPM_ENTRY).as_deref(), Some("200"));
    assert_eq!(store.get(VOLUME_ENTRY).as_deref(), Some("1"));
}

#[test]
fn garbage_on_disk_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = settings_file_path(dir.path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let mut kit = open_kit(dir.path());
    let ds = kit.display_state();
    assert_eq!(ds.bpm, 120);
    assert_eq!(ds.volume, 1.0);
    assert_eq!(kit.mapping(), &KeyMapping::default_kit());

    // and the next write repairs the file
    kit.handle_input(InputEvent::SetBpm(100));
    let store = JsonFileStore::open(dir.path());
    assert_eq!(store.get(BPM_ENTRY).as_deref(), Some("100"));
}

#[test]
fn reset_mapping_persists_defaults() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut kit = open_kit(dir.path());
        kit.handle_input(InputEvent::ApplyMapping(vec![("q".to_string(), "crash".into())]));
        kit.handle_input(InputEvent::ResetMapping);
    }
    let kit = open_kit(dir.path());
    assert_eq!(kit.mapping(), &KeyMapping::default_kit());
    assert_eq!(
        kit.mapping().sound_for(PadKey::from_char('k')).map(|s| s.as_str()),
        Some("crash")
    );
}
