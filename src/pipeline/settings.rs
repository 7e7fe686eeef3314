// volume + tempo, restored at startup and written back on every change
use crate::pipeline::persistence::{BPM_ENTRY, KeyValueStore, VOLUME_ENTRY};
use crate::shared::{DEFAULT_BPM, DEFAULT_VOLUME, MAX_BPM, MIN_BPM};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    pub volume: f32, // 0.0 - 1.0
    pub bpm: u16,    // MIN_BPM - MAX_BPM
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            bpm: DEFAULT_BPM,
        }
    }
}

pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return DEFAULT_VOLUME;
    }
    volume.clamp(0.0, 1.0)
}

pub fn clamp_bpm(bpm: u16) -> u16 {
    bpm.clamp(MIN_BPM, MAX_BPM)
}

/// Sole writer of the persisted volume and BPM.
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: Settings,
}

impl SettingsStore {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut settings = Settings::default();
        if let Some(raw) = store.get(VOLUME_ENTRY) {
            match raw.trim().parse::<f32>() {
                Ok(v) => settings.volume = clamp_volume(v),
                Err(e) => log::warn!("ignoring stored volume {raw:?}: {e}"),
            }
        }
        if let Some(raw) = store.get(BPM_ENTRY) {
            // parse wide so out-of-range values clamp instead of failing
            match raw.trim().parse::<i64>() {
                Ok(b) => settings.bpm = b.clamp(MIN_BPM as i64, MAX_BPM as i64) as u16,
                Err(e) => log::warn!("ignoring stored bpm {raw:?}: {e}"),
            }
        }
        log::debug!("settings loaded: {settings:?}");
        Self { settings }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn volume(&self) -> f32 {
        self.settings.volume
    }

    pub fn bpm(&self) -> u16 {
        self.settings.bpm
    }

    /// Returns the value actually stored after clamping.
    pub fn set_volume(&mut self, volume: f32, store: &mut dyn KeyValueStore) -> f32 {
        self.settings.volume = clamp_volume(volume);
        if let Err(e) = store.set(VOLUME_ENTRY, self.settings.volume.to_string()) {
            log::warn!("could not persist volume: {e}");
        }
        self.settings.volume
    }

    pub fn set_bpm(&mut self, bpm: u16, store: &mut dyn KeyValueStore) -> u16 {
        self.settings.bpm = clamp_bpm(bpm);
        if let Err(e) = store.set(BPM_ENTRY, self.settings.bpm.to_string()) {
            log::warn!("could not persist bpm: {e}");
        }
        self.settings.bpm
    }
}
