// which key plays which drum, and the one component allowed to change that
use std::collections::BTreeMap;
use std::fmt;

use crate::pipeline::persistence::{KeyValueStore, MAPPING_ENTRY};

/// A single pad key, always stored lower-case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PadKey(char);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingEntryError {
    #[error("key is empty")]
    Empty,
    #[error("key {0:?} is longer than one character")]
    TooLong(String),
}

impl PadKey {
    pub fn parse(raw: &str) -> Result<Self, MappingEntryError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(MappingEntryError::Empty),
            (Some(c), None) => Ok(Self::from_char(c)),
            (Some(_), Some(_)) => Err(MappingEntryError::TooLong(raw.to_string())),
        }
    }

    pub fn from_char(c: char) -> Self {
        // keep the original char when lower-casing would expand it (e.g. 'İ')
        let mut lower = c.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) => Self(l),
            _ => Self(c),
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for PadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SoundId(String);

impl SoundId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SoundId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Drum {
    pub sound: &'static str,
    pub name: &'static str,
    pub default_key: char,
}

// pads are laid out in this order
pub const DRUM_KIT: [Drum; 7] = [
    Drum { sound: "tom-1", name: "Tom 1", default_key: 'w' },
    Drum { sound: "tom-2", name: "Tom 2", default_key: 'a' },
    Drum { sound: "tom-3", name: "Tom 3", default_key: 's' },
    Drum { sound: "tom-4", name: "Tom 4", default_key: 'd' },
    Drum { sound: "snare", name: "Snare", default_key: 'j' },
    Drum { sound: "crash", name: "Crash", default_key: 'k' },
    Drum { sound: "kick-bass", name: "Kick", default_key: 'l' },
];

/// Key → sound bindings. A key plays at most one sound and a sound is
/// reachable from at most one key; the latest binding wins either way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyMapping {
    bindings: BTreeMap<PadKey, SoundId>,
}

impl KeyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// w a s d j k l → tom-1 tom-2 tom-3 tom-4 snare crash kick-bass
    pub fn default_kit() -> Self {
        let mut mapping = Self::new();
        for drum in DRUM_KIT {
            mapping.bind(PadKey::from_char(drum.default_key), SoundId::new(drum.sound));
        }
        mapping
    }

    /// Build a mapping from raw `(key, sound)` entries in order, dropping
    /// entries whose key is not exactly one character.
    pub fn from_entries<K, S>(entries: impl IntoIterator<Item = (K, S)>) -> Self
    where
        K: AsRef<str>,
        S: Into<SoundId>,
    {
        let mut mapping = Self::new();
        for (raw_key, sound) in entries {
            match PadKey::parse(raw_key.as_ref()) {
                Ok(key) => mapping.bind(key, sound.into()),
                Err(e) => log::debug!("dropping mapping entry: {e}"),
            }
        }
        mapping
    }

    fn bind(&mut self, key: PadKey, sound: SoundId) {
        self.bindings.retain(|k, s| *k == key || *s != sound);
        self.bindings.insert(key, sound);
    }

    pub fn sound_for(&self, key: PadKey) -> Option<&SoundId> {
        self.bindings.get(&key)
    }

    pub fn key_for(&self, sound: &str) -> Option<PadKey> {
        self.bindings
            .iter()
            .find(|(_, s)| s.as_str() == sound)
            .map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PadKey, &SoundId)> {
        self.bindings.iter().map(|(k, s)| (*k, s))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        let flat: BTreeMap<String, &str> = self
            .bindings
            .iter()
            .map(|(k, s)| (k.to_string(), s.as_str()))
            .collect();
        Ok(serde_json::to_string(&flat)?)
    }

    /// Parse a flat JSON object; invalid keys are filtered like an edit.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let flat: BTreeMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::from_entries(
            flat.into_iter().map(|(k, s)| (k, SoundId::new(s))),
        ))
    }
}

/// Owns the active mapping; the only writer of it, in memory and on disk.
#[derive(Debug)]
pub struct MappingEditor {
    active: KeyMapping,
}

impl MappingEditor {
    /// Restore the persisted mapping, or the default kit if there is none
    /// or it can't be parsed.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let active = match store.get(MAPPING_ENTRY) {
            Some(json) => KeyMapping::from_json(&json).unwrap_or_else(|e| {
                log::warn!("stored key mapping unreadable, using defaults: {e}");
                KeyMapping::default_kit()
            }),
            None => KeyMapping::default_kit(),
        };
        Self { active }
    }

    pub fn mapping(&self) -> &KeyMapping {
        &self.active
    }

    /// Replace the whole mapping (no merge) and persist it.
    pub fn apply(&mut self, candidate: KeyMapping, store: &mut dyn KeyValueStore) -> &KeyMapping {
        self.active = candidate;
        self.persist(store);
        &self.active
    }

    pub fn reset(&mut self, store: &mut dyn KeyValueStore) -> &KeyMapping {
        self.apply(KeyMapping::default_kit(), store)
    }

    fn persist(&self, store: &mut dyn KeyValueStore) {
        let result = self
            .active
            .to_json()
            .and_then(|json| store.set(MAPPING_ENTRY, json));
        if let Err(e) = result {
            log::warn!("could not persist key mapping: {e}");
        }
    }
}
