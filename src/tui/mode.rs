use std::time::{Duration, Instant};

use ratatui::layout::{Position, Rect};

use crate::pipeline::mapping::{PadKey, SoundId};
use crate::shared::{DisplayState, PAD_FLASH_MS};

// one row of the key editor
#[derive(Clone, Debug, PartialEq)]
pub struct EditorRow {
    pub sound: SoundId,
    pub name: &'static str,
    pub key: String, // raw text, validated by the kit on apply
}

#[derive(Clone, Debug, PartialEq)]
pub struct EditorDraft {
    pub rows: Vec<EditorRow>,
    pub selected: usize,
}

impl EditorDraft {
    // open on the mapping currently in force
    pub fn from_display(ds: &DisplayState) -> Self {
        let rows = ds
            .pads
            .iter()
            .map(|pad| EditorRow {
                sound: pad.sound.clone(),
                name: pad.name,
                key: pad.key.map(|k| k.to_string()).unwrap_or_default(),
            })
            .collect();
        Self { rows, selected: 0 }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn set_key(&mut self, key: String) {
        if let Some(row) = self.rows.get_mut(self.selected) {
            row.key = key;
        }
    }

    pub fn entries(&self) -> Vec<(String, SoundId)> {
        self.rows
            .iter()
            .map(|row| (row.key.clone(), row.sound.clone()))
            .collect()
    }
}

// state local to the tui: what the kit doesn't need to know about
#[derive(Clone, Debug, Default)]
pub struct TuiState {
    pub editor: Option<EditorDraft>,
    // pad flash deadlines
    lit: Vec<(SoundId, Instant)>,
    // where each pad was last drawn, for mouse hits
    pub pad_rects: Vec<(Rect, Option<PadKey>)>,
}

impl TuiState {
    pub fn flash(&mut self, sound: SoundId, now: Instant) {
        let until = now + Duration::from_millis(PAD_FLASH_MS);
        self.lit.retain(|(s, _)| *s != sound);
        self.lit.push((sound, until));
    }

    pub fn is_lit(&self, sound: &SoundId, now: Instant) -> bool {
        self.lit.iter().any(|(s, until)| s == sound && now < *until)
    }

    pub fn expire_flashes(&mut self, now: Instant) {
        self.lit.retain(|(_, until)| now < *until);
    }

    pub fn pad_at(&self, column: u16, row: u16) -> Option<PadKey> {
        let pos = Position::new(column, row);
        self.pad_rects
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .and_then(|(_, key)| *key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_lasts_its_window() {
        let mut ts = TuiState::default();
        let t0 = Instant::now();
        let snare = SoundId::new("snare");
        ts.flash(snare.clone(), t0);
        assert!(ts.is_lit(&snare, t0 + Duration::from_millis(149)));
        assert!(!ts.is_lit(&snare, t0 + Duration::from_millis(150)));

        ts.expire_flashes(t0 + Duration::from_millis(200));
        assert!(!ts.is_lit(&snare, t0));
    }

    #[test]
    fn retrigger_extends_the_flash() {
        let mut ts = TuiState::default();
        let t0 = Instant::now();
        let crash = SoundId::new("crash");
        ts.flash(crash.clone(), t0);
        ts.flash(crash.clone(), t0 + Duration::from_millis(100));
        assert!(ts.is_lit(&crash, t0 + Duration::from_millis(200)));
    }

    #[test]
    fn pad_hit_testing() {
        let mut ts = TuiState::default();
        ts.pad_rects = vec![
            (Rect::new(0, 0, 10, 5), Some(PadKey::from_char('w'))),
            (Rect::new(10, 0, 10, 5), None),
        ];
        assert_eq!(ts.pad_at(3, 2), Some(PadKey::from_char('w')));
        assert_eq!(ts.pad_at(12, 2), None);
        assert_eq!(ts.pad_at(30, 2), None);
    }

    #[test]
    fn editor_selection_stays_in_bounds() {
        let mut draft = EditorDraft {
            rows: vec![
                EditorRow { sound: "tom-1".into(), name: "Tom 1", key: "w".into() },
                EditorRow { sound: "snare".into(), name: "Snare", key: "j".into() },
            ],
            selected: 0,
        };
        draft.select_prev();
        assert_eq!(draft.selected, 0);
        draft.select_next();
        draft.select_next();
        assert_eq!(draft.selected, 1);
        draft.set_key("x".into());
        assert_eq!(
            draft.entries(),
            vec![("w".to_string(), "tom-1".into()), ("x".to_string(), "snare".into())]
        );
    }
}
