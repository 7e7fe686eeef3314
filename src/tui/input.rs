use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};

use super::mode::{EditorDraft, TuiState};
use crate::pipeline::metronome::MetronomeState;
use crate::pipeline::player::PlaybackState;
use crate::pipeline::recorder::RecorderState;
use crate::shared::{DisplayState, InputEvent, VOLUME_STEP};

const BPM_FINE: u16 = 1;
const BPM_COARSE: u16 = 10;

// poll for input from the terminal and resolve it into InputEvents; toggles
// (record, metronome, esc) are resolved against the last DisplayState
pub fn poll_input(
    timeout: Duration,
    ts: &mut TuiState,
    ds: &DisplayState,
) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key(key.code, ts, ds)),
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            if ts.editor.is_some() {
                return Ok(vec![]);
            }
            Ok(ts
                .pad_at(mouse.column, mouse.row)
                .map(InputEvent::PadClick)
                .into_iter()
                .collect())
        }
        _ => Ok(vec![]),
    }
}

pub fn handle_key(code: KeyCode, ts: &mut TuiState, ds: &DisplayState) -> Vec<InputEvent> {
    if let Some(draft) = ts.editor.as_mut() {
        return match handle_editor_key(code, draft) {
            EditorOutcome::Stay => vec![],
            EditorOutcome::Close(events) => {
                ts.editor = None;
                events
            }
        };
    }

    match code {
        KeyCode::Esc => match ds.playback {
            PlaybackState::Playing => vec![InputEvent::StopPlayback],
            PlaybackState::Idle => vec![InputEvent::Quit],
        },
        KeyCode::Tab => match ds.recorder {
            RecorderState::Recording => vec![InputEvent::StopRecording],
            RecorderState::Idle => vec![InputEvent::StartRecording],
        },
        KeyCode::Enter => vec![InputEvent::PlayRecording],
        KeyCode::Backspace => vec![InputEvent::ClearRecording],
        KeyCode::F(1) => match ds.metronome {
            MetronomeState::Running => vec![InputEvent::StopMetronome],
            MetronomeState::Stopped => vec![InputEvent::StartMetronome],
        },
        KeyCode::F(2) => {
            ts.editor = Some(EditorDraft::from_display(ds));
            vec![]
        }

        // the kit clamps into range, so no bounds here
        KeyCode::Up => vec![InputEvent::SetBpm(ds.bpm.saturating_add(BPM_FINE))],
        KeyCode::Down => vec![InputEvent::SetBpm(ds.bpm.saturating_sub(BPM_FINE))],
        KeyCode::PageUp => vec![InputEvent::SetBpm(ds.bpm.saturating_add(BPM_COARSE))],
        KeyCode::PageDown => vec![InputEvent::SetBpm(ds.bpm.saturating_sub(BPM_COARSE))],
        KeyCode::Left => vec![InputEvent::SetVolume(step_volume(ds.volume, -VOLUME_STEP))],
        KeyCode::Right => vec![InputEvent::SetVolume(step_volume(ds.volume, VOLUME_STEP))],

        KeyCode::Char(c) => vec![InputEvent::KeyPress(c)],
        _ => vec![],
    }
}

enum EditorOutcome {
    Stay,
    Close(Vec<InputEvent>),
}

fn handle_editor_key(code: KeyCode, draft: &mut EditorDraft) -> EditorOutcome {
    match code {
        KeyCode::Esc => EditorOutcome::Close(vec![]),
        KeyCode::Enter => EditorOutcome::Close(vec![InputEvent::ApplyMapping(draft.entries())]),
        KeyCode::F(5) => EditorOutcome::Close(vec![InputEvent::ResetMapping]),
        KeyCode::Up => {
            draft.select_prev();
            EditorOutcome::Stay
        }
        KeyCode::Down | KeyCode::Tab => {
            draft.select_next();
            EditorOutcome::Stay
        }
        KeyCode::Backspace | KeyCode::Delete => {
            draft.set_key(String::new());
            EditorOutcome::Stay
        }
        KeyCode::Char(c) => {
            draft.set_key(c.to_string());
            EditorOutcome::Stay
        }
        _ => EditorOutcome::Stay,
    }
}

// snap to whole percent so repeated steps don't drift
fn step_volume(volume: f32, delta: f32) -> f32 {
    ((volume + delta) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middle::DrumKit;
    use crate::pipeline::persistence::MemoryStore;
    use crate::timing::ManualClock;

    fn display() -> DisplayState {
        DrumKit::new(Box::new(ManualClock::new()), Box::new(MemoryStore::new())).display_state()
    }

    #[test]
    fn characters_are_pad_presses() {
        let mut ts = TuiState::default();
        assert_eq!(
            handle_key(KeyCode::Char('J'), &mut ts, &display()),
            vec![InputEvent::KeyPress('J')]
        );
    }

    #[test]
    fn toggles_follow_display_state() {
        let mut ts = TuiState::default();
        let mut ds = display();
        assert_eq!(handle_key(KeyCode::Tab, &mut ts, &ds), vec![InputEvent::StartRecording]);
        ds.recorder = RecorderState::Recording;
        assert_eq!(handle_key(KeyCode::Tab, &mut ts, &ds), vec![InputEvent::StopRecording]);

        assert_eq!(handle_key(KeyCode::F(1), &mut ts, &ds), vec![InputEvent::StartMetronome]);
        ds.metronome = MetronomeState::Running;
        assert_eq!(handle_key(KeyCode::F(1), &mut ts, &ds), vec![InputEvent::StopMetronome]);

        assert_eq!(handle_key(KeyCode::Esc, &mut ts, &ds), vec![InputEvent::Quit]);
        ds.playback = PlaybackState::Playing;
        assert_eq!(handle_key(KeyCode::Esc, &mut ts, &ds), vec![InputEvent::StopPlayback]);
    }

    #[test]
    fn arrows_step_bpm_and_volume() {
        let mut ts = TuiState::default();
        let ds = display();
        assert_eq!(handle_key(KeyCode::Up, &mut ts, &ds), vec![InputEvent::SetBpm(121)]);
        assert_eq!(handle_key(KeyCode::PageDown, &mut ts, &ds), vec![InputEvent::SetBpm(110)]);
        assert_eq!(handle_key(KeyCode::Left, &mut ts, &ds), vec![InputEvent::SetVolume(0.95)]);
    }

    #[test]
    fn editor_edits_then_applies() {
        let mut ts = TuiState::default();
        let ds = display();
        assert!(handle_key(KeyCode::F(2), &mut ts, &ds).is_empty());
        assert!(ts.editor.is_some());

        // typing in the editor never hits a pad
        assert!(handle_key(KeyCode::Char('q'), &mut ts, &ds).is_empty());
        handle_key(KeyCode::Down, &mut ts, &ds);
        handle_key(KeyCode::Backspace, &mut ts, &ds);

        let events = handle_key(KeyCode::Enter, &mut ts, &ds);
        assert!(ts.editor.is_none());
        let [InputEvent::ApplyMapping(entries)] = events.as_slice() else {
            panic!("expected ApplyMapping, got {events:?}");
        };
        assert_eq!(entries[0], ("q".to_string(), "tom-1".into()));
        assert_eq!(entries[1], (String::new(), "tom-2".into()));
        assert_eq!(entries[2], ("s".to_string(), "tom-3".into()));
    }

    #[test]
    fn editor_cancel_and_reset() {
        let mut ts = TuiState::default();
        let ds = display();
        handle_key(KeyCode::F(2), &mut ts, &ds);
        assert!(handle_key(KeyCode::Esc, &mut ts, &ds).is_empty());
        assert!(ts.editor.is_none());

        handle_key(KeyCode::F(2), &mut ts, &ds);
        assert_eq!(handle_key(KeyCode::F(5), &mut ts, &ds), vec![InputEvent::ResetMapping]);
    }
}
