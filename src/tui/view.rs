use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Gauge, Paragraph};

use super::grid::draw_pads;
use super::mode::{EditorDraft, TuiState};
use super::theme;
use crate::pipeline::metronome::MetronomeState;
use crate::pipeline::player::PlaybackState;
use crate::pipeline::recorder::RecorderState;
use crate::shared::DisplayState;

const HINT: &str =
    "  keys:pads  Tab:rec  Enter:play  Bksp:clear  F1:click  ↑/↓:bpm  ←/→:vol  F2:keys  Esc:stop/quit";
const EDITOR_HINT: &str = " type:set  Bksp:unbind  Enter:apply  F5:defaults  Esc:cancel ";

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, ts: &mut TuiState, now: Instant) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // transport + status
            Constraint::Length(3), // volume + bpm
            Constraint::Min(5),    // pads
            Constraint::Length(1), // hint
        ])
        .split(area);

    draw_transport(frame, sections[0], state);
    draw_settings(frame, sections[1], state);
    draw_pads(frame, sections[2], &state.pads, ts, now);
    frame.render_widget(
        Paragraph::new(HINT).style(Style::default().fg(theme::DIM)),
        sections[3],
    );

    if let Some(draft) = &ts.editor {
        draw_editor(frame, area, draft);
    }
}

fn draw_transport(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let rec = match state.recorder {
        RecorderState::Recording => Span::styled(" ● REC ", Style::default().fg(theme::RECORD_RED)),
        RecorderState::Idle => Span::styled(" ○ rec ", Style::default().fg(theme::DIM)),
    };
    let play = match state.playback {
        PlaybackState::Playing => Span::styled(" ▶ PLAY ", Style::default().fg(theme::PLAYING_GREEN)),
        PlaybackState::Idle if state.can_play => Span::styled(" ▷ play ", Style::default().fg(theme::FG)),
        PlaybackState::Idle => Span::styled(" ▷ play ", Style::default().fg(theme::DIM)),
    };
    let line = Line::from(vec![
        rec,
        play,
        Span::styled(
            format!(" {} hits ", state.recorded_hits),
            Style::default().fg(theme::FG),
        ),
        Span::styled(
            format!("  {}", state.status),
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).block(Block::bordered().title(" drumkit ")), area);
}

fn draw_settings(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let volume = Gauge::default()
        .block(Block::bordered().title(" volume "))
        .gauge_style(Style::default().fg(theme::ACCENT))
        .ratio(f64::from(state.volume.clamp(0.0, 1.0)))
        .label(format!("{}%", state.volume_percent()));
    frame.render_widget(volume, cols[0]);

    let click = match state.metronome {
        MetronomeState::Running => Span::styled("  ♪ click", Style::default().fg(theme::CLICK_YELLOW)),
        MetronomeState::Stopped => Span::styled("  ♪ off", Style::default().fg(theme::DIM)),
    };
    let bpm = Line::from(vec![
        Span::styled(format!(" {} BPM", state.bpm), Style::default().fg(theme::FG)),
        click,
    ]);
    frame.render_widget(Paragraph::new(bpm).block(Block::bordered().title(" tempo ")), cols[1]);
}

fn draw_editor(frame: &mut Frame, area: Rect, draft: &EditorDraft) {
    let height = draft.rows.len() as u16 + 2;
    let popup = centered(area, 36, height);

    let lines: Vec<Line> = draft
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let key = if row.key.is_empty() { "_" } else { row.key.as_str() };
            let text = format!(" {:<10} [{}]", row.name, key);
            if i == draft.selected {
                Line::styled(text, Style::default().fg(theme::ACCENT).bg(theme::SELECTED_BG))
            } else {
                Line::styled(text, Style::default().fg(theme::FG))
            }
        })
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::bordered()
                .title(" key mapping ")
                .title_bottom(EDITOR_HINT),
        ),
        popup,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middle::DrumKit;
    use crate::pipeline::persistence::MemoryStore;
    use crate::timing::ManualClock;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn popup_fits_inside_small_areas() {
        let area = Rect::new(0, 0, 20, 5);
        let popup = centered(area, 36, 9);
        assert_eq!(popup, Rect::new(0, 0, 20, 5));
    }

    #[test]
    fn render_records_pad_rects_for_every_pad() {
        let kit = DrumKit::new(Box::new(ManualClock::new()), Box::new(MemoryStore::new()));
        let state = kit.display_state();
        let mut ts = TuiState::default();
        let mut term = Terminal::new(TestBackend::new(100, 20)).unwrap();
        term.draw(|frame| {
            let area = frame.area();
            render(frame, area, &state, &mut ts, Instant::now());
        })
        .unwrap();

        assert_eq!(ts.pad_rects.len(), 7);
        let (rect, key) = ts.pad_rects[4];
        assert_eq!(key.map(|k| k.as_char()), Some('j'));
        assert_eq!(ts.pad_at(rect.x + 1, rect.y + 1), key);
    }
}
