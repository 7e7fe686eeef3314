use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use super::mode::TuiState;
use super::theme;
use crate::shared::PadView;

// one pad per drum, side by side in kit order
pub fn draw_pads(frame: &mut Frame, area: Rect, pads: &[PadView], ts: &mut TuiState, now: Instant) {
    let n = pads.len().max(1) as u32;
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(pads.iter().map(|_| Constraint::Ratio(1, n)))
        .split(area);

    ts.pad_rects.clear();
    for (pad, cell) in pads.iter().zip(cells.iter()) {
        let lit = ts.is_lit(&pad.sound, now);
        let style = if lit {
            Style::default().fg(theme::PAD_LIT).add_modifier(Modifier::BOLD)
        } else if pad.key.is_some() {
            Style::default().fg(theme::FG)
        } else {
            Style::default().fg(theme::DIM)
        };
        let label = match pad.key {
            Some(key) => key.to_string().to_uppercase(),
            None => "-".to_string(),
        };

        let block = Block::bordered().title(pad.name).border_style(style);
        let inner = block.inner(*cell);
        frame.render_widget(block, *cell);

        // vertically centre the key label
        let pad_top = inner.height.saturating_sub(1) / 2;
        let text: Vec<Line> = std::iter::repeat_n(Line::raw(""), pad_top as usize)
            .chain(std::iter::once(Line::styled(label, style)))
            .collect();
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);

        ts.pad_rects.push((*cell, pad.key));
    }
}
