use ratatui::style::Color;

pub const FG: Color = Color::Rgb(200, 200, 210);
pub const DIM: Color = Color::Rgb(80, 80, 90);
pub const ACCENT: Color = Color::Rgb(0, 200, 150);
pub const RECORD_RED: Color = Color::Rgb(220, 50, 50);
pub const PLAYING_GREEN: Color = Color::Rgb(50, 220, 100);
pub const CLICK_YELLOW: Color = Color::Rgb(220, 200, 50);
pub const PAD_LIT: Color = Color::Rgb(255, 150, 100);
pub const SELECTED_BG: Color = Color::Rgb(40, 45, 55);
