use ratatui::style::Color;

// Element colors follow the ones `sl` itself uses so the picker reads like `sl ssl`.
//
// Keep roles here instead of sprinkling colors through the renderer.
pub const FG: Color = Color::Reset;
pub const MUTED: Color = Color::Gray;
pub const BAR_BG: Color = Color::DarkGray;

pub const COMMIT_TRUNK: Color = Color::Yellow;
pub const COMMIT_FORK: Color = Color::Gray;
pub const BOOKMARK: Color = Color::Green;

// Author, datetime and message of the entry under the cursor.
pub const HIGHLIGHT: Color = Color::Magenta;
