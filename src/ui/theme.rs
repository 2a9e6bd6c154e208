//! Theme constants for the Grid Duel GUI

use egui::Color32;

// Board colors
pub const BOARD_BG: Color32 = Color32::from_rgb(222, 184, 135);
pub const GRID_LINE: Color32 = Color32::from_rgb(60, 40, 20);
pub const CELL_BG: Color32 = Color32::from_rgb(238, 214, 175);
pub const CELL_EATEN: Color32 = Color32::from_rgb(120, 95, 70);
pub const CELL_OBSTACLE: Color32 = Color32::from_rgb(90, 60, 60);

// Markers
pub const LAST_MOVE_MARKER: Color32 = Color32::from_rgb(230, 60, 60);
pub const WIN_HIGHLIGHT: Color32 = Color32::from_rgb(50, 220, 50);

pub fn hover_valid() -> Color32 {
    Color32::from_rgba_unmultiplied(80, 200, 120, 90)
}

pub fn hover_invalid() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 50, 50, 100)
}

// Panel colors - dark modern theme
pub const PANEL_BG: Color32 = Color32::from_rgb(25, 27, 31);
pub const CARD_BG: Color32 = Color32::from_rgb(35, 38, 43);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 165, 175);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 125, 135);

// Timer colors
pub const TIMER_NORMAL: Color32 = Color32::from_rgb(80, 200, 120);
pub const TIMER_WARNING: Color32 = Color32::from_rgb(255, 180, 50);
pub const TIMER_CRITICAL: Color32 = Color32::from_rgb(255, 70, 70);

// Sizes
pub const BOARD_MARGIN: f32 = 28.0;
pub const CELL_GAP: f32 = 3.0;
pub const GLYPH_RATIO: f32 = 0.6;
pub const LAST_MOVE_MARKER_RADIUS: f32 = 5.0;
