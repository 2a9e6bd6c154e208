//! Board rendering for the Grid Duel GUI

use egui::{Align2, CornerRadius, FontId, Painter, Pos2, Rect, Sense, Stroke, Vec2};

use crate::board::{Board, Cell, Pos};
use crate::player::Players;
use crate::tiles::TileSet;

use super::theme::*;

/// What the board view needs to know about the current position
pub struct BoardScene<'a> {
    pub board: &'a Board,
    pub players: &'a Players,
    pub tiles: &'a TileSet,
    pub last_move: Option<Pos>,
    pub winning_line: Option<&'a [Pos]>,
}

/// Board view handles rendering and input for the game board
pub struct BoardView {
    /// Cached cell size for coordinate calculations
    cell_size: f32,
    /// Board drawing area
    board_rect: Rect,
    rows: u8,
    cols: u8,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_size: 60.0,
            board_rect: Rect::NOTHING,
            rows: 0,
            cols: 0,
        }
    }
}

impl BoardView {
    /// Render the board and return the clicked cell if it is playable
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        scene: &BoardScene<'_>,
        is_playable: impl Fn(Pos) -> bool,
    ) -> Option<Pos> {
        self.rows = scene.board.rows();
        self.cols = scene.board.cols();

        let available = ui.available_size() - Vec2::splat(20.0);
        let span = self.rows.max(self.cols) as f32;
        self.cell_size = ((available.x.min(available.y) - 2.0 * BOARD_MARGIN) / span).max(16.0);

        let size = Vec2::new(
            2.0 * BOARD_MARGIN + self.cols as f32 * self.cell_size,
            2.0 * BOARD_MARGIN + self.rows as f32 * self.cell_size,
        );
        let (response, painter) = ui.allocate_painter(size, Sense::click());
        self.board_rect = response.rect;

        painter.rect_filled(self.board_rect, CornerRadius::same(4), BOARD_BG);
        self.draw_coordinates(&painter);
        self.draw_cells(&painter, scene);

        if let Some(pos) = scene.last_move {
            let center = self.cell_rect(pos).right_top() + Vec2::new(-8.0, 8.0);
            painter.circle_filled(center, LAST_MOVE_MARKER_RADIUS, LAST_MOVE_MARKER);
        }

        if let Some(line) = scene.winning_line {
            self.draw_winning_line(&painter, line);
        }

        let hovered = response.hover_pos().and_then(|p| self.screen_to_board(p))?;
        let playable = is_playable(hovered);
        let color = if playable { hover_valid() } else { hover_invalid() };
        painter.rect_filled(self.cell_rect(hovered), CornerRadius::same(6), color);

        (response.clicked() && playable).then_some(hovered)
    }

    /// Column and row labels, 1-based
    fn draw_coordinates(&self, painter: &Painter) {
        let font = FontId::proportional(12.0);
        for col in 0..self.cols {
            let rect = self.cell_rect(Pos::new(0, col));
            let pos = Pos2::new(rect.center().x, self.board_rect.min.y + BOARD_MARGIN * 0.5);
            painter.text(pos, Align2::CENTER_CENTER, col + 1, font.clone(), GRID_LINE);
        }
        for row in 0..self.rows {
            let rect = self.cell_rect(Pos::new(row, 0));
            let pos = Pos2::new(self.board_rect.min.x + BOARD_MARGIN * 0.5, rect.center().y);
            painter.text(pos, Align2::CENTER_CENTER, row + 1, font.clone(), GRID_LINE);
        }
    }

    fn draw_cells(&self, painter: &Painter, scene: &BoardScene<'_>) {
        let font = FontId::proportional(self.cell_size * GLYPH_RATIO);
        for (pos, cell) in scene.board.iter() {
            let rect = self.cell_rect(pos);
            let fill = match cell {
                Cell::Eaten => CELL_EATEN,
                Cell::Obstacle => CELL_OBSTACLE,
                _ => CELL_BG,
            };
            painter.rect_filled(rect, CornerRadius::same(6), fill);
            painter.rect_stroke(
                rect,
                CornerRadius::same(6),
                Stroke::new(1.0, GRID_LINE),
                egui::StrokeKind::Inside,
            );

            if matches!(cell, Cell::Empty | Cell::Eaten) {
                continue;
            }
            let glyph = scene.tiles.glyph(cell, scene.players);
            painter.text(rect.center(), Align2::CENTER_CENTER, glyph, font.clone(), TEXT_PRIMARY);

            if let Cell::Fruit { points, .. } = cell {
                painter.text(
                    rect.right_bottom() - Vec2::new(6.0, 6.0),
                    Align2::RIGHT_BOTTOM,
                    points,
                    FontId::proportional(11.0),
                    GRID_LINE,
                );
            }
        }
    }

    fn draw_winning_line(&self, painter: &Painter, line: &[Pos]) {
        let stroke = Stroke::new(4.0, WIN_HIGHLIGHT);
        for pair in line.windows(2) {
            let start = self.cell_rect(pair[0]).center();
            let end = self.cell_rect(pair[1]).center();
            painter.line_segment([start, end], stroke);
        }
        for &pos in line {
            painter.rect_stroke(
                self.cell_rect(pos),
                CornerRadius::same(6),
                stroke,
                egui::StrokeKind::Inside,
            );
        }
    }

    /// Screen rectangle of a cell
    pub fn cell_rect(&self, pos: Pos) -> Rect {
        let min = self.board_rect.min
            + Vec2::new(
                BOARD_MARGIN + pos.col as f32 * self.cell_size,
                BOARD_MARGIN + pos.row as f32 * self.cell_size,
            );
        Rect::from_min_size(min, Vec2::splat(self.cell_size)).shrink(CELL_GAP)
    }

    /// Convert screen coordinates to board position
    pub fn screen_to_board(&self, screen_pos: Pos2) -> Option<Pos> {
        let relative = screen_pos - self.board_rect.min - Vec2::splat(BOARD_MARGIN);
        if relative.x < 0.0 || relative.y < 0.0 {
            return None;
        }
        let col = (relative.x / self.cell_size).floor() as u32;
        let row = (relative.y / self.cell_size).floor() as u32;
        (row < self.rows as u32 && col < self.cols as u32).then(|| Pos::new(row as u8, col as u8))
    }
}
