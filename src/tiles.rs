//! Tile alphabets: name, display glyph and point value per tile kind

use crate::board::{Cell, TileKind};
use crate::player::Players;

/// One entry of a tile alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpec {
    pub name: &'static str,
    pub glyph: &'static str,
    pub points: i32,
}

/// Immutable tile alphabet for a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSet {
    fruits: Vec<TileSpec>,
    obstacle: Option<TileSpec>,
}

pub const EMPTY_GLYPH: &str = "⬜";
pub const EATEN_GLYPH: &str = "⬛";

impl TileSet {
    pub fn new(fruits: Vec<TileSpec>, obstacle: Option<TileSpec>) -> Self {
        debug_assert!(fruits.len() <= u8::MAX as usize);
        Self { fruits, obstacle }
    }

    /// Avocado, banana, apple, carrot and the prohibited tile
    pub fn fruit() -> Self {
        Self::new(
            vec![
                TileSpec { name: "avocado", glyph: "🥑", points: 4 },
                TileSpec { name: "banana", glyph: "🍌", points: 3 },
                TileSpec { name: "apple", glyph: "🍎", points: 2 },
                TileSpec { name: "carrot", glyph: "🥕", points: 1 },
            ],
            Some(TileSpec { name: "prohibited", glyph: "🚫", points: 0 }),
        )
    }

    /// No tiles at all: every cell starts `Empty`
    pub fn blank() -> Self {
        Self::new(Vec::new(), None)
    }

    pub fn fruits(&self) -> &[TileSpec] {
        &self.fruits
    }

    pub fn obstacle(&self) -> Option<&TileSpec> {
        self.obstacle.as_ref()
    }

    pub fn spec(&self, kind: TileKind) -> Option<&TileSpec> {
        self.fruits.get(kind.0 as usize)
    }

    /// The board cell for a tile kind
    pub fn cell(&self, kind: TileKind) -> Cell {
        Cell::Fruit {
            kind,
            points: self.spec(kind).map_or(0, |s| s.points),
        }
    }

    /// Number of cell kinds the initial-state generator draws from
    /// (fruits plus the obstacle, if any)
    pub fn draw_kinds(&self) -> usize {
        self.fruits.len() + usize::from(self.obstacle.is_some())
    }

    /// Cell for a draw index in `0..draw_kinds()`
    pub fn drawn_cell(&self, idx: usize) -> Cell {
        if idx < self.fruits.len() {
            self.cell(TileKind(idx as u8))
        } else {
            Cell::Obstacle
        }
    }

    /// Display glyph for any cell
    pub fn glyph(&self, cell: Cell, players: &Players) -> &'static str {
        match cell {
            Cell::Empty => EMPTY_GLYPH,
            Cell::Eaten => EATEN_GLYPH,
            Cell::Obstacle => self.obstacle.map_or("#", |s| s.glyph),
            Cell::Fruit { kind, .. } => self.spec(kind).map_or("?", |s| s.glyph),
            Cell::Occupied(id) => players[id].glyph,
        }
    }

    /// Points legend rows: fruits first, then the obstacle
    pub fn legend(&self) -> impl Iterator<Item = &TileSpec> {
        self.fruits.iter().chain(self.obstacle.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PlayerId;

    #[test]
    fn test_fruit_alphabet() {
        let tiles = TileSet::fruit();
        assert_eq!(tiles.draw_kinds(), 5);
        assert_eq!(tiles.cell(TileKind(0)).points(), 4);
        assert_eq!(tiles.drawn_cell(3).points(), 1);
        assert_eq!(tiles.drawn_cell(4), Cell::Obstacle);
        assert_eq!(tiles.legend().count(), 5);
    }

    #[test]
    fn test_glyphs_cover_every_cell() {
        let tiles = TileSet::fruit();
        let players = Players::fruit_duel();
        assert_eq!(tiles.glyph(Cell::Obstacle, &players), "🚫");
        assert_eq!(tiles.glyph(Cell::Occupied(PlayerId::Computer), &players), "🧛");
        assert_eq!(tiles.glyph(Cell::Eaten, &players), EATEN_GLYPH);
        assert_eq!(tiles.glyph(Cell::Empty, &players), EMPTY_GLYPH);
        // Unknown kinds still render
        let stray = Cell::Fruit { kind: TileKind(9), points: 1 };
        assert_eq!(tiles.glyph(stray, &players), "?");
    }

    #[test]
    fn test_blank_has_no_draws() {
        assert_eq!(TileSet::blank().draw_kinds(), 0);
    }
}
