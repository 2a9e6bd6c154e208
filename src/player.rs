//! Players and their per-game state

use std::ops::{Index, IndexMut};

use crate::board::{PlayerId, Pos};

/// A player's identity plus the state that changes during a game
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Player {
    pub id: PlayerId,
    pub name: &'static str,
    pub glyph: &'static str,
    /// Accumulated points (collection variants)
    pub score: i32,
    /// Current cell (tracked-position variants only)
    pub pos: Option<Pos>,
}

impl Player {
    pub fn new(id: PlayerId, name: &'static str, glyph: &'static str) -> Self {
        Self {
            id,
            name,
            glyph,
            score: 0,
            pos: None,
        }
    }
}

/// The two players of a session, indexed by seat (`Human` = 0, `Computer` = 1)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Players([Player; 2]);

impl Players {
    pub fn new(human: Player, computer: Player) -> Self {
        debug_assert_eq!(human.id, PlayerId::Human);
        debug_assert_eq!(computer.id, PlayerId::Computer);
        Self([human, computer])
    }

    /// Superman (human) and Vampire (computer)
    pub fn fruit_duel() -> Self {
        Self::new(
            Player::new(PlayerId::Human, "Superman", "🦸"),
            Player::new(PlayerId::Computer, "Vampire", "🧛"),
        )
    }

    /// Crosses (human) and noughts (computer)
    pub fn noughts_and_crosses() -> Self {
        Self::new(
            Player::new(PlayerId::Human, "Crosses", "❌"),
            Player::new(PlayerId::Computer, "Noughts", "⭕"),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.0.iter()
    }

    /// Scores in seat order
    pub fn scores(&self) -> [i32; 2] {
        [self.0[0].score, self.0[1].score]
    }

    /// Computer score minus human score
    pub fn differential(&self) -> i32 {
        self.0[1].score - self.0[0].score
    }

    /// Reset scores and positions for a new round
    pub fn reset(&mut self) {
        for player in &mut self.0 {
            player.score = 0;
            player.pos = None;
        }
    }
}

impl Index<PlayerId> for Players {
    type Output = Player;

    #[inline]
    fn index(&self, id: PlayerId) -> &Player {
        &self.0[id.index()]
    }
}

impl IndexMut<PlayerId> for Players {
    #[inline]
    fn index_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.0[id.index()]
    }
}
