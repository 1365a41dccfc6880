//! MCP session state.
//!
//! Owns the character and monster rosters and the dice RNG for one client connection.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::roster::{CreatureKind, Roster};

/// MCP session state.
///
/// Everything lives in memory and is dropped when the connection ends.
pub struct McpSession {
    /// Character store
    characters: Roster,
    /// Monster store
    monsters: Roster,
    /// RNG used by dice tools
    rng: StdRng,
}

impl McpSession {
    /// Create a new session with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a new session whose dice rolls are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            characters: Roster::new(CreatureKind::Character),
            monsters: Roster::new(CreatureKind::Monster),
            rng,
        }
    }

    /// Get the roster for a creature kind.
    pub fn roster(&self, kind: CreatureKind) -> &Roster {
        match kind {
            CreatureKind::Character => &self.characters,
            CreatureKind::Monster => &self.monsters,
        }
    }

    /// Get the roster for a creature kind, mutably.
    pub fn roster_mut(&mut self, kind: CreatureKind) -> &mut Roster {
        match kind {
            CreatureKind::Character => &mut self.characters,
            CreatureKind::Monster => &mut self.monsters,
        }
    }

    /// The dice RNG.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Default for McpSession {
    fn default() -> Self {
        Self::new()
    }
}
