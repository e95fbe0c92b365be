//! Game registry.
//!
//! Holds every live game under its identifier and routes actions to it. Each
//! game sits behind its own mutex, so the read-validate-write of one action is
//! atomic with respect to other actions on the same game, while different
//! games proceed independently.
//!
//! Callers identify themselves by a resolved 1-based seat; an action from any
//! seat other than the one to act is refused before the rules are consulted.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::info;

use crate::board::{Coord, Fence};
use crate::game::{Configuration, Game, GameError, GameId};

/// Errors raised by the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("the game {0} does not exist")]
    UnknownGame(GameId),

    #[error("seat {seat} cannot act, it is seat {turn}'s turn")]
    NotYourTurn { seat: usize, turn: usize },

    #[error(transparent)]
    Game(#[from] GameError),
}

type Slot = Arc<Mutex<Game>>;

/// In-memory store of live games.
pub struct Engine {
    games: RwLock<HashMap<GameId, Slot>>,
    rng: Mutex<SmallRng>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Locks a mutex, recovering the guard if a previous holder panicked.
///
/// Games are only ever replaced whole, so the guarded value is consistent.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Engine {
    /// Creates an empty registry with an entropy-seeded identifier generator.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Creates an empty registry whose identifiers are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Engine {
            games: RwLock::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Number of live games.
    pub fn len(&self) -> usize {
        self.games.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates and stores a new game, returning a copy of it.
    pub fn create_game(&self, config: &Configuration) -> Result<Game, EngineError> {
        let game = {
            let mut rng = lock(&self.rng);
            Game::create(config, &mut *rng)?
        };
        self.insert(game.clone());
        info!(game = %game.id(), size = config.board_size, players = config.players, "game created");
        Ok(game)
    }

    /// Stores an existing game, replacing any game under the same identifier.
    ///
    /// Games only come from `Game::new`, accepted actions, or checked
    /// deserialization, so whatever is stored here is a consistent position.
    pub fn insert(&self, game: Game) {
        let id = game.id().clone();
        self.games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(game)));
    }

    /// Removes a game from the registry and returns its final state.
    pub fn remove_game(&self, id: &GameId) -> Result<Game, EngineError> {
        let slot = self
            .games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .ok_or_else(|| EngineError::UnknownGame(id.clone()))?;
        let game = lock(&slot).clone();
        info!(game = %id, "game removed");
        Ok(game)
    }

    /// Returns a copy of the current state of a game.
    pub fn game(&self, id: &GameId) -> Result<Game, EngineError> {
        let slot = self.slot(id)?;
        let game = lock(&slot).clone();
        Ok(game)
    }

    /// Places a fence on behalf of `seat`.
    pub fn add_fence(&self, id: &GameId, seat: usize, fence: Fence) -> Result<Game, EngineError> {
        self.apply(id, seat, |g| g.add_fence(fence))
    }

    /// Moves the pawn of `seat`.
    pub fn move_pawn(&self, id: &GameId, seat: usize, dest: Coord) -> Result<Game, EngineError> {
        self.apply(id, seat, |g| g.move_pawn(dest))
    }

    /// Fences the seat to act could place.
    pub fn legal_fence_placements(&self, id: &GameId) -> Result<BTreeSet<Fence>, EngineError> {
        let slot = self.slot(id)?;
        let placements = lock(&slot).legal_fence_placements();
        Ok(placements)
    }

    /// Cells the seat to act could move to.
    pub fn legal_pawn_destinations(&self, id: &GameId) -> Result<BTreeSet<Coord>, EngineError> {
        let slot = self.slot(id)?;
        let dests = lock(&slot).legal_pawn_destinations();
        Ok(dests)
    }

    fn slot(&self, id: &GameId) -> Result<Slot, EngineError> {
        self.games
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownGame(id.clone()))
    }

    /// Runs one action under the game's lock and stores the result on success.
    fn apply<F>(&self, id: &GameId, seat: usize, action: F) -> Result<Game, EngineError>
    where
        F: FnOnce(&Game) -> Result<Game, GameError>,
    {
        let slot = self.slot(id)?;
        let mut current = lock(&slot);
        if current.is_over() {
            return Err(GameError::GameOver.into());
        }
        if seat != current.turn() {
            return Err(EngineError::NotYourTurn {
                seat,
                turn: current.turn(),
            });
        }
        let next = action(&*current)?;
        *current = next.clone();
        Ok(next)
    }
}
