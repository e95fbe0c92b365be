//! Game state machine.
//!
//! A `Game` is a plain value. Every action takes the current game by
//! reference and returns either a new game or a typed rejection; the input is
//! never modified, so a rejected action leaves no trace.
//!
//! Turns are 1-based seat numbers cycling over the pawns. Once a pawn lands on
//! its goal line the game is over and every further action is rejected.

use std::collections::BTreeSet;
use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::board::{Board, BoardError, Coord, Direction, Fence, FenceSet, Pawn};
use crate::movegen::{first_trapped_pawn, legal_destinations, legal_fence_placements};
use crate::protocol::{check_game, SnapshotError};
use crate::search::distance_to_goal;

pub const DEFAULT_BOARD_SIZE: usize = 9;
pub const DEFAULT_FENCES_PER_PLAYER: u32 = 10;
pub const DEFAULT_PLAYERS: usize = 2;

/// Length of generated game identifiers.
pub const GAME_ID_LEN: usize = 22;

/// Goal edge of each seat, in turn order. Pawns start on the opposite edge.
const SEAT_GOALS: [Direction; 4] = [
    Direction::East,
    Direction::West,
    Direction::South,
    Direction::North,
];

/// Options for creating a game. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub board_size: usize,
    pub fences_per_player: u32,
    pub players: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            board_size: DEFAULT_BOARD_SIZE,
            fences_per_player: DEFAULT_FENCES_PER_PLAYER,
            players: DEFAULT_PLAYERS,
        }
    }
}

impl Configuration {
    /// A two-player configuration on a board of the given size.
    pub fn new(board_size: usize) -> Self {
        Configuration {
            board_size,
            ..Self::default()
        }
    }

    /// Checks the configuration and returns the board it describes.
    pub fn validate(&self) -> Result<Board, ConfigError> {
        let board = Board::new(self.board_size)?;
        if self.players != 2 && self.players != 4 {
            return Err(ConfigError::PlayerCount(self.players));
        }
        Ok(board)
    }
}

/// Errors in a game configuration.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("unsupported player count {0}, expected 2 or 4")]
    PlayerCount(usize),
}

/// Reasons an action is rejected. The game is unchanged in every case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("fence {0} overlaps another one")]
    FenceOverlap(Fence),

    #[error("fence {0} would leave a pawn without access to its goal line")]
    NoPathToGoal(Fence),

    #[error("seat {seat} has no fences left")]
    NoFencesLeft { seat: usize },

    #[error("game is over")]
    GameOver,

    #[error("{0} is outside the board")]
    OutOfBounds(Coord),

    #[error("{0} is not a legal destination")]
    IllegalDestination(Coord),
}

/// Opaque game identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Draws a fresh alphanumeric identifier.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let id = rng
            .sample_iter(&Alphanumeric)
            .take(GAME_ID_LEN)
            .map(char::from)
            .collect();
        GameId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        GameId(s.to_string())
    }
}

impl From<String> for GameId {
    fn from(s: String) -> Self {
        GameId(s)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    InProgress,
    Over,
}

/// Complete state of one game.
///
/// Deserialization goes through `RawGame` and re-checks every invariant, so a
/// decoded game is always one the state machine could have produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGame")]
pub struct Game {
    id: GameId,
    board: Board,
    pawns: Vec<Pawn>,
    fences: FenceSet,
    /// Seat to act, 1-based.
    turn: usize,
    over: bool,
}

/// Unchecked mirror of `Game`, as read from a snapshot.
#[derive(Debug, Deserialize)]
pub(crate) struct RawGame {
    id: GameId,
    board: Board,
    pawns: Vec<Pawn>,
    fences: FenceSet,
    turn: usize,
    over: bool,
}

impl TryFrom<RawGame> for Game {
    type Error = SnapshotError;

    fn try_from(raw: RawGame) -> Result<Self, Self::Error> {
        let game = Game {
            id: raw.id,
            board: raw.board,
            pawns: raw.pawns,
            fences: raw.fences,
            turn: raw.turn,
            over: raw.over,
        };
        check_game(&game)?;
        Ok(game)
    }
}

impl Game {
    /// Creates a game: pawns on the midpoints of opposite edges, no fences,
    /// seat 1 to act.
    pub fn new(id: GameId, config: &Configuration) -> Result<Game, GameError> {
        let board = config.validate()?;
        let pawns = SEAT_GOALS[..config.players]
            .iter()
            .map(|&goal| {
                Pawn::new(
                    board.edge_midpoint(goal.opposite()),
                    goal,
                    config.fences_per_player,
                )
            })
            .collect();

        Ok(Game {
            id,
            board,
            pawns,
            fences: FenceSet::new(),
            turn: 1,
            over: false,
        })
    }

    /// Creates a game under a freshly generated identifier.
    pub fn create(config: &Configuration, rng: &mut impl Rng) -> Result<Game, GameError> {
        Game::new(GameId::generate(rng), config)
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Pawns in seat order; seat `n` owns `pawns()[n - 1]`.
    pub fn pawns(&self) -> &[Pawn] {
        &self.pawns
    }

    pub fn fences(&self) -> &FenceSet {
        &self.fences
    }

    /// The seat to act, 1-based.
    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn status(&self) -> Status {
        if self.over {
            Status::Over
        } else {
            Status::InProgress
        }
    }

    /// The pawn of a 1-based seat.
    pub fn pawn(&self, seat: usize) -> Option<&Pawn> {
        seat.checked_sub(1).and_then(|i| self.pawns.get(i))
    }

    pub fn current_pawn(&self) -> &Pawn {
        &self.pawns[self.current_index()]
    }

    fn current_index(&self) -> usize {
        self.turn - 1
    }

    fn next_turn(&self) -> usize {
        self.turn % self.pawns.len() + 1
    }

    /// The seat whose pawn reached its goal line, once the game is over.
    pub fn winner(&self) -> Option<usize> {
        if !self.over {
            return None;
        }
        self.pawns
            .iter()
            .position(|p| self.board.on_edge(p.position, p.goal))
            .map(|i| i + 1)
    }

    /// Shortest fence-respecting distance from each pawn to its goal line, in seat order.
    pub fn distances_to_goal(&self) -> Vec<Option<usize>> {
        self.pawns
            .iter()
            .map(|p| {
                let goal = self.board.goal_line(p.goal);
                distance_to_goal(&self.board, &self.fences, p.position, &goal)
            })
            .collect()
    }

    /// Places a fence for the seat to act and passes the turn.
    pub fn add_fence(&self, fence: Fence) -> Result<Game, GameError> {
        if self.over {
            return Err(self.reject(GameError::GameOver));
        }
        if !self.board.contains_anchor(fence.anchor) {
            return Err(self.reject(GameError::OutOfBounds(fence.anchor)));
        }
        if self.current_pawn().fences_left == 0 {
            return Err(self.reject(GameError::NoFencesLeft { seat: self.turn }));
        }
        if self.fences.overlaps(&fence) {
            return Err(self.reject(GameError::FenceOverlap(fence)));
        }
        if first_trapped_pawn(&self.board, &self.fences, &self.pawns, fence).is_some() {
            return Err(self.reject(GameError::NoPathToGoal(fence)));
        }

        let mut next = self.clone();
        next.fences.insert(fence);
        next.pawns[self.current_index()].fences_left -= 1;
        next.turn = self.next_turn();
        debug!(game = %self.id, seat = self.turn, %fence, "fence placed");
        Ok(next)
    }

    /// Moves the pawn of the seat to act and passes the turn.
    ///
    /// Landing on the pawn's goal line ends the game.
    pub fn move_pawn(&self, dest: Coord) -> Result<Game, GameError> {
        if self.over {
            return Err(self.reject(GameError::GameOver));
        }
        if !self.board.contains(dest) {
            return Err(self.reject(GameError::OutOfBounds(dest)));
        }
        if !self.legal_pawn_destinations().contains(&dest) {
            return Err(self.reject(GameError::IllegalDestination(dest)));
        }

        let mut next = self.clone();
        let pawn = &mut next.pawns[self.current_index()];
        pawn.position = dest;
        next.over = self.board.on_edge(dest, pawn.goal);
        next.turn = self.next_turn();
        debug!(game = %self.id, seat = self.turn, %dest, over = next.over, "pawn moved");
        Ok(next)
    }

    /// Every fence the seat to act could place right now.
    pub fn legal_fence_placements(&self) -> BTreeSet<Fence> {
        if self.over || self.current_pawn().fences_left == 0 {
            return BTreeSet::new();
        }
        legal_fence_placements(&self.board, &self.fences, &self.pawns)
    }

    /// Every cell the seat to act could move its pawn to right now.
    pub fn legal_pawn_destinations(&self) -> BTreeSet<Coord> {
        if self.over {
            return BTreeSet::new();
        }
        legal_destinations(&self.board, &self.fences, &self.pawns, self.current_index())
    }

    fn reject(&self, err: GameError) -> GameError {
        trace!(game = %self.id, seat = self.turn, error = %err, "action rejected");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn game(size: usize) -> Game {
        Game::new(GameId::from("test"), &Configuration::new(size)).unwrap()
    }

    fn play(game: &Game, moves: &[(i32, i32)]) -> Game {
        moves.iter().fold(game.clone(), |g, &(c, r)| {
            g.move_pawn(Coord::new(c, r)).unwrap()
        })
    }

    #[test]
    fn rejects_invalid_configurations() {
        assert_eq!(
            Game::new(GameId::from("x"), &Configuration::new(4)),
            Err(GameError::InvalidConfiguration(ConfigError::Board(
                BoardError::InvalidSize(4)
            )))
        );
        let three = Configuration {
            players: 3,
            ..Configuration::new(5)
        };
        assert_eq!(
            Game::new(GameId::from("x"), &three),
            Err(GameError::InvalidConfiguration(ConfigError::PlayerCount(3)))
        );
    }

    #[test]
    fn oversized_board_from_json_is_rejected() {
        let config: Configuration =
            serde_json::from_str(r#"{"board_size": 4294967297}"#).unwrap();
        assert!(matches!(
            Game::new(GameId::from("huge"), &config),
            Err(GameError::InvalidConfiguration(ConfigError::Board(
                BoardError::InvalidSize(_)
            )))
        ));
    }

    #[test]
    fn pawns_start_on_opposite_edge_midpoints() {
        for size in [3, 5, 7, 9, 11] {
            let g = game(size);
            let mid = (size as i32 - 1) / 2;
            assert_eq!(g.pawns()[0].position, Coord::new(0, mid));
            assert_eq!(g.pawns()[0].goal, Direction::East);
            assert_eq!(g.pawns()[1].position, Coord::new(size as i32 - 1, mid));
            assert_eq!(g.pawns()[1].goal, Direction::West);
            assert_eq!(g.turn(), 1);
            assert!(g.fences().is_empty());
            assert_eq!(g.status(), Status::InProgress);
        }
    }

    #[test]
    fn four_players_start_on_all_edges() {
        let config = Configuration {
            board_size: 5,
            fences_per_player: 5,
            players: 4,
        };
        let g = Game::new(GameId::from("four"), &config).unwrap();
        let starts: Vec<Coord> = g.pawns().iter().map(|p| p.position).collect();
        assert_eq!(
            starts,
            vec![Coord::new(0, 2), Coord::new(4, 2), Coord::new(2, 0), Coord::new(2, 4)]
        );
        assert!(g.pawns().iter().all(|p| p.fences_left == 5));
    }

    #[test]
    fn generated_ids_are_alphanumeric() {
        let mut rng = SmallRng::seed_from_u64(7);
        let g = Game::create(&Configuration::default(), &mut rng).unwrap();
        assert_eq!(g.id().as_str().len(), GAME_ID_LEN);
        assert!(g.id().as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        let other = Game::create(&Configuration::default(), &mut rng).unwrap();
        assert_ne!(g.id(), other.id());
    }

    #[test]
    fn add_fence_commits_and_passes_turn() {
        let g = game(3);
        let g1 = g.add_fence(Fence::vertical(0, 0)).unwrap();
        assert_eq!(g1.fences().len(), 1);
        assert!(g1.fences().contains(&Fence::vertical(0, 0)));
        assert_eq!(g1.turn(), 2);
        assert_eq!(g1.pawns()[0].fences_left, DEFAULT_FENCES_PER_PLAYER - 1);
        assert!(g.fences().is_empty());
    }

    #[test]
    fn crossing_fence_on_same_anchor_overlaps() {
        let g = game(3).add_fence(Fence::vertical(0, 0)).unwrap();
        assert_eq!(
            g.add_fence(Fence::horizontal(0, 0)),
            Err(GameError::FenceOverlap(Fence::horizontal(0, 0)))
        );
        let g = game(3).add_fence(Fence::horizontal(0, 0)).unwrap();
        assert_eq!(
            g.add_fence(Fence::vertical(0, 0)),
            Err(GameError::FenceOverlap(Fence::vertical(0, 0)))
        );
    }

    #[test]
    fn adjacent_vertical_fence_overlaps() {
        let g = game(3).add_fence(Fence::vertical(0, 0)).unwrap();
        assert_eq!(
            g.add_fence(Fence::vertical(0, 1)),
            Err(GameError::FenceOverlap(Fence::vertical(0, 1)))
        );
    }

    #[test]
    fn adjacent_horizontal_fence_overlaps_either_side() {
        let g = game(5).add_fence(Fence::horizontal(0, 0)).unwrap();
        assert!(matches!(
            g.add_fence(Fence::horizontal(1, 0)),
            Err(GameError::FenceOverlap(_))
        ));
        let g = game(5).add_fence(Fence::horizontal(1, 0)).unwrap();
        assert!(matches!(
            g.add_fence(Fence::horizontal(0, 0)),
            Err(GameError::FenceOverlap(_))
        ));
    }

    #[test]
    fn crossing_between_two_parallel_fences_is_allowed() {
        let g = game(5)
            .add_fence(Fence::horizontal(0, 0))
            .and_then(|g| g.add_fence(Fence::horizontal(2, 0)))
            .and_then(|g| g.add_fence(Fence::vertical(1, 0)))
            .unwrap();
        assert_eq!(g.fences().len(), 3);

        let g = game(5)
            .add_fence(Fence::vertical(0, 0))
            .and_then(|g| g.add_fence(Fence::vertical(0, 2)))
            .and_then(|g| g.add_fence(Fence::horizontal(0, 1)))
            .unwrap();
        assert_eq!(g.fences().len(), 3);
    }

    #[test]
    fn fence_that_traps_a_pawn_is_rejected() {
        let g = game(3).add_fence(Fence::horizontal(0, 0)).unwrap();
        assert_eq!(
            g.add_fence(Fence::vertical(0, 1)),
            Err(GameError::NoPathToGoal(Fence::vertical(0, 1)))
        );
        let g = game(3).add_fence(Fence::vertical(0, 0)).unwrap();
        assert_eq!(
            g.add_fence(Fence::horizontal(0, 1)),
            Err(GameError::NoPathToGoal(Fence::horizontal(0, 1)))
        );
    }

    #[test]
    fn fence_anchor_must_be_on_the_board() {
        let g = game(3);
        assert_eq!(
            g.add_fence(Fence::vertical(2, 0)),
            Err(GameError::OutOfBounds(Coord::new(2, 0)))
        );
        assert_eq!(
            g.add_fence(Fence::horizontal(0, -1)),
            Err(GameError::OutOfBounds(Coord::new(0, -1)))
        );
    }

    #[test]
    fn fence_budget_is_enforced() {
        let config = Configuration {
            fences_per_player: 1,
            ..Configuration::new(5)
        };
        let g = Game::new(GameId::from("budget"), &config)
            .unwrap()
            .add_fence(Fence::horizontal(0, 0))
            .and_then(|g| g.add_fence(Fence::horizontal(2, 3)))
            .unwrap();
        assert_eq!(g.pawns()[0].fences_left, 0);
        assert_eq!(
            g.add_fence(Fence::vertical(3, 3)),
            Err(GameError::NoFencesLeft { seat: 1 })
        );
        assert!(g.legal_fence_placements().is_empty());
        assert!(!g.legal_pawn_destinations().is_empty());
    }

    #[test]
    fn rejected_fence_leaves_game_unchanged() {
        let g = game(3).add_fence(Fence::vertical(0, 0)).unwrap();
        let before = g.clone();
        for _ in 0..3 {
            assert!(g.add_fence(Fence::vertical(0, 1)).is_err());
        }
        assert_eq!(g, before);
    }

    #[test]
    fn pawn_moves_in_each_direction() {
        let g = game(3);
        assert_eq!(play(&g, &[(1, 1)]).pawns()[0].position, Coord::new(1, 1));
        assert_eq!(play(&g, &[(0, 0)]).pawns()[0].position, Coord::new(0, 0));
        assert_eq!(play(&g, &[(0, 2)]).pawns()[0].position, Coord::new(0, 2));
        let g2 = play(&g, &[(0, 0), (1, 1)]);
        assert_eq!(g2.pawns()[1].position, Coord::new(1, 1));
        assert_eq!(g2.turn(), 1);
    }

    #[test]
    fn opening_destinations() {
        let g = game(3);
        let expected: BTreeSet<Coord> = [Coord::new(0, 0), Coord::new(1, 1), Coord::new(0, 2)]
            .into_iter()
            .collect();
        assert_eq!(g.legal_pawn_destinations(), expected);
    }

    #[test]
    fn move_off_board_is_out_of_bounds() {
        let g = game(3);
        assert_eq!(
            g.move_pawn(Coord::new(-1, 1)),
            Err(GameError::OutOfBounds(Coord::new(-1, 1)))
        );
    }

    #[test]
    fn unreachable_cell_is_illegal() {
        let g = game(3);
        assert_eq!(
            g.move_pawn(Coord::new(2, 2)),
            Err(GameError::IllegalDestination(Coord::new(2, 2)))
        );
        // Two cells away in a straight line without a pawn to jump.
        assert_eq!(
            g.move_pawn(Coord::new(2, 1)),
            Err(GameError::IllegalDestination(Coord::new(2, 1)))
        );
    }

    #[test]
    fn pawn_cannot_cross_a_fence() {
        let g = game(3).add_fence(Fence::vertical(0, 0)).unwrap();
        // Seat 2 moves away, then seat 1 tries to go east through the fence.
        let g = play(&g, &[(2, 0)]);
        assert_eq!(
            g.move_pawn(Coord::new(1, 1)),
            Err(GameError::IllegalDestination(Coord::new(1, 1)))
        );
    }

    #[test]
    fn pawn_cannot_land_on_another_pawn() {
        let g = play(&game(3), &[(1, 1)]);
        assert_eq!(
            g.move_pawn(Coord::new(1, 1)),
            Err(GameError::IllegalDestination(Coord::new(1, 1)))
        );
    }

    #[test]
    fn jump_over_opponent() {
        let g = play(&game(3), &[(1, 1), (0, 1)]);
        assert_eq!(g.pawns()[1].position, Coord::new(0, 1));
    }

    #[test]
    fn diagonal_jumps_when_straight_jump_is_off_board() {
        let g = play(&game(3), &[(1, 1)]);
        let g = g.add_fence(Fence::horizontal(0, 0)).unwrap();
        let dests = g.legal_pawn_destinations();
        assert!(dests.contains(&Coord::new(2, 0)));
        assert!(dests.contains(&Coord::new(2, 2)));
        assert!(!dests.contains(&Coord::new(2, 1)));
        assert_eq!(g.move_pawn(Coord::new(2, 0)).unwrap().pawns()[0].position, Coord::new(2, 0));
        assert_eq!(g.move_pawn(Coord::new(2, 2)).unwrap().pawns()[0].position, Coord::new(2, 2));
    }

    #[test]
    fn diagonal_jump_blocked_by_fence() {
        let g = play(&game(3), &[(1, 1)]);
        let left = g.add_fence(Fence::horizontal(1, 0)).unwrap();
        assert_eq!(
            left.move_pawn(Coord::new(2, 0)),
            Err(GameError::IllegalDestination(Coord::new(2, 0)))
        );
        let right = g.add_fence(Fence::horizontal(1, 1)).unwrap();
        assert_eq!(
            right.move_pawn(Coord::new(2, 2)),
            Err(GameError::IllegalDestination(Coord::new(2, 2)))
        );
        let expected: BTreeSet<Coord> = [Coord::new(1, 0), Coord::new(2, 0), Coord::new(0, 1)]
            .into_iter()
            .collect();
        assert_eq!(right.legal_pawn_destinations(), expected);
    }

    #[test]
    fn game_not_over_mid_board() {
        let g = play(&game(3), &[(1, 1)]);
        assert!(!g.is_over());
        assert_eq!(g.winner(), None);
    }

    #[test]
    fn reaching_goal_line_ends_the_game() {
        let g = play(&game(3), &[(1, 1), (2, 2), (2, 1)]);
        assert!(g.is_over());
        assert_eq!(g.status(), Status::Over);
        assert_eq!(g.winner(), Some(1));
        assert_eq!(g.move_pawn(Coord::new(1, 2)), Err(GameError::GameOver));
        assert_eq!(g.add_fence(Fence::horizontal(0, 0)), Err(GameError::GameOver));
        assert!(g.legal_pawn_destinations().is_empty());
        assert!(g.legal_fence_placements().is_empty());
    }

    #[test]
    fn west_goal_pawn_wins_on_column_zero() {
        // Seat 1 wanders north and south while seat 2 walks west.
        let g = play(&game(3), &[(0, 0), (1, 1), (0, 1), (1, 2), (0, 0), (0, 2)]);
        assert!(g.is_over());
        assert_eq!(g.winner(), Some(2));
    }

    #[test]
    fn turn_cycles_over_seats() {
        let config = Configuration {
            board_size: 5,
            fences_per_player: 5,
            players: 4,
        };
        let mut g = Game::new(GameId::from("four"), &config).unwrap();
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(g.turn());
            let dest = *g.legal_pawn_destinations().iter().next().unwrap();
            let prev = g.turn();
            g = g.move_pawn(dest).unwrap();
            assert_eq!(g.turn(), prev % 4 + 1);
            if g.is_over() {
                break;
            }
        }
        assert_eq!(&seen[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn distances_track_fences() {
        let g = game(5);
        assert_eq!(g.distances_to_goal(), vec![Some(4), Some(4)]);
        let g = g.add_fence(Fence::vertical(0, 1)).unwrap();
        assert_eq!(g.distances_to_goal(), vec![Some(5), Some(4)]);
    }
}
