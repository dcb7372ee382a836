//! Game loop: an agent plays against a board until it wins, loses or runs
//! out of moves.

use crate::agent::{Agent, Move};
use crate::board::Board;
use crate::error::{AiError, AiResult};
use crate::knowledge::Inference;
use crate::rng::GameRng;
use crate::types::Dimensions;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Board size, mine count and optional seed for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
    /// Seeds both mine placement and the agent's random moves.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            height: 8,
            width: 8,
            mines: 8,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.height, self.width)
    }

    pub fn validate(&self) -> AiResult<()> {
        if self.height == 0 || self.width == 0 {
            return Err(AiError::InvalidConfig(format!(
                "board must not be empty, got {}x{}",
                self.height, self.width
            )));
        }
        if self.mines > self.height * self.width {
            return Err(AiError::InvalidConfig(format!(
                "{} mines do not fit on a {}x{} board",
                self.mines, self.height, self.width
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
    /// No cell left that is neither probed nor a known mine.
    Stalled,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

/// One step of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub mv: Option<Move>,
    /// Probe result, absent when the move hit a mine or there was no move.
    pub count: Option<usize>,
    pub inference: Inference,
    pub status: GameStatus,
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    agent: Agent,
    status: GameStatus,
    turns: usize,
}

impl Game {
    pub fn new(config: GameConfig) -> AiResult<Self> {
        config.validate()?;
        let dims = config.dimensions();
        let (mut board_rng, agent_rng) = match config.seed {
            Some(seed) => (
                GameRng::from_seed(seed),
                GameRng::from_seed(seed.wrapping_add(1)),
            ),
            None => (GameRng::new(), GameRng::new()),
        };
        let board = Board::random(dims, config.mines, &mut board_rng)?;
        Self::with_board(board, Agent::with_rng(dims, agent_rng))
    }

    /// Play `agent` against a prepared board of the same size.
    pub fn with_board(board: Board, agent: Agent) -> AiResult<Self> {
        let (board_dims, agent_dims) = (board.dimensions(), agent.knowledge().dimensions());
        if board_dims != agent_dims {
            return Err(AiError::InvalidConfig(format!(
                "agent expects a {}x{} board, got {}x{}",
                agent_dims.height, agent_dims.width, board_dims.height, board_dims.width
            )));
        }
        Ok(Self {
            board,
            agent,
            status: GameStatus::Playing,
            turns: 0,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Let the agent make one move.
    pub fn step(&mut self) -> AiResult<Turn> {
        if self.status.is_over() {
            return Ok(self.turn(None, None, Inference::default()));
        }

        let Some(mv) = self.agent.next_move() else {
            self.status = GameStatus::Stalled;
            info!(turns = self.turns, "no move left");
            return Ok(self.turn(None, None, Inference::default()));
        };
        self.turns += 1;

        let cell = mv.cell();
        if self.board.is_mine(cell) {
            self.status = GameStatus::Lost;
            info!(%cell, turns = self.turns, "hit a mine");
            return Ok(self.turn(Some(mv), None, Inference::default()));
        }

        let count = self.board.probe(cell)?;
        let inference = self.agent.observe(cell, count)?;
        debug!(?mv, count, mines = self.agent.knowledge().mines().len(), "turn");

        if self.cleared() {
            self.status = GameStatus::Won;
            info!(turns = self.turns, "board cleared");
        }
        Ok(self.turn(Some(mv), Some(count), inference))
    }

    /// Step until the game is over. Every move probes a new cell, so this
    /// takes at most one step per cell plus the final one.
    pub fn play(&mut self) -> AiResult<GameStatus> {
        let limit = self.board.dimensions().len() + 1;
        for _ in 0..limit {
            if self.status.is_over() {
                break;
            }
            self.step()?;
        }
        Ok(self.status)
    }

    fn cleared(&self) -> bool {
        let kb = self.agent.knowledge();
        let safe_cells = self.board.dimensions().len() - self.board.mine_count();
        self.board.won(kb.mines()) || kb.moves_made().len() == safe_cells
    }

    fn turn(&self, mv: Option<Move>, count: Option<usize>, inference: Inference) -> Turn {
        Turn {
            mv,
            count,
            inference,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!((config.height, config.width, config.mines), (8, 8, 8));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let too_many = GameConfig { mines: 65, ..GameConfig::default() };
        assert!(matches!(too_many.validate(), Err(AiError::InvalidConfig(_))));

        let empty = GameConfig { height: 0, ..GameConfig::default() };
        assert!(Game::new(empty).is_err());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"mines": 10, "seed": 7}"#).unwrap();
        assert_eq!(
            config,
            GameConfig { height: 8, width: 8, mines: 10, seed: Some(7) }
        );

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<GameConfig>(&json).unwrap(), config);
    }

    #[test]
    fn test_board_and_agent_sizes_must_match() {
        let board = Board::with_mines(Dimensions::new(3, 3), [Cell::new(0, 0)]).unwrap();
        for dims in [Dimensions::new(2, 2), Dimensions::new(4, 3)] {
            let err = Game::with_board(board.clone(), Agent::with_seed(dims, 0)).unwrap_err();
            assert!(matches!(err, AiError::InvalidConfig(_)));
        }
        assert!(Game::with_board(board, Agent::with_seed(Dimensions::new(3, 3), 0)).is_ok());
    }

    #[test]
    fn test_no_mines_is_won_after_first_move() {
        let config = GameConfig { height: 4, width: 4, mines: 0, seed: Some(3) };
        let mut game = Game::new(config).unwrap();
        let turn = game.step().unwrap();
        // Nothing to find, so the first probe already wins
        assert_eq!(turn.count, Some(0));
        assert_eq!(turn.status, GameStatus::Won);
        assert_eq!(game.play().unwrap(), GameStatus::Won);
    }

    #[test]
    fn test_game_over_step_is_noop() {
        let board = Board::with_mines(Dimensions::new(1, 2), [Cell::new(0, 1)]).unwrap();
        let mut game = Game::with_board(board, Agent::with_seed(Dimensions::new(1, 2), 0)).unwrap();
        let status = game.play().unwrap();
        assert!(status.is_over());

        let turns = game.turns();
        let turn = game.step().unwrap();
        assert_eq!(turn.mv, None);
        assert_eq!(game.turns(), turns);
    }

    #[test]
    fn test_seeded_games_are_reproducible() {
        let config = GameConfig { height: 8, width: 8, mines: 8, seed: Some(2024) };
        let mut a = Game::new(config).unwrap();
        let mut b = Game::new(config).unwrap();
        assert_eq!(a.board().mines(), b.board().mines());
        assert_eq!(a.play().unwrap(), b.play().unwrap());
        assert_eq!(a.turns(), b.turns());
    }

    #[test]
    fn test_play_terminates() {
        for seed in 0..20 {
            let config = GameConfig { height: 6, width: 6, mines: 5, seed: Some(seed) };
            let mut game = Game::new(config).unwrap();
            let status = game.play().unwrap();
            assert!(status.is_over());
            assert!(game.turns() <= 36);
        }
    }
}
