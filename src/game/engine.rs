use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::{
    action::{Action, Direction},
    config::{ConfigError, GameConfig},
    grid::{CellContent, Grid},
    snake::{MoveOutcome, Snake},
    state::{Phase, Position, TerminalCause, TrialRecord},
};
use crate::search::{self, SearchOutcome, SearchStats};

/// Information about a played tick
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// What the move did
    pub outcome: MoveOutcome,
    /// Length of the planned path, `None` when the fallback policy moved the snake
    pub path_len: Option<usize>,
    /// Whether the move came from a manual override
    pub manual: bool,
    /// Counters from this tick's search (zero for manual moves)
    pub search: SearchStats,
}

impl StepInfo {
    pub fn ate_food(&self) -> bool {
        self.outcome.grew()
    }
}

/// What one call to [`GameEngine::tick`] did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The snake moved and the trial goes on
    Stepped(StepInfo),
    /// The trial just ended
    TrialOver(TrialRecord),
    /// The grid was cleared for the next trial
    Resetting,
    /// A fresh snake and food were placed
    TrialStarted { trial: usize },
    /// All configured trials are done
    Finished,
}

/// Drives trials tick by tick: food placement, planning, movement, collisions
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    snake: Snake,
    food: Option<Position>,
    rng: StdRng,
    phase: Phase,
    records: Vec<TrialRecord>,
    trial_ticks: usize,
    ticks_since_food: usize,
    last_step: Option<StepInfo>,
}

impl GameEngine {
    /// Create a new game engine and start the first trial
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = Grid::new(config.grid_size);
        let snake = Snake::new(
            config.start_position(),
            Direction::Right,
            config.initial_snake_length,
        );

        let mut engine = Self {
            config,
            grid,
            snake,
            food: None,
            rng,
            phase: Phase::Playing,
            records: Vec::new(),
            trial_ticks: 0,
            ticks_since_food: 0,
            last_step: None,
        };
        engine.spawn_trial();

        Ok(engine)
    }

    /// Advance one tick under the autonomous policy
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_with(Action::Auto)
    }

    /// Advance one tick; a valid manual direction replaces the planner for this tick
    pub fn tick_with(&mut self, action: Action) -> TickOutcome {
        match self.phase {
            Phase::Playing => self.play(action),
            Phase::Terminal(_) => {
                if self.is_run_complete() {
                    self.phase = Phase::Finished;
                    TickOutcome::Finished
                } else {
                    self.grid.reset();
                    self.phase = Phase::Resetting;
                    TickOutcome::Resetting
                }
            }
            Phase::Resetting => {
                self.spawn_trial();
                self.phase = Phase::Playing;
                TickOutcome::TrialStarted {
                    trial: self.records.len(),
                }
            }
            Phase::Finished => TickOutcome::Finished,
        }
    }

    /// Skip the reset ticks after a game over; returns false when there is nothing to skip
    pub fn begin_next_trial(&mut self) -> bool {
        match self.phase {
            Phase::Terminal(_) if !self.is_run_complete() => {
                self.grid.reset();
                self.spawn_trial();
                self.phase = Phase::Playing;
                true
            }
            Phase::Resetting => {
                self.spawn_trial();
                self.phase = Phase::Playing;
                true
            }
            _ => false,
        }
    }

    fn play(&mut self, action: Action) -> TickOutcome {
        self.grid.clear_path_markers();

        let head = self.snake.head();
        if self.food.map_or(true, |food| food == head) {
            self.food = self.place_food();
        }
        let Some(food) = self.food else {
            self.trial_ticks += 1;
            return self.end_trial(TerminalCause::GridFilled);
        };

        let step = match action {
            Action::Move(direction) if self.snake.is_valid_direction(direction) => StepInfo {
                outcome: self.snake.step(&mut self.grid, direction),
                path_len: None,
                manual: true,
                search: SearchStats::default(),
            },
            _ => self.autonomous_move(food),
        };

        self.trial_ticks += 1;
        if step.ate_food() {
            self.ticks_since_food = 0;
        } else {
            self.ticks_since_food += 1;
        }

        debug!(
            tick = self.trial_ticks,
            head = %self.snake.head(),
            food = %food,
            path_len = ?step.path_len,
            expanded = step.search.expanded,
            outcome = ?step.outcome,
            "tick"
        );
        self.last_step = Some(step.clone());

        if step.outcome == MoveOutcome::HitWall {
            return self.end_trial(TerminalCause::Wall);
        }
        if self.snake.has_self_collision() {
            return self.end_trial(TerminalCause::SelfCollision);
        }
        if step.ate_food() && self.snake.len() == self.grid.len() {
            return self.end_trial(TerminalCause::GridFilled);
        }
        if let Some(limit) = self.config.stall_limit_ticks() {
            if self.ticks_since_food >= limit {
                warn!(
                    trial = self.records.len(),
                    limit,
                    length = self.snake.len(),
                    "trial stalled without reaching food"
                );
                return self.end_trial(TerminalCause::Stalled);
            }
        }

        TickOutcome::Stepped(step)
    }

    fn autonomous_move(&mut self, food: Position) -> StepInfo {
        let SearchOutcome { path, stats } = search::search(&mut self.grid, self.snake.head(), food);

        let planned = match path.as_ref() {
            Some(path) => self
                .snake
                .advance_along(&mut self.grid, path)
                .map(|outcome| (path.len(), outcome)),
            None => None,
        };

        match planned {
            Some((len, outcome)) => StepInfo {
                outcome,
                path_len: Some(len),
                manual: false,
                search: stats,
            },
            None => StepInfo {
                outcome: self.snake.fallback_move(&mut self.grid, &mut self.rng),
                path_len: None,
                manual: false,
                search: stats,
            },
        }
    }

    fn end_trial(&mut self, cause: TerminalCause) -> TickOutcome {
        let record = TrialRecord {
            trial: self.records.len(),
            score: self.snake.len(),
            ticks: self.trial_ticks,
            cause,
        };
        debug!(
            trial = record.trial,
            score = record.score,
            ticks = record.ticks,
            cause = cause.as_str(),
            "trial over"
        );

        self.records.push(record);
        self.phase = Phase::Terminal(cause);
        TickOutcome::TrialOver(record)
    }

    fn spawn_trial(&mut self) {
        self.snake = Snake::new(
            self.config.start_position(),
            Direction::Right,
            self.config.initial_snake_length,
        );
        self.snake.place(&mut self.grid);
        self.food = self.place_food();
        self.trial_ticks = 0;
        self.ticks_since_food = 0;
        self.last_step = None;
    }

    /// Put food on a uniformly chosen cell the snake does not occupy
    fn place_food(&mut self) -> Option<Position> {
        let free: Vec<Position> = self
            .grid
            .cells()
            .map(|cell| cell.position())
            .filter(|pos| !self.snake.occupies(*pos))
            .collect();

        let food = free.choose(&mut self.rng).copied()?;
        self.grid.set_content(food, CellContent::Food);
        Some(food)
    }

    fn is_run_complete(&self) -> bool {
        self.config
            .max_trials
            .is_some_and(|max| self.records.len() >= max)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Completed trials in order
    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    /// Score of every completed trial, in order
    pub fn scores(&self) -> Vec<usize> {
        self.records.iter().map(|record| record.score).collect()
    }

    /// Zero-based index of the trial in progress (or the next one)
    pub fn current_trial(&self) -> usize {
        self.records.len()
    }

    pub fn trial_ticks(&self) -> usize {
        self.trial_ticks
    }

    pub fn last_step(&self) -> Option<&StepInfo> {
        self.last_step.as_ref()
    }

    /// One-line dump of head and food positions
    pub fn debug_summary(&self) -> String {
        let food = self
            .food
            .map_or_else(|| "none".to_string(), |food| food.to_string());
        format!(
            "trial {} tick {} head {} food {} length {}",
            self.current_trial() + 1,
            self.trial_ticks,
            self.snake.head(),
            food,
            self.snake.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(config: GameConfig) -> GameEngine {
        GameEngine::new(config.with_seed(1234)).unwrap()
    }

    /// Move the food to `pos` by hand
    fn put_food(engine: &mut GameEngine, pos: Position) {
        if let Some(old) = engine.food {
            engine.grid.set_content(old, CellContent::Empty);
        }
        engine.grid.set_content(pos, CellContent::Food);
        engine.food = Some(pos);
    }

    #[test]
    fn test_new_engine_starts_first_trial() {
        let engine = seeded(GameConfig::default());

        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!(engine.snake().len(), 5);
        assert_eq!(engine.snake().head(), Position::new(5, 3));
        assert_eq!(engine.grid().cells_with(CellContent::Head).count(), 1);
        assert_eq!(engine.grid().cells_with(CellContent::Body).count(), 4);

        let food = engine.food().unwrap();
        assert!(!engine.snake().occupies(food));
        assert_eq!(engine.grid().content(food), Some(CellContent::Food));
        assert!(engine.records().is_empty());
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(GameEngine::new(GameConfig::new(3)).is_err());
    }

    #[test]
    fn test_first_tick_follows_straight_path() {
        let mut engine = seeded(GameConfig::default());
        put_food(&mut engine, Position::new(10, 3));

        let outcome = engine.tick();

        let TickOutcome::Stepped(info) = outcome else {
            panic!("expected a step, got {outcome:?}");
        };
        assert_eq!(info.path_len, Some(5));
        assert!(!info.manual);
        assert_eq!(engine.snake().head(), Position::new(6, 3));
        // The planned cells still ahead stay marked until the next tick
        assert_eq!(engine.grid().cells_with(CellContent::PathMarker).count(), 3);
    }

    #[test]
    fn test_path_markers_cleared_each_tick() {
        let mut engine = seeded(GameConfig::default());
        put_food(&mut engine, Position::new(10, 3));

        for expected_markers in [3, 2, 1, 0] {
            engine.tick();
            assert_eq!(
                engine.grid().cells_with(CellContent::PathMarker).count(),
                expected_markers
            );
        }
    }

    #[test]
    fn test_reaching_food_grows_and_relocates() {
        let mut engine = seeded(GameConfig::default());
        put_food(&mut engine, Position::new(7, 3));

        engine.tick();
        let outcome = engine.tick();

        let TickOutcome::Stepped(info) = outcome else {
            panic!("expected a step, got {outcome:?}");
        };
        assert!(info.ate_food());
        assert_eq!(engine.snake().len(), 6);
        assert_eq!(engine.snake().head(), Position::new(7, 3));

        let outcome = engine.tick();
        let food = engine.food().unwrap();
        assert_ne!(food, Position::new(7, 3));
        match outcome {
            // The relocated food happened to be the next hop
            TickOutcome::Stepped(info) if info.ate_food() => {
                assert_eq!(food, engine.snake().head());
            }
            _ => {
                assert!(!engine.snake().occupies(food));
                assert_eq!(engine.grid().cells_with(CellContent::Food).count(), 1);
            }
        }
    }

    #[test]
    fn test_length_changes_only_when_eating() {
        let mut engine = seeded(GameConfig::new(10).with_trials(5));
        let mut previous = engine.snake().len();

        while !engine.is_finished() {
            match engine.tick() {
                TickOutcome::Stepped(info) => {
                    let expected = if info.ate_food() { previous + 1 } else { previous };
                    assert_eq!(engine.snake().len(), expected);
                }
                TickOutcome::TrialStarted { .. } => {
                    assert_eq!(engine.snake().len(), 5);
                }
                _ => {}
            }
            previous = engine.snake().len();
        }
    }

    #[test]
    fn test_manual_wall_collision() {
        let mut engine = seeded(GameConfig::default());
        put_food(&mut engine, Position::new(12, 12));

        for _ in 0..3 {
            assert!(matches!(
                engine.tick_with(Action::Move(Direction::Up)),
                TickOutcome::Stepped(StepInfo { manual: true, .. })
            ));
        }
        let outcome = engine.tick_with(Action::Move(Direction::Up));

        assert!(matches!(
            outcome,
            TickOutcome::TrialOver(TrialRecord {
                cause: TerminalCause::Wall,
                score: 5,
                ..
            })
        ));
        assert_eq!(engine.phase(), Phase::Terminal(TerminalCause::Wall));
    }

    #[test]
    fn test_manual_self_collision() {
        let mut engine = seeded(GameConfig::default());
        put_food(&mut engine, Position::new(12, 12));

        engine.tick_with(Action::Move(Direction::Right));
        engine.tick_with(Action::Move(Direction::Down));
        engine.tick_with(Action::Move(Direction::Left));
        let outcome = engine.tick_with(Action::Move(Direction::Up));

        assert!(matches!(
            outcome,
            TickOutcome::TrialOver(TrialRecord {
                cause: TerminalCause::SelfCollision,
                ..
            })
        ));
        assert!(engine.snake().has_self_collision());
    }

    #[test]
    fn test_reversing_override_falls_back_to_planner() {
        let mut engine = seeded(GameConfig::default());
        put_food(&mut engine, Position::new(10, 3));

        let outcome = engine.tick_with(Action::Move(Direction::Left));

        assert!(matches!(
            outcome,
            TickOutcome::Stepped(StepInfo { manual: false, .. })
        ));
        assert_eq!(engine.snake().head(), Position::new(6, 3));
    }

    #[test]
    fn test_terminal_resetting_playing_cycle() {
        let mut engine = seeded(GameConfig::default());
        put_food(&mut engine, Position::new(12, 12));
        for _ in 0..4 {
            engine.tick_with(Action::Move(Direction::Up));
        }

        assert_eq!(engine.tick(), TickOutcome::Resetting);
        assert_eq!(engine.phase(), Phase::Resetting);
        assert!(engine.grid().cells().all(|c| c.content() == CellContent::Empty));

        assert_eq!(engine.tick(), TickOutcome::TrialStarted { trial: 1 });
        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!(engine.snake().head(), Position::new(5, 3));
        assert_eq!(engine.scores(), vec![5]);
    }

    #[test]
    fn test_run_finishes_after_max_trials() {
        let mut engine = seeded(GameConfig::default().with_trials(1));
        put_food(&mut engine, Position::new(12, 12));
        for _ in 0..4 {
            engine.tick_with(Action::Move(Direction::Up));
        }

        assert_eq!(engine.tick(), TickOutcome::Finished);
        assert!(engine.is_finished());
        assert_eq!(engine.tick(), TickOutcome::Finished);
        assert!(!engine.begin_next_trial());
    }

    #[test]
    fn test_begin_next_trial_skips_reset_ticks() {
        let mut engine = seeded(GameConfig::default());
        put_food(&mut engine, Position::new(12, 12));
        for _ in 0..4 {
            engine.tick_with(Action::Move(Direction::Up));
        }

        assert!(engine.begin_next_trial());
        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!(engine.current_trial(), 1);
        assert!(!engine.begin_next_trial());
    }

    #[test]
    fn test_stall_limit_ends_trial() {
        let config = GameConfig {
            stall_limit: Some(2),
            ..GameConfig::default()
        };
        let mut engine = seeded(config);
        put_food(&mut engine, Position::new(12, 12));

        assert!(matches!(engine.tick(), TickOutcome::Stepped(_)));
        let outcome = engine.tick();

        assert!(matches!(
            outcome,
            TickOutcome::TrialOver(TrialRecord {
                cause: TerminalCause::Stalled,
                ticks: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_eating_last_free_cell_fills_grid() {
        let config = GameConfig {
            grid_size: 4,
            initial_snake_length: 4,
            start_col: 3,
            start_row: 0,
            ..GameConfig::default()
        };
        let mut engine = seeded(config);

        // Serpentine over every cell but (0, 3), head next to it
        #[rustfmt::skip]
        let body = [
            (1, 3), (2, 3), (3, 3),
            (3, 2), (2, 2), (1, 2), (0, 2),
            (0, 1), (1, 1), (2, 1), (3, 1),
            (3, 0), (2, 0), (1, 0), (0, 0),
        ];
        engine.grid.reset();
        engine.food = None;
        engine.snake = Snake {
            body: body.iter().map(|&(col, row)| Position::new(col, row)).collect(),
            direction: Direction::Left,
        };
        engine.snake.place(&mut engine.grid);
        put_food(&mut engine, Position::new(0, 3));

        let outcome = engine.tick();

        assert_eq!(
            outcome,
            TickOutcome::TrialOver(TrialRecord {
                trial: 0,
                score: 16,
                ticks: 1,
                cause: TerminalCause::GridFilled,
            })
        );
        assert_eq!(engine.last_step().map(StepInfo::ate_food), Some(true));
        assert_eq!(engine.phase(), Phase::Terminal(TerminalCause::GridFilled));
    }

    #[test]
    fn test_spawn_without_free_cell_counts_one_tick() {
        let config = GameConfig {
            grid_size: 1,
            initial_snake_length: 1,
            start_col: 0,
            start_row: 0,
            ..GameConfig::default()
        };
        let mut engine = seeded(config);
        assert_eq!(engine.food(), None);

        assert_eq!(
            engine.tick(),
            TickOutcome::TrialOver(TrialRecord {
                trial: 0,
                score: 1,
                ticks: 1,
                cause: TerminalCause::GridFilled,
            })
        );
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut engine = seeded(GameConfig::small().with_trials(3));
            while !engine.is_finished() {
                engine.tick();
            }
            engine.records().to_vec()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_debug_summary_mentions_food() {
        let mut engine = seeded(GameConfig::default());
        put_food(&mut engine, Position::new(9, 9));
        let summary = engine.debug_summary();
        assert!(summary.contains("food (9, 9)"));
        assert!(summary.contains("head (5, 3)"));
    }
}
