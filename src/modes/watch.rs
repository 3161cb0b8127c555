//! Interactive mode for watching the planner play
//!
//! Ticks are driven from a tokio interval whose period follows the selected
//! speed; keyboard events and rendering run alongside in the same
//! `select!` loop, so exactly one tick executes at a time.
//!
//! # Controls
//!
//! - Arrows/WASD: steer for one tick
//! - Space: Pause/unpause
//! - N: Single tick
//! - ?: Toggle the head/food debug line
//! - R/Enter: Next trial after a game over
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, interval};

use crate::game::{Action, Direction, GameConfig, GameEngine, TickOutcome, TrialRecord};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Hud, Renderer};

/// Playback speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    /// Slow: 2 Hz (500ms per tick)
    Slow,
    /// Normal: 8 Hz (125ms per tick)
    Normal,
    /// Fast: 20 Hz (50ms per tick)
    Fast,
    /// Very Fast: 60 Hz (16ms per tick)
    VeryFast,
}

impl PlaybackSpeed {
    /// Map the 1-4 speed keys
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Slow),
            2 => Some(Self::Normal),
            3 => Some(Self::Fast),
            4 => Some(Self::VeryFast),
            _ => None,
        }
    }

    /// Get the tick interval for this speed
    pub fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(125),
            Self::Fast => Duration::from_millis(50),
            Self::VeryFast => Duration::from_millis(16),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

pub struct WatchMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    speed: PlaybackSpeed,
    /// Steering intent applied on the next tick
    pending_direction: Option<Direction>,
    /// Start the next trial without waiting for R/Enter
    auto_restart: bool,
    show_debug: bool,
    /// Result of the trial that just ended, cleared when the next one starts
    game_over: Option<TrialRecord>,
}

impl WatchMode {
    pub fn new(config: GameConfig, auto_restart: bool) -> Result<Self> {
        let engine = GameEngine::new(config).context("Invalid game configuration")?;

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            speed: PlaybackSpeed::Normal,
            pending_direction: None,
            auto_restart,
            show_debug: false,
            game_over: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.advance();
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.engine.grid().snapshot();
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &hud, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => self.pending_direction = Some(direction),
            KeyAction::Step => self.advance(),
            KeyAction::Debug => self.show_debug = !self.show_debug,
            KeyAction::TogglePause => self.paused = !self.paused,
            KeyAction::Restart => self.restart(),
            KeyAction::Speed(level) => {
                if let Some(speed) = PlaybackSpeed::from_level(level) {
                    self.change_speed(speed, tick_timer);
                }
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    /// Run one engine tick unless a game over is waiting for a restart
    fn advance(&mut self) {
        if self.game_over.is_some() && !self.auto_restart {
            return;
        }

        let action = self
            .pending_direction
            .take()
            .map(Action::Move)
            .unwrap_or_default();

        match self.engine.tick_with(action) {
            TickOutcome::Stepped(step) => self.metrics.on_step(&step),
            TickOutcome::TrialOver(record) => {
                self.metrics.on_trial_over(&record);
                self.game_over = Some(record);
            }
            TickOutcome::TrialStarted { .. } => self.on_trial_start(),
            TickOutcome::Resetting | TickOutcome::Finished => {}
        }
    }

    fn restart(&mut self) {
        if self.engine.begin_next_trial() {
            self.on_trial_start();
        }
    }

    fn on_trial_start(&mut self) {
        self.metrics.on_trial_start();
        self.game_over = None;
        self.pending_direction = None;
    }

    fn change_speed(&mut self, new_speed: PlaybackSpeed, tick_timer: &mut Interval) {
        self.speed = new_speed;
        *tick_timer = interval(self.speed.tick_interval());
    }

    fn hud(&self) -> Hud {
        Hud {
            length: self.engine.snake().len(),
            trial: self.engine.current_trial() + usize::from(self.game_over.is_none()),
            max_trials: self.engine.config().max_trials,
            speed: self.speed.as_str(),
            paused: self.paused,
            status: self.show_debug.then(|| self.engine.debug_summary()),
            game_over: self.game_over,
        }
    }

    fn cleanup_terminal(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
