use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::game::{GameConfig, GameListener, GameLoopDriver, GameSnapshot, SnakeEngine};
use crate::input::{InputHandler, InputQueue, KeyAction, TextAction};
use crate::leaderboard::{HighScoreEntry, LeaderboardManager, MAX_NAME_LEN};
use crate::render::{Renderer, View};

/// Messages from the tick loop and leaderboard tasks to the UI loop.
///
/// Tick loop messages carry the id of the game that sent them; an abandoned
/// game may still have messages in flight after the next one starts.
#[derive(Debug)]
enum AppEvent {
    Refresh { game: u64, snapshot: GameSnapshot },
    GameOver { game: u64, score: u32 },
    ScoresLoaded(Result<Vec<HighScoreEntry>, String>),
    ScoreSaved(Result<(), String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Screen {
    Menu,
    Playing,
    /// Waiting for the leaderboard before deciding whether to ask for a name
    GameOver { score: u32 },
    EnterName { row: usize, name: String },
    HighScores { highlight: Option<usize> },
}

/// Forwards tick loop callbacks to the UI as owned snapshots
struct ChannelListener {
    game: u64,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl ChannelListener {
    fn send_snapshot(&self, engine: &SnakeEngine) {
        let _ = self.tx.send(AppEvent::Refresh {
            game: self.game,
            snapshot: engine.snapshot(),
        });
    }
}

impl GameListener for ChannelListener {
    fn on_start(&mut self, engine: &SnakeEngine) {
        self.send_snapshot(engine);
    }

    fn on_refresh(&mut self, engine: &SnakeEngine) {
        self.send_snapshot(engine);
    }

    fn on_game_over(&mut self, final_score: u32) {
        let _ = self.tx.send(AppEvent::GameOver {
            game: self.game,
            score: final_score,
        });
    }
}

pub struct HumanMode {
    config: GameConfig,
    renderer: Renderer,
    input_handler: InputHandler,
    queue: InputQueue,
    leaderboard: LeaderboardManager,
    screen: Screen,
    snapshot: Option<GameSnapshot>,
    status: Option<String>,
    game_cancel: Option<CancellationToken>,
    /// Id of the most recently started game
    game_id: u64,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<AppEvent>>,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, leaderboard: LeaderboardManager) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            queue: InputQueue::from_config(&config),
            config,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            leaderboard,
            screen: Screen::Menu,
            snapshot: None,
            status: None,
            game_cancel: None,
            game_id: 0,
            events_tx,
            events_rx: Some(events_rx),
            should_quit: false,
        }
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

        // Run app loop with cleanup
        let result = self.run_app_loop(&mut terminal).await;

        self.cancel_game();

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_app_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut events_rx = self
            .events_rx
            .take()
            .context("App loop is already running")?;
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        // The menu shows the latest scores
        self.spawn_load_scores();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Tick loop and leaderboard results
                Some(app_event) = events_rx.recv() => {
                    self.handle_app_event(app_event);
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.view());
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
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

    fn view(&self) -> View<'_> {
        match &self.screen {
            Screen::Menu => View::Menu {
                status: self.status.as_deref(),
            },
            Screen::Playing => View::Playing {
                snapshot: self.snapshot.as_ref(),
            },
            Screen::GameOver { score } => View::GameOver { score: *score },
            Screen::EnterName { row, name } => View::EnterName {
                board: self.leaderboard.board(),
                row: *row,
                name,
            },
            Screen::HighScores { highlight } => View::HighScores {
                board: self.leaderboard.board(),
                highlight: *highlight,
                status: self.status.as_deref(),
            },
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }
            self.handle_key(key);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if let Screen::EnterName { .. } = self.screen {
            if self.input_handler.is_interrupt(key) {
                self.quit();
            } else {
                let action = self.input_handler.handle_text_key(key);
                self.handle_text_action(action);
            }
            return;
        }

        let action = self.input_handler.handle_key_event(key);

        match (&self.screen, action) {
            (_, KeyAction::Quit) => self.quit(),

            (Screen::Playing, KeyAction::Steer(code)) => {
                self.queue.enqueue_key_code(code);
            }
            (Screen::Playing, KeyAction::Back) => {
                self.cancel_game();
                self.show_menu();
            }
            (Screen::Playing, _) => {}

            (Screen::Menu | Screen::HighScores { .. }, KeyAction::Play) => self.start_game(),
            (Screen::Menu, KeyAction::ShowHighScores) => {
                self.status = None;
                self.screen = Screen::HighScores { highlight: None };
                self.spawn_load_scores();
            }
            (Screen::HighScores { .. } | Screen::GameOver { .. }, KeyAction::Back) => {
                self.show_menu()
            }

            _ => {}
        }
    }

    fn handle_text_action(&mut self, action: TextAction) {
        let Screen::EnterName { row, name } = &mut self.screen else {
            return;
        };
        let row = *row;

        match action {
            TextAction::Insert(c) => {
                if name.len() < MAX_NAME_LEN {
                    name.push(c);
                }
            }
            TextAction::Delete => {
                name.pop();
            }
            TextAction::Submit => {
                let typed = std::mem::take(name);
                if let Some(entry) = self.leaderboard.name_pending(&typed) {
                    self.spawn_save_score(entry);
                }
                self.screen = Screen::HighScores {
                    highlight: Some(row),
                };
            }
            TextAction::Cancel => {
                self.leaderboard.discard_pending();
                self.screen = Screen::HighScores { highlight: None };
            }
            TextAction::None => {}
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Refresh { game, snapshot } => {
                if self.is_live(game) {
                    self.snapshot = Some(snapshot);
                }
            }
            AppEvent::GameOver { game, score } => {
                if self.is_live(game) {
                    self.game_cancel = None;
                    self.status = None;
                    self.screen = Screen::GameOver { score };
                    self.spawn_load_scores();
                }
            }
            AppEvent::ScoresLoaded(result) => self.on_scores_loaded(result),
            AppEvent::ScoreSaved(Ok(())) => {
                info!("High score saved");
                self.status = Some("Score saved".to_string());
            }
            AppEvent::ScoreSaved(Err(e)) => {
                warn!("Failed to save high score: {}", e);
                self.status = Some(format!("Could not save score: {e}"));
            }
        }
    }

    /// Whether `game` is the one currently on screen
    fn is_live(&self, game: u64) -> bool {
        game == self.game_id && self.screen == Screen::Playing
    }

    fn on_scores_loaded(&mut self, result: Result<Vec<HighScoreEntry>, String>) {
        // A late reply must not wipe a row that is being named
        if matches!(self.screen, Screen::EnterName { .. }) {
            return;
        }

        match result {
            Ok(entries) => self.leaderboard.apply_loaded(entries),
            Err(e) => {
                warn!("Failed to load high scores: {}", e);
                self.status = Some(format!("Leaderboard unavailable: {e}"));
            }
        }

        if let Screen::GameOver { score } = self.screen {
            self.screen = match self.leaderboard.record_score(score) {
                Some(row) => Screen::EnterName {
                    row,
                    name: String::new(),
                },
                None => Screen::HighScores { highlight: None },
            };
        }
    }

    fn start_game(&mut self) {
        self.cancel_game();

        let cancel = CancellationToken::new();
        self.game_cancel = Some(cancel.clone());
        self.game_id += 1;
        self.snapshot = None;
        self.status = None;
        self.screen = Screen::Playing;

        let mut driver = GameLoopDriver::new(self.config.clone(), self.queue.clone());
        let mut listener = ChannelListener {
            game: self.game_id,
            tx: self.events_tx.clone(),
        };

        tokio::spawn(async move {
            driver.play(&mut listener, &cancel).await;
        });
    }

    fn cancel_game(&mut self) {
        if let Some(cancel) = self.game_cancel.take() {
            cancel.cancel();
        }
    }

    fn show_menu(&mut self) {
        if let Err(e) = self.leaderboard.write_snapshot() {
            warn!("Failed to write leaderboard snapshot: {:#}", e);
        }
        self.snapshot = None;
        self.screen = Screen::Menu;
    }

    fn quit(&mut self) {
        self.cancel_game();
        self.should_quit = true;
    }

    fn spawn_load_scores(&self) {
        let store = self.leaderboard.store();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = store.load_scores().await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::ScoresLoaded(result));
        });
    }

    fn spawn_save_score(&self, entry: HighScoreEntry) {
        let store = self.leaderboard.store();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = store.append_score(&entry).await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::ScoreSaved(result));
        });
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
