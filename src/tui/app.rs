use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    widgets::Block,
};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::config::AppConfig;
use crate::sources::FetchError;
use crate::tui::events::spawn_key_reader;
use crate::tui::theme;
use crate::tui::widgets::{countdown, header, prayers, statusbar};
use crate::widget::timer::spawn_repeating;
use crate::widget::{
    CachedEntry, CountdownState, RefreshSchedule, Refresher, Resolution, TimerSlot, WidgetCache,
    countdown_at,
};

/// Everything that can wake the board up.
#[derive(Debug, Clone)]
pub enum Message {
    Key(KeyEvent),
    /// Countdown tick
    Tick,
    /// Periodic refresh timer
    Refresh,
    /// Local midnight
    Midnight,
    Resolved {
        generation: u64,
        resolution: Box<Resolution>,
    },
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Owns all display state. Background tasks only ever talk to it through
/// the message channel.
pub struct App {
    config: AppConfig,
    refresher: Arc<Refresher>,
    cache: WidgetCache,
    /// What is on screen; replaced only by a complete resolution.
    entry: CachedEntry,
    tx: UnboundedSender<Message>,

    countdown_timer: TimerSlot,
    refresh_task: TimerSlot,
    schedule: RefreshSchedule,
    /// Bumped per refresh; resolutions from older refreshes are dropped.
    generation: u64,

    countdown: CountdownState,
    errors: Vec<FetchError>,
    pub should_quit: bool,
}

impl App {
    /// Renders from the cache when there is one, otherwise resolves the
    /// local fallback synchronously so the first frame is never empty.
    pub fn new(
        config: AppConfig,
        refresher: Arc<Refresher>,
        mut cache: WidgetCache,
        tx: UnboundedSender<Message>,
    ) -> Self {
        let at = now();
        let entry = match cache.get().cloned() {
            Some(entry) => entry,
            None => {
                info!("No cached prayer data, starting from local estimate");
                let fallback = refresher.offline(at.date());
                cache.store(fallback.snapshot, fallback.hijri, at).clone()
            }
        };

        let mut app = App {
            config,
            refresher,
            cache,
            entry,
            tx,
            countdown_timer: TimerSlot::new(),
            refresh_task: TimerSlot::new(),
            schedule: RefreshSchedule::new(),
            generation: 0,
            countdown: CountdownState::IftarTime,
            errors: Vec::new(),
            should_quit: false,
        };
        app.update_countdown(at);
        app
    }

    /// Starts the countdown, both refresh timers and the first fetch.
    pub fn start(&mut self) {
        self.start_countdown();
        self.schedule
            .restart_periodic(self.config.refresh.period(), self.tx.clone(), Message::Refresh);
        self.schedule
            .arm_midnight(now(), self.tx.clone(), Message::Midnight);
        self.start_refresh();
    }

    pub fn entry(&self) -> &CachedEntry {
        &self.entry
    }

    fn update_countdown(&mut self, at: NaiveDateTime) {
        let maghrib = self.entry.snapshot.maghrib();
        let hold = chrono::Duration::minutes(self.config.refresh.iftar_hold_minutes);
        self.countdown = countdown_at(at, maghrib, hold);
    }

    fn start_countdown(&mut self) {
        self.update_countdown(now());
        self.countdown_timer.replace(spawn_repeating(
            self.config.refresh.tick(),
            true,
            self.tx.clone(),
            Message::Tick,
        ));
    }

    fn start_refresh(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let refresher = Arc::clone(&self.refresher);
        let tx = self.tx.clone();
        let today = now().date();
        debug!("Starting refresh #{}", generation);
        self.refresh_task.replace(tokio::spawn(async move {
            let resolution = refresher.resolve(today).await;
            let _ = tx.send(Message::Resolved {
                generation,
                resolution: Box::new(resolution),
            });
        }));
    }

    fn apply(&mut self, resolution: Resolution) {
        let Resolution {
            snapshot,
            hijri,
            hijri_error,
            timings_error,
        } = resolution.keep_cached(self.cache.get());
        self.errors = hijri_error.into_iter().chain(timings_error).collect();
        self.entry = self.cache.store(snapshot, hijri, now()).clone();
        self.start_countdown();
    }

    /// Returns whether the screen needs redrawing.
    pub fn handle_message(&mut self, msg: Message) -> bool {
        match msg {
            Message::Key(key) => {
                self.handle_key(key);
                true
            }
            Message::Tick => {
                let before = self.countdown;
                self.update_countdown(now());
                before != self.countdown
            }
            Message::Refresh => {
                self.start_refresh();
                true
            }
            Message::Midnight => {
                info!("Midnight, refreshing for the new day");
                self.start_refresh();
                self.schedule.restart_periodic(
                    self.config.refresh.period(),
                    self.tx.clone(),
                    Message::Refresh,
                );
                self.schedule
                    .arm_midnight(now(), self.tx.clone(), Message::Midnight);
                true
            }
            Message::Resolved {
                generation,
                resolution,
            } => {
                if generation != self.generation {
                    debug!(
                        "Dropping stale refresh #{} (current #{})",
                        generation, self.generation
                    );
                    return false;
                }
                self.apply(*resolution);
                true
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('r') => self.start_refresh(),
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // header
                Constraint::Min(9),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let entry = &self.entry;
        let at = now();
        header::render(
            frame,
            rows[0],
            &entry.hijri,
            at.date(),
            &self.config.location.city,
        );
        prayers::render(
            frame,
            columns[0],
            &entry.snapshot,
            &self.config.jamaat,
            at.time(),
        );
        countdown::render(
            frame,
            columns[1],
            self.countdown,
            entry.snapshot.maghrib(),
            self.config.refresh.shows_seconds(),
        );
        statusbar::render(frame, rows[2], entry, &self.errors, self.refresh_task.is_active());
    }
}

/// Run the board until the user quits.
pub async fn run(config: AppConfig, cache: WidgetCache) -> Result<()> {
    let refresher = Arc::new(Refresher::new(&config)?);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut app = App::new(config, refresher, cache, tx.clone());
    let _keys = spawn_key_reader(tx, Message::Key);

    let mut terminal = ratatui::init();
    app.start();

    let result = async {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|frame| app.draw(frame))?;
            }
            if app.should_quit {
                break;
            }
            let Some(msg) = rx.recv().await else {
                break;
            };
            needs_redraw = app.handle_message(msg);
            while let Ok(next) = rx.try_recv() {
                needs_redraw |= app.handle_message(next);
            }
        }
        Ok(())
    }
    .await;

    ratatui::restore();
    result
}
