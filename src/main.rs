mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use retype::{
    config::{Config, ConfigStore, FileConfigStore},
    language::SupportedLanguage,
    runtime::{CrosstermEventSource, Event, Runner},
    score::{ScoreLog, ScoreRecord},
    session::{Outcome, TypingSession},
    words::{self, FetchOutcome, RandomWordApi, WordPool},
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// terminal typing speed test
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing speed test. Words come from the random-word api for the \
selected language (with a built-in fallback list when the api is unreachable); your corrected \
CPM and WPM land in a local score history."
)]
pub struct Cli {
    /// language to pull words from
    #[clap(short = 'l', long, value_enum)]
    language: Option<SupportedLanguage>,

    /// number of seconds on the countdown
    #[clap(short = 's', long)]
    number_of_secs: Option<u64>,

    /// skip the word api and type the built-in list
    #[clap(long)]
    offline: bool,

    /// space-separated custom words to type instead of fetched ones
    #[clap(short = 'p', long)]
    prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Typing,
    Results,
}

/// Owns exactly one session at a time; restart and language switches
/// replace it wholesale.
#[derive(Debug)]
pub struct App {
    pub cli: Cli,
    pub config: Config,
    pub session: TypingSession,
    pub entry: String,
    pub word_marks: Vec<Outcome>,
    pub fallback_reason: Option<String>,
    pub last_score: Option<ScoreRecord>,
    pub state: AppState,
    pub timer_started: bool,
    pub score_log: ScoreLog,
}

impl App {
    pub fn new(cli: Cli, config: Config) -> Self {
        let mut app = Self {
            cli,
            config,
            session: TypingSession::new(WordPool::default()),
            entry: String::new(),
            word_marks: Vec::new(),
            fallback_reason: None,
            last_score: None,
            state: AppState::Results,
            timer_started: false,
            score_log: ScoreLog::new(),
        };
        app.new_session();
        app
    }

    /// Effective settings: CLI flags over stored config.
    pub fn language(&self) -> SupportedLanguage {
        self.cli.language.unwrap_or(self.config.language)
    }

    pub fn seconds(&self) -> u64 {
        self.cli.number_of_secs.unwrap_or(self.config.number_of_secs)
    }

    pub fn offline(&self) -> bool {
        self.cli.offline || self.config.offline
    }

    pub fn resolved_config(&self) -> Config {
        Config {
            language: self.language(),
            number_of_secs: self.seconds(),
            offline: self.offline(),
        }
    }

    /// Obtain a fresh pool and start over. An empty pool (everything
    /// filtered out) lands directly on the results screen.
    pub fn new_session(&mut self) {
        let (pool, fallback_reason) = self.build_pool();
        self.session = TypingSession::with_seconds(pool, self.seconds());
        self.fallback_reason = fallback_reason;
        self.entry.clear();
        self.word_marks.clear();
        self.timer_started = false;
        self.last_score = self.score_log.last().ok().flatten();
        self.state = if self.session.is_ended() {
            AppState::Results
        } else {
            AppState::Typing
        };
    }

    pub fn cycle_language(&mut self) {
        self.config.language = self.language().next();
        self.cli.language = None;
        self.new_session();
    }

    fn build_pool(&self) -> (WordPool, Option<String>) {
        if let Some(prompt) = &self.cli.prompt {
            let custom = prompt.split_whitespace().map(str::to_string).collect();
            return (WordPool::from_words(custom), None);
        }
        if self.offline() {
            return (words::offline_pool(), None);
        }
        match words::fetch_pool(&RandomWordApi, self.language().tag()) {
            FetchOutcome::Fetched(pool) => (pool, None),
            FetchOutcome::Fallback(pool, reason) => (pool, Some(reason)),
        }
    }

    pub fn handle_char(&mut self, c: char) -> Result<(), Box<dyn Error>> {
        if self.state != AppState::Typing || self.session.is_ended() {
            return Ok(());
        }
        // the countdown arms on the first keystroke
        self.timer_started = true;
        if c == ' ' {
            self.submit_entry()?;
        } else {
            self.entry.push(c);
        }
        Ok(())
    }

    pub fn handle_backspace(&mut self) {
        if self.state == AppState::Typing {
            self.entry.pop();
        }
    }

    pub fn handle_tick(&mut self) -> Result<(), Box<dyn Error>> {
        if self.state != AppState::Typing || !self.timer_started || self.session.is_ended() {
            return Ok(());
        }
        if self.session.tick() == 0 {
            self.finish()?;
        }
        Ok(())
    }

    fn submit_entry(&mut self) -> Result<(), Box<dyn Error>> {
        let typed = self.entry.trim().to_string();
        let outcome = self.session.submit_word(&typed);
        self.word_marks.push(outcome);
        self.entry.clear();
        if self.session.is_ended() {
            self.finish()?;
        }
        Ok(())
    }

    // Freeze the session, persist the score, land on the results screen.
    // Persistence failure is the one error this app refuses to swallow.
    fn finish(&mut self) -> Result<(), Box<dyn Error>> {
        self.state = AppState::Results;
        if !self.session.words.is_empty() {
            let record = ScoreRecord::from_session(&self.session, self.language().score_tag());
            self.score_log.append(&record)?;
            self.last_score = Some(record);
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let config = store.load();

    // the one blocking word fetch happens here, before the terminal is
    // taken over and before any session exists
    let mut app = App::new(cli, config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    store.save(&app.resolved_config())?;

    res
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new();
    let mut runner = Runner::new(events, TICK_INTERVAL);

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            Event::Tick => {
                app.handle_tick()?;
            }
            Event::Resize => {}
            Event::Key(key) => match key.code {
                KeyCode::Esc => break,
                KeyCode::Backspace => app.handle_backspace(),
                KeyCode::Char(c) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                        break;
                    }
                    match app.state {
                        AppState::Typing => {
                            let was_started = app.timer_started;
                            app.handle_char(c)?;
                            if !was_started && app.timer_started {
                                // first keystroke: tick cadence starts now
                                runner.rearm();
                            }
                        }
                        AppState::Results => match c {
                            'r' => app.new_session(),
                            'l' => app.cycle_language(),
                            _ => {}
                        },
                    }
                }
                _ => {}
            },
        }

        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
