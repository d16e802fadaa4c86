//! Interactive menu: an explicit state machine plus the loop that drives it.
//!
//! `MenuState::transition` is pure: it maps one trimmed input line to the
//! next state and an `Action`. `MenuController` owns the I/O and carries
//! actions out, so the whole loop runs against any `BufRead`/`Write` pair.

use std::{
    collections::HashSet,
    io::{BufRead, Write},
};

use crate::{
    cli::handlers::{self, HandlerEnv, View},
    core::{
        config::AppConfig,
        constants::{
            DEFAULT_DIARY_COUNT, DEFAULT_TREND_DAYS, DIARY_COUNT_MAX, DIARY_COUNT_MIN,
            TREND_DAYS_MAX, TREND_DAYS_MIN,
        },
        entry::{MoodEntry, Score, parse_int},
        error::{MoodError, ValidationError},
        messages::Messages,
        rng::Lcg,
    },
    render::{Capabilities, ExportFormat, RenderContext},
    stats::Aggregator,
    store::LogStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    AwaitingNote { score: Score },
    VisualizeSubmenu,
    AwaitingTrendDays,
    DiaryView,
    Exit,
}

/// Why an input line was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Score(ValidationError),
    Unrecognized,
    Choice,
    Number,
}

impl Rejection {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Score(e) => format!("Please enter a whole number from 1 to 10 ({e})."),
            Self::Unrecognized => "Unrecognized input, enter 1-10, V, D or N.".to_owned(),
            Self::Choice => "Please choose 1-6, or press Enter to go back.".to_owned(),
            Self::Number => "Please enter a whole number, or press Enter for the default.".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do besides showing the next prompt.
    Prompt,
    Reject(Rejection),
    Encourage(Score),
    Append { score: Score, note: String },
    Visualize { view: View, days: u32 },
    Diary(usize),
    Back,
    Quit,
}

/// Empty input picks `default`, a number is clamped, anything else is `None`.
fn number_or_default(input: &str, default: i64, min: i64, max: i64) -> Option<i64> {
    if input.is_empty() {
        return Some(default);
    }
    parse_int(input).map(|n| n.clamp(min, max))
}

impl MenuState {
    /// The transition table.
    #[must_use]
    pub fn transition(self, input: &str) -> (Self, Action) {
        let input = input.trim();
        let key = input.to_lowercase();
        match self {
            Self::MainMenu => match key.as_str() {
                "v" => (Self::VisualizeSubmenu, Action::Prompt),
                "d" => (Self::DiaryView, Action::Prompt),
                "n" | "no" => (Self::Exit, Action::Quit),
                _ => match input.parse::<Score>() {
                    Ok(score) => (Self::AwaitingNote { score }, Action::Encourage(score)),
                    Err(e @ ValidationError::OutOfRange(_)) => {
                        (Self::MainMenu, Action::Reject(Rejection::Score(e)))
                    }
                    Err(ValidationError::NotANumber(_)) => {
                        (Self::MainMenu, Action::Reject(Rejection::Unrecognized))
                    }
                },
            },
            Self::AwaitingNote { score } => (
                Self::MainMenu,
                Action::Append {
                    score,
                    note: input.to_owned(),
                },
            ),
            Self::VisualizeSubmenu => {
                let view = |view| Action::Visualize {
                    view,
                    days: DEFAULT_TREND_DAYS,
                };
                match key.as_str() {
                    "1" => (Self::MainMenu, view(View::Sparkline)),
                    "2" => (Self::MainMenu, view(View::Bars)),
                    "3" => (Self::MainMenu, view(View::Export(ExportFormat::Png))),
                    "4" => (Self::MainMenu, view(View::Export(ExportFormat::Html))),
                    "5" => (Self::AwaitingTrendDays, Action::Prompt),
                    "6" => (Self::MainMenu, view(View::Braille)),
                    "" | "b" => (Self::MainMenu, Action::Back),
                    _ => (Self::VisualizeSubmenu, Action::Reject(Rejection::Choice)),
                }
            }
            Self::AwaitingTrendDays => match number_or_default(
                input,
                i64::from(DEFAULT_TREND_DAYS),
                i64::from(TREND_DAYS_MIN),
                i64::from(TREND_DAYS_MAX),
            ) {
                // clamped into TREND_DAYS_MIN..=TREND_DAYS_MAX, always fits
                Some(n) => (
                    Self::MainMenu,
                    Action::Visualize {
                        view: View::Sparkline,
                        days: u32::try_from(n).unwrap_or(DEFAULT_TREND_DAYS),
                    },
                ),
                None => (Self::AwaitingTrendDays, Action::Reject(Rejection::Number)),
            },
            Self::DiaryView => {
                #[allow(clippy::cast_possible_wrap)]
                let picked = number_or_default(
                    input,
                    DEFAULT_DIARY_COUNT as i64,
                    DIARY_COUNT_MIN as i64,
                    DIARY_COUNT_MAX as i64,
                );
                match picked {
                    Some(n) => (
                        Self::MainMenu,
                        Action::Diary(usize::try_from(n).unwrap_or(DEFAULT_DIARY_COUNT)),
                    ),
                    None => (Self::DiaryView, Action::Reject(Rejection::Number)),
                }
            }
            Self::Exit => (Self::Exit, Action::Quit),
        }
    }
}

/// Drives the menu over an input/output pair.
pub struct MenuController<R, W> {
    input: R,
    out: W,
    store: LogStore,
    config: AppConfig,
    ctx: RenderContext,
    caps: Capabilities,
    messages: Messages,
    rng: Lcg,
    /// Encouragement lines already shown this session.
    shown: HashSet<String>,
    clock: Option<Aggregator>,
}

impl<R: BufRead, W: Write> MenuController<R, W> {
    pub fn new(
        config: AppConfig,
        ctx: RenderContext,
        caps: Capabilities,
        messages: Messages,
        input: R,
        out: W,
    ) -> Self {
        Self {
            input,
            out,
            store: LogStore::from_config(&config),
            config,
            ctx,
            caps,
            messages,
            rng: Lcg::seed_from_time(),
            shown: HashSet::new(),
            clock: None,
        }
    }

    /// Pin "today" for aggregation.
    #[must_use]
    pub fn with_clock(mut self, agg: Aggregator) -> Self {
        self.clock = Some(agg);
        self
    }

    #[must_use]
    pub fn with_rng(mut self, rng: Lcg) -> Self {
        self.rng = rng;
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn aggregator(&self) -> Aggregator {
        self.clock.unwrap_or_else(Aggregator::now)
    }

    /// Run until the user quits or input ends.
    pub fn run(&mut self) -> Result<(), MoodError> {
        writeln!(self.out, "=== How are you doing from 1-10 ===")?;
        let mut state = MenuState::MainMenu;
        let mut buf = Vec::new();
        while state != MenuState::Exit {
            self.prompt(state)?;
            let Some(line) = self.read_line(&mut buf)? else {
                tracing::debug!(?state, "end of input");
                writeln!(self.out)?;
                if let MenuState::AwaitingNote { score } = state {
                    self.append(score, "")?;
                }
                break;
            };
            let (next, action) = state.transition(&line);
            tracing::trace!(from = ?state, to = ?next, ?action, "menu transition");
            self.execute(action)?;
            state = next;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Next input line, `None` at end of input. Bytes that are not UTF-8
    /// become U+FFFD instead of ending the session.
    fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<Option<String>, MoodError> {
        buf.clear();
        if self.input.read_until(b'\n', buf)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(buf).into_owned();
        if std::str::from_utf8(buf).is_err() {
            tracing::warn!(bytes = buf.len(), "input is not valid UTF-8");
            writeln!(self.out, "(some input was not valid UTF-8 and was replaced)")?;
        }
        Ok(Some(line))
    }

    fn prompt(&mut self, state: MenuState) -> Result<(), MoodError> {
        match state {
            MenuState::MainMenu => {
                let today = self.aggregator().today();
                match self.store.entries_on(today) {
                    Ok(v) if !v.is_empty() => writeln!(
                        self.out,
                        "Note: you already logged {} time(s) today ({today}).",
                        v.len()
                    )?,
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "cannot count today's entries"),
                }
                write!(
                    self.out,
                    "How are you? Enter 1-10 to log, V to visualize, D for the diary, N to quit: "
                )?;
            }
            MenuState::AwaitingNote { .. } => {
                write!(self.out, "\nAnything to note? (leave empty to skip): ")?;
            }
            MenuState::VisualizeSubmenu => {
                writeln!(self.out, "\nVisualize:")?;
                writeln!(self.out, "1) Sparkline (last {DEFAULT_TREND_DAYS} days)")?;
                writeln!(self.out, "2) Bar chart (last {DEFAULT_TREND_DAYS} days)")?;
                writeln!(self.out, "3) Export PNG (last {DEFAULT_TREND_DAYS} days)")?;
                writeln!(self.out, "4) Export HTML (last {DEFAULT_TREND_DAYS} days)")?;
                writeln!(self.out, "5) Sparkline over a custom number of days")?;
                writeln!(self.out, "6) Braille line chart (last {DEFAULT_TREND_DAYS} days)")?;
                write!(self.out, "Choose [1-6] (Enter or B to go back): ")?;
            }
            MenuState::AwaitingTrendDays => write!(
                self.out,
                "How many days? ({TREND_DAYS_MIN}-{TREND_DAYS_MAX}, default {DEFAULT_TREND_DAYS}): "
            )?,
            MenuState::DiaryView => write!(
                self.out,
                "How many diary notes? ({DIARY_COUNT_MIN}-{DIARY_COUNT_MAX}, default {DEFAULT_DIARY_COUNT}): "
            )?,
            MenuState::Exit => {}
        }
        self.out.flush()?;
        Ok(())
    }

    fn execute(&mut self, action: Action) -> Result<(), MoodError> {
        match action {
            Action::Prompt => {}
            Action::Reject(r) => writeln!(self.out, "{}", r.message())?,
            Action::Encourage(score) => {
                let line = self
                    .messages
                    .choose(score, &self.shown, &mut self.rng)
                    .to_owned();
                writeln!(self.out, "\n--- Today's message ---\n{line}")?;
                self.shown.insert(line);
            }
            Action::Append { score, note } => self.append(score, &note)?,
            Action::Visualize { view, days } => {
                if let Some(entries) = self.load()? {
                    let lines = handlers::visualize(&entries, view, days, &self.env())?;
                    self.emit(&lines)?;
                }
            }
            Action::Diary(k) => {
                if let Some(entries) = self.load()? {
                    let lines = handlers::diary(&entries, k);
                    self.emit(&lines)?;
                }
            }
            Action::Back => writeln!(self.out, "Back to the main menu.")?,
            Action::Quit => writeln!(self.out, "Bye, have a good day!")?,
        }
        Ok(())
    }

    fn env(&self) -> HandlerEnv<'_> {
        HandlerEnv {
            config: &self.config,
            ctx: &self.ctx,
            caps: &self.caps,
            agg: self.aggregator(),
        }
    }

    /// A failed append ends the session so no entry is lost silently.
    fn append(&mut self, score: Score, note: &str) -> Result<(), MoodError> {
        let entry = MoodEntry::now(score, note);
        self.store.append(&entry)?;
        tracing::info!(score = score.get(), noted = entry.has_note(), "entry saved");
        writeln!(self.out, "Saved to {}.", self.store.path().display())?;
        if let Some(entries) = self.load()? {
            let lines = handlers::recent(&entries, &self.env())?;
            self.emit(&lines)?;
        }
        Ok(())
    }

    /// Read the log for display; read failures are reported and swallowed.
    fn load(&mut self) -> Result<Option<Vec<MoodEntry>>, MoodError> {
        match self.store.read_report() {
            Ok(report) => {
                if !report.skipped.is_empty() {
                    writeln!(
                        self.out,
                        "({} malformed row(s) in {} skipped)",
                        report.skipped.len(),
                        self.store.path().display()
                    )?;
                }
                Ok(Some(report.entries))
            }
            Err(e) => {
                tracing::error!(error = %e, "reading the log failed");
                writeln!(self.out, "Could not read the log: {e}")?;
                Ok(None)
            }
        }
    }

    fn emit(&mut self, lines: &[String]) -> Result<(), MoodError> {
        writeln!(self.out)?;
        for l in lines {
            writeln!(self.out, "{l}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Cursor, path::Path};

    fn score(n: i64) -> Score {
        Score::try_from(n).unwrap()
    }

    fn run_script(dir: &Path, script: &str, caps: Capabilities) -> String {
        run_bytes(dir, script.as_bytes(), caps)
    }

    fn run_bytes(dir: &Path, script: &[u8], caps: Capabilities) -> String {
        let cfg = AppConfig::builder().data_dir(dir).build().unwrap();
        let mut menu = MenuController::new(
            cfg,
            RenderContext::plain(80),
            caps,
            Messages::default(),
            Cursor::new(script.to_vec()),
            Vec::new(),
        )
        .with_rng(Lcg::seed(7));
        menu.run().unwrap();
        String::from_utf8(menu.into_output()).unwrap()
    }

    fn log_lines(dir: &Path) -> Vec<String> {
        fs::read_to_string(dir.join("mood_log.csv"))
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_main_menu_transitions() {
        let s = MenuState::MainMenu;
        assert_eq!(
            s.transition("7\n"),
            (MenuState::AwaitingNote { score: score(7) }, Action::Encourage(score(7)))
        );
        assert_eq!(s.transition(" V ").0, MenuState::VisualizeSubmenu);
        assert_eq!(s.transition("d").0, MenuState::DiaryView);
        assert_eq!(s.transition("No"), (MenuState::Exit, Action::Quit));
        assert_eq!(
            s.transition("11"),
            (
                MenuState::MainMenu,
                Action::Reject(Rejection::Score(ValidationError::OutOfRange(11)))
            )
        );
        assert_eq!(
            s.transition("great"),
            (MenuState::MainMenu, Action::Reject(Rejection::Unrecognized))
        );
        assert_eq!(s.transition("").0, MenuState::MainMenu);
    }

    #[test]
    fn test_submenu_transitions() {
        let s = MenuState::VisualizeSubmenu;
        assert_eq!(
            s.transition("3").1,
            Action::Visualize { view: View::Export(ExportFormat::Png), days: 30 }
        );
        assert_eq!(s.transition("5").0, MenuState::AwaitingTrendDays);
        assert_eq!(s.transition("B"), (MenuState::MainMenu, Action::Back));
        assert_eq!(s.transition(""), (MenuState::MainMenu, Action::Back));
        assert_eq!(s.transition("9").0, MenuState::VisualizeSubmenu);

        let days = MenuState::AwaitingTrendDays;
        let days_of = |input| match days.transition(input).1 {
            Action::Visualize { days, .. } => Some(days),
            _ => None,
        };
        assert_eq!(days_of(""), Some(30));
        assert_eq!(days_of("3"), Some(7));
        assert_eq!(days_of("500"), Some(180));
        assert_eq!(days_of("90"), Some(90));
        assert_eq!(days.transition("lots").0, MenuState::AwaitingTrendDays);

        let diary = MenuState::DiaryView;
        assert_eq!(diary.transition("").1, Action::Diary(10));
        assert_eq!(diary.transition("0").1, Action::Diary(1));
        assert_eq!(diary.transition("1000").1, Action::Diary(100));
        assert_eq!(diary.transition("x").0, MenuState::DiaryView);
    }

    #[test]
    fn test_note_keeps_any_text() {
        let s = MenuState::AwaitingNote { score: score(3) };
        assert_eq!(
            s.transition("  n  \n"),
            (MenuState::MainMenu, Action::Append { score: score(3), note: "n".to_owned() })
        );
    }

    #[test]
    fn test_log_one_entry_and_quit() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_script(dir.path(), "7\nfeeling okay\nN\n", Capabilities::none());

        let lines = log_lines(dir.path());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "timestamp,score,note");
        assert!(lines[1].ends_with(",7,feeling okay"), "{}", lines[1]);
        assert!(out.contains("--- Today's message ---"));
        assert!(out.contains("=== Last 7 days ==="));
        assert!(out.ends_with("Bye, have a good day!\n"));
    }

    #[test]
    fn test_invalid_scores_leave_log_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_script(dir.path(), "0\n11\nabc\n-3\nn\n", Capabilities::none());
        assert!(!dir.path().join("mood_log.csv").exists());
        assert_eq!(out.matches("Please enter a whole number from 1 to 10").count(), 3);
        assert_eq!(out.matches("Unrecognized input").count(), 1);
    }

    #[test]
    fn test_missing_exporter_reports_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_script(dir.path(), "5\n\nv\n3\nv\n4\nn\n", Capabilities::none());
        assert!(out.contains("PNG export is not available in this build"));
        assert!(out.contains("HTML export is not available in this build"));
        assert!(out.ends_with("Bye, have a good day!\n"));
        assert_eq!(log_lines(dir.path()).len(), 2);
    }

    #[test]
    fn test_end_of_input_saves_pending_entry() {
        let dir = tempfile::tempdir().unwrap();
        run_script(dir.path(), "9\n", Capabilities::none());
        let lines = log_lines(dir.path());
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with(",9,"), "{}", lines[1]);

        // eof elsewhere just stops
        let other = tempfile::tempdir().unwrap();
        run_script(other.path(), "v\n", Capabilities::none());
        assert!(!other.path().join("mood_log.csv").exists());
    }

    #[test]
    fn test_today_hint_and_diary() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_script(dir.path(), "8\ngood day, \"really\"\nd\n\nn\n", Capabilities::none());
        assert!(out.contains("Note: you already logged 1 time(s) today"));
        assert!(out.contains("=== Last 1 diary notes ==="));
        assert!(out.contains("- good day, \"really\""));
    }

    #[test]
    fn test_non_utf8_note_keeps_the_entry() {
        let dir = tempfile::tempdir().unwrap();
        // GBK-encoded note
        let out = run_bytes(dir.path(), b"6\n\xc4\xe3\xba\xc3\nN\n", Capabilities::none());

        let lines = log_lines(dir.path());
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains(",6,"), "{}", lines[1]);
        assert!(lines[1].contains('\u{FFFD}'), "{}", lines[1]);
        assert!(out.contains("was not valid UTF-8"));
        assert!(out.ends_with("Bye, have a good day!\n"));
    }
}
