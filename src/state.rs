//! Screen state machine for the interactive session.
//!
//! [`Session::update`] is a pure transition: it takes the current session
//! and one [`Event`] and returns the next session plus the [`Command`]s the
//! runtime must carry out. It performs no I/O and never blocks.

use crate::input::TextInput;
use crate::metadata::MediaMetadata;
use crate::mode::{DownloadMode, MenuAction};
use crate::progress::DownloadStats;
use crate::relay::{Outcome, RelayEvent};

/// Screen currently shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    UrlInput,
    FetchingMetadata,
    QualitySelection,
    Downloading,
    Done,
    Failed,
}

/// Keys the state machine distinguishes, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
    Backspace,
    Delete,
    Char(char),
    /// Terminates the program from any screen.
    ForceQuit,
    Other,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key(Key),
    Paste(String),
    Resize { width: u16, height: u16 },
    MetadataReady(MediaMetadata),
    MetadataFailed(String),
    Progress(f64),
    Stats(DownloadStats),
    Outcome(Outcome),
    /// Spinner animation tick.
    Tick,
    /// Progress bar animation frame.
    Frame,
}

impl From<RelayEvent> for Event {
    fn from(event: RelayEvent) -> Self {
        match event {
            RelayEvent::Progress(fraction) => Self::Progress(fraction),
            RelayEvent::Stats(stats) => Self::Stats(stats),
            RelayEvent::Outcome(outcome) => Self::Outcome(outcome),
        }
    }
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    FetchMetadata(String),
    StartDownload { reference: String, mode: DownloadMode },
    /// Wait for exactly one more relay event.
    AwaitRelay,
    /// Deliver another [`Event::Frame`] soon.
    AnimateProgress,
}

/// An ordered list with a clamped cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Selection<T> {
    #[must_use]
    pub const fn new(items: Vec<T>) -> Self {
        Self { items, cursor: 0 }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    pub const fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }
}

/// Displayed progress that eases toward the latest sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressBar {
    shown: f64,
    target: f64,
}

impl ProgressBar {
    const EASING: f64 = 0.25;
    const SNAP: f64 = 0.002;

    #[must_use]
    pub const fn shown(&self) -> f64 {
        self.shown
    }

    #[must_use]
    pub const fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, fraction: f64) {
        self.target = fraction.clamp(0.0, 1.0);
    }

    pub fn jump_to(&mut self, fraction: f64) {
        self.set_target(fraction);
        self.shown = self.target;
    }

    /// Advances one animation frame; returns true once settled on the target.
    pub fn step(&mut self) -> bool {
        let gap = self.target - self.shown;
        if gap.abs() <= Self::SNAP {
            self.shown = self.target;
            true
        } else {
            self.shown += gap * Self::EASING;
            false
        }
    }
}

/// Terminal dimensions last reported by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// Complete UI state of one interactive session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    screen: Screen,
    menu: Selection<MenuAction>,
    choice: Option<MenuAction>,
    url: TextInput,
    reference: Option<String>,
    metadata: Option<MediaMetadata>,
    qualities: Selection<DownloadMode>,
    mode: Option<DownloadMode>,
    percent: f64,
    bar: ProgressBar,
    stats: DownloadStats,
    error: Option<String>,
    spinner: usize,
    viewport: Viewport,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(160)
    }
}

impl Session {
    /// Creates a session on the main menu.
    #[must_use]
    pub fn new(url_char_limit: usize) -> Self {
        Self {
            screen: Screen::Menu,
            menu: Selection::new(MenuAction::ALL.to_vec()),
            choice: None,
            url: TextInput::new(url_char_limit),
            reference: None,
            metadata: None,
            qualities: Selection::default(),
            mode: None,
            percent: 0.0,
            bar: ProgressBar::default(),
            stats: DownloadStats::default(),
            error: None,
            spinner: 0,
            viewport: Viewport::default(),
        }
    }

    /// Applies one event, returning the next session and follow-up commands.
    #[must_use]
    pub fn update(mut self, event: Event) -> (Self, Vec<Command>) {
        let commands = self.apply(event);
        (self, commands)
    }

    fn apply(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Key(Key::ForceQuit) => vec![Command::Quit],
            Event::Key(key) => self.on_key(key),
            Event::Paste(text) => {
                if self.screen == Screen::UrlInput {
                    self.url.insert_str(&text);
                }
                Vec::new()
            }
            Event::Resize { width, height } => {
                self.viewport = Viewport { width, height };
                Vec::new()
            }
            Event::MetadataReady(metadata) => self.on_metadata(metadata),
            Event::MetadataFailed(reason) => self.on_metadata_failed(reason),
            Event::Progress(fraction) => self.on_progress(fraction),
            Event::Stats(stats) => self.on_stats(stats),
            Event::Outcome(outcome) => self.on_outcome(outcome),
            Event::Tick => {
                self.spinner = self.spinner.wrapping_add(1);
                Vec::new()
            }
            Event::Frame => {
                if self.bar.step() {
                    Vec::new()
                } else {
                    vec![Command::AnimateProgress]
                }
            }
        }
    }

    fn on_key(&mut self, key: Key) -> Vec<Command> {
        match self.screen {
            Screen::Menu => self.on_menu_key(key),
            Screen::UrlInput => self.on_url_key(key),
            Screen::QualitySelection => self.on_quality_key(key),
            Screen::FetchingMetadata | Screen::Downloading => Vec::new(),
            Screen::Done | Screen::Failed => vec![Command::Quit],
        }
    }

    fn on_menu_key(&mut self, key: Key) -> Vec<Command> {
        match key {
            Key::Up | Key::Char('k') => self.menu.up(),
            Key::Down | Key::Char('j') => self.menu.down(),
            Key::Enter => {
                let Some(&action) = self.menu.selected() else {
                    return Vec::new();
                };
                if action == MenuAction::Exit {
                    return vec![Command::Quit];
                }
                self.choice = Some(action);
                self.screen = Screen::UrlInput;
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_url_key(&mut self, key: Key) -> Vec<Command> {
        match key {
            Key::Enter => {
                let reference = self.url.value().trim().to_string();
                if reference.is_empty() {
                    return Vec::new();
                }
                self.reference = Some(reference.clone());
                self.screen = Screen::FetchingMetadata;
                return vec![Command::FetchMetadata(reference)];
            }
            Key::Char(ch) => self.url.insert(ch),
            Key::Backspace => self.url.backspace(),
            Key::Delete => self.url.delete(),
            Key::Left => self.url.move_left(),
            Key::Right => self.url.move_right(),
            Key::Home => self.url.move_home(),
            Key::End => self.url.move_end(),
            Key::Up | Key::Down | Key::ForceQuit | Key::Other => {}
        }
        Vec::new()
    }

    fn on_quality_key(&mut self, key: Key) -> Vec<Command> {
        match key {
            Key::Up | Key::Char('k') => self.qualities.up(),
            Key::Down | Key::Char('j') => self.qualities.down(),
            Key::Enter => return self.start_download(),
            _ => {}
        }
        Vec::new()
    }

    fn start_download(&mut self) -> Vec<Command> {
        let (Some(&mode), Some(metadata)) = (self.qualities.selected(), self.metadata.as_ref())
        else {
            return Vec::new();
        };
        let reference = metadata.webpage_url.clone();

        self.mode = Some(mode);
        self.percent = 0.0;
        self.bar = ProgressBar::default();
        self.error = None;
        self.stats = DownloadStats::pending();
        self.screen = Screen::Downloading;

        vec![
            Command::StartDownload { reference, mode },
            Command::AwaitRelay,
        ]
    }

    fn on_metadata(&mut self, mut metadata: MediaMetadata) -> Vec<Command> {
        if self.screen != Screen::FetchingMetadata {
            return Vec::new();
        }
        if let Some(reference) = &self.reference {
            metadata.backfill_reference(reference);
        }
        let modes = self.choice.unwrap_or(MenuAction::DownloadVideo).modes();

        self.metadata = Some(metadata);
        self.qualities = Selection::new(modes.to_vec());
        self.screen = Screen::QualitySelection;
        Vec::new()
    }

    fn on_metadata_failed(&mut self, reason: String) -> Vec<Command> {
        if self.screen == Screen::FetchingMetadata {
            self.fail(reason);
        }
        Vec::new()
    }

    fn on_progress(&mut self, fraction: f64) -> Vec<Command> {
        if self.screen != Screen::Downloading {
            return Vec::new();
        }
        self.percent = fraction;
        self.bar.set_target(fraction);
        vec![Command::AwaitRelay, Command::AnimateProgress]
    }

    fn on_stats(&mut self, stats: DownloadStats) -> Vec<Command> {
        if self.screen != Screen::Downloading {
            return Vec::new();
        }
        self.stats = stats;
        vec![Command::AwaitRelay]
    }

    fn on_outcome(&mut self, outcome: Outcome) -> Vec<Command> {
        if self.screen != Screen::Downloading {
            return Vec::new();
        }
        match outcome {
            Outcome::Completed => {
                self.percent = 1.0;
                self.bar.jump_to(1.0);
                self.screen = Screen::Done;
            }
            Outcome::Failed(reason) => self.fail(reason),
        }
        Vec::new()
    }

    fn fail(&mut self, reason: String) {
        self.error = Some(reason);
        self.screen = Screen::Failed;
    }

    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub const fn menu(&self) -> &Selection<MenuAction> {
        &self.menu
    }

    #[must_use]
    pub const fn choice(&self) -> Option<MenuAction> {
        self.choice
    }

    #[must_use]
    pub const fn url(&self) -> &TextInput {
        &self.url
    }

    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    #[must_use]
    pub const fn metadata(&self) -> Option<&MediaMetadata> {
        self.metadata.as_ref()
    }

    #[must_use]
    pub const fn qualities(&self) -> &Selection<DownloadMode> {
        &self.qualities
    }

    #[must_use]
    pub const fn mode(&self) -> Option<DownloadMode> {
        self.mode
    }

    /// Latest completion fraction reported by the worker.
    #[must_use]
    pub const fn percent(&self) -> f64 {
        self.percent
    }

    #[must_use]
    pub const fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    #[must_use]
    pub const fn stats(&self) -> &DownloadStats {
        &self.stats
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn spinner(&self) -> usize {
        self.spinner
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(session: Session, key: Key) -> (Session, Vec<Command>) {
        session.update(Event::Key(key))
    }

    fn type_text(mut session: Session, text: &str) -> Session {
        for ch in text.chars() {
            session = press(session, Key::Char(ch)).0;
        }
        session
    }

    fn metadata() -> MediaMetadata {
        MediaMetadata {
            title: "Clip".to_string(),
            uploader: "Someone".to_string(),
            duration: 90,
            webpage_url: "https://youtu.be/abc".to_string(),
        }
    }

    fn fetching() -> Session {
        let session = press(Session::default(), Key::Enter).0;
        let session = type_text(session, "https://youtu.be/abc");
        press(session, Key::Enter).0
    }

    fn quality_selection() -> Session {
        fetching().update(Event::MetadataReady(metadata())).0
    }

    fn downloading() -> Session {
        press(quality_selection(), Key::Enter).0
    }

    // ==================== Menu ====================

    #[test]
    fn starts_on_menu() {
        let session = Session::default();
        assert_eq!(session.screen(), Screen::Menu);
        assert_eq!(session.menu().cursor(), 0);
        assert_eq!(session.menu().items(), MenuAction::ALL);
    }

    #[test]
    fn menu_cursor_clamps() {
        let (session, _) = press(Session::default(), Key::Up);
        assert_eq!(session.menu().cursor(), 0);

        let mut session = session;
        for _ in 0..10 {
            session = press(session, Key::Down).0;
        }
        assert_eq!(session.menu().cursor(), MenuAction::ALL.len() - 1);
    }

    #[test]
    fn menu_vim_keys() {
        let (session, _) = press(Session::default(), Key::Char('j'));
        assert_eq!(session.menu().cursor(), 1);
        let (session, _) = press(session, Key::Char('k'));
        assert_eq!(session.menu().cursor(), 0);
    }

    #[test]
    fn menu_enter_commits_choice() {
        let (session, commands) = press(Session::default(), Key::Enter);
        assert_eq!(session.screen(), Screen::UrlInput);
        assert_eq!(session.choice(), Some(MenuAction::DownloadVideo));
        assert!(commands.is_empty());
    }

    #[test]
    fn menu_exit_quits() {
        let session = press(press(Session::default(), Key::Down).0, Key::Down).0;
        let (session, commands) = press(session, Key::Enter);
        assert_eq!(commands, [Command::Quit]);
        assert_eq!(session.screen(), Screen::Menu);
    }

    // ==================== URL Input ====================

    #[test]
    fn url_keys_edit_text() {
        let session = press(Session::default(), Key::Enter).0;
        let session = type_text(session, "abx");
        let session = press(session, Key::Backspace).0;
        let session = press(session, Key::Char('c')).0;
        assert_eq!(session.url().value(), "abc");
        assert_eq!(session.screen(), Screen::UrlInput);
    }

    #[test]
    fn url_enter_schedules_fetch() {
        let session = press(Session::default(), Key::Enter).0;
        let session = type_text(session, "  https://youtu.be/abc ");
        let (session, commands) = press(session, Key::Enter);

        assert_eq!(session.screen(), Screen::FetchingMetadata);
        assert_eq!(session.reference(), Some("https://youtu.be/abc"));
        assert_eq!(
            commands,
            [Command::FetchMetadata("https://youtu.be/abc".to_string())]
        );
    }

    #[test]
    fn blank_url_is_ignored() {
        let session = press(Session::default(), Key::Enter).0;
        let session = type_text(session, "   ");
        let (session, commands) = press(session, Key::Enter);
        assert_eq!(session.screen(), Screen::UrlInput);
        assert!(commands.is_empty());
    }

    #[test]
    fn paste_only_applies_to_url_input() {
        let (session, _) = Session::default().update(Event::Paste("x".to_string()));
        assert!(session.url().value().is_empty());

        let session = press(session, Key::Enter).0;
        let (session, _) = session.update(Event::Paste("https://a\n".to_string()));
        assert_eq!(session.url().value(), "https://a");
    }

    // ==================== Fetching ====================

    #[test]
    fn fetching_ignores_keys() {
        let before = fetching();
        let (after, commands) = press(before.clone(), Key::Enter);
        assert_eq!(after, before);
        assert!(commands.is_empty());
    }

    #[test]
    fn metadata_ready_shows_qualities() {
        let session = quality_selection();
        assert_eq!(session.screen(), Screen::QualitySelection);
        assert_eq!(session.qualities().items(), DownloadMode::ALL);
        assert_eq!(session.qualities().cursor(), 0);
        assert_eq!(session.metadata(), Some(&metadata()));
    }

    #[test]
    fn audio_choice_offers_audio_only() {
        let session = press(press(Session::default(), Key::Down).0, Key::Enter).0;
        let session = type_text(session, "ref");
        let session = press(session, Key::Enter).0;
        let (session, _) = session.update(Event::MetadataReady(metadata()));
        assert_eq!(session.qualities().items(), [DownloadMode::AudioOnly]);
    }

    #[test]
    fn metadata_reference_is_backfilled() {
        let (session, _) = fetching().update(Event::MetadataReady(MediaMetadata::default()));
        assert_eq!(
            session.metadata().unwrap().webpage_url,
            "https://youtu.be/abc"
        );
    }

    #[test]
    fn metadata_failure_goes_straight_to_failed() {
        let (session, commands) = fetching().update(Event::MetadataFailed(
            "failed to fetch metadata: exit status: 1".to_string(),
        ));
        assert_eq!(session.screen(), Screen::Failed);
        assert_eq!(
            session.error(),
            Some("failed to fetch metadata: exit status: 1")
        );
        assert!(session.qualities().items().is_empty());
        assert!(commands.is_empty());
    }

    #[test]
    fn stale_metadata_is_ignored() {
        let before = Session::default();
        let (after, _) = before.clone().update(Event::MetadataReady(metadata()));
        assert_eq!(after, before);
    }

    // ==================== Quality Selection ====================

    #[test]
    fn quality_cursor_clamps() {
        let mut session = quality_selection();
        for _ in 0..10 {
            session = press(session, Key::Down).0;
        }
        assert_eq!(session.qualities().cursor(), DownloadMode::ALL.len() - 1);
        let (session, _) = press(session, Key::Up);
        assert_eq!(session.qualities().cursor(), DownloadMode::ALL.len() - 2);
    }

    #[test]
    fn quality_enter_starts_download() {
        let session = press(quality_selection(), Key::Down).0;
        let (session, commands) = press(session, Key::Enter);

        assert_eq!(session.screen(), Screen::Downloading);
        assert_eq!(session.mode(), Some(DownloadMode::Hd1080));
        assert_eq!(session.percent(), 0.0);
        assert!(session.error().is_none());
        assert_eq!(session.stats(), &DownloadStats::pending());
        assert_eq!(
            commands,
            [
                Command::StartDownload {
                    reference: "https://youtu.be/abc".to_string(),
                    mode: DownloadMode::Hd1080,
                },
                Command::AwaitRelay,
            ]
        );
    }

    // ==================== Downloading ====================

    #[test]
    fn progress_rearms_relay_and_animates() {
        let (session, commands) = downloading().update(Event::Progress(0.3));
        assert_eq!(session.percent(), 0.3);
        assert_eq!(session.bar().target(), 0.3);
        assert_eq!(commands, [Command::AwaitRelay, Command::AnimateProgress]);
    }

    #[test]
    fn stats_do_not_touch_fraction() {
        let (session, _) = downloading().update(Event::Progress(0.6));
        let stats = DownloadStats {
            eta: "00:03".to_string(),
            speed: "2MiB/s".to_string(),
            total_size: "30MiB".to_string(),
        };
        let (session, commands) = session.update(Event::Stats(stats.clone()));

        assert_eq!(session.percent(), 0.6);
        assert_eq!(session.stats(), &stats);
        assert_eq!(commands, [Command::AwaitRelay]);
    }

    #[test]
    fn keys_are_ignored_while_downloading() {
        let before = downloading();
        let (after, commands) = press(before.clone(), Key::Enter);
        assert_eq!(after, before);
        assert!(commands.is_empty());
    }

    #[test]
    fn completion_forces_full_fraction() {
        let (session, _) = downloading().update(Event::Progress(0.42));
        let (session, commands) = session.update(Event::Outcome(Outcome::Completed));
        assert_eq!(session.screen(), Screen::Done);
        assert_eq!(session.percent(), 1.0);
        assert_eq!(session.bar().shown(), 1.0);
        assert!(commands.is_empty());
    }

    #[test]
    fn failure_overrides_progress() {
        let (session, _) = downloading().update(Event::Progress(0.8));
        let (session, commands) = session.update(Event::Outcome(Outcome::Failed(
            "download failed: exit status: 1".to_string(),
        )));
        assert_eq!(session.screen(), Screen::Failed);
        assert_eq!(session.error(), Some("download failed: exit status: 1"));
        assert!(commands.is_empty());
    }

    #[test]
    fn terminal_states_accept_no_relay_events() {
        let (done, _) = downloading().update(Event::Outcome(Outcome::Completed));
        for event in [
            Event::Progress(0.1),
            Event::Stats(DownloadStats::default()),
            Event::Outcome(Outcome::Failed("late".to_string())),
        ] {
            let (after, commands) = done.clone().update(event);
            assert_eq!(after, done);
            assert!(commands.is_empty());
        }
    }

    #[test]
    fn any_key_dismisses_terminal_states() {
        let (done, _) = downloading().update(Event::Outcome(Outcome::Completed));
        assert_eq!(press(done, Key::Char('x')).1, [Command::Quit]);

        let (failed, _) = fetching().update(Event::MetadataFailed("boom".to_string()));
        assert_eq!(press(failed, Key::Enter).1, [Command::Quit]);
    }

    // ==================== Global ====================

    #[test]
    fn force_quit_from_every_screen() {
        for session in [
            Session::default(),
            fetching(),
            quality_selection(),
            downloading(),
        ] {
            let screen = session.screen();
            let (after, commands) = press(session, Key::ForceQuit);
            assert_eq!(commands, [Command::Quit]);
            assert_eq!(after.screen(), screen);
        }
    }

    #[test]
    fn resize_never_changes_screen() {
        let (session, commands) = downloading().update(Event::Resize {
            width: 120,
            height: 40,
        });
        assert_eq!(session.screen(), Screen::Downloading);
        assert_eq!(
            session.viewport(),
            Viewport {
                width: 120,
                height: 40
            }
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn ticks_in_terminal_states_keep_screen() {
        let (done, _) = downloading().update(Event::Outcome(Outcome::Completed));
        let (after, commands) = done.update(Event::Tick);
        assert_eq!(after.screen(), Screen::Done);
        assert_eq!(after.spinner(), 1);
        assert!(commands.is_empty());

        let (after, _) = after.update(Event::Frame);
        assert_eq!(after.screen(), Screen::Done);
    }

    #[test]
    fn frames_ease_bar_until_settled() {
        let (mut session, _) = downloading().update(Event::Progress(1.0));
        let mut frames = 0;
        loop {
            let (next, commands) = session.update(Event::Frame);
            session = next;
            frames += 1;
            if commands.is_empty() {
                break;
            }
            assert_eq!(commands, [Command::AnimateProgress]);
            assert!(session.bar().shown() < 1.0);
            assert!(frames < 100, "bar never settled");
        }
        assert_eq!(session.bar().shown(), 1.0);
    }

    #[test]
    fn relay_events_convert_to_session_events() {
        assert_eq!(Event::from(RelayEvent::Progress(0.5)), Event::Progress(0.5));
        assert_eq!(
            Event::from(RelayEvent::Outcome(Outcome::Completed)),
            Event::Outcome(Outcome::Completed)
        );
    }

    // ==================== Scenarios ====================

    #[test]
    fn full_download_scenario() {
        let session = Session::default();
        assert_eq!(session.menu().selected(), Some(&MenuAction::DownloadVideo));

        let (session, _) = press(session, Key::Enter);
        assert_eq!(session.screen(), Screen::UrlInput);

        let session = type_text(session, "https://youtu.be/abc");
        let (session, commands) = press(session, Key::Enter);
        assert_eq!(session.screen(), Screen::FetchingMetadata);
        assert_eq!(
            commands,
            [Command::FetchMetadata("https://youtu.be/abc".to_string())]
        );

        let (session, _) = session.update(Event::MetadataReady(metadata()));
        assert_eq!(session.screen(), Screen::QualitySelection);
        assert_eq!(session.qualities().items(), DownloadMode::ALL);
        assert_eq!(session.qualities().cursor(), 0);
        assert_eq!(
            session.qualities().selected().map(|m| m.label()),
            Some("Best Quality (MP4)")
        );

        let (mut session, commands) = press(session, Key::Enter);
        assert_eq!(session.screen(), Screen::Downloading);
        assert_eq!(session.percent(), 0.0);
        assert!(commands.contains(&Command::AwaitRelay));

        for fraction in [0.10, 0.55, 1.0] {
            let (next, commands) = session.update(Event::Progress(fraction));
            session = next;
            assert_eq!(session.percent(), fraction);
            assert!(commands.contains(&Command::AwaitRelay));
        }

        let (session, commands) = session.update(Event::Outcome(Outcome::Completed));
        assert_eq!(session.screen(), Screen::Done);
        assert_eq!(session.percent(), 1.0);
        assert!(!commands.contains(&Command::AwaitRelay));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn nav_key() -> impl Strategy<Value = Key> {
            prop_oneof![
                Just(Key::Up),
                Just(Key::Down),
                Just(Key::Char('j')),
                Just(Key::Char('k')),
            ]
        }

        proptest! {
            #[test]
            fn selection_cursor_stays_in_bounds(
                len in 0usize..20,
                moves in proptest::collection::vec(any::<bool>(), 0..60),
            ) {
                let mut selection = Selection::new((0..len).collect::<Vec<_>>());
                for down in moves {
                    if down { selection.down() } else { selection.up() }
                    prop_assert!(selection.cursor() < len.max(1));
                }
            }

            #[test]
            fn menu_navigation_never_leaves_menu(keys in proptest::collection::vec(nav_key(), 0..40)) {
                let mut session = Session::default();
                for key in keys {
                    let (next, commands) = session.update(Event::Key(key));
                    session = next;
                    prop_assert!(commands.is_empty());
                    prop_assert_eq!(session.screen(), Screen::Menu);
                    prop_assert!(session.menu().cursor() < MenuAction::ALL.len());
                }
            }

            #[test]
            fn latest_sample_wins(samples in proptest::collection::vec(0.0f64..=1.0, 1..20)) {
                let mut session = downloading();
                for &sample in &samples {
                    session = session.update(Event::Progress(sample)).0;
                }
                prop_assert_eq!(session.percent(), *samples.last().unwrap());
            }
        }
    }
}
