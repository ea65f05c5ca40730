use crate::leaderboard::{
    CategorizationScheme, Categorized, CommandOutcome, LeaderboardView, OutcomeStatus,
};
use crate::models::WinnerRecord;

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Leaderboard,
    Loading,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

pub struct App {
    pub contest_name: String,
    pub view: Option<LeaderboardView>,
    pub scheme: CategorizationScheme,
    pub podium_size: usize,
    pub export_file: String,
    pub categorized: Categorized,
    pub selected_group: usize,
    pub selected_bucket: usize,
    pub current_screen: Screen,
    pub loading_message: Option<String>,
    pub status: Option<StatusLine>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        contest_name: impl Into<String>,
        scheme: CategorizationScheme,
        podium_size: usize,
        export_file: impl Into<String>,
    ) -> Self {
        Self {
            contest_name: contest_name.into(),
            view: None,
            scheme,
            podium_size,
            export_file: export_file.into(),
            categorized: Categorized::empty(scheme),
            selected_group: 0,
            selected_bucket: 0,
            current_screen: Screen::Leaderboard,
            loading_message: None,
            status: None,
            should_quit: false,
        }
    }

    pub fn set_loading(&mut self, message: &str) {
        self.current_screen = Screen::Loading;
        self.loading_message = Some(message.to_string());
    }

    pub fn set_view(&mut self, view: LeaderboardView) {
        self.view = Some(view);
        self.current_screen = Screen::Leaderboard;
        self.loading_message = None;
        self.recategorize();
    }

    /// Regroups the raw records under the current scheme.
    pub fn recategorize(&mut self) {
        self.categorized = match &self.view {
            Some(view) => view.categorized(self.scheme, None),
            None => Categorized::empty(self.scheme),
        };
        self.selected_group = 0;
        self.selected_bucket = 0;
    }

    pub fn cycle_scheme(&mut self) {
        self.scheme = self.scheme.next();
        self.recategorize();
        self.set_info(&format!("Grouping by {}", self.scheme.description()));
    }

    pub fn has_data(&self) -> bool {
        !self.categorized.is_empty()
    }

    pub fn group_keys(&self) -> Vec<String> {
        self.categorized
            .groups()
            .iter()
            .map(|g| g.key.to_string())
            .collect()
    }

    pub fn bucket_keys(&self) -> Vec<String> {
        self.categorized
            .groups()
            .get(self.selected_group)
            .map(|g| g.buckets.iter().map(|b| b.key.to_string()).collect())
            .unwrap_or_default()
    }

    pub fn current_records(&self) -> &[WinnerRecord] {
        self.categorized
            .groups()
            .get(self.selected_group)
            .and_then(|g| g.buckets.get(self.selected_bucket))
            .map(|b| b.records)
            .unwrap_or(&[])
    }

    pub fn podium(&self) -> &[WinnerRecord] {
        let records = self.current_records();
        &records[..records.len().min(self.podium_size)]
    }

    pub fn next_group(&mut self) {
        let count = self.categorized.group_count();
        if count > 0 {
            self.selected_group = (self.selected_group + 1) % count;
            self.selected_bucket = 0;
        }
    }

    pub fn previous_group(&mut self) {
        let count = self.categorized.group_count();
        if count > 0 {
            self.selected_group = (self.selected_group + count - 1) % count;
            self.selected_bucket = 0;
        }
    }

    pub fn next_bucket(&mut self) {
        let count = self.bucket_keys().len();
        if count > 0 {
            self.selected_bucket = (self.selected_bucket + 1) % count;
        }
    }

    pub fn previous_bucket(&mut self) {
        let count = self.bucket_keys().len();
        if count > 0 {
            self.selected_bucket = (self.selected_bucket + count - 1) % count;
        }
    }

    pub fn set_info(&mut self, text: &str) {
        self.status = Some(StatusLine {
            text: text.to_string(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: &str) {
        self.status = Some(StatusLine {
            text: text.to_string(),
            is_error: true,
        });
        self.loading_message = None;
        self.current_screen = Screen::Leaderboard;
    }

    pub fn set_outcome(&mut self, outcome: &CommandOutcome) {
        let text = format!("{}: {}", outcome.title, outcome.description);
        match outcome.status {
            OutcomeStatus::Success => self.set_info(&text),
            OutcomeStatus::Error => self.set_error(&text),
        }
    }
}
