use std::mem;
use std::time::{Duration, Instant};

use crate::domain::{Address, BalanceQueryResult, ChainStatus, HistoryEntry};

/// History rows shown as quick queries
pub const QUICK_QUERY_COUNT: usize = 6;
/// Latency samples kept for the sparkline
const LATENCY_SAMPLES: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Empty,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl StatusLevel {
    /// How long a notification of this level stays visible
    pub fn ttl(self) -> Duration {
        match self {
            StatusLevel::Warn | StatusLevel::Error => Duration::from_secs(5),
            StatusLevel::Info | StatusLevel::Success => Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

pub struct App {
    pub endpoint: String,
    pub chain_id: u64,
    pub network_name: String,
    pub should_quit: bool,
    pub focus: Focus,

    pub input: String,
    pub input_state: InputState,

    /// Queries sent but not yet answered
    pub in_flight: usize,
    pub last_result: Option<BalanceQueryResult>,
    /// None until the first refresh lands
    pub chain: Option<ChainStatus>,
    pub history: Vec<HistoryEntry>,
    pub selected_history: usize,
    pub latencies: Vec<u64>,

    status: Option<StatusMessage>,
    pending_queries: Vec<String>,
    pending_refresh: bool,
    pending_clear: bool,
    pending_export: bool,
}

impl App {
    pub fn new(endpoint: impl Into<String>, chain_id: u64, network_name: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            chain_id,
            network_name: network_name.into(),
            should_quit: false,
            focus: Focus::Input,
            input: String::new(),
            input_state: InputState::Empty,
            in_flight: 0,
            last_result: None,
            chain: None,
            history: Vec::new(),
            selected_history: 0,
            latencies: Vec::new(),
            status: None,
            pending_queries: Vec::new(),
            pending_refresh: false,
            pending_clear: false,
            pending_export: false,
        }
    }

    // ----- notifications -----

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        self.expire_status(Instant::now());
    }

    fn expire_status(&mut self, now: Instant) {
        if let Some(status) = self.status.as_ref() {
            if now.saturating_duration_since(status.since) > status.level.ttl() {
                self.status = None;
            }
        }
    }

    // ----- input -----

    pub fn push_char(&mut self, ch: char) {
        if ch.is_whitespace() {
            return;
        }
        self.input.push(ch);
        self.revalidate();
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
        self.revalidate();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.revalidate();
    }

    /// Replace the input (paste, quick query). Surrounding whitespace is dropped.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.trim().to_string();
        self.revalidate();
    }

    /// Recompute validity; returns the new state when it changed
    fn revalidate(&mut self) -> Option<InputState> {
        let next = if self.input.is_empty() {
            InputState::Empty
        } else if Address::is_valid(&self.input) {
            InputState::Valid
        } else {
            InputState::Invalid
        };
        if next == self.input_state {
            return None;
        }
        self.input_state = next;
        Some(next)
    }

    pub fn can_query(&self) -> bool {
        self.input_state == InputState::Valid
    }

    // ----- actions -----

    /// Enter: query the input, or re-query the selected quick entry
    pub fn submit(&mut self) {
        match self.focus {
            Focus::Input => {
                if self.can_query() {
                    let address = self.input.clone();
                    self.enqueue_query(address);
                } else if self.input_state == InputState::Invalid {
                    self.set_status("Enter 0x followed by 40 hex digits", StatusLevel::Warn);
                }
            }
            Focus::History => {
                if let Some(entry) = self.selected_entry() {
                    let address = entry.address.clone();
                    self.set_input(&address);
                    self.enqueue_query(address);
                }
            }
        }
    }

    fn enqueue_query(&mut self, address: String) {
        self.in_flight += 1;
        self.pending_queries.push(address);
    }

    pub fn request_refresh(&mut self) {
        self.pending_refresh = true;
        self.set_status("Refreshing chain status…", StatusLevel::Info);
    }

    pub fn request_clear_history(&mut self) {
        self.pending_clear = true;
    }

    pub fn request_export(&mut self) {
        if self.history.is_empty() {
            self.set_status("No history to export", StatusLevel::Warn);
        } else {
            self.pending_export = true;
        }
    }

    pub fn take_query_requests(&mut self) -> Vec<String> {
        mem::take(&mut self.pending_queries)
    }

    pub fn take_refresh_request(&mut self) -> bool {
        mem::take(&mut self.pending_refresh)
    }

    pub fn take_clear_request(&mut self) -> bool {
        mem::take(&mut self.pending_clear)
    }

    pub fn take_export_request(&mut self) -> bool {
        mem::take(&mut self.pending_export)
    }

    /// Text for the copy key: the address of the last result
    pub fn copy_target(&self) -> Option<String> {
        self.last_result
            .as_ref()
            .map(|result| result.address.as_str().to_string())
    }

    // ----- focus & selection -----

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input if !self.quick_entries().is_empty() => Focus::History,
            _ => Focus::Input,
        };
    }

    pub fn quick_entries(&self) -> &[HistoryEntry] {
        let len = self.history.len().min(QUICK_QUERY_COUNT);
        &self.history[..len]
    }

    pub fn selected_entry(&self) -> Option<&HistoryEntry> {
        self.quick_entries().get(self.selected_history)
    }

    pub fn move_selection_up(&mut self) {
        self.selected_history = self.selected_history.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let len = self.quick_entries().len();
        if self.selected_history + 1 < len {
            self.selected_history += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.quick_entries().len();
        if len == 0 {
            self.selected_history = 0;
            if self.focus == Focus::History {
                self.focus = Focus::Input;
            }
        } else if self.selected_history >= len {
            self.selected_history = len - 1;
        }
    }

    // ----- runtime events -----

    pub fn apply_query_completed(&mut self, result: BalanceQueryResult) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.latencies.push(result.latency_ms);
        if self.latencies.len() > LATENCY_SAMPLES {
            let excess = self.latencies.len() - LATENCY_SAMPLES;
            self.latencies.drain(..excess);
        }
        self.set_status(
            format!("Balance loaded in {} ms", result.latency_ms),
            StatusLevel::Success,
        );
        self.last_result = Some(result);
    }

    pub fn apply_query_failed(&mut self, address: &str, message: &str) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.set_status(
            format!("Query for {} failed: {}", crate::ui::format::short_address(address, 4), message),
            StatusLevel::Error,
        );
    }

    pub fn apply_status(&mut self, status: ChainStatus) {
        self.chain = Some(status);
    }

    pub fn apply_history(&mut self, entries: Vec<HistoryEntry>) {
        self.history = entries;
        self.clamp_selection();
    }

    pub fn apply_warning(&mut self, message: String) {
        self.set_status(message, StatusLevel::Warn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use chrono::Utc;

    const ADDR: &str = "0x0000000000000000000000000000000000000000";

    fn app() -> App {
        App::new("https://rpc.example", 841, "Taraxa Mainnet")
    }

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            address: format!("0x{:040x}", n),
            balance_decimal: n as f64,
            queried_at: Utc::now(),
        }
    }

    fn result(latency_ms: u64) -> BalanceQueryResult {
        BalanceQueryResult {
            address: Address::parse(ADDR).unwrap(),
            balance_wei: U256::ZERO,
            balance_decimal: 0.0,
            latency_ms,
            queried_at: Utc::now(),
        }
    }

    #[test]
    fn test_input_validation_follows_typing() {
        let mut app = app();
        assert_eq!(app.input_state, InputState::Empty);

        app.push_char('0');
        app.push_char('x');
        assert_eq!(app.input_state, InputState::Invalid);

        for _ in 0..40 {
            app.push_char('a');
        }
        assert_eq!(app.input_state, InputState::Valid);
        assert!(app.can_query());

        app.push_char('b');
        assert_eq!(app.input_state, InputState::Invalid);
        app.pop_char();
        assert_eq!(app.input_state, InputState::Valid);

        app.clear_input();
        assert_eq!(app.input_state, InputState::Empty);
    }

    #[test]
    fn test_revalidate_reports_only_changes() {
        let mut app = app();
        app.input = "0x1".into();
        assert_eq!(app.revalidate(), Some(InputState::Invalid));
        app.input = "0x12".into();
        assert_eq!(app.revalidate(), None);
        app.input = ADDR.into();
        assert_eq!(app.revalidate(), Some(InputState::Valid));
    }

    #[test]
    fn test_submit_invalid_does_not_query() {
        let mut app = app();
        app.set_input("0x123");
        app.submit();

        assert!(app.take_query_requests().is_empty());
        assert_eq!(app.in_flight, 0);
        assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Warn));
    }

    #[test]
    fn test_submit_valid_queues_query() {
        let mut app = app();
        app.set_input(&format!("  {ADDR} "));
        app.submit();
        app.submit();

        assert_eq!(app.in_flight, 2);
        assert_eq!(app.take_query_requests(), vec![ADDR.to_string(), ADDR.to_string()]);
        assert!(app.take_query_requests().is_empty());

        app.apply_query_completed(result(40));
        app.apply_query_failed(ADDR, "rpc error: rate limited");
        assert_eq!(app.in_flight, 0);
        assert_eq!(app.latencies, vec![40]);
        let (text, level) = app.status_text().unwrap();
        assert_eq!(level, StatusLevel::Error);
        assert!(text.ends_with("rate limited"));
    }

    #[test]
    fn test_quick_query_reuses_history_address() {
        let mut app = app();
        app.apply_history((1..=8).map(entry).collect());
        assert_eq!(app.quick_entries().len(), QUICK_QUERY_COUNT);

        app.cycle_focus();
        assert_eq!(app.focus, Focus::History);
        for _ in 0..10 {
            app.move_selection_down();
        }
        assert_eq!(app.selected_history, QUICK_QUERY_COUNT - 1);
        app.move_selection_up();

        app.submit();
        let expected = entry(5).address;
        assert_eq!(app.take_query_requests(), vec![expected.clone()]);
        assert_eq!(app.input, expected);
        assert_eq!(app.input_state, InputState::Valid);
    }

    #[test]
    fn test_history_shrink_clamps_selection() {
        let mut app = app();
        app.apply_history((1..=4).map(entry).collect());
        app.cycle_focus();
        app.selected_history = 3;

        app.apply_history(vec![entry(1)]);
        assert_eq!(app.selected_history, 0);

        app.apply_history(Vec::new());
        assert_eq!(app.focus, Focus::Input);
        assert!(app.selected_entry().is_none());
    }

    #[test]
    fn test_focus_stays_on_input_without_history() {
        let mut app = app();
        app.cycle_focus();
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_notifications_expire_by_level() {
        let mut app = app();
        let now = Instant::now();

        app.set_status("ok", StatusLevel::Success);
        app.expire_status(now + Duration::from_secs(2));
        assert!(app.status_text().is_some());
        app.expire_status(now + Duration::from_secs(4));
        assert!(app.status_text().is_none());

        app.set_status("bad", StatusLevel::Error);
        app.expire_status(now + Duration::from_secs(4));
        assert!(app.status_text().is_some());
        app.expire_status(now + Duration::from_secs(6));
        assert!(app.status_text().is_none());
    }

    #[test]
    fn test_latency_samples_are_bounded() {
        let mut app = app();
        for ms in 0..(LATENCY_SAMPLES as u64 + 5) {
            app.in_flight += 1;
            app.apply_query_completed(result(ms));
        }
        assert_eq!(app.latencies.len(), LATENCY_SAMPLES);
        assert_eq!(app.latencies[0], 5);
        assert_eq!(app.copy_target().as_deref(), Some(ADDR));
    }

    #[test]
    fn test_export_requires_history() {
        let mut app = app();
        app.request_export();
        assert!(!app.take_export_request());

        app.apply_history(vec![entry(1)]);
        app.request_export();
        assert!(app.take_export_request());
        assert!(!app.take_export_request());
    }
}
