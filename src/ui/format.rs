//! Text formatting shared by the TUI and the CLI tables

use chrono::{DateTime, Utc};

use crate::domain::ChainStatus;

/// `0x1234...abcd` style shortening. Strings too short to shorten are
/// returned unchanged.
pub fn short_address(addr: &str, chars: usize) -> String {
    if addr.len() <= chars * 2 + 2 {
        return addr.to_string();
    }
    match (addr.get(..chars + 2), addr.get(addr.len() - chars..)) {
        (Some(head), Some(tail)) => format!("{head}...{tail}"),
        _ => addr.to_string(),
    }
}

pub fn format_balance(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// K / M / B suffixes with two decimals
pub fn abbreviate(value: f64) -> String {
    const UNITS: [(f64, &str); 3] = [(1e9, "B"), (1e6, "M"), (1e3, "K")];
    for (scale, suffix) in UNITS {
        if value >= scale {
            return format!("{:.2}{}", value / scale, suffix);
        }
    }
    format!("{value:.2}")
}

/// Relative age, falling back to a calendar date after 30 days
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} min ago")
    } else if hours < 24 {
        format!("{hours} h ago")
    } else if days < 30 {
        format!("{days} d ago")
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyBand {
    Offline,
    /// Connected, latency unknown
    Online,
    Good,
    Fair,
    Slow,
}

impl LatencyBand {
    pub fn from_status(status: &ChainStatus) -> Self {
        if !status.connected {
            return LatencyBand::Offline;
        }
        status
            .latency_ms
            .map_or(LatencyBand::Online, LatencyBand::from_latency)
    }

    pub fn from_latency(ms: u64) -> Self {
        match ms {
            0..=99 => LatencyBand::Good,
            100..=499 => LatencyBand::Fair,
            _ => LatencyBand::Slow,
        }
    }
}

/// Connectivity text for the header and `status` subcommand
pub fn network_label(status: &ChainStatus) -> (String, LatencyBand) {
    let band = LatencyBand::from_status(status);
    let text = match (band, status.latency_ms) {
        (LatencyBand::Offline, _) => "offline".to_string(),
        (_, Some(ms)) => format!("online ({ms}ms)"),
        (_, None) => "online".to_string(),
    };
    (text, band)
}

/// Thousands separators for block heights
pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
