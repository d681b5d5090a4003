mod sparkline;

use ratatui::style::Color;

use crate::ui::format::LatencyBand;

pub use sparkline::LatencySparkline;

pub fn band_color(band: LatencyBand) -> Color {
    match band {
        LatencyBand::Offline => Color::LightRed,
        LatencyBand::Online | LatencyBand::Good => Color::LightGreen,
        LatencyBand::Fair => Color::LightYellow,
        LatencyBand::Slow => Color::Rgb(255, 165, 0),
    }
}
