//! Single-line latency sparkline, each bar colored by its latency band

use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

use crate::ui::format::LatencyBand;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub struct LatencySparkline<'a> {
    samples: &'a [u64],
}

impl<'a> LatencySparkline<'a> {
    pub fn new(samples: &'a [u64]) -> Self {
        Self { samples }
    }

    /// The samples that fit in `width`, newest last
    fn visible(&self, width: usize) -> &'a [u64] {
        let start = self.samples.len().saturating_sub(width);
        &self.samples[start..]
    }
}

/// Bar height 0..=7 relative to the largest visible sample
fn bar_index(value: u64, max: u64) -> usize {
    let max = max.max(1);
    (((value as f64 / max as f64) * 7.0).round() as usize).min(7)
}

impl<'a> Widget for LatencySparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let visible = self.visible(area.width as usize);
        let max = visible.iter().copied().max().unwrap_or(1);

        for (i, &ms) in visible.iter().enumerate() {
            let color = super::band_color(LatencyBand::from_latency(ms));
            buf.get_mut(area.x + i as u16, area.y)
                .set_char(BARS[bar_index(ms, max)])
                .set_style(Style::default().fg(color));
        }
    }
}
