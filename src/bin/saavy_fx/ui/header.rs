//! Header bar - effect, stream format, source and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::UiStateInit;
use crate::source::SourceKind;

pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }

    fn peak_db(&self) -> f32 {
        20.0 * self.peak.max(1e-6).log10()
    }
}

pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    init: &UiStateInit,
    source: SourceKind,
    bypass: bool,
    stats: &AudioStats,
) {
    let block = Block::default().title(" saavy-fx ").borders(Borders::ALL);

    let (state_label, state_color) = if bypass {
        ("BYPASS", Color::Yellow)
    } else {
        ("ACTIVE", Color::Green)
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {}  ", init.effect_name),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("{state_label}  "), Style::default().fg(state_color)),
        Span::styled(
            format!("source: {}  ", source.label()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz x{}  ", init.sample_rate / 1000.0, init.channels),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "Peak: {:.2} ({:.1} dB)  RMS: {:.2}",
                stats.peak,
                stats.peak_db(),
                stats.rms
            ),
            Style::default().fg(if stats.peak >= 1.0 {
                Color::Red
            } else {
                Color::Magenta
            }),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
