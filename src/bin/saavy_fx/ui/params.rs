//! Parameter list - one row per host slot with a fill bar

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use saavy_fx::ParamRange;

const BAR_WIDTH: usize = 16;

/// Slots with a small whole-number span are choices or counts and move
/// one unit per key press. Everything else moves in 2% steps.
pub fn step_for(range: &ParamRange) -> f32 {
    let span = range.max - range.min;
    let whole = range.min.fract() == 0.0 && range.default.fract() == 0.0;
    if whole && span <= 16.0 {
        1.0
    } else {
        span / 50.0
    }
}

fn bar(range: &ParamRange, value: f32) -> String {
    let span = (range.max - range.min).max(f32::EPSILON);
    let filled = (((value - range.min) / span) * BAR_WIDTH as f32).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "·".repeat(BAR_WIDTH - filled))
}

pub fn render_params(
    frame: &mut Frame,
    area: Rect,
    ranges: &[ParamRange],
    values: &[f32],
    selected: usize,
) {
    let block = Block::default().title(" Parameters ").borders(Borders::ALL);

    let lines: Vec<Line> = ranges
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (range, &value))| {
            let style = if i == selected {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(format!(" {:<13}", range.name), style),
                Span::styled(format!(" {} ", bar(range, value)), Style::default().fg(Color::Cyan)),
                Span::styled(format!("{value:>9.2}"), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_slots_step_by_one() {
        assert_eq!(step_for(&ParamRange::new("topology", 0.0, 2.0, 0.0)), 1.0);
        assert!((step_for(&ParamRange::new("mix", 0.0, 1.0, 0.3)) - 0.02).abs() < 1e-6);
        assert!((step_for(&ParamRange::new("time_ms", 1.0, 2_000.0, 350.0)) - 39.98).abs() < 1e-3);
    }

    #[test]
    fn test_bar_fill() {
        let range = ParamRange::new("mix", 0.0, 1.0, 0.5);
        assert_eq!(bar(&range, 0.0).chars().filter(|&c| c == '█').count(), 0);
        assert_eq!(bar(&range, 0.5).chars().filter(|&c| c == '█').count(), BAR_WIDTH / 2);
        assert_eq!(bar(&range, 1.0).chars().filter(|&c| c == '█').count(), BAR_WIDTH);
    }
}
