//! TUI for saavy-fx
//!
//! Parameter editing on the left, live scope and spectrum of the output
//! on the right. All communication with the audio thread goes through
//! lock-free rtrb queues.

mod header;
mod params;
mod spectrum;
pub mod state;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::time::Duration;

pub use state::{ControlMessage, UiStateInit};

use crate::source::SourceKind;
use header::{render_header, AudioStats};
use params::{render_params, step_for};
use spectrum::{render_spectrum, SpectrumAnalyzer};
use waveform::render_waveform;

/// Scope length, also the FFT size.
const VIS_BUFFER_SIZE: usize = 1024;

pub struct UiApp {
    scope_rx: Consumer<f32>,
    control_tx: Producer<ControlMessage>,
    init: UiStateInit,
    values: Vec<f32>,
    selected: usize,
    source: SourceKind,
    bypass: bool,
    scope: Vec<f32>,
    analyzer: SpectrumAnalyzer,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        scope_rx: Consumer<f32>,
        control_tx: Producer<ControlMessage>,
        init: UiStateInit,
    ) -> Self {
        Self {
            scope_rx,
            control_tx,
            values: init.values.clone(),
            selected: 0,
            source: init.source,
            bypass: false,
            scope: vec![0.0; VIS_BUFFER_SIZE],
            analyzer: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, init.sample_rate),
            init,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn poll_scope(&mut self) {
        let before = self.scope.len();
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
        }
        if self.scope.len() == before {
            return;
        }
        let excess = self.scope.len().saturating_sub(VIS_BUFFER_SIZE);
        self.scope.drain(0..excess);
        self.analyzer.update(&self.scope);
    }

    fn send(&mut self, message: ControlMessage) {
        // Dropped only if the audio thread has stalled; the next edit resends
        let _ = self.control_tx.push(message);
    }

    fn nudge(&mut self, direction: f32) {
        let Some(range) = self.init.ranges.get(self.selected).copied() else {
            return;
        };
        let Some(value) = self.values.get_mut(self.selected) else {
            return;
        };
        *value = range.clamp(*value + direction * step_for(&range));
        let message = ControlMessage::SetParam {
            index: self.selected,
            value: *value,
        };
        self.send(message);
    }

    fn restore_default(&mut self) {
        let Some(range) = self.init.ranges.get(self.selected).copied() else {
            return;
        };
        if let Some(value) = self.values.get_mut(self.selected) {
            *value = range.default;
        }
        self.send(ControlMessage::SetParam {
            index: self.selected,
            value: range.default,
        });
    }

    fn handle_key(&mut self, key: KeyCode) {
        let count = self.init.ranges.len().max(1);
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => self.selected = (self.selected + count - 1) % count,
            KeyCode::Down => self.selected = (self.selected + 1) % count,
            KeyCode::Left => self.nudge(-1.0),
            KeyCode::Right => self.nudge(1.0),
            KeyCode::Char('d') => self.restore_default(),
            KeyCode::Char('b') => {
                self.bypass = !self.bypass;
                self.send(ControlMessage::Bypass(self.bypass));
            }
            KeyCode::Char('f') => self.send(ControlMessage::Flush),
            KeyCode::Char('s') => {
                self.source = self.source.next();
                self.send(ControlMessage::Source(self.source));
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(8),    // Body
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(46), Constraint::Min(20)])
            .split(rows[1]);

        let views = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        let stats = AudioStats::from_buffer(&self.scope);
        render_header(frame, rows[0], &self.init, self.source, self.bypass, &stats);
        render_params(frame, columns[0], &self.init.ranges, &self.values, self.selected);
        render_waveform(frame, views[0], &self.scope);
        render_spectrum(frame, views[1], self.analyzer.data());

        let help = Paragraph::new(
            " [↑↓] Select  [←→] Adjust  [D] Default  [B] Bypass  [F] Flush  [S] Source  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[2]);
    }
}
