pub mod charting;

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    engine::{Remaining, SessionEngine, SessionSummary},
    mission::Mission,
    report::{problem_keys, CharBreakdown, PROBLEM_KEY_LIMIT},
    session::{CharState, Status},
    time_series::WpmSample,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Everything a frame needs, borrowed from the running app.
pub struct View<'a> {
    engine: &'a SessionEngine,
    now: Instant,
    mission: Option<&'a Mission>,
    next_mission: Option<&'a Mission>,
}

impl<'a> View<'a> {
    pub fn new(engine: &'a SessionEngine, now: Instant) -> Self {
        Self {
            engine,
            now,
            mission: None,
            next_mission: None,
        }
    }

    pub fn with_mission(mut self, current: &'a Mission, next: Option<&'a Mission>) -> Self {
        self.mission = Some(current);
        self.next_mission = next;
        self
    }

    fn render_typing(&self, area: Rect, buf: &mut Buffer) {
        let engine = self.engine;
        let session = engine.session();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = bold_style.fg(Color::Green);
        let red_bold_style = bold_style.fg(Color::Red);
        let dim_bold_style = bold_style.add_modifier(Modifier::DIM);
        let underlined_dim_bold_style = dim_bold_style.add_modifier(Modifier::UNDERLINED);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_width = session.text_string().as_str().width();
        let prompt_occupied_lines = if prompt_width <= max_chars_per_line as usize {
            1
        } else {
            ((prompt_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
        };
        let padding = area.height.saturating_sub(prompt_occupied_lines + 3) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(2),
                Constraint::Length(prompt_occupied_lines),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let stats = engine.stats();
        let counter = match engine.remaining(self.now) {
            Remaining::Seconds(s) => format!("{s}s"),
            Remaining::Words(w) => format!("{w} words left"),
            Remaining::Elapsed(s) => format!("{s}s"),
        };
        let header = if session.status() == Status::Idle {
            format!("{counter}   start typing")
        } else {
            format!("{counter}   {} wpm   {}% acc", stats.wpm, stats.accuracy)
        };
        Paragraph::new(Span::styled(header, dim_bold_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let cursor = session.cursor();
        let spans: Vec<Span> = session
            .text()
            .iter()
            .zip(session.char_states())
            .enumerate()
            .map(|(idx, (c, state))| match state {
                CharState::Correct => Span::styled(c.to_string(), green_bold_style),
                CharState::Incorrect => Span::styled(
                    match *c {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    red_bold_style,
                ),
                CharState::Unset if idx == cursor => {
                    Span::styled(c.to_string(), underlined_dim_bold_style)
                }
                CharState::Unset => Span::styled(c.to_string(), dim_bold_style),
            })
            .collect();

        Paragraph::new(Line::from(spans))
            .alignment(if prompt_occupied_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);

        Paragraph::new(Span::styled(
            "(tab) new text / (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .render(chunks[4], buf);
    }

    fn render_results(&self, summary: &SessionSummary, area: Rect, buf: &mut Buffer) {
        let session = self.engine.session();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(1),    // chart
                Constraint::Length(1), // stats
                Constraint::Length(1), // characters
                Constraint::Length(1), // problem keys
                Constraint::Length(1), // mission
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ])
            .split(area);

        let samples = session.samples();
        let wpm_points: Vec<(f64, f64)> = samples.iter().map(WpmSample::wpm_point).collect();
        let raw_points: Vec<(f64, f64)> = samples.iter().map(WpmSample::raw_point).collect();
        let (overall_duration, highest_wpm) =
            charting::chart_bounds(samples, summary.duration_secs);

        let datasets = vec![
            Dataset::default()
                .name("raw")
                .marker(Marker::Braille)
                .style(Style::default().fg(Color::DarkGray))
                .graph_type(GraphType::Line)
                .data(&raw_points),
            Dataset::default()
                .name("wpm")
                .marker(Marker::Braille)
                .style(Style::default().fg(Color::Magenta))
                .graph_type(GraphType::Line)
                .data(&wpm_points),
        ];

        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("seconds")
                    .bounds([0.0, overall_duration])
                    .labels(vec![
                        Span::styled("0", bold_style),
                        Span::styled(charting::format_label(overall_duration), bold_style),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("wpm")
                    .bounds([0.0, highest_wpm])
                    .labels(vec![
                        Span::styled("0", bold_style),
                        Span::styled(charting::format_label(highest_wpm), bold_style),
                    ]),
            )
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            format!(
                "{} wpm   {} raw   {}% acc   {}% consistency   {}s",
                summary.wpm,
                summary.raw_wpm,
                summary.accuracy,
                summary.consistency,
                charting::format_label(summary.duration_secs.round())
            ),
            bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        Paragraph::new(format!("characters {}", CharBreakdown::of(session)))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let keys = problem_keys(session.errors(), PROBLEM_KEY_LIMIT);
        let problem_line = if keys.is_empty() {
            "Perfect! No errors.".to_string()
        } else {
            let listed: Vec<String> = keys.iter().map(|(k, n)| format!("{k} ×{n}")).collect();
            format!("problem keys: {}", listed.join("   "))
        };
        Paragraph::new(Span::styled(
            problem_line,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        if let Some(mission) = self.mission {
            let next = match self.next_mission {
                Some(next) => format!("{} done, next up: {}", mission.name, next.name),
                None => format!("{} done, that was the last mission", mission.name),
            };
            Paragraph::new(next)
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center)
                .render(chunks[4], buf);
        }

        let legend = match (self.mission, self.next_mission) {
            (Some(_), Some(_)) => "(r)etry / (n)ext mission / (esc)ape",
            (Some(_), None) => "(r)etry / (esc)ape",
            (None, _) => "(r)etry / (n)ew / (esc)ape",
        };
        Paragraph::new(Span::styled(legend, italic_style)).render(chunks[6], buf);
    }
}

impl Widget for &View<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.engine.summary() {
            Some(summary) => self.render_results(summary, area, buf),
            None => self.render_typing(area, buf),
        }
    }
}
