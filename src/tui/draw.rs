//! All drawing / rendering functions.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Gauge, Padding, Paragraph, Wrap};

use crate::format::format_duration;
use crate::input::TextInput;
use crate::state::{Screen, Selection, Session};

const MAX_WIDTH: u16 = 80;
const MAX_HEIGHT: u16 = 20;
const GAUGE_WIDTH: u16 = 50;
const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

const BORDER: Color = Color::Indexed(62);
const ACCENT: Color = Color::Indexed(205);
const INFO: Color = Color::Indexed(241);
const ERROR: Color = Color::Indexed(196);
const SUCCESS: Color = Color::Indexed(46);
const SPINNER_COLOR: Color = Color::Indexed(69);

pub fn draw(frame: &mut Frame, session: &Session) {
    let area = container_rect(frame.area());
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .padding(Padding::new(2, 2, 1, 1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match session.screen() {
        Screen::Menu => draw_menu(frame, session, inner),
        Screen::UrlInput => draw_url_input(frame, session, inner),
        Screen::FetchingMetadata => draw_fetching(frame, session, inner),
        Screen::QualitySelection => draw_quality(frame, session, inner),
        Screen::Downloading => draw_downloading(frame, session, inner),
        Screen::Done => draw_done(frame, inner),
        Screen::Failed => draw_failed(frame, session, inner),
    }
}

fn title(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        format!(" {text} "),
        Style::default()
            .fg(ACCENT)
            .bg(BORDER)
            .add_modifier(Modifier::BOLD),
    ))
}

fn info(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(INFO)))
}

fn spinner(session: &Session) -> Span<'static> {
    Span::styled(
        SPINNER[session.spinner() % SPINNER.len()],
        Style::default().fg(SPINNER_COLOR),
    )
}

fn list_lines<T>(selection: &Selection<T>, label: impl Fn(&T) -> &str) -> Vec<Line<'_>> {
    selection
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if i == selection.cursor() {
                Line::from(Span::styled(
                    format!("  > {}", label(item)),
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("    {}", label(item)))
            }
        })
        .collect()
}

fn draw_menu(frame: &mut Frame, session: &Session, area: Rect) {
    let mut lines = vec![title("GRAB MEDIA DOWNLOADER"), Line::default()];
    lines.extend(list_lines(session.menu(), |action| action.label()));
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_url_input(frame: &mut Frame, session: &Session, area: Rect) {
    let mode = session.choice().map_or("", |choice| choice.label());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(2), // Mode
            Constraint::Length(1), // Input
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(title("ENTER URL")), chunks[0]);
    frame.render_widget(Paragraph::new(info(format!("Mode: {mode}"))), chunks[1]);
    draw_text_input(frame, session.url(), chunks[2]);
}

fn draw_text_input(frame: &mut Frame, input: &TextInput, area: Rect) {
    let prompt = Span::styled(TextInput::PROMPT, Style::default().fg(ACCENT));
    let prompt_width = u16::try_from(prompt.width()).unwrap_or(u16::MAX);
    let field_width = usize::from(area.width.saturating_sub(prompt_width));

    let (line, cursor_offset) = if input.value().is_empty() {
        let placeholder = Span::styled(TextInput::PLACEHOLDER, Style::default().fg(INFO));
        (Line::from(vec![prompt, placeholder]), 0)
    } else {
        let (visible, offset) = scroll_to_cursor(input.value(), input.cursor(), field_width);
        (Line::from(vec![prompt, Span::raw(visible)]), offset)
    };
    frame.render_widget(Paragraph::new(line), area);

    let x = area
        .x
        .saturating_add(prompt_width)
        .saturating_add(u16::try_from(cursor_offset).unwrap_or(u16::MAX))
        .min(area.right().saturating_sub(1));
    frame.set_cursor_position((x, area.y));
}

/// Drops leading characters until the cursor fits in `width` columns.
/// Returns the visible text and the cursor's column within it.
fn scroll_to_cursor(value: &str, cursor: usize, width: usize) -> (String, usize) {
    let chars: Vec<char> = value.chars().collect();
    let cursor = cursor.min(chars.len());
    let columns = |range: &[char]| Span::raw(range.iter().collect::<String>()).width();

    let mut start = 0;
    while start < cursor && columns(&chars[start..cursor]) >= width.max(1) {
        start += 1;
    }
    (
        chars[start..].iter().collect(),
        columns(&chars[start..cursor]),
    )
}

fn draw_fetching(frame: &mut Frame, session: &Session, area: Rect) {
    let lines = vec![
        Line::default(),
        Line::from(vec![
            spinner(session),
            Span::raw(" Fetching video information..."),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_quality(frame: &mut Frame, session: &Session, area: Rect) {
    let mut lines = vec![title("SELECT QUALITY"), Line::default()];
    if let Some(metadata) = session.metadata() {
        lines.push(info(format!("Video: {}", metadata.title)));
        lines.push(info(format!("Uploader: {}", metadata.uploader)));
        if metadata.duration > 0 {
            lines.push(info(format!(
                "Duration: {}",
                format_duration(metadata.duration)
            )));
        }
    }
    lines.push(Line::default());
    lines.extend(list_lines(session.qualities(), |mode| mode.label()));
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_downloading(frame: &mut Frame, session: &Session, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(2), // Source
            Constraint::Length(2), // Gauge
            Constraint::Length(2), // Spinner
            Constraint::Length(1), // Stats
            Constraint::Min(0),
        ])
        .split(area);

    let source = session.metadata().map_or("", |m| m.title.as_str());
    frame.render_widget(Paragraph::new(title("DOWNLOADING")), chunks[0]);
    frame.render_widget(
        Paragraph::new(info(format!("Source: {source}"))),
        chunks[1],
    );

    let ratio = session.bar().shown().clamp(0.0, 1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = (ratio * 100.0).round() as u16;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(ACCENT).bg(Color::DarkGray))
        .ratio(ratio)
        .label(format!("{pct}%"));
    let gauge_area = Rect {
        width: chunks[2].width.min(GAUGE_WIDTH),
        height: 1,
        ..chunks[2]
    };
    frame.render_widget(gauge, gauge_area);

    frame.render_widget(
        Paragraph::new(Line::from(vec![spinner(session), Span::raw(" Downloading...")])),
        chunks[3],
    );

    let stats = session.stats();
    let separator = Span::styled("  |  ", Style::default().fg(INFO));
    let stats_line = Line::from(vec![
        Span::styled(format!("ETA: {}", stats.eta), Style::default().fg(INFO)),
        separator.clone(),
        Span::styled(format!("Speed: {}", stats.speed), Style::default().fg(INFO)),
        separator,
        Span::styled(
            format!("Size: {}", stats.total_size),
            Style::default().fg(INFO),
        ),
    ]);
    frame.render_widget(Paragraph::new(stats_line), chunks[4]);
}

fn draw_done(frame: &mut Frame, area: Rect) {
    let style = Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::default(),
        Line::from(Span::styled("✨ Done! File saved to current folder.", style)),
        Line::from(Span::styled("(Press any key to exit)", style)),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_failed(frame: &mut Frame, session: &Session, area: Rect) {
    let style = Style::default().fg(ERROR).add_modifier(Modifier::BOLD);
    let error = session.error().unwrap_or("unknown error");
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(format!("❌ Error: {error}"), style)),
        Line::from(Span::styled("(Press any key to exit)", style)),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

/// Centred container, at most 80x20 and inset from the terminal edges.
fn container_rect(area: Rect) -> Rect {
    let width = area.width.saturating_sub(4).min(MAX_WIDTH);
    let height = area.height.saturating_sub(4).min(MAX_HEIGHT);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
