mod theme;

use crate::app::AppModel;
use crate::domain::{ElementName, LogLine};
use ratatui::prelude::*;
use ratatui::widgets::*;
use unicode_width::UnicodeWidthStr;

const HIGHLIGHTED_ELEMENTS: [ElementName; 3] = [
    ElementName::Author,
    ElementName::Datetime,
    ElementName::Message,
];

pub fn render(frame: &mut Frame, model: &AppModel) {
    let full_area = frame.area();
    if full_area.width == 0 || full_area.height == 0 {
        return;
    }

    let (log_area, footer_area) = if full_area.height > 1 {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(full_area);
        (chunks[0], Some(chunks[1]))
    } else {
        (full_area, None)
    };

    render_log(frame, log_area, model);
    if let Some(area) = footer_area {
        render_footer(frame, area, model);
    }
}

fn render_log(frame: &mut Frame, area: Rect, model: &AppModel) {
    let highlighted = model.highlighted_line_indices();
    let log_lines = model.log().lines();
    let lines: Vec<Line> = log_lines
        .iter()
        .enumerate()
        .map(|(index, line)| styled_log_line(line, highlighted.contains(&index)))
        .collect();

    let offset = scroll_offset(highlighted, log_lines.len(), area.height as usize);
    let scroll = u16::try_from(offset).unwrap_or(u16::MAX);
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);
}

fn render_footer(frame: &mut Frame, area: Rect, model: &AppModel) {
    let base_style = Style::default().fg(Color::White).bg(theme::BAR_BG);
    let hint_style = Style::default().fg(theme::MUTED).bg(theme::BAR_BG);

    let hint = " ↑/↓ move  enter goto  esc cancel";
    let current = if model.cursor() == model.initial_checkout() {
        " (current)"
    } else {
        ""
    };
    let position = format!(
        "{}/{}{current} ",
        model.cursor() + 1,
        model.log().entries().len()
    );
    let used_width = UnicodeWidthStr::width(hint) + UnicodeWidthStr::width(position.as_str());
    let remaining = (area.width as usize).saturating_sub(used_width);

    let spans = vec![
        Span::styled(hint.to_string(), hint_style),
        Span::styled(" ".repeat(remaining), base_style),
        Span::styled(position, base_style),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)).style(base_style), area);
}

/// First visible row: keeps the highlighted entry on screen, roughly centered.
fn scroll_offset(highlighted: &[usize], total_lines: usize, height: usize) -> usize {
    if height == 0 || total_lines <= height {
        return 0;
    }
    let Some(&first) = highlighted.first() else {
        return 0;
    };
    let last = highlighted.last().copied().unwrap_or(first);
    let span = last - first + 1;
    let max_offset = total_lines - height;
    first
        .saturating_sub(height.saturating_sub(span) / 2)
        .min(max_offset)
}

fn styled_log_line(line: &LogLine, is_highlighted: bool) -> Line<'static> {
    let chars: Vec<char> = line.text.chars().collect();
    let mut styles = vec![Style::default().fg(theme::FG); chars.len()];

    if is_highlighted {
        for name in HIGHLIGHTED_ELEMENTS {
            if let Some(element) = line.element(name) {
                paint(&mut styles, &element.columns, Style::default().fg(theme::HIGHLIGHT));
            }
        }
    }
    if let Some(commit) = line.element(ElementName::Commit) {
        let style = if line.is_in_trunk {
            Style::default().fg(theme::COMMIT_TRUNK)
        } else {
            Style::default()
                .fg(theme::COMMIT_FORK)
                .add_modifier(Modifier::BOLD)
        };
        paint(&mut styles, &commit.columns, style);
    }
    if let Some(bookmark) = line.element(ElementName::Bookmark) {
        paint(&mut styles, &bookmark.columns, Style::default().fg(theme::BOOKMARK));
    }

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut start = 0usize;
    for end in 1..=chars.len() {
        if end == chars.len() || styles[end] != styles[start] {
            let text: String = chars[start..end].iter().collect();
            spans.push(Span::styled(text, styles[start]));
            start = end;
        }
    }
    Line::from(spans)
}

fn paint(styles: &mut [Style], columns: &std::ops::Range<usize>, style: Style) {
    let end = columns.end.min(styles.len());
    for slot in styles.iter_mut().take(end).skip(columns.start) {
        *slot = style;
    }
}
