use crate::config::Config;
use crate::models::{LogEntry, Urgency};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils::fmt_date;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Normal => Color::Gray,
        Urgency::Caution => Color::Yellow,
        Urgency::Urgent => Color::Red,
    }
}

/// One list row: date, job, writer, first work item, and issue markers
fn entry_line(entry: &LogEntry, fg: Color) -> Line<'static> {
    let mut spans = vec![
        Span::styled(fmt_date(&entry.date), Style::default().fg(fg)),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", entry.job),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(entry.writer.clone(), Style::default().fg(fg)),
    ];
    if let Some(first) = entry.work_items.first() {
        let mut content = first.content.clone();
        if content.chars().count() > 24 {
            content = content.chars().take(24).collect::<String>() + "…";
        }
        spans.push(Span::styled(
            format!("  {}", content),
            Style::default().fg(fg).add_modifier(Modifier::DIM),
        ));
        if entry.work_items.len() > 1 {
            spans.push(Span::styled(
                format!(" (+{})", entry.work_items.len() - 1),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    if entry.has_issue {
        spans.push(Span::styled(
            format!("  ⚠ {}", entry.urgency.label()),
            Style::default()
                .fg(urgency_color(entry.urgency))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", entry.status.label()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if entry.need_report {
        spans.push(Span::styled(
            " 보고".to_string(),
            Style::default().fg(Color::Magenta),
        ));
    }
    Line::from(spans)
}

pub fn render_entry_list(
    f: &mut Frame,
    area: Rect,
    entries: &[LogEntry],
    list_state: &mut ListState,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let title = format!("일지 목록 ({})", entries.len());

    if entries.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(fg_color).bg(bg_color));
        let empty = ratatui::widgets::Paragraph::new("작성된 일지가 없습니다")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| ListItem::new(entry_line(entry, fg_color)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, list_state);
}
