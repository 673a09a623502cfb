use crate::config::Config;
use crate::models::LogEntry;
use crate::tui::widgets::color::parse_color;
use crate::utils::fmt_date;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Full detail view of one entry
pub fn render_entry_view(
    f: &mut Frame,
    area: Rect,
    entry: &LogEntry,
    scroll: usize,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(fg_color);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("날짜      ", label),
            Span::styled(fmt_date(&entry.date), value),
        ]),
        Line::from(vec![
            Span::styled("업무 구분 ", label),
            Span::styled(entry.job.clone(), value),
        ]),
        Line::from(vec![
            Span::styled("작성자    ", label),
            Span::styled(entry.writer.clone(), value),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "작업 내용",
            Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
        )),
    ];

    for item in &entry.work_items {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", item.time.display()), label),
            Span::styled(item.content.clone(), value),
        ]));
    }

    lines.push(Line::default());
    if entry.has_issue {
        lines.push(Line::from(vec![
            Span::styled(
                "특이사항 ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("[{} / {}]", entry.status.label(), entry.urgency.label()),
                label,
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", entry.issue),
            value,
        )));
        if !entry.action.trim().is_empty() {
            lines.push(Line::from(vec![
                Span::styled("  조치: ", label),
                Span::styled(entry.action.clone(), value),
            ]));
        }
    } else {
        lines.push(Line::from(Span::styled("특이사항 없음", label)));
    }

    if entry.need_report {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "보고 필요",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("작성: {}", entry.created_at),
        Style::default().fg(Color::DarkGray),
    )));
    if let Some(ref updated) = entry.updated_at {
        lines.push(Line::from(Span::styled(
            format!("수정: {}", updated),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("일지 상세")
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));

    f.render_widget(paragraph, area);
}
