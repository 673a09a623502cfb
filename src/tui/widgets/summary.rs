use crate::config::Config;
use crate::models::{Summary, WRITERS};
use crate::tui::widgets::color::parse_color;
use crate::utils::fmt_date;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Render today's aggregates over the shared collection
pub fn render_summary(f: &mut Frame, area: Rect, summary: &Summary, today: &str, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(fg_color).add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("오늘 작성된 일지      ", label),
            Span::styled(format!("{}건", summary.today_count), value),
        ]),
        Line::from(vec![
            Span::styled("미결 특이사항         ", label),
            Span::styled(
                format!("{}건", summary.open_count),
                if summary.open_count > 0 {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    value
                },
            ),
        ]),
        Line::from(vec![
            Span::styled("긴급 특이사항         ", label),
            Span::styled(
                format!("{}건", summary.urgent_count),
                if summary.urgent_count > 0 {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    value
                },
            ),
        ]),
        Line::from(vec![
            Span::styled("최근 7일 특이사항     ", label),
            Span::styled(format!("{}건", summary.week_issue_count), value),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "작성 현황",
            Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
        )),
    ];

    // Every known writer with a submitted marker for today
    for writer in WRITERS {
        let submitted = summary.submitted_writers.contains(writer);
        let (marker, style) = if submitted {
            ("✓", Style::default().fg(Color::Green))
        } else {
            ("-", label)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", marker), style),
            Span::styled(writer.to_string(), Style::default().fg(fg_color)),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "최근 특이사항",
        Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
    )));
    if summary.recent_issues.is_empty() {
        lines.push(Line::from(Span::styled("  없음", label)));
    } else {
        for entry in &summary.recent_issues {
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", fmt_date(&entry.date)), label),
                Span::styled(format!("[{}] ", entry.job), Style::default().fg(Color::Cyan)),
                Span::styled(entry.issue.clone(), Style::default().fg(fg_color)),
                Span::styled(format!(" ({})", entry.status.label()), label),
            ]));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("요약 - {}", fmt_date(today)))
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
