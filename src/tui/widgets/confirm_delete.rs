use crate::config::Config;
use crate::models::LogEntry;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils::fmt_date;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

pub fn render_confirm_delete(
    f: &mut Frame,
    area: Rect,
    entry: &LogEntry,
    selection: usize,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup_area = popup_area(area, 50, 35);

    // Clear the background so the list does not show through
    f.render_widget(Clear, popup_area);

    let mut all_lines = vec![
        Line::from(Span::styled(
            "정말 삭제하시겠습니까?",
            Style::default().fg(fg_color).bg(bg_color),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("{} [{}] {}", fmt_date(&entry.date), entry.job, entry.writer),
            Style::default().fg(fg_color).bg(bg_color),
        )),
        Line::default(),
    ];

    let options = ["삭제", "취소"];
    for (index, option) in options.iter().enumerate() {
        let is_selected = index == selection;
        let prefix = if is_selected { "> " } else { "  " };
        let style = if is_selected {
            Style::default().fg(highlight_fg).bg(highlight_bg)
        } else {
            Style::default().fg(fg_color).bg(bg_color)
        };
        all_lines.push(Line::from(Span::styled(
            format!("{}{}", prefix, option),
            style,
        )));
    }

    all_lines.push(Line::default());
    all_lines.push(Line::from(Span::styled(
        "↑↓: 이동  Enter: 확인  Esc: 취소",
        Style::default().fg(fg_color).bg(bg_color),
    )));

    let paragraph = Paragraph::new(all_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("일지 삭제")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup_area);
}

/// Centered rect using a percentage of the available rect
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
