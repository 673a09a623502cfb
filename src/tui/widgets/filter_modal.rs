use crate::config::Config;
use crate::tui::app::{FilterFormField, FilterFormState};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

pub fn render_filter_modal(f: &mut Frame, area: Rect, form: &FilterFormState, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup_area = popup_area(area, 50, 45);
    f.render_widget(Clear, popup_area);

    let label = Style::default().fg(Color::DarkGray);
    let normal = Style::default().fg(fg_color).bg(bg_color);
    let focused = Style::default()
        .fg(highlight_fg)
        .bg(highlight_bg)
        .add_modifier(Modifier::BOLD);
    let style_for = |field: FilterFormField| if form.field == field { focused } else { normal };

    let date_value = if form.date.is_empty() {
        "전체".to_string()
    } else {
        form.date.clone()
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("날짜     ", label),
            Span::styled(date_value, style_for(FilterFormField::Date)),
        ]),
        Line::from(vec![
            Span::styled("업무 구분 ", label),
            Span::styled(
                format!("< {} >", form.job_label()),
                style_for(FilterFormField::Job),
            ),
        ]),
        Line::from(vec![
            Span::styled("작성자   ", label),
            Span::styled(
                format!("< {} >", form.writer_label()),
                style_for(FilterFormField::Writer),
            ),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled(" 적용 ", style_for(FilterFormField::Apply)),
            Span::raw("  "),
            Span::styled(" 초기화 ", style_for(FilterFormField::Clear)),
            Span::raw("  "),
            Span::styled(" 취소 ", style_for(FilterFormField::Cancel)),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "Tab: 이동  Space/←→: 변경  Enter: 선택  Esc: 닫기",
            label,
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("필터")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color));

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
