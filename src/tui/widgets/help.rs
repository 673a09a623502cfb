use crate::config::Config;
use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let kb = &config.key_bindings;
    let section = Style::default().fg(fg_color).add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Cyan);
    let desc = Style::default().fg(fg_color);

    let entries: Vec<(String, &str)> = vec![
        (format!("{}/{}/{}", kb.tab_1, kb.tab_2, kb.tab_3), "탭 전환 (작성/목록/요약)"),
        ("←/→".to_string(), "탭 전환 (목록/요약 탭에서)"),
        (kb.quit.clone(), "종료"),
        (kb.help.clone(), "도움말"),
        (format_key_binding_for_display(&kb.refresh), "수동 새로고침"),
    ];
    let form_entries: Vec<(String, &str)> = vec![
        ("Tab/↓, Shift+Tab/↑".to_string(), "필드 이동"),
        ("Space, ←/→".to_string(), "선택 항목 변경"),
        (format_key_binding_for_display(&kb.submit), "제출/저장"),
        (format_key_binding_for_display(&kb.add_item), "작업 항목 추가"),
        (format_key_binding_for_display(&kb.remove_item), "작업 항목 삭제"),
        ("Esc".to_string(), "수정 취소"),
    ];
    let list_entries: Vec<(String, &str)> = vec![
        (format!("{}/{}", kb.list_down, kb.list_up), "위/아래 이동"),
        (kb.select.clone(), "상세 보기"),
        (kb.edit.clone(), "수정"),
        (kb.delete.clone(), "삭제"),
        (kb.filter.clone(), "필터"),
    ];

    let mut lines = vec![Line::from(Span::styled("전체", section))];
    for (keys, description) in &entries {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<20}", keys), key_style),
            Span::styled(*description, desc),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("작성/수정", section)));
    for (keys, description) in &form_entries {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<20}", keys), key_style),
            Span::styled(*description, desc),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("일지 목록", section)));
    for (keys, description) in &list_entries {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<20}", keys), key_style),
            Span::styled(*description, desc),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("도움말")
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
