use crate::config::Config;
use crate::tui::app::{FormField, FormState};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

struct FieldStyles {
    label: Style,
    value: Style,
    focused: Style,
    error: Style,
}

fn field_line(
    label: &str,
    value: String,
    focused: bool,
    error: bool,
    styles: &FieldStyles,
) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let value_style = if focused {
        styles.focused
    } else if error {
        styles.error
    } else {
        styles.value
    };
    let mut spans = vec![
        Span::styled(marker.to_string(), value_style),
        Span::styled(format!("{:<10}", label), styles.label),
        Span::styled(value, value_style),
    ];
    if error {
        spans.push(Span::styled(" (필수)", styles.error));
    }
    Line::from(spans)
}

fn select_display(value: &str) -> String {
    if value.is_empty() {
        "< 선택 >".to_string()
    } else {
        format!("< {} >", value)
    }
}

fn toggle_display(on: bool) -> String {
    if on {
        "[x]".to_string()
    } else {
        "[ ]".to_string()
    }
}

/// Render the entry form (used by both the write tab and the edit view)
pub fn render_form(f: &mut Frame, area: Rect, form: &FormState, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let styles = FieldStyles {
        label: Style::default().fg(Color::DarkGray),
        value: Style::default().fg(fg_color),
        focused: Style::default()
            .fg(highlight_fg)
            .bg(highlight_bg)
            .add_modifier(Modifier::BOLD),
        error: Style::default().fg(Color::Red),
    };

    let draft = &form.draft;
    let at = |field: FormField| form.field == field;

    let mut lines = vec![
        field_line("날짜", draft.date.clone(), at(FormField::Date), form.errors.date, &styles),
        field_line(
            "업무 구분",
            select_display(&draft.job),
            at(FormField::Job),
            form.errors.job,
            &styles,
        ),
        field_line(
            "작성자",
            select_display(&draft.writer),
            at(FormField::Writer),
            form.errors.writer,
            &styles,
        ),
        Line::default(),
        Line::from(Span::styled(
            "작업 내용",
            Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
        )),
    ];

    for (i, item) in draft.work_items.iter().enumerate() {
        let row_focused = form.item_index == i;
        let time_line = Line::from(vec![
            Span::styled(format!("  {}. ", i + 1), styles.label),
            Span::styled(
                format!("[{}]", item.ampm.label()),
                if row_focused && at(FormField::ItemAmpm) {
                    styles.focused
                } else {
                    styles.value
                },
            ),
            Span::raw(" "),
            Span::styled(
                format!("[{}시]", item.hour),
                if row_focused && at(FormField::ItemHour) {
                    styles.focused
                } else {
                    styles.value
                },
            ),
            Span::raw(" "),
            Span::styled(
                format!("[{}분]", item.min),
                if row_focused && at(FormField::ItemMin) {
                    styles.focused
                } else {
                    styles.value
                },
            ),
        ]);
        lines.push(time_line);
        let content_focused = row_focused && at(FormField::ItemContent);
        let content = if item.content.is_empty() && !content_focused {
            Span::styled("내용을 입력하세요".to_string(), Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(
                item.content.clone(),
                if content_focused { styles.focused } else { styles.value },
            )
        };
        let marker = if content_focused { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker.to_string(), styles.value),
            Span::raw("   "),
            content,
        ]));
    }
    if form.errors.work {
        lines.push(Line::from(Span::styled(
            "  작업 내용을 한 개 이상 입력해 주세요",
            styles.error,
        )));
    }

    lines.push(Line::default());
    lines.push(field_line(
        "특이사항",
        toggle_display(draft.has_issue),
        at(FormField::HasIssue),
        false,
        &styles,
    ));

    if draft.has_issue {
        lines.push(field_line("내용", draft.issue.clone(), at(FormField::Issue), form.errors.issue, &styles));
        lines.push(field_line("조치", draft.action.clone(), at(FormField::Action), false, &styles));
        lines.push(field_line(
            "상태",
            select_display(draft.status.label()),
            at(FormField::Status),
            false,
            &styles,
        ));
        lines.push(field_line(
            "긴급도",
            select_display(draft.urgency.label()),
            at(FormField::Urgency),
            false,
            &styles,
        ));
    }

    lines.push(field_line(
        "보고 필요",
        toggle_display(draft.need_report),
        at(FormField::NeedReport),
        false,
        &styles,
    ));

    let title = if form.editing_entry.is_some() {
        "일지 수정"
    } else {
        "일지 작성"
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
