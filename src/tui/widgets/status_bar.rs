use crate::config::Config;
use crate::sync::SyncStatus;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Short label for the sync indicator at the left edge of the status bar
fn sync_label(status: SyncStatus) -> Option<(&'static str, Color)> {
    match status {
        SyncStatus::Idle => None,
        SyncStatus::Saving => Some(("저장 중...", Color::Yellow)),
        SyncStatus::Saved => Some(("저장됨 ✓", Color::Green)),
        SyncStatus::Error => Some(("저장 실패 ✗", Color::Red)),
    }
}

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    sync: SyncStatus,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let mut spans: Vec<Span> = Vec::new();
    let mut used = 0usize;
    let max_width = area.width as usize;

    if let Some((label, color)) = sync_label(sync) {
        spans.push(Span::styled(
            format!(" {} ", label),
            Style::default().fg(color).bg(bg_color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled("| ", Style::default().fg(fg_color).bg(bg_color)));
        used += label.chars().count() + 4;
    }

    if let Some(msg) = message {
        // Status messages get a highlighted background for visibility
        let msg_fg = get_contrast_text_color(highlight_bg);
        let mut text = msg.clone();
        let remaining = max_width.saturating_sub(used);
        if text.chars().count() > remaining {
            text = text.chars().take(remaining.saturating_sub(3)).collect::<String>() + "...";
        }
        spans.push(Span::styled(
            text,
            Style::default().fg(msg_fg).bg(highlight_bg).add_modifier(Modifier::BOLD),
        ));
    } else {
        // Key hints with bullet separators, fitting as many as the width
        // allows
        let separator = " • ";
        let mut hints_text = String::new();
        for (i, hint) in key_hints.iter().enumerate() {
            let addition = if i == 0 {
                hint.chars().count()
            } else {
                separator.chars().count() + hint.chars().count()
            };
            if used + hints_text.chars().count() + addition > max_width {
                if !hints_text.is_empty() {
                    hints_text.push_str("...");
                }
                break;
            }
            if i > 0 {
                hints_text.push_str(separator);
            }
            hints_text.push_str(hint);
        }
        spans.push(Span::styled(
            hints_text,
            Style::default().fg(fg_color).bg(bg_color),
        ));
    }

    // Simple 1-line display, no Block wrapper
    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().fg(fg_color).bg(bg_color));

    f.render_widget(paragraph, area);
}
