use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::models::Summary;
use crate::tui::app::{App, Mode, Tab};
use crate::tui::layout::Layout;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::confirm_delete::render_confirm_delete;
use crate::tui::widgets::entry_list::render_entry_list;
use crate::tui::widgets::entry_view::render_entry_view;
use crate::tui::widgets::filter_modal::render_filter_modal;
use crate::tui::widgets::filters_box::render_filters_box;
use crate::tui::widgets::form::render_form;
use crate::tui::widgets::help::render_help;
use crate::tui::widgets::status_bar::render_status_bar;
use crate::tui::widgets::summary::render_summary;
use crate::tui::widgets::tabs::render_tabs;
use crate::utils;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    // Outer border around the whole application
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(" facilog ")
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer, f.area());

    render_tabs(f, layout.tabs_area, app.ui.current_tab, &app.config);

    // Main content
    match (app.ui.current_tab, app.ui.mode) {
        (_, Mode::Edit) => {
            if let Some(ref form) = app.edit_form {
                render_form(f, layout.main_area, form, &app.config);
            }
        }
        (Tab::Write, _) => {
            render_form(f, layout.main_area, &app.form, &app.config);
        }
        (Tab::Entries, Mode::Detail) => {
            if let Some(entry) = app.selected_entry() {
                render_entry_view(f, layout.main_area, &entry, app.ui.detail_scroll, &app.config);
            } else {
                app.ui.mode = Mode::View;
            }
        }
        (Tab::Entries, _) => {
            let entries = app.visible_entries();
            render_entry_list(
                f,
                layout.main_area,
                &entries,
                &mut app.ui.list_state,
                &app.config,
            );
        }
        (Tab::Summary, _) => {
            let today = utils::today();
            let summary = Summary::compute(&app.entries, &today);
            render_summary(f, layout.main_area, &summary, &today, &app.config);
        }
    }

    render_filters_box(
        f,
        layout.filters_area,
        &app.filter.summary_line(),
        &app.config,
    );

    let hints = app.key_hints();
    render_status_bar(
        f,
        layout.status_area,
        app.engine.status(),
        app.status.message.as_ref(),
        &hints,
        &app.config,
    );

    // Overlays
    if app.ui.mode == Mode::Filter {
        if let Some(ref form) = app.filter.form {
            render_filter_modal(f, layout.inner_area, form, &app.config);
        }
    }
    if app.ui.mode == Mode::Help {
        render_help(f, layout.inner_area, &app.config);
    }
    if let Some(ref entry) = app.modals.delete_confirmation {
        render_confirm_delete(
            f,
            layout.inner_area,
            entry,
            app.modals.delete_modal_selection,
            &app.config,
        );
    }
}
