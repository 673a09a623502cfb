use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;

use crate::tui::app::{FilterFormField, FormState, Mode, Tab};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::App;
use crate::utils::{has_primary_modifier, parse_key_binding};

/// Guard that ensures terminal state is restored even on panic
/// If the terminal is left in raw mode or alternate screen, the user's
/// terminal will be unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Manually restore terminal state (called on normal exit)
    /// After calling this, the guard will do nothing on drop
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Ignore errors in drop - we're already in a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

/// Check a configured binding string against a key event
fn binding_matches(binding: &str, key_event: &KeyEvent) -> bool {
    match parse_key_binding(binding) {
        Ok(parsed) => {
            parsed.key_code == key_event.code
                && parsed.requires_ctrl == has_primary_modifier(key_event.modifiers)
        }
        Err(_) => false,
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check terminal size before entering alternate screen so the error
    // message lands in the normal terminal
    let (width, height) = terminal_size()?;

    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;

    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        // Timers: status message expiry, saved indicator, store poll
        app.on_tick();

        let terminal_size = terminal.size()?;
        let terminal_rect =
            ratatui::layout::Rect::new(0, 0, terminal_size.width, terminal_size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(std::time::Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key_event) => {
                    // Only process Press events (ignore Release events to
                    // prevent double-processing on Windows)
                    if key_event.kind == KeyEventKind::Press
                        && handle_key_event(&mut app, key_event)
                    {
                        break; // Quit requested
                    }
                }
                Event::Resize(_width, _height) => {
                    // Layout recalculates from terminal.size() on next draw
                }
                _ => {}
            }
        }
    }

    guard.restore()?;

    Ok(())
}

/// Top-level key dispatch. Returns true when the app should quit.
fn handle_key_event(app: &mut App, key_event: KeyEvent) -> bool {
    // Modals take precedence over everything else
    if app.modals.delete_confirmation.is_some() {
        handle_delete_confirmation(app, key_event);
        return false;
    }

    match app.ui.mode {
        Mode::Help => {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::Enter)
                || binding_matches(&app.config.key_bindings.help.clone(), &key_event)
            {
                app.ui.mode = Mode::View;
            }
            false
        }
        Mode::Filter => {
            handle_filter_key(app, key_event);
            false
        }
        Mode::Edit => {
            handle_edit_key(app, key_event);
            false
        }
        Mode::Detail => {
            handle_detail_key(app, key_event);
            false
        }
        Mode::View => handle_view_key(app, key_event),
    }
}

fn handle_delete_confirmation(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
            // Two options: delete, cancel
            app.modals.delete_modal_selection = 1 - app.modals.delete_modal_selection;
        }
        KeyCode::Enter => {
            if app.modals.delete_modal_selection == 0 {
                app.confirm_delete();
                if app.ui.mode == Mode::Detail {
                    app.ui.mode = Mode::View;
                }
            } else {
                app.modals.delete_confirmation = None;
            }
        }
        KeyCode::Esc => {
            app.modals.delete_confirmation = None;
        }
        _ => {}
    }
}

fn handle_filter_key(app: &mut App, key_event: KeyEvent) {
    let Some(form) = app.filter.form.as_mut() else {
        app.ui.mode = Mode::View;
        return;
    };
    match key_event.code {
        KeyCode::Esc => {
            app.filter.form = None;
            app.ui.mode = Mode::View;
        }
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left => form.cycle(-1),
        KeyCode::Right => form.cycle(1),
        KeyCode::Char(' ') if form.field != FilterFormField::Date => form.cycle(1),
        KeyCode::Enter => match form.field {
            FilterFormField::Cancel => {
                app.filter.form = None;
                app.ui.mode = Mode::View;
            }
            FilterFormField::Clear => app.clear_filter(),
            _ => app.apply_filter_form(),
        },
        KeyCode::Char(c) if form.field == FilterFormField::Date => {
            if !has_primary_modifier(key_event.modifiers) {
                form.date.push(c);
            }
        }
        KeyCode::Backspace if form.field == FilterFormField::Date => {
            form.date.pop();
        }
        _ => {}
    }
}

fn handle_edit_key(app: &mut App, key_event: KeyEvent) {
    if key_event.code == KeyCode::Esc {
        app.cancel_edit();
        return;
    }
    let kb = app.config.key_bindings.clone();
    if binding_matches(&kb.submit, &key_event) {
        app.save_edit();
        return;
    }
    if let Some(form) = app.edit_form.as_mut() {
        handle_form_key(form, key_event, &kb.add_item, &kb.remove_item);
    }
}

fn handle_detail_key(app: &mut App, key_event: KeyEvent) {
    let kb = app.config.key_bindings.clone();
    match key_event.code {
        KeyCode::Esc | KeyCode::Enter => {
            app.ui.mode = Mode::View;
            app.ui.detail_scroll = 0;
        }
        KeyCode::Up => {
            app.ui.detail_scroll = app.ui.detail_scroll.saturating_sub(1);
        }
        KeyCode::Down => {
            app.ui.detail_scroll += 1;
        }
        _ => {
            if binding_matches(&kb.edit, &key_event) {
                app.open_edit();
            } else if binding_matches(&kb.delete, &key_event) {
                app.request_delete();
            }
        }
    }
}

/// Handle a key inside a form. Returns true when the key was consumed,
/// so unconsumed keys can fall through to the global shortcuts.
fn handle_form_key(
    form: &mut FormState,
    key_event: KeyEvent,
    add_item: &str,
    remove_item: &str,
) -> bool {
    if binding_matches(add_item, &key_event) {
        form.add_item_row();
        return true;
    }
    if binding_matches(remove_item, &key_event) {
        form.remove_item_row();
        return true;
    }
    match key_event.code {
        KeyCode::Tab | KeyCode::Down => {
            form.next_field();
            true
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.prev_field();
            true
        }
        KeyCode::Left if !form.field.is_text() => {
            form.cycle(-1);
            true
        }
        KeyCode::Right if !form.field.is_text() => {
            form.cycle(1);
            true
        }
        KeyCode::Char(' ') if !form.field.is_text() => {
            form.cycle(1);
            true
        }
        KeyCode::Char(c) => {
            if has_primary_modifier(key_event.modifiers) {
                return false;
            }
            if let Some(text) = form.current_text_mut() {
                text.push(c);
                true
            } else {
                // Non-text field: let digits and letters reach the
                // global shortcuts
                false
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = form.current_text_mut() {
                text.pop();
                true
            } else {
                false
            }
        }
        _ => false,
    }
}

fn handle_view_key(app: &mut App, key_event: KeyEvent) -> bool {
    let kb = app.config.key_bindings.clone();

    // The create form on the write tab gets the first look at the key
    if app.ui.current_tab == Tab::Write {
        // Any key after a submit acknowledgment works on a fresh draft
        app.flush_pending_form_reset();
        if binding_matches(&kb.submit, &key_event) {
            app.submit_form();
            return false;
        }
        if handle_form_key(&mut app.form, key_event, &kb.add_item, &kb.remove_item) {
            return false;
        }
    }

    // Global shortcuts
    if binding_matches(&kb.quit, &key_event) {
        return true;
    }
    if key_event.code == KeyCode::Char('c')
        && key_event.modifiers.contains(KeyModifiers::CONTROL)
    {
        return true;
    }
    if binding_matches(&kb.help, &key_event) {
        app.ui.mode = Mode::Help;
        return false;
    }
    if binding_matches(&kb.refresh, &key_event) {
        app.force_refresh();
        return false;
    }
    if binding_matches(&kb.tab_1, &key_event) {
        app.ui.current_tab = Tab::Write;
        return false;
    }
    if binding_matches(&kb.tab_2, &key_event) {
        app.ui.current_tab = Tab::Entries;
        app.adjust_selected_index();
        return false;
    }
    if binding_matches(&kb.tab_3, &key_event) {
        app.ui.current_tab = Tab::Summary;
        return false;
    }
    // Arrow tab switching stays available outside the write tab, where
    // the arrows belong to the form
    if app.ui.current_tab != Tab::Write {
        if binding_matches(&kb.tab_left, &key_event) {
            app.ui.current_tab = match app.ui.current_tab {
                Tab::Write => Tab::Summary,
                Tab::Entries => Tab::Write,
                Tab::Summary => Tab::Entries,
            };
            return false;
        }
        if binding_matches(&kb.tab_right, &key_event) {
            app.ui.current_tab = match app.ui.current_tab {
                Tab::Write => Tab::Entries,
                Tab::Entries => Tab::Summary,
                Tab::Summary => Tab::Write,
            };
            app.adjust_selected_index();
            return false;
        }
    }

    // List tab shortcuts
    if app.ui.current_tab == Tab::Entries {
        if binding_matches(&kb.list_up, &key_event) || key_event.code == KeyCode::Up {
            app.move_selection_up();
        } else if binding_matches(&kb.list_down, &key_event) || key_event.code == KeyCode::Down {
            app.move_selection_down();
        } else if binding_matches(&kb.select, &key_event) {
            if app.selected_entry().is_some() {
                app.ui.mode = Mode::Detail;
                app.ui.detail_scroll = 0;
            }
        } else if binding_matches(&kb.edit, &key_event) {
            app.open_edit();
        } else if binding_matches(&kb.delete, &key_event) {
            app.request_delete();
        } else if binding_matches(&kb.filter, &key_event) {
            app.open_filter();
        }
    }

    false
}
