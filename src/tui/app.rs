use crate::config::Config;
use crate::draft::{DraftErrors, EntryDraft};
use crate::models::{
    remove_entry, apply_edit, EntryFilter, IssueStatus, LogEntry, Urgency, HOURS, JOBS, MINUTES,
    WRITERS,
};
use crate::sync::SyncEngine;
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

/// How long the submitted acknowledgment stays up before the create form
/// blanks for the next entry
const SUBMIT_ACK_HOLD: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Write,
    Entries,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Detail,
    Edit,
    Filter,
    Help,
}

/// Focusable form fields, in cycling order. The issue block fields are
/// skipped while has_issue is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Job,
    Writer,
    ItemAmpm,
    ItemHour,
    ItemMin,
    ItemContent,
    HasIssue,
    Issue,
    Action,
    Status,
    Urgency,
    NeedReport,
}

impl FormField {
    /// Fields that take free text input (other fields treat printable keys
    /// as no-ops so global shortcuts stay usable)
    pub fn is_text(self) -> bool {
        matches!(
            self,
            FormField::Date | FormField::ItemContent | FormField::Issue | FormField::Action
        )
    }

    fn is_item_field(self) -> bool {
        matches!(
            self,
            FormField::ItemAmpm | FormField::ItemHour | FormField::ItemMin | FormField::ItemContent
        )
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub draft: EntryDraft,
    pub field: FormField,
    pub item_index: usize,
    pub errors: DraftErrors,
    /// Original entry when editing, None for the create form
    pub editing_entry: Option<LogEntry>,
}

impl FormState {
    pub fn new_create() -> Self {
        Self {
            draft: EntryDraft::fresh(),
            field: FormField::Date,
            item_index: 0,
            errors: DraftErrors::default(),
            editing_entry: None,
        }
    }

    pub fn for_edit(entry: &LogEntry) -> Self {
        Self {
            draft: EntryDraft::from_entry(entry),
            field: FormField::Date,
            item_index: 0,
            errors: DraftErrors::default(),
            editing_entry: Some(entry.clone()),
        }
    }

    /// Advance focus to the next field, walking work-item rows in order
    /// and skipping the issue block when has_issue is off
    pub fn next_field(&mut self) {
        self.field = match self.field {
            FormField::Date => FormField::Job,
            FormField::Job => FormField::Writer,
            FormField::Writer => {
                self.item_index = 0;
                FormField::ItemAmpm
            }
            FormField::ItemAmpm => FormField::ItemHour,
            FormField::ItemHour => FormField::ItemMin,
            FormField::ItemMin => FormField::ItemContent,
            FormField::ItemContent => {
                if self.item_index + 1 < self.draft.work_items.len() {
                    self.item_index += 1;
                    FormField::ItemAmpm
                } else {
                    FormField::HasIssue
                }
            }
            FormField::HasIssue => {
                if self.draft.has_issue {
                    FormField::Issue
                } else {
                    FormField::NeedReport
                }
            }
            FormField::Issue => FormField::Action,
            FormField::Action => FormField::Status,
            FormField::Status => FormField::Urgency,
            FormField::Urgency => FormField::NeedReport,
            FormField::NeedReport => FormField::Date,
        };
    }

    /// Move focus to the previous field
    pub fn prev_field(&mut self) {
        self.field = match self.field {
            FormField::Date => FormField::NeedReport,
            FormField::Job => FormField::Date,
            FormField::Writer => FormField::Job,
            FormField::ItemAmpm => {
                if self.item_index > 0 {
                    self.item_index -= 1;
                    FormField::ItemContent
                } else {
                    FormField::Writer
                }
            }
            FormField::ItemHour => FormField::ItemAmpm,
            FormField::ItemMin => FormField::ItemHour,
            FormField::ItemContent => FormField::ItemMin,
            FormField::HasIssue => {
                self.item_index = self.draft.work_items.len().saturating_sub(1);
                FormField::ItemContent
            }
            FormField::Issue => FormField::HasIssue,
            FormField::Action => FormField::Issue,
            FormField::Status => FormField::Action,
            FormField::Urgency => FormField::Status,
            FormField::NeedReport => {
                if self.draft.has_issue {
                    FormField::Urgency
                } else {
                    FormField::HasIssue
                }
            }
        };
    }

    /// Mutable access to the text buffer of the focused field, if it is a
    /// text field
    pub fn current_text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Date => Some(&mut self.draft.date),
            FormField::ItemContent => self
                .draft
                .work_items
                .get_mut(self.item_index)
                .map(|w| &mut w.content),
            FormField::Issue => Some(&mut self.draft.issue),
            FormField::Action => Some(&mut self.draft.action),
            _ => None,
        }
    }

    /// Cycle the focused select field forward (step = 1) or backward
    /// (step = -1). Toggles are flipped regardless of direction.
    pub fn cycle(&mut self, step: i32) {
        match self.field {
            FormField::Job => cycle_choice(&mut self.draft.job, &JOBS, step),
            FormField::Writer => cycle_choice(&mut self.draft.writer, &WRITERS, step),
            FormField::ItemAmpm => {
                if let Some(item) = self.draft.work_items.get_mut(self.item_index) {
                    item.ampm = item.ampm.toggled();
                }
            }
            FormField::ItemHour => {
                if let Some(item) = self.draft.work_items.get_mut(self.item_index) {
                    cycle_choice(&mut item.hour, &HOURS, step);
                }
            }
            FormField::ItemMin => {
                if let Some(item) = self.draft.work_items.get_mut(self.item_index) {
                    cycle_choice(&mut item.min, &MINUTES, step);
                }
            }
            FormField::HasIssue => {
                self.draft.has_issue = !self.draft.has_issue;
            }
            FormField::Status => {
                let idx = IssueStatus::ALL
                    .iter()
                    .position(|s| *s == self.draft.status)
                    .unwrap_or(0);
                let next = step_index(idx, IssueStatus::ALL.len(), step);
                self.draft.status = IssueStatus::ALL[next];
            }
            FormField::Urgency => {
                let idx = Urgency::ALL
                    .iter()
                    .position(|u| *u == self.draft.urgency)
                    .unwrap_or(0);
                let next = step_index(idx, Urgency::ALL.len(), step);
                self.draft.urgency = Urgency::ALL[next];
            }
            FormField::NeedReport => {
                self.draft.need_report = !self.draft.need_report;
            }
            _ => {}
        }
    }

    /// Append a work-item row and focus its content field
    pub fn add_item_row(&mut self) {
        self.draft.add_work_item();
        self.item_index = self.draft.work_items.len() - 1;
        self.field = FormField::ItemContent;
    }

    /// Remove the focused work-item row (no-op unless an item field is
    /// focused, or when it is the only row)
    pub fn remove_item_row(&mut self) {
        if !self.field.is_item_field() || self.draft.work_items.len() <= 1 {
            return;
        }
        let id = self.draft.work_items[self.item_index].id.clone();
        self.draft.remove_work_item(&id);
        if self.item_index >= self.draft.work_items.len() {
            self.item_index = self.draft.work_items.len() - 1;
        }
    }
}

fn cycle_choice(value: &mut String, choices: &[&str], step: i32) {
    let next = match choices.iter().position(|c| c == value) {
        Some(idx) => step_index(idx, choices.len(), step),
        None => 0,
    };
    *value = choices[next].to_string();
}

fn step_index(idx: usize, len: usize, step: i32) -> usize {
    if step >= 0 {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFormField {
    Date,
    Job,
    Writer,
    Apply,
    Clear,
    Cancel,
}

/// Working copy of the filter while the filter modal is open
#[derive(Debug, Clone)]
pub struct FilterFormState {
    pub field: FilterFormField,
    pub date: String,
    /// 0 selects all jobs, 1.. index into JOBS
    pub job_index: usize,
    /// 0 selects all writers, 1.. index into WRITERS
    pub writer_index: usize,
}

impl FilterFormState {
    pub fn from_filter(filter: &EntryFilter) -> Self {
        let job_index = filter
            .job
            .as_deref()
            .and_then(|j| JOBS.iter().position(|c| *c == j))
            .map(|i| i + 1)
            .unwrap_or(0);
        let writer_index = filter
            .writer
            .as_deref()
            .and_then(|w| WRITERS.iter().position(|c| *c == w))
            .map(|i| i + 1)
            .unwrap_or(0);
        Self {
            field: FilterFormField::Date,
            date: filter.date.clone().unwrap_or_default(),
            job_index,
            writer_index,
        }
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            FilterFormField::Date => FilterFormField::Job,
            FilterFormField::Job => FilterFormField::Writer,
            FilterFormField::Writer => FilterFormField::Apply,
            FilterFormField::Apply => FilterFormField::Clear,
            FilterFormField::Clear => FilterFormField::Cancel,
            FilterFormField::Cancel => FilterFormField::Date,
        };
    }

    pub fn prev_field(&mut self) {
        self.field = match self.field {
            FilterFormField::Date => FilterFormField::Cancel,
            FilterFormField::Job => FilterFormField::Date,
            FilterFormField::Writer => FilterFormField::Job,
            FilterFormField::Apply => FilterFormField::Writer,
            FilterFormField::Clear => FilterFormField::Apply,
            FilterFormField::Cancel => FilterFormField::Clear,
        };
    }

    /// Cycle the focused selector. The wildcard sits at index 0.
    pub fn cycle(&mut self, step: i32) {
        match self.field {
            FilterFormField::Job => {
                self.job_index = step_index(self.job_index, JOBS.len() + 1, step);
            }
            FilterFormField::Writer => {
                self.writer_index = step_index(self.writer_index, WRITERS.len() + 1, step);
            }
            _ => {}
        }
    }

    pub fn to_filter(&self) -> EntryFilter {
        EntryFilter {
            date: if self.date.trim().is_empty() {
                None
            } else {
                Some(self.date.trim().to_string())
            },
            job: if self.job_index == 0 {
                None
            } else {
                Some(JOBS[self.job_index - 1].to_string())
            },
            writer: if self.writer_index == 0 {
                None
            } else {
                Some(WRITERS[self.writer_index - 1].to_string())
            },
        }
    }

    pub fn job_label(&self) -> &str {
        if self.job_index == 0 {
            "전체"
        } else {
            JOBS[self.job_index - 1]
        }
    }

    pub fn writer_label(&self) -> &str {
        if self.writer_index == 0 {
            "전체"
        } else {
            WRITERS[self.writer_index - 1]
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub filter: EntryFilter,
    pub form: Option<FilterFormState>,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        self.filter.date.is_some() || self.filter.job.is_some() || self.filter.writer.is_some()
    }

    /// One-line summary for the filters box
    pub fn summary_line(&self) -> String {
        if !self.is_active() {
            return "필터 없음 (전체 표시)".to_string();
        }
        let mut parts = Vec::new();
        if let Some(ref date) = self.filter.date {
            parts.push(format!("날짜: {}", date));
        }
        if let Some(ref job) = self.filter.job {
            parts.push(format!("업무: {}", job));
        }
        if let Some(ref writer) = self.filter.writer {
            parts.push(format!("작성자: {}", writer));
        }
        parts.join("  |  ")
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub current_tab: Tab,
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
    pub detail_scroll: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_tab: Tab::Write,
            mode: Mode::View,
            selected_index: 0,
            list_state: ListState::default(),
            detail_scroll: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub delete_confirmation: Option<LogEntry>,
    pub delete_modal_selection: usize,
}

#[derive(Debug, Clone)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
    pub message_duration: Duration,
}

impl Default for StatusState {
    fn default() -> Self {
        Self {
            message: None,
            message_time: None,
            message_duration: Duration::from_secs(3),
        }
    }
}

pub struct App {
    // Core infrastructure
    pub config: Config,
    pub engine: SyncEngine,

    // The shared collection (frequently accessed, keep at top level)
    pub entries: Vec<LogEntry>,

    // Grouped state
    pub ui: UiState,
    pub form: FormState,
    // Armed on submit; the create form keeps the submitted content on
    // screen until the acknowledgment has run its course
    form_reset_at: Option<Instant>,
    form_reset_hold: Duration,
    pub edit_form: Option<FormState>,
    pub filter: FilterState,
    pub modals: ModalState,
    pub status: StatusState,
}

impl App {
    pub fn new(config: Config, mut engine: SyncEngine) -> Self {
        let entries = engine.load();
        let mut app = Self {
            config,
            engine,
            entries,
            ui: UiState::default(),
            form: FormState::new_create(),
            form_reset_at: None,
            form_reset_hold: SUBMIT_ACK_HOLD,
            edit_form: None,
            filter: FilterState::default(),
            modals: ModalState::default(),
            status: StatusState::default(),
        };
        app.sync_list_state();
        app
    }

    /// Entries visible on the list tab after applying the current filter
    pub fn visible_entries(&self) -> Vec<LogEntry> {
        self.filter.filter.apply(&self.entries)
    }

    pub fn selected_entry(&self) -> Option<LogEntry> {
        self.visible_entries().into_iter().nth(self.ui.selected_index)
    }

    /// Per-iteration timer hook: expire the status message, revert the
    /// saved indicator, and poll the store when due. A completed poll
    /// replaces the local collection wholesale.
    pub fn on_tick(&mut self) {
        self.engine.tick();
        self.check_status_message_timeout();
        if self
            .form_reset_at
            .is_some_and(|at| at.elapsed() >= self.form_reset_hold)
        {
            self.flush_pending_form_reset();
        }
        if let Some(remote) = self.engine.maybe_refresh() {
            self.replace_entries(remote);
        }
    }

    /// Force a fetch outside the poll schedule
    pub fn force_refresh(&mut self) {
        match self.engine.refresh() {
            Some(remote) => {
                self.replace_entries(remote);
                self.set_status_message("새로고침 완료".to_string());
            }
            None => {
                self.set_status_message("새로고침 실패".to_string());
            }
        }
    }

    /// Swap in a freshly fetched collection, re-anchoring the selection
    /// by id when the entry survived, clamping otherwise
    fn replace_entries(&mut self, remote: Vec<LogEntry>) {
        let selected_id = self.selected_entry().map(|e| e.id);
        self.entries = remote;
        if let Some(id) = selected_id {
            if let Some(idx) = self.visible_entries().iter().position(|e| e.id == id) {
                self.ui.selected_index = idx;
                self.sync_list_state();
                return;
            }
        }
        self.adjust_selected_index();
    }

    /// Submit the create form: validate, prepend, write the whole
    /// collection. The form keeps the submitted content on screen and
    /// blanks for the next entry when the acknowledgment clears.
    pub fn submit_form(&mut self) {
        let errors = self.form.draft.validate();
        if !errors.is_empty() {
            self.form.errors = errors;
            self.set_status_message("필수 항목을 입력해 주세요".to_string());
            return;
        }
        let entry = self.form.draft.commit_new();
        self.entries.insert(0, entry);
        self.engine.persist(&self.entries);
        self.form_reset_at = Some(Instant::now());
        self.set_status_message_for("일지가 저장되었습니다".to_string(), SUBMIT_ACK_HOLD);
    }

    /// Blank the create form if a submit acknowledgment is pending.
    /// Called from the tick once the hold elapses, and from the key
    /// handler so typing starts a fresh draft instead of amending the
    /// already-submitted one.
    pub fn flush_pending_form_reset(&mut self) {
        if self.form_reset_at.take().is_some() {
            self.form = FormState::new_create();
        }
    }

    /// Save the edit form as a full-record replacement of the original
    pub fn save_edit(&mut self) {
        let Some(form) = self.edit_form.take() else {
            return;
        };
        let errors = form.draft.validate();
        if !errors.is_empty() {
            let mut form = form;
            form.errors = errors;
            self.edit_form = Some(form);
            self.set_status_message("필수 항목을 입력해 주세요".to_string());
            return;
        }
        let Some(ref original) = form.editing_entry else {
            return;
        };
        let updated = form.draft.commit_update(original);
        apply_edit(&mut self.entries, updated);
        self.engine.persist(&self.entries);
        // Back to the read-only detail of the entry just saved
        self.ui.mode = Mode::Detail;
        self.set_status_message_for(
            "수정 내용이 저장되었습니다".to_string(),
            Duration::from_secs(2),
        );
    }

    /// Open the edit form for the selected entry
    pub fn open_edit(&mut self) {
        if let Some(entry) = self.selected_entry() {
            self.edit_form = Some(FormState::for_edit(&entry));
            self.ui.mode = Mode::Edit;
        }
    }

    /// Discard the edit form without touching the collection, back to
    /// the read-only detail
    pub fn cancel_edit(&mut self) {
        self.edit_form = None;
        self.ui.mode = Mode::Detail;
    }

    pub fn request_delete(&mut self) {
        if let Some(entry) = self.selected_entry() {
            self.modals.delete_confirmation = Some(entry);
            self.modals.delete_modal_selection = 0;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(entry) = self.modals.delete_confirmation.take() {
            remove_entry(&mut self.entries, &entry.id);
            self.engine.persist(&self.entries);
            self.adjust_selected_index();
            self.set_status_message("일지가 삭제되었습니다".to_string());
        }
    }

    pub fn open_filter(&mut self) {
        self.filter.form = Some(FilterFormState::from_filter(&self.filter.filter));
        self.ui.mode = Mode::Filter;
    }

    pub fn apply_filter_form(&mut self) {
        if let Some(form) = self.filter.form.take() {
            self.filter.filter = form.to_filter();
        }
        self.ui.mode = Mode::View;
        self.ui.selected_index = 0;
        self.sync_list_state();
    }

    pub fn clear_filter(&mut self) {
        self.filter.filter = EntryFilter::default();
        self.filter.form = None;
        self.ui.mode = Mode::View;
        self.ui.selected_index = 0;
        self.sync_list_state();
    }

    pub fn set_status_message(&mut self, message: String) {
        self.set_status_message_for(message, Duration::from_secs(3));
    }

    pub fn set_status_message_for(&mut self, message: String, duration: Duration) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
        self.status.message_duration = duration;
    }

    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status.message_time {
            if time.elapsed() >= self.status.message_duration {
                self.status.message = None;
                self.status.message_time = None;
            }
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
        }
        self.sync_list_state();
    }

    pub fn move_selection_down(&mut self) {
        let count = self.visible_entries().len();
        if count > 0 && self.ui.selected_index + 1 < count {
            self.ui.selected_index += 1;
        }
        self.sync_list_state();
    }

    /// Clamp the selection after the collection changed underneath it
    pub fn adjust_selected_index(&mut self) {
        let count = self.visible_entries().len();
        if count == 0 {
            self.ui.selected_index = 0;
        } else if self.ui.selected_index >= count {
            self.ui.selected_index = count - 1;
        }
        self.sync_list_state();
    }

    pub fn sync_list_state(&mut self) {
        if self.visible_entries().is_empty() {
            self.ui.list_state.select(None);
        } else {
            self.ui.list_state.select(Some(self.ui.selected_index));
        }
    }

    /// Key hints for the status bar in the current context
    pub fn key_hints(&self) -> Vec<String> {
        let kb = &self.config.key_bindings;
        match self.ui.mode {
            Mode::Edit => vec![
                format!("{}: 저장", kb.submit),
                "Esc: 취소".to_string(),
                format!("{}: 항목 추가", kb.add_item),
                format!("{}: 항목 삭제", kb.remove_item),
            ],
            Mode::Filter => vec![
                "Tab: 이동".to_string(),
                "Space: 변경".to_string(),
                "Enter: 선택".to_string(),
                "Esc: 닫기".to_string(),
            ],
            Mode::Detail => vec![
                "Esc: 뒤로".to_string(),
                format!("{}: 수정", kb.edit),
                format!("{}: 삭제", kb.delete),
            ],
            Mode::Help => vec!["Esc: 닫기".to_string()],
            Mode::View => match self.ui.current_tab {
                Tab::Write => vec![
                    "Tab: 다음 필드".to_string(),
                    "Space: 선택 변경".to_string(),
                    format!("{}: 제출", kb.submit),
                    format!("{}: 항목 추가", kb.add_item),
                    format!("{}: 도움말", kb.help),
                ],
                Tab::Entries => vec![
                    format!("{}/{}: 이동", kb.list_down, kb.list_up),
                    format!("{}: 보기", kb.select),
                    format!("{}: 수정", kb.edit),
                    format!("{}: 삭제", kb.delete),
                    format!("{}: 필터", kb.filter),
                    format!("{}: 종료", kb.quit),
                ],
                Tab::Summary => vec![
                    format!("{}: 새로고침", kb.refresh),
                    format!("{}: 종료", kb.quit),
                ],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::models::Meridiem;
    use crate::store::{KvStore, StoreError};
    use crate::sync::{SyncStatus, STORAGE_KEY};

    struct MemStore {
        data: RefCell<HashMap<String, String>>,
    }

    impl KvStore for MemStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.data.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.data.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn test_app() -> App {
        let store = MemStore {
            data: RefCell::new(HashMap::new()),
        };
        let engine = SyncEngine::new(Box::new(store), Duration::ZERO);
        App::new(Config::default(), engine)
    }

    fn fill_form(app: &mut App) {
        app.form.draft.job = "전기".to_string();
        app.form.draft.writer = "임상식".to_string();
        app.form.draft.work_items[0].content = "분전반 점검".to_string();
    }

    #[test]
    fn submit_with_missing_fields_keeps_the_draft() {
        let mut app = test_app();
        app.submit_form();
        assert!(app.entries.is_empty());
        assert!(app.form.errors.job);
        assert!(app.form.errors.writer);
        assert_eq!(app.engine.status(), SyncStatus::Idle);
    }

    #[test]
    fn submit_prepends_and_persists() {
        let mut app = test_app();
        fill_form(&mut app);
        app.submit_form();

        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.entries[0].work_items[0].content, "분전반 점검");
        assert_eq!(app.engine.status(), SyncStatus::Saved);
        assert!(app.status.message.is_some());
        // The submitted content stays on screen with the acknowledgment
        assert_eq!(app.form.draft.work_items[0].content, "분전반 점검");

        app.flush_pending_form_reset();
        fill_form(&mut app);
        app.form.draft.work_items[0].content = "비상등 교체".to_string();
        app.submit_form();
        assert_eq!(app.entries[0].work_items[0].content, "비상등 교체");
    }

    #[test]
    fn submit_resets_the_form_when_the_ack_clears() {
        let mut app = test_app();
        fill_form(&mut app);
        app.submit_form();
        assert!(!app.form.draft.job.is_empty());

        app.form_reset_hold = Duration::ZERO;
        app.on_tick();
        assert!(app.form.draft.job.is_empty());
        assert!(app.form.draft.work_items[0].content.is_empty());
        assert!(app.form_reset_at.is_none());
    }

    #[test]
    fn typing_after_submit_starts_a_fresh_draft() {
        let mut app = test_app();
        fill_form(&mut app);
        app.submit_form();

        app.flush_pending_form_reset();
        assert!(app.form.draft.job.is_empty());

        // With no submit pending, a flush leaves the draft alone
        app.form.draft.job = "소방".to_string();
        app.flush_pending_form_reset();
        assert_eq!(app.form.draft.job, "소방");
    }

    #[test]
    fn edit_flow_replaces_the_record_in_place() {
        let mut app = test_app();
        fill_form(&mut app);
        app.submit_form();
        let id = app.entries[0].id.clone();

        app.ui.current_tab = Tab::Entries;
        app.ui.mode = Mode::Detail;
        app.open_edit();
        assert_eq!(app.ui.mode, Mode::Edit);
        {
            let form = app.edit_form.as_mut().unwrap();
            form.draft.job = "소방".to_string();
        }
        app.save_edit();

        // The detail view stays open, back in read-only display
        assert_eq!(app.ui.mode, Mode::Detail);
        assert!(app.edit_form.is_none());
        assert_eq!(app.entries[0].id, id);
        assert_eq!(app.entries[0].job, "소방");
        assert!(app.entries[0].updated_at.is_some());
    }

    #[test]
    fn cancel_edit_discards_changes() {
        let mut app = test_app();
        fill_form(&mut app);
        app.submit_form();

        app.ui.current_tab = Tab::Entries;
        app.ui.mode = Mode::Detail;
        app.open_edit();
        app.edit_form.as_mut().unwrap().draft.job = "소방".to_string();
        app.cancel_edit();

        assert_eq!(app.entries[0].job, "전기");
        assert!(app.edit_form.is_none());
        assert_eq!(app.ui.mode, Mode::Detail);
    }

    #[test]
    fn delete_removes_and_persists() {
        let mut app = test_app();
        fill_form(&mut app);
        app.submit_form();

        app.ui.current_tab = Tab::Entries;
        app.request_delete();
        assert!(app.modals.delete_confirmation.is_some());
        app.confirm_delete();

        assert!(app.entries.is_empty());
        let stored = app.engine.refresh().unwrap();
        assert!(stored.is_empty());
    }

    #[test]
    fn poll_replaces_the_visible_collection() {
        let mut app = test_app();
        fill_form(&mut app);
        app.submit_form();

        // A competing client overwrites the slot with an empty collection
        app.engine.persist(&[]);

        app.on_tick();
        assert!(app.entries.is_empty());
        assert_eq!(app.ui.selected_index, 0);
    }

    #[test]
    fn poll_reanchors_the_selection_by_id() {
        let mut app = test_app();
        for content in ["첫째", "둘째", "셋째"] {
            fill_form(&mut app);
            app.form.draft.work_items[0].content = content.to_string();
            app.submit_form();
        }
        // Newest-first: select the middle entry ("둘째")
        app.ui.current_tab = Tab::Entries;
        app.ui.selected_index = 1;
        app.sync_list_state();
        let selected_id = app.selected_entry().unwrap().id;

        // Another client deletes the newest entry and writes back
        let mut remote = app.entries.clone();
        remote.remove(0);
        app.engine.persist(&remote);

        app.on_tick();
        assert_eq!(app.entries.len(), 2);
        assert_eq!(app.selected_entry().unwrap().id, selected_id);
        assert_eq!(app.ui.selected_index, 0);
    }

    #[test]
    fn filter_form_round_trips_selections() {
        let mut app = test_app();
        app.open_filter();
        {
            let form = app.filter.form.as_mut().unwrap();
            form.date = "2024-05-01".to_string();
            form.job_index = 1;
            form.writer_index = 0;
        }
        app.apply_filter_form();

        assert_eq!(app.filter.filter.date.as_deref(), Some("2024-05-01"));
        assert_eq!(app.filter.filter.job.as_deref(), Some(JOBS[0]));
        assert!(app.filter.filter.writer.is_none());
        assert!(app.filter.is_active());

        app.clear_filter();
        assert!(!app.filter.is_active());
    }

    #[test]
    fn form_field_cycle_skips_issue_block_when_off() {
        let mut form = FormState::new_create();
        form.field = FormField::HasIssue;
        form.next_field();
        assert_eq!(form.field, FormField::NeedReport);

        form.draft.has_issue = true;
        form.field = FormField::HasIssue;
        form.next_field();
        assert_eq!(form.field, FormField::Issue);
    }

    #[test]
    fn form_field_cycle_walks_every_item_row() {
        let mut form = FormState::new_create();
        form.draft.add_work_item();
        form.field = FormField::ItemContent;
        form.item_index = 0;
        form.next_field();
        assert_eq!(form.field, FormField::ItemAmpm);
        assert_eq!(form.item_index, 1);

        form.field = FormField::ItemContent;
        form.next_field();
        assert_eq!(form.field, FormField::HasIssue);
    }

    #[test]
    fn cycling_selects_and_toggles() {
        let mut form = FormState::new_create();
        form.field = FormField::Job;
        form.cycle(1);
        assert_eq!(form.draft.job, JOBS[0]);
        form.cycle(-1);
        assert_eq!(form.draft.job, JOBS[JOBS.len() - 1]);

        form.field = FormField::ItemAmpm;
        let before = form.draft.work_items[0].ampm;
        form.cycle(1);
        assert_eq!(form.draft.work_items[0].ampm, before.toggled());

        form.field = FormField::Status;
        form.cycle(1);
        assert_eq!(form.draft.status, IssueStatus::InProgress);
    }

    #[test]
    fn removing_item_rows_clamps_focus() {
        let mut form = FormState::new_create();
        form.add_item_row();
        assert_eq!(form.item_index, 1);
        assert_eq!(form.field, FormField::ItemContent);

        form.remove_item_row();
        assert_eq!(form.draft.work_items.len(), 1);
        assert_eq!(form.item_index, 0);

        // The last remaining row cannot be removed
        form.remove_item_row();
        assert_eq!(form.draft.work_items.len(), 1);
    }

    #[test]
    fn status_message_expires_after_its_duration() {
        let mut app = test_app();
        app.set_status_message_for("done".to_string(), Duration::ZERO);
        assert!(app.status.message.is_some());
        app.check_status_message_timeout();
        assert!(app.status.message.is_none());
    }

    #[test]
    fn startup_load_reads_the_shared_slot() {
        let store = MemStore {
            data: RefCell::new(HashMap::new()),
        };
        let seed = {
            let mut app = test_app();
            fill_form(&mut app);
            app.form.draft.work_items[0].ampm = Meridiem::Am;
            app.submit_form();
            serde_json::to_string(&app.entries).unwrap()
        };
        store.data.borrow_mut().insert(STORAGE_KEY.to_string(), seed);

        let engine = SyncEngine::new(Box::new(store), Duration::from_secs(10));
        let app = App::new(Config::default(), engine);
        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.ui.list_state.selected(), Some(0));
    }
}
