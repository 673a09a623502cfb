use crate::models::{IssueStatus, LogEntry, Meridiem, TimeSpec, Urgency, WorkItem};
use crate::utils;

/// One editable work-item row. Rows always carry 12-hour picker fields;
/// legacy 24-hour times are converted when an entry is opened for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItemDraft {
    pub id: String,
    pub ampm: Meridiem,
    pub hour: String,
    pub min: String,
    pub content: String,
}

impl WorkItemDraft {
    /// Fresh row with the current time and no content
    pub fn fresh() -> Self {
        let (ampm, hour, min) = TimeSpec::now().twelve_parts();
        Self {
            id: utils::new_id(),
            ampm,
            hour,
            min,
            content: String::new(),
        }
    }

    fn from_item(item: &WorkItem) -> Self {
        let (ampm, hour, min) = item.time.twelve_parts();
        Self {
            id: item.id.clone(),
            ampm,
            hour,
            min,
            content: item.content.clone(),
        }
    }

    fn to_item(&self) -> WorkItem {
        WorkItem {
            id: self.id.clone(),
            time: TimeSpec::Twelve {
                ampm: self.ampm,
                hour: self.hour.clone(),
                min: self.min.clone(),
            },
            content: self.content.clone(),
        }
    }
}

/// Field-level validation results. Empty iff the draft is submittable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DraftErrors {
    pub date: bool,
    pub job: bool,
    pub writer: bool,
    pub work: bool,
    pub issue: bool,
}

impl DraftErrors {
    pub fn is_empty(&self) -> bool {
        !(self.date || self.job || self.writer || self.work || self.issue)
    }
}

/// Mutable in-progress form state, used by both the create flow (always
/// present, reset after a successful submit) and the edit flow (a deep
/// copy of the selected entry, discarded on cancel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub date: String,
    pub job: String,
    pub writer: String,
    pub work_items: Vec<WorkItemDraft>,
    pub has_issue: bool,
    pub issue: String,
    pub action: String,
    pub status: IssueStatus,
    pub urgency: Urgency,
    pub need_report: bool,
}

impl EntryDraft {
    /// Blank draft for a new entry, dated today with one empty work item
    pub fn fresh() -> Self {
        Self {
            date: utils::today(),
            job: String::new(),
            writer: String::new(),
            work_items: vec![WorkItemDraft::fresh()],
            has_issue: false,
            issue: String::new(),
            action: String::new(),
            status: IssueStatus::Done,
            urgency: Urgency::Normal,
            need_report: false,
        }
    }

    /// Deep copy of an existing entry for the edit flow
    pub fn from_entry(entry: &LogEntry) -> Self {
        let mut work_items: Vec<WorkItemDraft> =
            entry.work_items.iter().map(WorkItemDraft::from_item).collect();
        // The editor always shows at least one row
        if work_items.is_empty() {
            work_items.push(WorkItemDraft::fresh());
        }
        Self {
            date: entry.date.clone(),
            job: entry.job.clone(),
            writer: entry.writer.clone(),
            work_items,
            has_issue: entry.has_issue,
            issue: entry.issue.clone(),
            action: entry.action.clone(),
            status: entry.status,
            urgency: entry.urgency,
            need_report: entry.need_report,
        }
    }

    /// Check the draft for submission. Runs on submit/save attempts only,
    /// not per keystroke.
    pub fn validate(&self) -> DraftErrors {
        DraftErrors {
            date: self.date.trim().is_empty(),
            job: self.job.is_empty(),
            writer: self.writer.is_empty(),
            work: !self.work_items.iter().any(|w| !w.content.trim().is_empty()),
            issue: self.has_issue && self.issue.trim().is_empty(),
        }
    }

    /// Append a fresh work-item row
    pub fn add_work_item(&mut self) {
        self.work_items.push(WorkItemDraft::fresh());
    }

    /// Remove a row by id. No-op when it is the only row: the editor must
    /// always retain at least one, even if blank.
    pub fn remove_work_item(&mut self, id: &str) {
        if self.work_items.len() > 1 {
            self.work_items.retain(|w| w.id != id);
        }
    }

    /// Work items with non-blank content, in draft order
    fn cleaned_items(&self) -> Vec<WorkItem> {
        self.work_items
            .iter()
            .filter(|w| !w.content.trim().is_empty())
            .map(WorkItemDraft::to_item)
            .collect()
    }

    /// Freeze the draft into a new entry. The caller is expected to have
    /// validated first; blank work-item rows are dropped here.
    pub fn commit_new(&self) -> LogEntry {
        LogEntry {
            id: utils::new_id(),
            created_at: utils::now_timestamp(),
            updated_at: None,
            date: self.date.clone(),
            job: self.job.clone(),
            writer: self.writer.clone(),
            work_items: self.cleaned_items(),
            has_issue: self.has_issue,
            issue: self.issue.clone(),
            action: self.action.clone(),
            status: self.status,
            urgency: self.urgency,
            need_report: self.need_report,
        }
    }

    /// Freeze the draft as a full-record replacement of an existing entry,
    /// keeping its identity and creation time and stamping updated_at.
    pub fn commit_update(&self, original: &LogEntry) -> LogEntry {
        LogEntry {
            id: original.id.clone(),
            created_at: original.created_at.clone(),
            updated_at: Some(utils::now_timestamp()),
            date: self.date.clone(),
            job: self.job.clone(),
            writer: self.writer.clone(),
            work_items: self.cleaned_items(),
            has_issue: self.has_issue,
            issue: self.issue.clone(),
            action: self.action.clone(),
            status: self.status,
            urgency: self.urgency,
            need_report: self.need_report,
        }
    }
}
