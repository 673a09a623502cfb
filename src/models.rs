use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::utils;

/// Fixed set of job categories an entry can be filed under
pub const JOBS: [&str; 9] = [
    "전기",
    "소방",
    "기계/공조",
    "냉난방",
    "급배수",
    "승강기",
    "통신",
    "보안/경비",
    "기타",
];

/// Known staff identities allowed as entry writers
pub const WRITERS: [&str; 4] = ["임상식", "김병삼", "한승조", "김동철"];

/// How many recent incident entries the summary shows
pub const RECENT_ISSUE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meridiem {
    #[serde(rename = "오전")]
    Am,
    #[serde(rename = "오후")]
    Pm,
}

impl Meridiem {
    pub fn label(self) -> &'static str {
        match self {
            Meridiem::Am => "오전",
            Meridiem::Pm => "오후",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }
}

/// Time of a work item. New items are authored with the 12-hour picker
/// fields; entries written by older clients carry a plain 24-hour "HH:MM"
/// string instead. Both forms round-trip through serialization unchanged
/// and render identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeSpec {
    Twelve {
        ampm: Meridiem,
        hour: String, // "01".."12"
        min: String,  // "00", "10", .. "50"
    },
    Raw {
        time: String, // "HH:MM"
    },
}

/// Selectable hour values for the 12-hour picker
pub const HOURS: [&str; 12] = [
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
];

/// Selectable minute values (10-minute grid)
pub const MINUTES: [&str; 6] = ["00", "10", "20", "30", "40", "50"];

impl TimeSpec {
    /// Current local time, rounded down to the 10-minute grid
    pub fn now() -> Self {
        use chrono::Timelike;
        let now = chrono::Local::now();
        let h = now.hour();
        let min = (now.minute() / 10) * 10;
        let ampm = if h < 12 { Meridiem::Am } else { Meridiem::Pm };
        let mut hour = h % 12;
        if hour == 0 {
            hour = 12;
        }
        TimeSpec::Twelve {
            ampm,
            hour: format!("{:02}", hour),
            min: format!("{:02}", min),
        }
    }

    /// Canonical 24-hour "HH:MM" value, used for comparison and storage
    /// of the normalized form
    pub fn to_24h(&self) -> String {
        match self {
            TimeSpec::Twelve { ampm, hour, min } => {
                let mut h: u32 = hour.parse().unwrap_or(12);
                match ampm {
                    Meridiem::Am => {
                        if h == 12 {
                            h = 0;
                        }
                    }
                    Meridiem::Pm => {
                        if h != 12 {
                            h += 12;
                        }
                    }
                }
                format!("{:02}:{}", h, min)
            }
            TimeSpec::Raw { time } => time.clone(),
        }
    }

    /// 12-hour picker parts, converting the legacy form when needed.
    /// The editor only ever writes the 12-hour form.
    pub fn twelve_parts(&self) -> (Meridiem, String, String) {
        match self {
            TimeSpec::Twelve { ampm, hour, min } => (*ampm, hour.clone(), min.clone()),
            TimeSpec::Raw { time } => {
                let (h, m) = match time.split_once(':') {
                    Some((h, m)) => (h.parse::<u32>().unwrap_or(0), m.to_string()),
                    None => (0, "00".to_string()),
                };
                let ampm = if h < 12 { Meridiem::Am } else { Meridiem::Pm };
                let mut hour = h % 12;
                if hour == 0 {
                    hour = 12;
                }
                (ampm, format!("{:02}", hour), m)
            }
        }
    }

    /// Display form, e.g. "오전 9:00" (both encodings render the same way)
    pub fn display(&self) -> String {
        let (ampm, hour, min) = self.twelve_parts();
        let hour_num: u32 = hour.parse().unwrap_or(0);
        format!("{} {}:{}", ampm.label(), hour_num, min)
    }
}

/// One timestamped sub-task within an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    #[serde(flatten)]
    pub time: TimeSpec,
    pub content: String,
}

impl WorkItem {
    pub fn new(time: TimeSpec, content: String) -> Self {
        Self {
            id: utils::new_id(),
            time,
            content,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueStatus {
    #[serde(rename = "완료")]
    Done,
    #[serde(rename = "진행중")]
    InProgress,
    #[serde(rename = "미결")]
    Open,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 3] = [IssueStatus::Done, IssueStatus::InProgress, IssueStatus::Open];

    pub fn label(self) -> &'static str {
        match self {
            IssueStatus::Done => "완료",
            IssueStatus::InProgress => "진행중",
            IssueStatus::Open => "미결",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    #[serde(rename = "일반")]
    Normal,
    #[serde(rename = "주의")]
    Caution,
    #[serde(rename = "긴급")]
    Urgent,
}

impl Urgency {
    pub const ALL: [Urgency; 3] = [Urgency::Normal, Urgency::Caution, Urgency::Urgent];

    pub fn label(self) -> &'static str {
        match self {
            Urgency::Normal => "일반",
            Urgency::Caution => "주의",
            Urgency::Urgent => "긴급",
        }
    }
}

fn default_status() -> IssueStatus {
    IssueStatus::Done
}

fn default_urgency() -> Urgency {
    Urgency::Normal
}

/// One submitted daily work-log record. Serialized field names are
/// camelCase so the stored payload stays compatible with entries written
/// by the original web client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub date: String, // YYYY-MM-DD
    pub job: String,
    pub writer: String,
    #[serde(default)]
    pub work_items: Vec<WorkItem>,
    #[serde(default)]
    pub has_issue: bool,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub action: String,
    #[serde(default = "default_status")]
    pub status: IssueStatus,
    #[serde(default = "default_urgency")]
    pub urgency: Urgency,
    #[serde(default)]
    pub need_report: bool,
}

/// Replace the entry matching `updated.id` in place, preserving its
/// position. No-op if the id is absent (e.g. removed by another user
/// between poll cycles).
pub fn apply_edit(entries: &mut Vec<LogEntry>, updated: LogEntry) {
    if let Some(slot) = entries.iter_mut().find(|e| e.id == updated.id) {
        *slot = updated;
    }
}

/// Remove the entry with the given id. No-op if absent.
pub fn remove_entry(entries: &mut Vec<LogEntry>, id: &str) {
    entries.retain(|e| e.id != id);
}

/// Browse filter over the collection. Each dimension is either a wildcard
/// (None) or an exact match; supplied dimensions AND together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub date: Option<String>,
    pub job: Option<String>,
    pub writer: Option<String>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        let date_ok = self.date.as_ref().is_none_or(|d| &entry.date == d);
        let job_ok = self.job.as_ref().is_none_or(|j| &entry.job == j);
        let writer_ok = self.writer.as_ref().is_none_or(|w| &entry.writer == w);
        date_ok && job_ok && writer_ok
    }

    /// Matching entries in collection order
    pub fn apply(&self, entries: &[LogEntry]) -> Vec<LogEntry> {
        entries.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

/// Aggregate status over the full collection. Always computed fresh from
/// the current entries, never cached, so poll-driven replacements are
/// reflected immediately.
#[derive(Debug, Clone)]
pub struct Summary {
    pub today_count: usize,
    pub submitted_writers: HashSet<String>,
    pub open_count: usize,
    pub urgent_count: usize,
    pub recent_issues: Vec<LogEntry>,
    pub week_issue_count: usize,
}

impl Summary {
    pub fn compute(entries: &[LogEntry], today: &str) -> Self {
        let today_count = entries.iter().filter(|e| e.date == today).count();
        let submitted_writers: HashSet<String> = entries
            .iter()
            .filter(|e| e.date == today)
            .map(|e| e.writer.clone())
            .collect();
        let open_count = entries
            .iter()
            .filter(|e| e.has_issue && e.status == IssueStatus::Open)
            .count();
        let urgent_count = entries
            .iter()
            .filter(|e| e.has_issue && e.urgency == Urgency::Urgent)
            .count();
        let recent_issues: Vec<LogEntry> = entries
            .iter()
            .filter(|e| e.has_issue)
            .take(RECENT_ISSUE_LIMIT)
            .cloned()
            .collect();

        // Calendar-date comparison over the trailing 7 days, inclusive
        let week_issue_count = match utils::parse_date(today) {
            Ok(today_date) => {
                let week_ago = today_date - chrono::Duration::days(7);
                entries
                    .iter()
                    .filter(|e| {
                        e.has_issue
                            && utils::parse_date(&e.date).is_ok_and(|d| d >= week_ago)
                    })
                    .count()
            }
            Err(_) => 0,
        };

        Self {
            today_count,
            submitted_writers,
            open_count,
            urgent_count,
            recent_issues,
            week_issue_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, date: &str, job: &str, writer: &str) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            created_at: "2024-05-01T09:00:00+00:00".to_string(),
            updated_at: None,
            date: date.to_string(),
            job: job.to_string(),
            writer: writer.to_string(),
            work_items: vec![WorkItem {
                id: format!("{}-w1", id),
                time: TimeSpec::Twelve {
                    ampm: Meridiem::Am,
                    hour: "09".to_string(),
                    min: "00".to_string(),
                },
                content: "점검".to_string(),
            }],
            has_issue: false,
            issue: String::new(),
            action: String::new(),
            status: IssueStatus::Done,
            urgency: Urgency::Normal,
            need_report: false,
        }
    }

    fn issue_entry(id: &str, date: &str, status: IssueStatus, urgency: Urgency) -> LogEntry {
        let mut e = entry(id, date, "전기", "임상식");
        e.has_issue = true;
        e.issue = "누전 의심".to_string();
        e.status = status;
        e.urgency = urgency;
        e
    }

    #[test]
    fn twelve_hour_to_24h_conversion() {
        let am9 = TimeSpec::Twelve {
            ampm: Meridiem::Am,
            hour: "09".to_string(),
            min: "00".to_string(),
        };
        assert_eq!(am9.to_24h(), "09:00");

        let midnight = TimeSpec::Twelve {
            ampm: Meridiem::Am,
            hour: "12".to_string(),
            min: "30".to_string(),
        };
        assert_eq!(midnight.to_24h(), "00:30");

        let noon = TimeSpec::Twelve {
            ampm: Meridiem::Pm,
            hour: "12".to_string(),
            min: "10".to_string(),
        };
        assert_eq!(noon.to_24h(), "12:10");

        let pm3 = TimeSpec::Twelve {
            ampm: Meridiem::Pm,
            hour: "03".to_string(),
            min: "50".to_string(),
        };
        assert_eq!(pm3.to_24h(), "15:50");
    }

    #[test]
    fn raw_and_twelve_forms_render_equivalently() {
        let twelve = TimeSpec::Twelve {
            ampm: Meridiem::Pm,
            hour: "02".to_string(),
            min: "30".to_string(),
        };
        let raw = TimeSpec::Raw {
            time: "14:30".to_string(),
        };
        assert_eq!(twelve.display(), raw.display());
        assert_eq!(twelve.display(), "오후 2:30");

        // Midnight edge of the legacy form
        let raw_midnight = TimeSpec::Raw {
            time: "00:10".to_string(),
        };
        assert_eq!(raw_midnight.display(), "오전 12:10");
    }

    #[test]
    fn serialization_round_trips_both_time_encodings() {
        let mut e = entry("a", "2024-05-01", "전기", "임상식");
        e.work_items.push(WorkItem {
            id: "a-w2".to_string(),
            time: TimeSpec::Raw {
                time: "14:30".to_string(),
            },
            content: "필터 교체".to_string(),
        });
        let collection = vec![e, issue_entry("b", "2024-05-02", IssueStatus::Open, Urgency::Urgent)];

        let json = serde_json::to_string(&collection).unwrap();
        let back: Vec<LogEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, collection);

        // The stored shape stays camelCase with Korean enum values
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"workItems\""));
        assert!(json.contains("\"hasIssue\""));
        assert!(json.contains("\"오전\""));
        assert!(json.contains("\"time\":\"14:30\""));
        assert!(json.contains("\"미결\""));
    }

    #[test]
    fn deserializes_legacy_payload_with_missing_fields() {
        // Entries written before work items / issue fields existed
        let json = r#"[{"id":"x","createdAt":"2024-01-01T00:00:00Z","date":"2024-01-01","job":"기타","writer":"김병삼"}]"#;
        let entries: Vec<LogEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].work_items.len(), 0);
        assert!(!entries[0].has_issue);
        assert_eq!(entries[0].status, IssueStatus::Done);
        assert_eq!(entries[0].urgency, Urgency::Normal);
    }

    #[test]
    fn filter_dimensions_and_together() {
        let entries = vec![
            entry("a", "2024-05-01", "전기", "임상식"),
            entry("b", "2024-05-01", "소방", "임상식"),
            entry("c", "2024-05-02", "전기", "김병삼"),
        ];

        let all = EntryFilter::default();
        assert_eq!(all.apply(&entries).len(), 3);

        let f = EntryFilter {
            date: Some("2024-05-01".to_string()),
            job: Some("전기".to_string()),
            writer: None,
        };
        let hits = f.apply(&entries);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
    }

    #[test]
    fn filter_is_idempotent() {
        let entries = vec![
            entry("a", "2024-05-01", "전기", "임상식"),
            entry("b", "2024-05-02", "소방", "김병삼"),
        ];
        let f = EntryFilter {
            date: None,
            job: None,
            writer: Some("임상식".to_string()),
        };
        let once = f.apply(&entries);
        let twice = f.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn apply_edit_replaces_in_place() {
        let mut entries = vec![
            entry("a", "2024-05-01", "전기", "임상식"),
            entry("b", "2024-05-01", "소방", "김병삼"),
            entry("c", "2024-05-02", "기타", "한승조"),
        ];
        let mut updated = entries[1].clone();
        updated.job = "승강기".to_string();
        apply_edit(&mut entries, updated);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].id, "b");
        assert_eq!(entries[1].job, "승강기");
    }

    #[test]
    fn apply_edit_missing_id_is_noop() {
        let mut entries = vec![entry("a", "2024-05-01", "전기", "임상식")];
        let ghost = entry("zz", "2024-05-01", "소방", "김병삼");
        apply_edit(&mut entries, ghost);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].job, "전기");
    }

    #[test]
    fn remove_entry_by_id() {
        let mut entries = vec![
            entry("a", "2024-05-01", "전기", "임상식"),
            entry("b", "2024-05-01", "소방", "김병삼"),
        ];
        remove_entry(&mut entries, "a");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "b");

        remove_entry(&mut entries, "missing");
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn summary_counts_and_writers() {
        let entries = vec![
            issue_entry("a", "2024-05-10", IssueStatus::Open, Urgency::Urgent),
            issue_entry("b", "2024-05-09", IssueStatus::InProgress, Urgency::Caution),
            issue_entry("c", "2024-05-01", IssueStatus::Open, Urgency::Normal),
            entry("d", "2024-05-10", "소방", "김병삼"),
        ];
        let summary = Summary::compute(&entries, "2024-05-10");

        assert_eq!(summary.today_count, 2);
        assert!(summary.submitted_writers.contains("임상식"));
        assert!(summary.submitted_writers.contains("김병삼"));
        assert_eq!(summary.open_count, 2);
        assert_eq!(summary.urgent_count, 1);
        // "c" is 9 days old, outside the trailing week
        assert_eq!(summary.week_issue_count, 2);
        assert_eq!(summary.recent_issues.len(), 3);
        assert_eq!(summary.recent_issues[0].id, "a");
    }

    #[test]
    fn summary_reflects_replaced_collection() {
        // A poll result where another user closed the incident must drop
        // the open count on the next recompute.
        let before = vec![issue_entry("a", "2024-05-10", IssueStatus::Open, Urgency::Normal)];
        assert_eq!(Summary::compute(&before, "2024-05-10").open_count, 1);

        let mut after = before.clone();
        after[0].status = IssueStatus::Done;
        assert_eq!(Summary::compute(&after, "2024-05-10").open_count, 0);
    }
}
