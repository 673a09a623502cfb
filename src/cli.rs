use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::models::{
    IssueStatus, LogEntry, Summary, TimeSpec, Urgency, WorkItem, JOBS, WRITERS,
};
use crate::store::{KvStore, StoreError};
use crate::sync::STORAGE_KEY;
use crate::utils::{self, parse_date};

#[derive(Parser)]
#[command(name = "facilog")]
#[command(about = "Facility maintenance logbook - a shared terminal journal")]
#[command(version)]
pub struct Cli {
    /// Use development mode (uses separate dev config/store)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Quickly add a log entry without entering the TUI
    Add {
        /// Job category (one of: 전기, 소방, 기계/공조, 냉난방, 급배수, 승강기, 통신, 보안/경비, 기타)
        job: String,
        /// Writer name
        writer: String,
        /// Work description
        work: String,
        /// Entry date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Issue description (marks the entry as having an issue)
        #[arg(long)]
        issue: Option<String>,
        /// Action taken for the issue
        #[arg(long)]
        action: Option<String>,
        /// Issue status (완료, 진행중, 미결)
        #[arg(long)]
        status: Option<String>,
        /// Issue urgency (일반, 주의, 긴급)
        #[arg(long)]
        urgency: Option<String>,
        /// Flag the entry as needing a report
        #[arg(long)]
        need_report: bool,
    },
    /// Print today's summary of the shared logbook
    Summary {
        /// Date to summarize (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),
    #[error("Failed to parse stored entries: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

fn parse_status(label: &str) -> Result<IssueStatus, CliError> {
    IssueStatus::ALL
        .iter()
        .copied()
        .find(|s| s.label() == label)
        .ok_or_else(|| CliError::InvalidValue(format!("unknown status '{}'", label)))
}

fn parse_urgency(label: &str) -> Result<Urgency, CliError> {
    Urgency::ALL
        .iter()
        .copied()
        .find(|u| u.label() == label)
        .ok_or_else(|| CliError::InvalidValue(format!("unknown urgency '{}'", label)))
}

fn load_entries(store: &dyn KvStore) -> Result<Vec<LogEntry>, CliError> {
    match store.get(STORAGE_KEY)? {
        Some(value) => Ok(serde_json::from_str(&value)?),
        None => Ok(Vec::new()),
    }
}

fn save_entries(store: &dyn KvStore, entries: &[LogEntry]) -> Result<(), CliError> {
    let json = serde_json::to_string(entries)?;
    store.set(STORAGE_KEY, &json)?;
    Ok(())
}

/// Handle the add command
#[allow(clippy::too_many_arguments)]
pub fn handle_add(
    job: String,
    writer: String,
    work: String,
    date: Option<String>,
    issue: Option<String>,
    action: Option<String>,
    status: Option<String>,
    urgency: Option<String>,
    need_report: bool,
    store: &dyn KvStore,
) -> Result<(), CliError> {
    if !JOBS.contains(&job.as_str()) {
        return Err(CliError::InvalidValue(format!(
            "unknown job '{}' (expected one of: {})",
            job,
            JOBS.join(", ")
        )));
    }
    if !WRITERS.contains(&writer.as_str()) {
        return Err(CliError::InvalidValue(format!(
            "unknown writer '{}' (expected one of: {})",
            writer,
            WRITERS.join(", ")
        )));
    }
    if work.trim().is_empty() {
        return Err(CliError::InvalidValue("work description is empty".to_string()));
    }

    let date = match date {
        Some(d) => {
            parse_date(&d).map_err(|e| {
                CliError::DateParseError(format!("Invalid date format '{}': {}", d, e))
            })?;
            d
        }
        None => utils::today(),
    };

    let status = match status {
        Some(s) => parse_status(&s)?,
        None => IssueStatus::Done,
    };
    let urgency = match urgency {
        Some(u) => parse_urgency(&u)?,
        None => Urgency::Normal,
    };

    let entry = LogEntry {
        id: utils::new_id(),
        created_at: utils::now_timestamp(),
        updated_at: None,
        date,
        job,
        writer,
        work_items: vec![WorkItem {
            id: utils::new_id(),
            time: TimeSpec::now(),
            content: work,
        }],
        has_issue: issue.is_some(),
        issue: issue.unwrap_or_default(),
        action: action.unwrap_or_default(),
        status,
        urgency,
        need_report,
    };

    // Newest entries sit at the front of the collection
    let mut entries = load_entries(store)?;
    entries.insert(0, entry);
    save_entries(store, &entries)?;

    println!("Log entry created ({} entries total)", entries.len());
    Ok(())
}

/// Handle the summary command
pub fn handle_summary(date: Option<String>, store: &dyn KvStore) -> Result<(), CliError> {
    let date = match date {
        Some(d) => {
            parse_date(&d).map_err(|e| {
                CliError::DateParseError(format!("Invalid date format '{}': {}", d, e))
            })?;
            d
        }
        None => utils::today(),
    };

    let entries = load_entries(store)?;
    let summary = Summary::compute(&entries, &date);

    println!("요약 ({})", utils::fmt_date(&date));
    println!("  오늘 작성된 일지: {}", summary.today_count);
    if summary.submitted_writers.is_empty() {
        println!("  작성자: 없음");
    } else {
        let mut writers: Vec<&str> = summary
            .submitted_writers
            .iter()
            .map(String::as_str)
            .collect();
        writers.sort_unstable();
        println!("  작성자: {}", writers.join(", "));
    }
    println!("  미결 특이사항: {}", summary.open_count);
    println!("  긴급 특이사항: {}", summary.urgent_count);
    println!("  최근 7일 특이사항: {}", summary.week_issue_count);
    if !summary.recent_issues.is_empty() {
        println!("  최근 특이사항:");
        for entry in &summary.recent_issues {
            println!(
                "    [{}] {} - {} ({})",
                utils::fmt_date(&entry.date),
                entry.job,
                entry.issue,
                entry.status.label()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::collections::HashMap;

    struct MemStore {
        data: RefCell<HashMap<String, String>>,
    }

    impl MemStore {
        fn new() -> Self {
            Self {
                data: RefCell::new(HashMap::new()),
            }
        }
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

    fn add_basic(store: &dyn KvStore, work: &str) {
        handle_add(
            "전기".to_string(),
            "임상식".to_string(),
            work.to_string(),
            None,
            None,
            None,
            None,
            None,
            false,
            store,
        )
        .unwrap();
    }

    #[test]
    fn add_prepends_to_the_shared_collection() {
        let store = MemStore::new();
        add_basic(&store, "분전반 점검");
        add_basic(&store, "비상등 교체");

        let entries = load_entries(&store).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].work_items[0].content, "비상등 교체");
        assert_eq!(entries[1].work_items[0].content, "분전반 점검");
    }

    #[test]
    fn add_rejects_unknown_job_and_writer() {
        let store = MemStore::new();
        let result = handle_add(
            "원예".to_string(),
            "임상식".to_string(),
            "x".to_string(),
            None,
            None,
            None,
            None,
            None,
            false,
            &store,
        );
        assert!(matches!(result, Err(CliError::InvalidValue(_))));

        let result = handle_add(
            "전기".to_string(),
            "아무개".to_string(),
            "x".to_string(),
            None,
            None,
            None,
            None,
            None,
            false,
            &store,
        );
        assert!(matches!(result, Err(CliError::InvalidValue(_))));
    }

    #[test]
    fn add_with_issue_sets_the_flag_and_fields() {
        let store = MemStore::new();
        handle_add(
            "소방".to_string(),
            "김병삼".to_string(),
            "수신기 점검".to_string(),
            Some("2024-05-01".to_string()),
            Some("감지기 오작동".to_string()),
            Some("교체 예정".to_string()),
            Some("진행중".to_string()),
            Some("긴급".to_string()),
            true,
            &store,
        )
        .unwrap();

        let entries = load_entries(&store).unwrap();
        let entry = &entries[0];
        assert!(entry.has_issue);
        assert_eq!(entry.issue, "감지기 오작동");
        assert_eq!(entry.action, "교체 예정");
        assert_eq!(entry.status, IssueStatus::InProgress);
        assert_eq!(entry.urgency, Urgency::Urgent);
        assert!(entry.need_report);
        assert_eq!(entry.date, "2024-05-01");
    }

    #[test]
    fn add_rejects_malformed_date() {
        let store = MemStore::new();
        let result = handle_add(
            "전기".to_string(),
            "임상식".to_string(),
            "x".to_string(),
            Some("05/01/2024".to_string()),
            None,
            None,
            None,
            None,
            false,
            &store,
        );
        assert!(matches!(result, Err(CliError::DateParseError(_))));
    }

    #[test]
    fn status_and_urgency_labels_parse() {
        assert_eq!(parse_status("완료").unwrap(), IssueStatus::Done);
        assert_eq!(parse_status("미결").unwrap(), IssueStatus::Open);
        assert!(parse_status("done").is_err());
        assert_eq!(parse_urgency("주의").unwrap(), Urgency::Caution);
        assert!(parse_urgency("높음").is_err());
    }

    #[test]
    fn summary_runs_on_an_empty_store() {
        let store = MemStore::new();
        handle_summary(Some("2024-05-01".to_string()), &store).unwrap();
    }
}
