use crate::report::{ReportPage, StatsRecord, TreeView};
use crate::upload::{CompareRequest, FileKind, FileStatus, UploadSummary};
use derivative::Derivative;
use std::sync::mpsc::Receiver;

pub const STATS_CONTAINER: &str = "statistics";
pub const TREE_CONTAINER: &str = "tree";

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ActionProgress {
    #[default]
    NotStarted,
    Uploading {
        pending: usize,
        current: String,
    },
    Completed {
        successful: usize,
        failed: usize,
    },
}

/// A table the service has cached, usable as comparison input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedTable {
    pub kind: FileKind,
    pub cache_key: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompareMode {
    #[default]
    A2Sec,
    A2Years,
}

impl CompareMode {
    pub fn label(self) -> &'static str {
        match self {
            CompareMode::A2Sec => "A2 vs SEC",
            CompareMode::A2Years => "A2 last year vs this year",
        }
    }

    /// Table kinds feeding the first and second key.
    pub fn key_kinds(self) -> (FileKind, FileKind) {
        match self {
            CompareMode::A2Sec => (FileKind::A2, FileKind::Sec),
            CompareMode::A2Years => (FileKind::A2, FileKind::A2),
        }
    }

    pub fn period_hint(self) -> &'static str {
        match self {
            CompareMode::A2Sec => "yyyymm",
            CompareMode::A2Years => "yyyy",
        }
    }
}

/// Inputs of the comparison form.
#[derive(Clone, Debug, Default)]
pub struct CompareForm {
    pub mode: CompareMode,
    pub period: String,
    pub first_key: String,
    pub second_key: String,
}

impl CompareForm {
    pub fn request(&self) -> Result<CompareRequest, String> {
        if self.first_key.is_empty() || self.second_key.is_empty() {
            return Err("Select both tables to compare".to_string());
        }

        let period = self.period.trim();
        match self.mode {
            CompareMode::A2Sec => {
                let year_month = parse_digits(period, 6)
                    .filter(|ym| (1..=12).contains(&(ym % 100)))
                    .ok_or_else(|| format!("Invalid period, expected yyyymm: {:?}", period))?;
                Ok(CompareRequest::A2Sec {
                    a2_key: self.first_key.clone(),
                    sec_key: self.second_key.clone(),
                    year_month,
                })
            }
            CompareMode::A2Years => {
                let year = parse_digits(period, 4)
                    .ok_or_else(|| format!("Invalid year, expected yyyy: {:?}", period))?;
                Ok(CompareRequest::A2Years {
                    last_year_key: self.first_key.clone(),
                    this_year_key: self.second_key.clone(),
                    year,
                })
            }
        }
    }
}

fn parse_digits(text: &str, len: usize) -> Option<u32> {
    if text.len() != len || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[derive(Derivative)]
#[derivative(Debug, Default)]
pub struct ReportState {
    pub progress: ActionProgress,
    pub next_task_id: u64,
    pub uploaded_tables: Vec<UploadedTable>,
    pub compare_form: CompareForm,
    pub successful: usize,
    pub failed: usize,
    pub file_statuses: Vec<FileStatus>,
    pub summary: Option<UploadSummary>,
    pub stats: Option<StatsRecord>,
    pub tree: Option<TreeView>,
    #[derivative(Default(value = "ReportPage::with_containers([STATS_CONTAINER, TREE_CONTAINER])"))]
    pub page: ReportPage,
    pub error_message: Option<String>,
    pub show_details: bool,
    #[derivative(Debug = "ignore")]
    pub status_receiver: Option<Receiver<FileStatus>>,
}

impl ReportState {
    /// Drops the rendered report and history, keeping the status channel.
    pub fn clear(&mut self) {
        let receiver = self.status_receiver.take();
        let pending = self.pending();
        let next_task_id = self.next_task_id;
        *self = ReportState::default();
        self.status_receiver = receiver;
        self.next_task_id = next_task_id;
        if pending > 0 {
            self.progress = ActionProgress::Uploading {
                pending,
                current: String::new(),
            };
        }
    }

    pub fn next_task_id(&mut self) -> u64 {
        self.next_task_id += 1;
        self.next_task_id
    }

    /// Stores `status`, replacing the earlier entry of the same task.
    pub fn record_status(&mut self, status: FileStatus) {
        match self.file_statuses.iter_mut().find(|s| s.id == status.id) {
            Some(existing) => *existing = status,
            None => self.file_statuses.push(status),
        }
    }

    /// Remembers a cached table; a re-upload under the same key replaces it.
    pub fn remember_table(&mut self, table: UploadedTable) {
        self.uploaded_tables.retain(|t| t.cache_key != table.cache_key);
        self.uploaded_tables.push(table);
    }

    pub fn tables_of(&self, kind: FileKind) -> impl Iterator<Item = &UploadedTable> {
        self.uploaded_tables.iter().filter(move |t| t.kind == kind)
    }

    pub fn pending(&self) -> usize {
        match &self.progress {
            ActionProgress::Uploading { pending, .. } => *pending,
            _ => 0,
        }
    }

    pub fn begin_task(&mut self, name: &str) {
        self.progress = ActionProgress::Uploading {
            pending: self.pending() + 1,
            current: name.to_string(),
        };
    }

    /// Records the end of one request, moving to `Completed` when none remain.
    pub fn finish_task(&mut self, succeeded: bool) {
        if succeeded {
            self.successful += 1;
        } else {
            self.failed += 1;
        }

        self.progress = match &self.progress {
            ActionProgress::Uploading { pending, current } if *pending > 1 => {
                ActionProgress::Uploading {
                    pending: pending - 1,
                    current: current.clone(),
                }
            }
            _ => ActionProgress::Completed {
                successful: self.successful,
                failed: self.failed,
            },
        };
    }

    pub fn get_status_text(&self) -> String {
        match &self.progress {
            ActionProgress::NotStarted => String::new(),
            ActionProgress::Uploading { pending, current } => format!(
                "Working on {} | in flight: {} | ✅ {} | ❌ {}",
                current, pending, self.successful, self.failed
            ),
            ActionProgress::Completed { successful, failed } => {
                format!("Finished | ✅ Success: {} | ❌ Failed: {}", successful, failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::{TaskKind, UploadStatus};

    #[test]
    fn test_default_page_has_containers() {
        let state = ReportState::default();
        assert_eq!(state.page.inner_html(STATS_CONTAINER), Some(""));
        assert_eq!(state.page.inner_html(TREE_CONTAINER), Some(""));
        assert_eq!(state.progress, ActionProgress::NotStarted);
    }

    #[test]
    fn test_overlapping_uploads() {
        let mut state = ReportState::default();
        state.begin_task("a2.xlsx");
        state.begin_task("sec.xlsx");
        assert_eq!(state.pending(), 2);

        state.finish_task(true);
        assert_eq!(state.pending(), 1);

        state.finish_task(false);
        assert_eq!(
            state.progress,
            ActionProgress::Completed {
                successful: 1,
                failed: 1
            }
        );
        assert!(state.get_status_text().contains("Failed: 1"));
    }

    fn status(id: u64, status: UploadStatus) -> FileStatus {
        FileStatus {
            id,
            name: "a2.xlsx".to_string(),
            task: TaskKind::Upload(FileKind::A2),
            status,
        }
    }

    #[test]
    fn test_final_status_replaces_processing() {
        let mut state = ReportState::default();
        let first = state.next_task_id();
        let second = state.next_task_id();
        assert_ne!(first, second);

        state.record_status(status(first, UploadStatus::Processing));
        state.record_status(status(second, UploadStatus::Processing));
        state.record_status(status(first, UploadStatus::Success(serde_json::json!({}))));

        assert_eq!(state.file_statuses.len(), 2);
        assert!(matches!(state.file_statuses[0].status, UploadStatus::Success(_)));
        assert!(matches!(state.file_statuses[1].status, UploadStatus::Processing));
    }

    #[test]
    fn test_remember_table_replaces_same_key() {
        let mut state = ReportState::default();
        let table = |kind, key: &str| UploadedTable {
            kind,
            cache_key: key.to_string(),
        };
        state.remember_table(table(FileKind::A2, "a2_2023"));
        state.remember_table(table(FileKind::Sec, "sec_2024"));
        state.remember_table(table(FileKind::A2, "a2_2023"));

        assert_eq!(state.uploaded_tables.len(), 2);
        assert_eq!(state.tables_of(FileKind::A2).count(), 1);
        assert_eq!(state.uploaded_tables[1].cache_key, "a2_2023");
    }

    #[test]
    fn test_compare_form_builds_requests() {
        let mut form = CompareForm {
            mode: CompareMode::A2Sec,
            period: " 202412 ".to_string(),
            first_key: "a2_a2.xlsx".to_string(),
            second_key: "sec_sec.xlsx".to_string(),
        };
        assert_eq!(
            form.request().unwrap(),
            CompareRequest::A2Sec {
                a2_key: "a2_a2.xlsx".to_string(),
                sec_key: "sec_sec.xlsx".to_string(),
                year_month: 202412,
            }
        );

        form.period = "202413".to_string();
        assert!(form.request().unwrap_err().contains("yyyymm"));

        form.mode = CompareMode::A2Years;
        form.period = "2024".to_string();
        assert!(matches!(form.request(), Ok(CompareRequest::A2Years { year: 2024, .. })));

        form.second_key.clear();
        assert_eq!(form.request().unwrap_err(), "Select both tables to compare");
    }

    #[test]
    fn test_clear_keeps_in_flight_uploads() {
        let mut state = ReportState::default();
        state.begin_task("a2.xlsx");
        state.successful = 3;
        let id = state.next_task_id();
        state.clear();

        assert_eq!(state.successful, 0);
        assert!(state.next_task_id() > id);
        assert_eq!(state.pending(), 1);
    }
}
