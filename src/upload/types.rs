use crate::error::Error;
use serde_json::{json, Value};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FileKind {
    #[default]
    A2,
    Sec,
    Evaluation,
    UnitChange,
    NewWells,
    PudPdpPdnp,
    SecUnitChange,
    HistoricalProd,
}

impl FileKind {
    pub const ALL: [FileKind; 8] = [
        FileKind::A2,
        FileKind::Sec,
        FileKind::Evaluation,
        FileKind::UnitChange,
        FileKind::NewWells,
        FileKind::PudPdpPdnp,
        FileKind::SecUnitChange,
        FileKind::HistoricalProd,
    ];

    /// Value of the multipart `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::A2 => "a2",
            FileKind::Sec => "sec",
            FileKind::Evaluation => "evaluation",
            FileKind::UnitChange => "unit_change",
            FileKind::NewWells => "new_wells",
            FileKind::PudPdpPdnp => "pud_pdp_pdnp",
            FileKind::SecUnitChange => "sec_unit_change",
            FileKind::HistoricalProd => "historical_prod",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::A2 => "A2表",
            FileKind::Sec => "SEC表",
            FileKind::Evaluation => "评估数据表",
            FileKind::UnitChange => "单元变化表",
            FileKind::NewWells => "老区新井表",
            FileKind::PudPdpPdnp => "PUD转PDP表",
            FileKind::SecUnitChange => "SEC单元变化表",
            FileKind::HistoricalProd => "历史生产数据表",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, Error> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Io(format!("invalid file name: {}", path.display())))?
            .to_string();
        let bytes = tokio::fs::read(path).await?;

        Ok(Self::new(file_name, bytes))
    }
}

/// Fields the service usually puts in an upload or compare response.
/// Each field is read on its own, so one odd value never hides the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadSummary {
    pub success: bool,
    pub message: Option<String>,
    pub cache_key: Option<String>,
    pub rows: Option<u64>,
    pub columns: Vec<String>,
    pub output_file: Option<String>,
}

impl UploadSummary {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

        // Column headers are not always strings (numeric headers in spreadsheets).
        let columns = value
            .get("columns")
            .and_then(Value::as_array)
            .map(|columns| {
                columns
                    .iter()
                    .map(|column| match column {
                        Value::String(name) => name.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            success: value.get("success").and_then(Value::as_bool).unwrap_or(false),
            message: text("message"),
            cache_key: text("cache_key"),
            rows: value.get("rows").and_then(Value::as_u64),
            columns,
            output_file: text("output_file"),
        }
    }
}

/// Comparisons the service runs over previously uploaded tables, addressed
/// by the `cache_key`s their uploads returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareRequest {
    /// A2 table against the SEC table for one `yyyymm` period.
    A2Sec {
        a2_key: String,
        sec_key: String,
        year_month: u32,
    },
    /// Last year's A2 table against this year's.
    A2Years {
        last_year_key: String,
        this_year_key: String,
        year: u32,
    },
}

impl CompareRequest {
    pub fn path(&self) -> [&'static str; 2] {
        match self {
            CompareRequest::A2Sec { .. } => ["business1", "compare"],
            CompareRequest::A2Years { .. } => ["business2", "compare"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompareRequest::A2Sec { .. } => "A2/SEC对比",
            CompareRequest::A2Years { .. } => "A2年度对比",
        }
    }

    pub fn body(&self) -> Value {
        match self {
            CompareRequest::A2Sec {
                a2_key,
                sec_key,
                year_month,
            } => json!({
                "a2_key": a2_key,
                "sec_key": sec_key,
                "year_month": year_month,
            }),
            CompareRequest::A2Years {
                last_year_key,
                this_year_key,
                year,
            } => json!({
                "last_year_key": last_year_key,
                "this_year_key": this_year_key,
                "year": year,
            }),
        }
    }
}

/// What a background request is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Upload(FileKind),
    Compare,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Upload(kind) => kind.as_str(),
            TaskKind::Compare => "compare",
        }
    }
}

#[derive(Debug, Clone)]
pub enum UploadStatus {
    Processing,
    Success(Value),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct FileStatus {
    /// Identifies one request; its final status replaces the `Processing` one.
    pub id: u64,
    pub name: String,
    pub task: TaskKind,
    pub status: UploadStatus,
}
