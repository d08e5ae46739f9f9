use serde::{Deserialize, Serialize};

/// Which backend import endpoint a spreadsheet goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportKind {
    #[default]
    Students,
    Courses,
    TransferRows,
}

impl ImportKind {
    pub const ALL: [ImportKind; 3] = [
        ImportKind::Students,
        ImportKind::Courses,
        ImportKind::TransferRows,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "students" => Some(ImportKind::Students),
            "courses" => Some(ImportKind::Courses),
            "transfer-rows" => Some(ImportKind::TransferRows),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Students => "students",
            ImportKind::Courses => "courses",
            ImportKind::TransferRows => "transfer-rows",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImportKind::Students => "Sinh viên",
            ImportKind::Courses => "Học phần",
            ImportKind::TransferRows => "Chuyển điểm",
        }
    }

    pub fn endpoint(&self) -> String {
        format!("/import/{}", self.as_str())
    }

    /// Expected spreadsheet columns
    pub fn format_hint(&self) -> &'static str {
        match self {
            ImportKind::Students => {
                "Mã SV, Họ tên, Email, SĐT, Mã lớp, Ngày sinh, Giới tính, Địa chỉ"
            }
            ImportKind::Courses => "Mã HP, Tên HP, Số tín chỉ, Mô tả",
            ImportKind::TransferRows => {
                "Mã SV, Mã HP gốc, Tên HP gốc, TC gốc, Mã HP chuyển, Tên HP chuyển, TC chuyển, Điểm"
            }
        }
    }

    pub fn needs_batch(&self) -> bool {
        matches!(self, ImportKind::TransferRows)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRowError {
    #[serde(default)]
    pub row: Option<u64>,
    pub error: String,
}

/// Response of the import endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    #[serde(default)]
    pub success: u64,
    #[serde(default)]
    pub errors: Vec<ImportRowError>,
}

impl ImportReport {
    /// Report standing in for an upload that failed as a whole
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: 0,
            errors: vec![ImportRowError {
                row: None,
                error: message.into(),
            }],
        }
    }

    pub fn summary(&self) -> String {
        format!("Import thành công: {} bản ghi", self.success)
    }

    pub fn error_lines(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| {
                let row = e
                    .row
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                format!("Dòng {}: {}", row, e.error)
            })
            .collect()
    }
}
