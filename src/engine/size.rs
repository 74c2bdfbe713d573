//! Context size estimates for merged rule sets.

/// Merged sets at or above this size get a warning.
pub const SAFE_LIMIT: usize = 50 * 1024;
/// Merged sets at or above this size are a risk.
pub const WARNING_LIMIT: usize = 100 * 1024;

/// Rough token estimate at four bytes per token.
pub fn estimate_tokens(bytes: usize) -> usize {
    (bytes as f64 / 4.0).round() as usize
}

/// Human-readable size, e.g. `512 B`, `1.50 KB`, `2.00 MB`.
pub fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    if bytes < 1024 * 1024 {
        return format!("{:.2} KB", bytes as f64 / 1024.0);
    }
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeStatus {
    Ok,
    Warning,
    Risk,
}

impl SizeStatus {
    pub fn for_size(bytes: usize) -> Self {
        if bytes >= WARNING_LIMIT {
            Self::Risk
        } else if bytes >= SAFE_LIMIT {
            Self::Warning
        } else {
            Self::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Risk => "RISK",
        }
    }
}

/// Size of one merged rule set, or the error that prevented merging it.
#[derive(Debug)]
pub struct SizeEntry {
    pub key: String,
    pub outcome: Result<usize, String>,
}

impl SizeEntry {
    pub fn status(&self) -> Option<SizeStatus> {
        self.outcome.as_ref().ok().map(|bytes| SizeStatus::for_size(*bytes))
    }

    /// One report line: status, size, token estimate, key.
    pub fn render(&self) -> String {
        match &self.outcome {
            Ok(bytes) => format!(
                "{:<8} {:<10} (~{} tokens) {}",
                SizeStatus::for_size(*bytes).as_str(),
                format_size(*bytes),
                estimate_tokens(*bytes),
                self.key
            ),
            Err(e) => format!("{:<8} {} {}", "ERROR", self.key, e),
        }
    }
}

/// Sizes for every checked key of one scope.
#[derive(Debug, Default)]
pub struct SizeReport {
    pub entries: Vec<SizeEntry>,
}

impl SizeReport {
    pub fn push(&mut self, key: impl Into<String>, outcome: Result<usize, String>) {
        self.entries.push(SizeEntry {
            key: key.into(),
            outcome,
        });
    }

    /// The worst status seen, treating merge failures as a risk.
    pub fn worst(&self) -> SizeStatus {
        self.entries
            .iter()
            .map(|entry| entry.status().unwrap_or(SizeStatus::Risk))
            .max()
            .unwrap_or(SizeStatus::Ok)
    }
}

/// Legend line describing the thresholds.
pub fn thresholds_legend() -> String {
    format!(
        "Thresholds: Safe < {}, Warning < {}, Risk >= {}",
        format_size(SAFE_LIMIT),
        format_size(WARNING_LIMIT),
        format_size(WARNING_LIMIT)
    )
}
