//! Unknown-key warnings raised while reading `site.toml`

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Last segment of the ignored path (`regoin` for `bucket.regoin`)
    pub key: String,
    pub file: PathBuf,
    /// 1-based
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl ConfigWarning {
    /// Warning for the ignored dotted `path`, located within the file's `content`
    pub fn unknown_key(file: &Path, content: &str, path: &str) -> Self {
        let key = path.rsplit('.').next().unwrap_or(path).to_string();
        let line = content
            .lines()
            .position(|line| declares(line, &key))
            .map(|index| index + 1);
        Self {
            key,
            file: file.to_path_buf(),
            line,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: Option<&str>) -> Self {
        self.suggestion = suggestion.map(str::to_string);
        self
    }

    /// `file:line`, or just the file when the line is unknown
    pub fn location(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{line}", self.file.display()),
            None => self.file.display().to_string(),
        }
    }
}

/// Whether `line` assigns `key` or opens a `[...key]` table
fn declares(line: &str, key: &str) -> bool {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(key) {
        return rest.trim_start().starts_with('=');
    }
    line.trim_start_matches('[')
        .trim_end_matches(']')
        .rsplit('.')
        .next()
        .is_some_and(|table| table.trim() == key && line.starts_with('['))
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown config key '{}' in {}", self.key, self.location())
    }
}
