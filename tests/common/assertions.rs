//! Custom assertion macros for CLI and scenario tests.

use std::path::Path;

/// List all files in a directory recursively (for debugging)
pub fn list_all_files(dir: &Path) -> Vec<String> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(list_all_files(&path));
            } else {
                files.push(path.display().to_string());
            }
        }
    }
    files
}

/// Assert that a command's stdout or stderr contains the given text.
///
/// # Example
/// ```ignore
/// assert_output_contains!(result, "Already converged");
/// ```
#[macro_export]
macro_rules! assert_output_contains {
    ($result:expr, $needle:expr) => {
        let combined = $result.combined_output();
        assert!(
            combined.contains($needle),
            "Expected output to contain '{}'.\nstdout:\n{}\nstderr:\n{}",
            $needle,
            $result.stdout,
            $result.stderr
        );
    };
}
