//! GitHub Actions workflow annotations

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Warning,
    Error,
}

/// Whether annotations should be printed for this process
pub fn in_github_actions() -> bool {
    std::env::var_os("GITHUB_ACTIONS").is_some()
}

/// `::warning file=site.toml,line=3,title=Sitefront::message`
pub fn github_actions_annotation(
    level: AnnotationLevel,
    message: &str,
    file: Option<&str>,
    line: Option<usize>,
) -> String {
    let level_str = match level {
        AnnotationLevel::Warning => "warning",
        AnnotationLevel::Error => "error",
    };

    let mut props = Vec::new();
    if let Some(file) = file {
        props.push(format!("file={}", escape(file)));
    }
    if let Some(line) = line {
        props.push(format!("line={line}"));
    }
    props.push("title=Sitefront".to_string());

    format!("::{level_str} {}::{}", props.join(","), escape(message))
}

fn escape(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}
