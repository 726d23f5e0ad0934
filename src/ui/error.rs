use sitefront::SitefrontError;

use crate::ui::ci::{github_actions_annotation, in_github_actions, AnnotationLevel};
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Suggested next step for errors a user can act on
fn fix_hint(err: &SitefrontError) -> Option<&'static str> {
    match err {
        SitefrontError::Read { .. } => {
            Some("Check [site] source in site.toml or build the site first.")
        }
        SitefrontError::Publish { .. } => {
            Some("Nothing was recorded; rerun `sitefront converge` to retry.")
        }
        SitefrontError::StateLocked { .. } => {
            Some("Wait for the other run to finish, then try again.")
        }
        SitefrontError::Config { .. } => Some("Run `sitefront init` to see every option."),
        SitefrontError::State(_) => {
            Some("Remove the state file to rebuild it from the provider on the next run.")
        }
        _ => None,
    }
}

pub fn format_error(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    let mut out = format!(
        "{} {}\n",
        Icon::Error.colored(supports_color, supports_unicode),
        err
    );
    for cause in err.chain().skip(1) {
        out.push_str(&format!(
            "  {} {}\n",
            Icon::Arrow.colored(supports_color, supports_unicode),
            ColoredText::dim(cause.to_string()).render(supports_color)
        ));
    }
    if let Some(hint) = err.downcast_ref::<SitefrontError>().and_then(fix_hint) {
        out.push_str(&format!(
            "\n{} {}\n",
            ColoredText::info("Fix:").bold().render(supports_color),
            hint
        ));
    }
    out
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let output = serde_json::json!({
            "event": "error",
            "message": err.to_string(),
        });
        let _ = crate::ui::json::emit(output);
        return;
    }

    if in_github_actions() {
        println!(
            "{}",
            github_actions_annotation(AnnotationLevel::Error, &format!("{err:#}"), None, None)
        );
    }

    let caps = crate::ui::terminal::detect_capabilities();
    eprint!(
        "{}",
        format_error(err, caps.supports_color, caps.supports_unicode)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn locked_state_suggests_waiting() {
        let err = anyhow::Error::new(SitefrontError::StateLocked {
            path: PathBuf::from(".sitefront/state.toml"),
        });
        let rendered = format_error(&err, false, false);
        assert!(rendered.starts_with("[FAIL] state .sitefront/state.toml is locked"));
        assert!(rendered.contains("Fix: Wait for the other run"));
    }

    #[test]
    fn context_chain_is_listed() {
        let err = anyhow::anyhow!("disk full").context("saving state");
        let rendered = format_error(&err, false, false);
        assert_eq!(rendered, "[FAIL] saving state\n  -> disk full\n");
    }
}
