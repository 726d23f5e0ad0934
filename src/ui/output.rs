use sitefront::config::ConfigWarning;

use crate::ui::ci::{github_actions_annotation, in_github_actions, AnnotationLevel};
use crate::ui::primitives::icon::Icon;

pub fn format_config_warning(warning: &ConfigWarning, supports_unicode: bool) -> String {
    let icon = Icon::Warning.render(supports_unicode);
    let mut out = format!("{icon} {warning}\n");
    if let Some(suggestion) = &warning.suggestion {
        out.push_str(&format!("   Did you mean '{suggestion}'?\n"));
    }
    out
}

pub fn print_config_warnings(warnings: &[ConfigWarning], supports_unicode: bool) {
    let annotate = in_github_actions();
    for w in warnings {
        eprint!("{}", format_config_warning(w, supports_unicode));
        if annotate {
            let file = w.file.display().to_string();
            println!(
                "{}",
                github_actions_annotation(
                    AnnotationLevel::Warning,
                    &format!("Unknown config key '{}'", w.key),
                    Some(&file),
                    w.line,
                )
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn warning_names_line_and_suggestion() {
        let warning = ConfigWarning::unknown_key(
            Path::new("site.toml"),
            "[bucket]\nname = \"my-site\"\nregoin = \"eu-west-1\"\n",
            "bucket.regoin",
        )
        .with_suggestion(Some("region"));
        assert_eq!(
            format_config_warning(&warning, false),
            "[WARN] Unknown config key 'regoin' in site.toml:3\n   Did you mean 'region'?\n"
        );
    }
}
