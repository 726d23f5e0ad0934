use sitefront::application::{ConvergeReport, InvalidationOutcome};

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_converge_summary(
    report: &ConvergeReport,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut out = String::new();

    let (icon, title) = match (report.dry_run, report.has_changes()) {
        (true, false) => (Icon::Success, "Dry run: already converged".to_string()),
        (true, true) => (
            Icon::Warning,
            format!("Dry run: {} changes pending", report.mutation_count()),
        ),
        (false, false) => (Icon::Success, "Already converged".to_string()),
        (false, true) => (
            Icon::Success,
            format!("Converged with {} changes", report.mutation_count()),
        ),
    };
    out.push_str(&format!(
        "{} {}\n",
        icon.colored(supports_color, supports_unicode),
        ColoredText::success(title).bold().render(supports_color)
    ));

    let verb = if report.dry_run { "to upload" } else { "uploaded" };
    out.push_str(&format!("  {} files {verb}\n", report.uploaded.len()));
    out.push_str(&format!("  {} files unchanged\n", report.unchanged.len()));
    if !report.deleted.is_empty() {
        let verb = if report.dry_run { "to delete" } else { "deleted" };
        out.push_str(&format!("  {} files {verb}\n", report.deleted.len()));
    }

    if let Some(distribution) = &report.distribution {
        out.push_str(&format!(
            "  {} https://{} ({})\n",
            Icon::Cdn.colored(supports_color, supports_unicode),
            distribution.domain_name,
            distribution.id
        ));
    }

    match &report.invalidation {
        None => {}
        Some(InvalidationOutcome::Planned { paths }) => {
            out.push_str(&format!("  would invalidate {}\n", paths.join(", ")));
        }
        Some(InvalidationOutcome::Submitted {
            id,
            paths,
            completed,
        }) => {
            let state = if *completed { "completed" } else { "in progress" };
            out.push_str(&format!(
                "  invalidation {id} {state}: {}\n",
                paths.join(", ")
            ));
        }
        Some(InvalidationOutcome::Failed { paths, .. }) => {
            out.push_str(&format!(
                "  invalidation pending for next run: {}\n",
                paths.join(", ")
            ));
        }
    }

    for warning in &report.warnings {
        out.push_str(&format!(
            "{} {}\n",
            Icon::Warning.colored(supports_color, supports_unicode),
            ColoredText::warning(warning.as_str()).render(supports_color)
        ));
    }

    if report.dry_run && report.has_changes() {
        out.push_str(&format!(
            "{} {} run `sitefront converge` to apply\n",
            Icon::Arrow.colored(supports_color, supports_unicode),
            ColoredText::dim("Next:").render(supports_color)
        ));
    }

    out
}
