use std::path::Path;

use sitefront::domain::entities::ConvergenceState;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_status(
    state: &ConvergenceState,
    state_path: &Path,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        ColoredText::info("State").bold().render(supports_color),
        state_path.display()
    ));

    if state.is_empty() && state.distribution().is_none() {
        out.push_str("  never converged\n");
        return out;
    }

    if let Some(bucket) = state.bucket() {
        out.push_str(&format!("  bucket: {bucket}\n"));
    }
    out.push_str(&format!("  objects: {}\n", state.object_count()));
    if let Some(distribution) = state.distribution() {
        out.push_str(&format!(
            "  distribution: {} (https://{})\n",
            distribution.id, distribution.domain_name
        ));
    }
    if let Some(at) = state.last_converged() {
        out.push_str(&format!(
            "  last converged: {}\n",
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    let pending = state.pending_invalidation();
    if !pending.is_empty() {
        out.push_str(&format!(
            "{} {} pending invalidation paths: {}\n",
            Icon::Warning.colored(supports_color, supports_unicode),
            pending.len(),
            pending.iter().cloned().collect::<Vec<_>>().join(", ")
        ));
    }
    out
}
