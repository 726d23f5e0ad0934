use sitefront::application::{ConvergePlan, DistributionAction};

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_plan(plan: &ConvergePlan, supports_color: bool, supports_unicode: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        ColoredText::info("Plan for").bold().render(supports_color),
        plan.manifest.bucket.name
    ));

    if plan.is_converged() {
        out.push_str(&format!(
            "{} Nothing to do; remote state matches the site\n",
            Icon::Success.colored(supports_color, supports_unicode)
        ));
        return out;
    }

    for object in plan.publish.uploads() {
        let note = if object.is_new() { "new" } else { "changed" };
        out.push_str(&format!(
            "  {} {} {}\n",
            Icon::Upload.colored(supports_color, supports_unicode),
            object.key,
            ColoredText::dim(format!("({note})")).render(supports_color)
        ));
    }
    for key in &plan.publish.deletions {
        out.push_str(&format!(
            "  {} {}\n",
            Icon::Delete.colored(supports_color, supports_unicode),
            key
        ));
    }

    if plan.create_bucket {
        out.push_str("  create bucket\n");
    }
    if plan.secure_bucket {
        out.push_str("  block public access\n");
    }
    if plan.origin_access_control_id.is_none() {
        out.push_str("  create origin access control\n");
    }
    match &plan.distribution {
        DistributionAction::Create => out.push_str("  create distribution\n"),
        DistributionAction::Update { live } => {
            out.push_str(&format!("  update distribution {}\n", live.identity.id))
        }
        DistributionAction::Keep { .. } => {}
    }
    if plan.policy_change {
        out.push_str("  bind bucket policy to distribution\n");
    }
    if !plan.invalidation_paths().is_empty() {
        out.push_str(&format!(
            "  invalidate {}\n",
            plan.invalidation_paths().join(", ")
        ));
    }

    out.push_str(&format!(
        "{} {} changes, {} files unchanged\n",
        Icon::Arrow.colored(supports_color, supports_unicode),
        plan.mutations().len(),
        plan.publish.unchanged_count()
    ));
    out
}
