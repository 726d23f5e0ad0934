use std::path::Path;

use anyhow::Result;

use sitefront::domain::ports::StateRepository;
use sitefront::infrastructure::TomlStateRepository;

use super::SiteContext;
use crate::ui::views::status::render_status;

pub fn cmd_status(config_path: &Path, json: bool) -> Result<()> {
    let site = SiteContext::load(config_path, json)?;
    let state_path = site.state_path();
    let state = TomlStateRepository::new()
        .load(&state_path)
        .map_err(sitefront::SitefrontError::from)?;

    if json {
        crate::ui::json::emit(serde_json::json!({
            "event": "status",
            "command": "status",
            "state_path": state_path.display().to_string(),
            "bucket": state.bucket(),
            "objects": state.object_count(),
            "distribution": state.distribution(),
            "origin_access_control_id": state.origin_access_control_id(),
            "pending_invalidation": state.pending_invalidation(),
            "last_converged": state.last_converged(),
        }))?;
        return Ok(());
    }

    print!(
        "{}",
        render_status(
            &state,
            &state_path,
            site.caps.supports_color,
            site.caps.supports_unicode
        )
    );
    Ok(())
}
