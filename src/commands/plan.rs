use std::path::Path;

use anyhow::Result;

use sitefront::domain::ports::{DeliveryNetwork, ObjectStore};
use sitefront::presentation::factory::{create_converge_use_case, open_provider, Provider};
use sitefront::{ConvergeOptions, ConvergePlan};

use super::SiteContext;
use crate::ui::views::plan::render_plan;

pub fn cmd_plan(config_path: &Path, json: bool) -> Result<()> {
    let site = SiteContext::load(config_path, json)?;
    let options = site.converge_options(true, false)?;

    let plan = match open_provider(&site.config, &site.root)? {
        Provider::Local(cloud) => compute(cloud.clone(), cloud, &options)?,
        #[cfg(feature = "aws")]
        Provider::Aws(cloud) => compute(cloud.clone(), cloud, &options)?,
    };

    if json {
        let mut document = plan.to_document();
        document["event"] = serde_json::json!("plan");
        document["command"] = serde_json::json!("plan");
        crate::ui::json::emit(document)?;
        return Ok(());
    }

    print!(
        "{}",
        render_plan(&plan, site.caps.supports_color, site.caps.supports_unicode)
    );
    Ok(())
}

fn compute<OS, DN>(store: OS, network: DN, options: &ConvergeOptions) -> Result<ConvergePlan>
where
    OS: ObjectStore,
    DN: DeliveryNetwork,
{
    Ok(create_converge_use_case(store, network).plan(options)?)
}
