use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use sitefront::domain::ports::{ConvergeEventSink, DeliveryNetwork, ObjectStore};
use sitefront::infrastructure::{ConsoleEventSink, JsonEventSink};
use sitefront::presentation::factory::{create_converge_use_case, open_provider, Provider};
use sitefront::{ConvergeOptions, ConvergeReport};

use super::SiteContext;
use crate::ui::views::converge::render_converge_summary;

pub fn cmd_converge(
    config_path: &Path,
    dry_run: bool,
    wait: bool,
    json: bool,
    verbose: u8,
) -> Result<()> {
    let site = SiteContext::load(config_path, json)?;
    let options = site.converge_options(dry_run, wait)?;

    let sink: Arc<dyn ConvergeEventSink> = if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stderr(verbose > 0))
    };

    let report = match open_provider(&site.config, &site.root)? {
        Provider::Local(cloud) => run(cloud.clone(), cloud, &options, sink)?,
        #[cfg(feature = "aws")]
        Provider::Aws(cloud) => run(cloud.clone(), cloud, &options, sink)?,
    };

    if json {
        crate::ui::json::emit(serde_json::json!({
            "event": "report",
            "command": "converge",
            "report": report,
        }))?;
        return Ok(());
    }

    print!(
        "{}",
        render_converge_summary(&report, site.caps.supports_color, site.caps.supports_unicode)
    );
    Ok(())
}

fn run<OS, DN>(
    store: OS,
    network: DN,
    options: &ConvergeOptions,
    sink: Arc<dyn ConvergeEventSink>,
) -> Result<ConvergeReport>
where
    OS: ObjectStore,
    DN: DeliveryNetwork,
{
    let use_case = create_converge_use_case(store, network);
    Ok(use_case.execute_with_events(options, sink)?)
}
