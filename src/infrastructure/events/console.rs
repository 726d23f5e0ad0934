//! Console Event Sink
//!
//! Human-readable progress lines on stderr.

use std::io::{self, Write};
use std::sync::Mutex;

use crossterm::style::Stylize;
use is_terminal::IsTerminal;

use crate::domain::ports::{ConvergeEvent, ConvergeEventSink, DistributionChange};

/// Progress printer for interactive runs
pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    color: bool,
    detailed: bool,
}

impl ConsoleEventSink {
    /// Write to stderr, colored when stderr is a terminal and `NO_COLOR` is unset
    pub fn stderr(detailed: bool) -> Self {
        let color = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self {
            writer: Mutex::new(Box::new(io::stderr())),
            color,
            detailed,
        }
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, detailed: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            color: false,
            detailed,
        }
    }

    fn mark(&self, symbol: &'static str, ok: bool) -> String {
        match (self.color, ok) {
            (false, _) => symbol.to_string(),
            (true, true) => symbol.green().to_string(),
            (true, false) => symbol.yellow().to_string(),
        }
    }

    fn line(&self, text: String) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{text}");
        }
    }
}

impl ConvergeEventSink for ConsoleEventSink {
    fn on_event(&self, event: ConvergeEvent) {
        match event {
            ConvergeEvent::Started {
                source,
                bucket,
                asset_count,
            } => self.line(format!(
                "Converging {} ({asset_count} files) onto {bucket}",
                source.display()
            )),
            ConvergeEvent::Planned {
                uploads,
                deletions,
                unchanged,
            } => self.line(format!(
                "  plan: {uploads} to upload, {deletions} to delete, {unchanged} unchanged"
            )),
            ConvergeEvent::ObjectUploaded { key, bytes } => {
                self.line(format!("  {} {key} ({bytes} bytes)", self.mark("+", true)))
            }
            ConvergeEvent::ObjectSkipped { key } => self.line(format!("  = {key}")),
            ConvergeEvent::ObjectDeleted { key } => {
                self.line(format!("  {} {key}", self.mark("-", false)))
            }
            ConvergeEvent::BucketSecured { bucket } => self.line(format!(
                "  {} public access blocked on {bucket}",
                self.mark("*", true)
            )),
            ConvergeEvent::DistributionReady { id, domain, change } => {
                let verb = match change {
                    DistributionChange::Created => "created",
                    DistributionChange::Updated => "updated",
                    DistributionChange::Unchanged => "ready",
                };
                self.line(format!(
                    "  {} distribution {id} {verb} at https://{domain}",
                    self.mark("*", true)
                ))
            }
            ConvergeEvent::PolicyBound { changed } => {
                if changed {
                    self.line(format!(
                        "  {} bucket policy bound to distribution",
                        self.mark("*", true)
                    ))
                }
            }
            ConvergeEvent::InvalidationSubmitted { id, paths } => self.line(format!(
                "  {} invalidation {id}: {}",
                self.mark("~", true),
                paths.join(", ")
            )),
            ConvergeEvent::InvalidationFailed { paths, error } => self.line(format!(
                "  {} invalidation deferred ({}): {error}",
                self.mark("!", false),
                paths.join(", ")
            )),
            ConvergeEvent::InvalidationCompleted { id } => self.line(format!(
                "  {} invalidation {id} completed",
                self.mark("~", true)
            )),
            ConvergeEvent::Completed { mutations, .. } => {
                if mutations == 0 {
                    self.line("Already converged".to_string())
                } else {
                    self.line(format!("Applied {mutations} changes"))
                }
            }
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.detailed
    }
}
