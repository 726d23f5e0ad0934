//! JSON Event Sink
//!
//! Outputs convergence events as NDJSON for CI/automation consumption.

use crate::domain::ports::{ConvergeEvent, ConvergeEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

fn to_json(event: ConvergeEvent) -> serde_json::Value {
    match event {
        ConvergeEvent::Started {
            source,
            bucket,
            asset_count,
        } => serde_json::json!({
            "event": "start",
            "command": "converge",
            "source": source.display().to_string(),
            "bucket": bucket,
            "asset_count": asset_count,
        }),

        ConvergeEvent::Planned {
            uploads,
            deletions,
            unchanged,
        } => serde_json::json!({
            "event": "planned",
            "command": "converge",
            "uploads": uploads,
            "deletions": deletions,
            "unchanged": unchanged,
        }),

        ConvergeEvent::ObjectUploaded { key, bytes } => serde_json::json!({
            "event": "object_uploaded",
            "command": "converge",
            "key": key,
            "bytes": bytes,
        }),

        ConvergeEvent::ObjectSkipped { key } => serde_json::json!({
            "event": "object_skipped",
            "command": "converge",
            "key": key,
        }),

        ConvergeEvent::ObjectDeleted { key } => serde_json::json!({
            "event": "object_deleted",
            "command": "converge",
            "key": key,
        }),

        ConvergeEvent::BucketSecured { bucket } => serde_json::json!({
            "event": "bucket_secured",
            "command": "converge",
            "bucket": bucket,
        }),

        ConvergeEvent::DistributionReady { id, domain, change } => serde_json::json!({
            "event": "distribution_ready",
            "command": "converge",
            "id": id,
            "domain": domain,
            "change": change.as_str(),
        }),

        ConvergeEvent::PolicyBound { changed } => serde_json::json!({
            "event": "policy_bound",
            "command": "converge",
            "changed": changed,
        }),

        ConvergeEvent::InvalidationSubmitted { id, paths } => serde_json::json!({
            "event": "invalidation_submitted",
            "command": "converge",
            "id": id,
            "paths": paths,
        }),

        ConvergeEvent::InvalidationFailed { paths, error } => serde_json::json!({
            "event": "invalidation_failed",
            "command": "converge",
            "paths": paths,
            "error": error,
        }),

        ConvergeEvent::InvalidationCompleted { id } => serde_json::json!({
            "event": "invalidation_completed",
            "command": "converge",
            "id": id,
        }),

        ConvergeEvent::Completed {
            uploaded,
            deleted,
            mutations,
        } => {
            let status = if mutations == 0 { "converged" } else { "changed" };
            serde_json::json!({
                "event": "complete",
                "command": "converge",
                "status": status,
                "uploaded": uploaded,
                "deleted": deleted,
                "mutations": mutations,
            })
        }
    }
}

impl ConvergeEventSink for JsonEventSink {
    fn on_event(&self, event: ConvergeEvent) {
        self.write_event(to_json(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::DistributionChange;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl TestWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buffer = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    buffer: buffer.clone(),
                },
                buffer,
            )
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lines(buffer: &Arc<Mutex<Vec<u8>>>) -> Vec<serde_json::Value> {
        let output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn json_sink_outputs_start_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(ConvergeEvent::Started {
            source: PathBuf::from("public"),
            bucket: "my-site".to_string(),
            asset_count: 5,
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["event"], "start");
        assert_eq!(events[0]["bucket"], "my-site");
        assert_eq!(events[0]["asset_count"], 5);
    }

    #[test]
    fn one_line_per_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(ConvergeEvent::DistributionReady {
            id: "E1".to_string(),
            domain: "d1.cloudfront.net".to_string(),
            change: DistributionChange::Created,
        });
        sink.on_event(ConvergeEvent::InvalidationSubmitted {
            id: "I1".to_string(),
            paths: vec!["/index.html".to_string()],
        });

        let events = lines(&buffer);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["change"], "created");
        assert_eq!(events[1]["paths"][0], "/index.html");
    }

    #[test]
    fn completion_status_reflects_mutations() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(ConvergeEvent::Completed {
            uploaded: 0,
            deleted: 0,
            mutations: 0,
        });
        sink.on_event(ConvergeEvent::Completed {
            uploaded: 2,
            deleted: 0,
            mutations: 6,
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["status"], "converged");
        assert_eq!(events[1]["status"], "changed");
        assert_eq!(events[1]["uploaded"], 2);
    }
}
