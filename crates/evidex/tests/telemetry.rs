//! Subscriber installation; kept in its own binary because it is global.

use std::io;
use std::sync::{Arc, Mutex};

use evidex::telemetry::{init_tracing, init_tracing_with_writer};
use evidex::{EvidenceEngine, SourceBatch};
use serde_json::json;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn verbose_subscriber_captures_pipeline_events_and_installs_once() {
    let captured = Captured::default();
    init_tracing_with_writer(true, captured.clone()).unwrap();

    let batch = SourceBatch::new(
        "pubmed",
        vec![json!({
            "uid": "30000009",
            "title": "Clopidogrel loading dose",
            "abstract": "Platelet function was tested after loading. 50 of 72 patients responded."
        })],
    );
    let estimate = EvidenceEngine::default().pool("clopidogrel", &[batch]);
    assert_eq!(estimate.n_studies, 1);

    let text = captured.text();
    assert!(text.contains("normalized source batch"), "{text}");
    assert!(text.contains("deduplicated records"), "{text}");
    assert!(text.contains("pooled efficacy estimate"), "{text}");
    assert!(text.contains("drug=clopidogrel"), "{text}");
    assert!(!text.contains("\u{1b}["), "plain text expected");

    let second = init_tracing(false).unwrap_err();
    assert!(second.to_string().contains("failed to initialize tracing subscriber"));
}
