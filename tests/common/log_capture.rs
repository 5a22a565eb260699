//! In-memory capture of `tracing` events for log assertions.
#![allow(dead_code)]

use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};

/// One captured event.
#[derive(Debug, Clone)]
pub struct CapturedLog {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl CapturedLog {
    /// Value of a structured field, if the event carried it.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Captures events on the current thread until dropped.
///
/// The subscriber is installed with `set_default`, so it only sees events
/// emitted on the test's own thread. `#[tokio::test]` runs a current-thread
/// runtime, which keeps spawned tasks on that thread too.
pub struct TestLogCapture {
    logs: Arc<Mutex<Vec<CapturedLog>>>,
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestLogCapture {
    pub fn start() -> Self {
        let logs = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(CaptureLayer {
            logs: Arc::clone(&logs),
        });
        let guard = tracing::subscriber::set_default(subscriber);
        Self {
            logs,
            _guard: guard,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CapturedLog>> {
        self.logs.lock().expect("log capture lock poisoned")
    }

    /// All events captured so far.
    pub fn logs(&self) -> Vec<CapturedLog> {
        self.lock().clone()
    }

    /// Events whose message contains `needle`.
    pub fn matching(&self, needle: &str) -> Vec<CapturedLog> {
        self.lock()
            .iter()
            .filter(|l| l.message.contains(needle))
            .cloned()
            .collect()
    }

    pub fn count_at_level(&self, level: Level) -> usize {
        self.lock().iter().filter(|l| l.level == level).count()
    }

    pub fn assert_logged(&self, needle: &str) {
        let logs = self.lock();
        assert!(
            logs.iter().any(|l| l.message.contains(needle)),
            "expected a log containing {needle:?}, got: {:#?}",
            logs.iter().map(|l| &l.message).collect::<Vec<_>>()
        );
    }

    pub fn assert_not_logged(&self, needle: &str) {
        let logs = self.lock();
        let hits: Vec<_> = logs.iter().filter(|l| l.message.contains(needle)).collect();
        assert!(hits.is_empty(), "unexpected log containing {needle:?}: {hits:#?}");
    }

    pub fn assert_logged_at_level(&self, level: Level, needle: &str) {
        let logs = self.lock();
        assert!(
            logs.iter()
                .any(|l| l.level == level && l.message.contains(needle)),
            "expected a {level} log containing {needle:?}, got: {:#?}",
            logs.iter()
                .filter(|l| l.level == level)
                .map(|l| &l.message)
                .collect::<Vec<_>>()
        );
    }

    pub fn assert_no_errors(&self) {
        let logs = self.lock();
        let errors: Vec<_> = logs.iter().filter(|l| l.level == Level::ERROR).collect();
        assert!(errors.is_empty(), "unexpected error logs: {errors:#?}");
    }

    /// Assert some event carried `name` with a value containing `value`.
    pub fn assert_field_logged(&self, name: &str, value: &str) {
        let logs = self.lock();
        assert!(
            logs.iter()
                .any(|l| l.field(name).is_some_and(|v| v.contains(value))),
            "expected field {name}={value:?}, got: {:#?}",
            logs.iter().map(|l| &l.fields).collect::<Vec<_>>()
        );
    }
}

struct CaptureLayer {
    logs: Arc<Mutex<Vec<CapturedLog>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let captured = CapturedLog {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        };
        if let Ok(mut logs) = self.logs.lock() {
            logs.push(captured);
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn put(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.put(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }
}

/// `assert_logged!(capture, "needle")` or `assert_logged!(capture, Level::WARN, "needle")`.
#[macro_export]
macro_rules! assert_logged {
    ($capture:expr, $needle:expr) => {
        $capture.assert_logged($needle)
    };
    ($capture:expr, $level:expr, $needle:expr) => {
        $capture.assert_logged_at_level($level, $needle)
    };
}
