//! Rendered output of the verbosity layer for different flag settings.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use logging::{VerbosityConfig, trace_apply, trace_cmd, trace_walk, verbosity_layer};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn text(&self) -> String {
        let buffer = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8(buffer.clone()).expect("captured output is UTF-8")
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn render(config: VerbosityConfig, emit: impl FnOnce()) -> String {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber =
        tracing_subscriber::registry().with(verbosity_layer(config, move || writer.clone()));
    tracing::subscriber::with_default(subscriber, emit);
    capture.text()
}

#[test]
fn quiet_config_shows_only_warnings() {
    let output = render(VerbosityConfig::default(), || {
        trace_apply!("applied access ACL");
        trace_cmd!("running mmgetacl");
        tracing::warn!(target: "ssacl::apply", "could not apply");
    });
    assert!(!output.contains("applied access ACL"));
    assert!(!output.contains("running mmgetacl"));
    assert!(output.contains("could not apply"));
}

#[test]
fn verbose_level_one_shows_applied_changes() {
    let output = render(VerbosityConfig::from_verbose_level(1), || {
        trace_apply!("applied access ACL");
        trace_cmd!("running mmgetacl");
    });
    assert!(output.contains("applied access ACL"));
    assert!(!output.contains("running mmgetacl"));
}

#[test]
fn debug_flag_enables_single_target() {
    let mut config = VerbosityConfig::default();
    config.apply_debug_flag("walk").expect("walk flag");
    let output = render(config, || {
        trace_walk!(path = "/gpfs/a", "entering directory");
        trace_cmd!("running mmputacl");
        tracing::trace!(target: "ssacl::walk", "level two detail");
    });
    assert!(output.contains("entering directory"));
    assert!(output.contains("/gpfs/a"));
    assert!(!output.contains("running mmputacl"));
    assert!(!output.contains("level two detail"));
}

#[test]
fn foreign_targets_are_dropped() {
    let output = render(VerbosityConfig::from_verbose_level(4), || {
        tracing::info!(target: "some_dependency", "noise");
    });
    assert!(output.is_empty());
}
