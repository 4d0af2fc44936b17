//! Status reporting protocol.
//!
//! The driver's observable stream: one line per event on stdout, either
//! structured (one JSON object per line) or raw text, selected at startup.
//! This is observability only — there is no acknowledgment and no
//! backpressure, and nothing in the core reads it back.
//!
//! Rendering is separated from emission so the exact wire format is
//! testable without capturing stdout.

use serde::Serialize;

/// Wire format of the status stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON object per line.
    Structured,
    /// Plain text lines.
    Raw,
}

#[derive(Serialize)]
struct StatusLine<'a> {
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

#[derive(Serialize)]
struct ProgressLine {
    frame: u32,
    step: u32,
    time: f64,
}

#[derive(Serialize)]
struct SavedLine<'a> {
    saved: &'a str,
    frame: u32,
    file: &'a str,
}

/// Emits simulation status and progress lines to stdout.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    format: OutputFormat,
}

impl StatusReporter {
    /// Creates a reporter with the given wire format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// True in structured (JSON) mode.
    pub fn is_structured(&self) -> bool {
        self.format == OutputFormat::Structured
    }

    /// Renders a status line, e.g. `{"status":"SAVE_START","details":"frame=3"}`.
    pub fn render_status(&self, status: &str, details: Option<&str>) -> String {
        match self.format {
            OutputFormat::Structured => {
                let line = StatusLine { status, details };
                serde_json::to_string(&line).unwrap_or_else(|_| status.to_string())
            }
            OutputFormat::Raw => match details {
                Some(d) => format!("{status}: {d}"),
                None => status.to_string(),
            },
        }
    }

    /// Renders a frame-progress line, e.g. `{"frame":2,"step":20,"time":0.8}`.
    pub fn render_progress(&self, frame: u32, step: u32, time: f64) -> String {
        match self.format {
            OutputFormat::Structured => {
                let line = ProgressLine { frame, step, time };
                serde_json::to_string(&line).unwrap_or_default()
            }
            OutputFormat::Raw => format!("Sim frame {frame} [{step}]"),
        }
    }

    /// Renders a saved-artifact line (structured mode only; raw mode keeps
    /// quiet about individual files).
    pub fn render_saved(&self, label: &str, frame: u32, file: &str) -> Option<String> {
        match self.format {
            OutputFormat::Structured => {
                let line = SavedLine { saved: label, frame, file };
                serde_json::to_string(&line).ok()
            }
            OutputFormat::Raw => None,
        }
    }

    /// Emits a status line.
    pub fn status(&self, status: &str, details: Option<&str>) {
        println!("{}", self.render_status(status, details));
    }

    /// Emits a frame-progress line.
    pub fn progress(&self, frame: u32, step: u32, time: f64) {
        println!("{}", self.render_progress(frame, step, time));
    }

    /// Emits a saved-artifact line, if the format has one.
    pub fn saved(&self, label: &str, frame: u32, file: &str) {
        if let Some(line) = self.render_saved(label, frame, file) {
            println!("{line}");
        }
    }
}
