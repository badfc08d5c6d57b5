//! Terminal rendering of the search session.
//!
//! One [`TerminalUi`] serves as status line, results panel and map. Output
//! goes to a single writer (stdout in the binary) in the format chosen with
//! `--format`; logs go to stderr.

use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use cafefinder_core::{Coordinate, PlaceId};
use cafefinder_search::{
    escape_html, MapDisplay, PlaceEntry, PlaceMarker, ResultsPanel, StatusSink,
};
use clap::ValueEnum;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// HTML fragments with escaped place data
    Html,
}

pub struct TerminalUi<W> {
    format: OutputFormat,
    out: Mutex<W>,
    /// Markers currently "on the map", kept so popups can be shown on select.
    markers: Mutex<Vec<PlaceMarker>>,
}

impl<W: Write + Send> TerminalUi<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self {
            format,
            out: Mutex::new(out),
            markers: Mutex::new(Vec::new()),
        }
    }

    fn emit(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }

    fn markers(&self) -> MutexGuard<'_, Vec<PlaceMarker>> {
        self.markers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> StatusSink for TerminalUi<W> {
    fn set_status(&self, message: &str) {
        let line = match self.format {
            OutputFormat::Text => format!("> {message}"),
            OutputFormat::Json => json!({ "event": "status", "message": message }).to_string(),
            OutputFormat::Html => format!("<div class=\"meta\">{}</div>", escape_html(message)),
        };
        self.emit(&line);
    }
}

impl<W: Write + Send> ResultsPanel for TerminalUi<W> {
    fn show_places(&self, entries: &[PlaceEntry]) {
        match self.format {
            OutputFormat::Text => {
                for (index, entry) in entries.iter().enumerate() {
                    self.emit(&format!("{:>3}. {}", index + 1, entry.name));
                    self.emit(&format!("     {}", entry.meta()));
                }
            }
            OutputFormat::Json => {
                self.emit(&json!({ "event": "places", "places": entries }).to_string());
            }
            OutputFormat::Html => {
                self.emit("<div id=\"places\">");
                for entry in entries {
                    self.emit(&entry.html());
                }
                self.emit("</div>");
            }
        }
    }

    fn clear(&self) {
        if self.format == OutputFormat::Json {
            self.emit(&json!({ "event": "clear_places" }).to_string());
        }
    }
}

impl<W: Write + Send> MapDisplay for TerminalUi<W> {
    fn set_view(&self, center: Coordinate, zoom: u8) {
        let line = match self.format {
            OutputFormat::Json => json!({
                "event": "view",
                "center": center,
                "zoom": zoom,
            })
            .to_string(),
            OutputFormat::Text | OutputFormat::Html => {
                format!("Search center: {center} (zoom {zoom})")
            }
        };
        self.emit(&line);
    }

    fn add_marker(&self, marker: &PlaceMarker) {
        self.markers().push(marker.clone());
    }

    fn clear_markers(&self) {
        self.markers().clear();
    }

    fn pan_to(&self, at: Coordinate) {
        if self.format == OutputFormat::Json {
            self.emit(&json!({ "event": "pan", "to": at }).to_string());
        }
    }

    fn open_popup(&self, id: PlaceId) {
        let Some(marker) = self.markers().iter().find(|m| m.id == id).cloned() else {
            tracing::debug!(%id, "no marker for popup");
            return;
        };
        match self.format {
            OutputFormat::Text => self.emit(&marker.popup.text()),
            OutputFormat::Json => self.emit(&json!({ "event": "popup", "marker": marker }).to_string()),
            OutputFormat::Html => self.emit(&marker.popup.html()),
        }
    }
}
