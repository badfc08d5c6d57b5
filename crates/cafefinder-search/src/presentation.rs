//! Presentation seams: the sinks a [`crate::Session`] draws into.
//!
//! The session never formats for a particular surface. It hands out
//! [`PlaceMarker`]s and [`PlaceEntry`]s; adapters choose between the plain
//! [`Popup::text`]/[`PlaceEntry::meta`] renderings and the escaped HTML ones.

use std::sync::Arc;

use cafefinder_core::{Coordinate, PlaceId, PlaceResult};
use serde::Serialize;

/// Single-line status area. Each call replaces the previous message. A failure
/// status is shown in place of the results list, which the session clears
/// first.
pub trait StatusSink: Send + Sync {
    fn set_status(&self, message: &str);
}

/// Ordered list of results.
pub trait ResultsPanel: Send + Sync {
    /// Replaces the panel content with `entries`, nearest first.
    fn show_places(&self, entries: &[PlaceEntry]);

    fn clear(&self);
}

/// Map surface with a movable search-center marker and per-place markers.
pub trait MapDisplay: Send + Sync {
    /// Recenters the view and moves the search-center marker to `center`.
    fn set_view(&self, center: Coordinate, zoom: u8);

    fn add_marker(&self, marker: &PlaceMarker);

    fn clear_markers(&self);

    fn pan_to(&self, at: Coordinate);

    fn open_popup(&self, id: PlaceId);
}

/// The three sinks a session renders into.
#[derive(Clone)]
pub struct Presentation {
    pub status: Arc<dyn StatusSink>,
    pub panel: Arc<dyn ResultsPanel>,
    pub map: Arc<dyn MapDisplay>,
}

impl Presentation {
    #[must_use]
    pub fn new(
        status: Arc<dyn StatusSink>,
        panel: Arc<dyn ResultsPanel>,
        map: Arc<dyn MapDisplay>,
    ) -> Self {
        Self { status, panel, map }
    }

    /// Uses one adapter for all three sinks.
    #[must_use]
    pub fn unified<T>(ui: &Arc<T>) -> Self
    where
        T: StatusSink + ResultsPanel + MapDisplay + 'static,
    {
        Self {
            status: Arc::clone(ui) as Arc<dyn StatusSink>,
            panel: Arc::clone(ui) as Arc<dyn ResultsPanel>,
            map: Arc::clone(ui) as Arc<dyn MapDisplay>,
        }
    }
}

/// Marker popup content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub name: String,
    pub street: Option<String>,
    pub distance_m: i64,
}

impl Popup {
    #[must_use]
    pub fn text(&self) -> String {
        match &self.street {
            Some(street) => format!("{}\n{}\n{} m away", self.name, street, self.distance_m),
            None => format!("{}\n{} m away", self.name, self.distance_m),
        }
    }

    #[must_use]
    pub fn html(&self) -> String {
        let street = self
            .street
            .as_deref()
            .map(|s| format!("{}<br/>", escape_html(s)))
            .unwrap_or_default();
        format!(
            "<strong>{}</strong><br/>{street}{} m away",
            escape_html(&self.name),
            self.distance_m
        )
    }
}

/// A map marker for one ranked place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceMarker {
    pub id: PlaceId,
    pub at: Coordinate,
    pub popup: Popup,
}

impl From<&PlaceResult> for PlaceMarker {
    fn from(place: &PlaceResult) -> Self {
        Self {
            id: place.id,
            at: place.position,
            popup: Popup {
                name: place.name.clone(),
                street: place.street.clone(),
                distance_m: place.rounded_distance_m(),
            },
        }
    }
}

/// One row of the results panel. Selecting it should call
/// [`crate::Session::select`] with `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceEntry {
    pub id: PlaceId,
    pub name: String,
    pub distance_m: i64,
    pub opening_hours: Option<String>,
}

impl PlaceEntry {
    /// Secondary line: `"<distance> m — <opening hours>"`.
    #[must_use]
    pub fn meta(&self) -> String {
        format!(
            "{} m — {}",
            self.distance_m,
            self.opening_hours.as_deref().unwrap_or_default()
        )
    }

    #[must_use]
    pub fn html(&self) -> String {
        format!(
            "<div class=\"place\"><strong>{}</strong><div class=\"meta\">{} m — {}</div></div>",
            escape_html(&self.name),
            self.distance_m,
            escape_html(self.opening_hours.as_deref().unwrap_or_default())
        )
    }
}

impl From<&PlaceResult> for PlaceEntry {
    fn from(place: &PlaceResult) -> Self {
        Self {
            id: place.id,
            name: place.name.clone(),
            distance_m: place.rounded_distance_m(),
            opening_hours: place.opening_hours.clone(),
        }
    }
}

/// Escapes `& < > ' "` for insertion into HTML text or attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use cafefinder_core::ElementKind;

    use super::*;

    fn place(street: Option<&str>, hours: Option<&str>) -> PlaceResult {
        PlaceResult {
            id: PlaceId {
                kind: ElementKind::Node,
                id: 42,
            },
            name: "Kala <Ghoda> & Co".to_owned(),
            street: street.map(str::to_owned),
            opening_hours: hours.map(str::to_owned),
            position: Coordinate::new(18.93, 72.83).unwrap(),
            distance_m: 249.6,
        }
    }

    #[test]
    fn escape_html_covers_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom's & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom&#39;s &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn popup_text_includes_street_when_present() {
        let marker = PlaceMarker::from(&place(Some("Rampart Row"), None));
        assert_eq!(
            marker.popup.text(),
            "Kala <Ghoda> & Co\nRampart Row\n250 m away"
        );
        let bare = PlaceMarker::from(&place(None, None));
        assert_eq!(bare.popup.text(), "Kala <Ghoda> & Co\n250 m away");
    }

    #[test]
    fn popup_html_is_escaped() {
        let marker = PlaceMarker::from(&place(Some("A & B Lane"), None));
        assert_eq!(
            marker.popup.html(),
            "<strong>Kala &lt;Ghoda&gt; &amp; Co</strong><br/>A &amp; B Lane<br/>250 m away"
        );
    }

    #[test]
    fn entry_meta_leaves_hours_blank_when_missing() {
        let entry = PlaceEntry::from(&place(None, None));
        assert_eq!(entry.meta(), "250 m — ");
        let with_hours = PlaceEntry::from(&place(None, Some("07:00-23:00")));
        assert_eq!(with_hours.meta(), "250 m — 07:00-23:00");
    }
}
