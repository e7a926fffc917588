//! Last-known map viewport, as reported back by any connected browser.

use mapcast_common::command::{Bounds, LatLng};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A map viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct View {
    /// `[lat, lng]`
    #[schema(value_type = Vec<f64>)]
    pub center: LatLng,
    pub zoom: f64,
    /// `[[south, west], [north, east]]`, or null before the first report.
    #[schema(value_type = Option<Vec<Vec<f64>>>)]
    pub bounds: Option<Bounds>,
}

impl Default for View {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            zoom: 2.0,
            bounds: None,
        }
    }
}

/// Fields extracted from a browser view-change report.
///
/// `None` means "leave unchanged". For `bounds`, `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewReport {
    pub center: Option<LatLng>,
    pub zoom: Option<f64>,
    pub bounds: Option<Option<Bounds>>,
}

impl ViewReport {
    /// Pull whatever well-formed fields a report carries. Missing or
    /// wrong-shaped fields are skipped, never rejected.
    pub fn from_json(report: &Value) -> Self {
        let Some(fields) = report.as_object() else {
            tracing::debug!("view report is not a JSON object; ignoring");
            return Self::default();
        };

        let center = fields.get("center").and_then(|v| field(v, "center"));
        let zoom = fields.get("zoom").and_then(|v| field(v, "zoom"));
        let bounds = match fields.get("bounds") {
            None => None,
            Some(Value::Null) => Some(None),
            Some(v) => field(v, "bounds").map(Some),
        };

        Self {
            center,
            zoom,
            bounds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.center.is_none() && self.zoom.is_none() && self.bounds.is_none()
    }
}

fn field<T: serde::de::DeserializeOwned>(value: &Value, name: &str) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::debug!(field = name, %err, "ignoring malformed view field");
            None
        }
    }
}

/// Process-wide view record. Last writer wins, per field.
pub struct ViewState {
    view: RwLock<View>,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            view: RwLock::new(View::default()),
        }
    }

    /// Overwrite every field the report carries; leave the rest alone.
    pub fn apply_report(&self, report: ViewReport) {
        if report.is_empty() {
            return;
        }
        let mut view = self.view.write();
        if let Some(center) = report.center {
            view.center = center;
        }
        if let Some(zoom) = report.zoom {
            view.zoom = zoom;
        }
        if let Some(bounds) = report.bounds {
            view.bounds = bounds;
        }
        tracing::debug!(center = ?view.center, zoom = view.zoom, bounds = ?view.bounds, "view updated");
    }

    pub fn read(&self) -> View {
        self.view.read().clone()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}
