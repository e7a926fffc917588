//! Map commands pushed from the host application to connected browsers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `[lat, lng]` pair.
pub type LatLng = [f64; 2];

/// `[[south, west], [north, east]]`.
pub type Bounds = [LatLng; 2];

/// Free-form styling options forwarded to the map renderer untouched.
pub type Options = Map<String, Value>;

// ---------------------------------------------------------------------------
// Command envelope
// ---------------------------------------------------------------------------

/// A typed instruction for the browser map.
///
/// Serializes as `{"type": "SHOW_MARKER", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    ShowPolygon(ShapeData),
    ShowMarker(MarkerData),
    ShowLine(ShapeData),
    SetView(ViewData),
    SetTitle(TitleData),
}

impl Command {
    /// Wire name of the command type, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::ShowPolygon(_) => "SHOW_POLYGON",
            Command::ShowMarker(_) => "SHOW_MARKER",
            Command::ShowLine(_) => "SHOW_LINE",
            Command::SetView(_) => "SET_VIEW",
            Command::SetTitle(_) => "SET_TITLE",
        }
    }

    pub fn marker(coordinates: LatLng, text: Option<String>, options: Option<Options>) -> Self {
        Command::ShowMarker(MarkerData {
            coordinates,
            text,
            options: options.unwrap_or_default(),
        })
    }

    pub fn polygon(coordinates: Vec<LatLng>, options: Option<Options>) -> Self {
        Command::ShowPolygon(ShapeData {
            coordinates,
            options: options.unwrap_or_default(),
        })
    }

    pub fn line(coordinates: Vec<LatLng>, options: Option<Options>) -> Self {
        Command::ShowLine(ShapeData {
            coordinates,
            options: options.unwrap_or_default(),
        })
    }

    pub fn view(bounds: Option<Bounds>, center: Option<LatLng>, zoom: Option<f64>) -> Self {
        Command::SetView(ViewData {
            bounds,
            center,
            zoom,
        })
    }

    pub fn title(title: impl Into<String>, options: Option<Options>) -> Self {
        Command::SetTitle(TitleData {
            title: title.into(),
            options: options.unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerData {
    pub coordinates: LatLng,
    /// Popup text. Sent as `null` when absent.
    pub text: Option<String>,
    #[serde(default)]
    pub options: Options,
}

/// Polygon or polyline vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeData {
    pub coordinates: Vec<LatLng>,
    #[serde(default)]
    pub options: Options,
}

/// Partial view change. Only supplied fields go on the wire, so the browser
/// keeps its current value for the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<LatLng>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleData {
    pub title: String,
    #[serde(default)]
    pub options: Options,
}
