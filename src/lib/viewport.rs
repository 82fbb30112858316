use super::geo::{padded_bounds, BoundingBox, DEFAULT_ZOOM, MIN_PADDING, PADDING_FRACTION, REGION_CENTER};
use super::geojson::Feature;
use super::resolve::Kind;
use serde::{Deserialize, Serialize};

/// The feature most recently focused via click, kept for the "currently
/// focused on" banner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FocusedFeature {
    pub name: String,
    pub kind: Kind,
}

/// What the renderer should do with the view on this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitAction {
    /// Fit the view to these bounds, then call `consume_pending_zoom`.
    FitBounds(BoundingBox),
    /// Nothing focused yet: fit the default regional extent.
    FitDefault,
    /// Leave the view where the user put it.
    Keep,
}

/// Per-session view state, threaded through otherwise stateless render
/// cycles. One instance per session, mutated only through the transitions
/// below.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub center: (f64, f64),
    pub zoom: u32,
    pub pending_bounds: Option<BoundingBox>,
    pub zoom_to_feature_pending: bool,
    pub last_focused: Option<FocusedFeature>,
}

impl Default for ViewportState {
    fn default() -> Self {
        ViewportState {
            center: REGION_CENTER,
            zoom: DEFAULT_ZOOM,
            pending_bounds: None,
            zoom_to_feature_pending: false,
            last_focused: None,
        }
    }
}

impl ViewportState {
    /// Manual pan/zoom reported by the renderer. The user's intent takes
    /// precedence, so any queued programmatic zoom is dropped.
    pub fn on_user_pan_zoom(&mut self, center: (f64, f64), zoom: u32) {
        self.center = center;
        self.zoom = zoom;
        self.pending_bounds = None;
        self.zoom_to_feature_pending = false;
    }

    /// Queue a zoom to the clicked feature's padded bounds and remember it
    /// as the focused feature.
    pub fn on_feature_clicked(&mut self, feature: &Feature, kind: Kind) {
        let bounds = padded_bounds(feature, PADDING_FRACTION, MIN_PADDING);
        self.pending_bounds = Some(bounds);
        self.zoom_to_feature_pending = true;
        self.center = bounds.midpoint();
        let name = feature
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unknown {}", kind));
        self.last_focused = Some(FocusedFeature { name, kind });
    }

    /// Called by the renderer right after it applied `pending_bounds`.
    /// Clears the pending flag only; the bounds and the focused-feature
    /// record are intentionally retained as history.
    pub fn consume_pending_zoom(&mut self) {
        self.zoom_to_feature_pending = false;
    }

    pub fn reset(&mut self) {
        *self = ViewportState::default();
    }

    /// Pure render-time fit decision. Once a focus has been applied and
    /// consumed, the view is left alone on later renders until the user
    /// pans, zooms or resets.
    pub fn fit_action(&self) -> FitAction {
        if self.zoom_to_feature_pending {
            if let Some(bounds) = self.pending_bounds {
                return FitAction::FitBounds(bounds);
            }
        }
        if self.last_focused.is_none() {
            return FitAction::FitDefault;
        }
        FitAction::Keep
    }
}
