//! Two-layer page compositor.
//!
//! The static layer holds every committed stroke in page order. The active
//! layer holds only the pen stroke being drawn and is cleared on commit.
//! Eraser strokes skip the active layer and punch the static layer directly
//! while they are drawn, so the user sees the erasure live.

use super::raster::{CoverageMask, PixelRect};
use super::surface::{CompositeOp, Surface};
use crate::constants::TARGET_FRAME_MS;
use crate::geometry::{GeometryEngine, LiveStroke};
use crate::perf::ScopedTimer;
use crate::types::{Color, Stroke, StrokePoint, StrokeStyle};
use image::RgbaImage;
use tracing::debug;

struct Layers {
    static_layer: Surface,
    active_layer: Surface,
}

struct LiveState {
    style: StrokeStyle,
    stroke: LiveStroke,
    /// Static layer as it was before an eraser stroke started
    baseline: Option<Surface>,
    /// Area of the active layer the preview has painted
    shown: Option<PixelRect>,
}

/// Owns the layer surfaces of one page and the stroke being drawn on it.
///
/// Until [`attach`](Self::attach) is called there are no surfaces and every
/// operation is a no-op.
pub struct LayeredCompositor {
    geometry: GeometryEngine,
    layers: Option<Layers>,
    live: Option<LiveState>,
}

impl LayeredCompositor {
    pub fn new(geometry: GeometryEngine) -> Self {
        Self {
            geometry,
            layers: None,
            live: None,
        }
    }

    /// Create blank `width`×`height` layers. Any stroke in progress is dropped;
    /// call [`rebuild`](Self::rebuild) afterwards to show committed strokes.
    pub fn attach(&mut self, width: u32, height: u32) {
        self.live = None;
        self.layers = Some(Layers {
            static_layer: Surface::new(width, height),
            active_layer: Surface::new(width, height),
        });
    }

    pub fn detach(&mut self) {
        self.live = None;
        self.layers = None;
    }

    pub fn is_attached(&self) -> bool {
        self.layers.is_some()
    }

    pub fn geometry(&self) -> GeometryEngine {
        self.geometry
    }

    pub fn static_layer(&self) -> Option<&Surface> {
        self.layers.as_ref().map(|l| &l.static_layer)
    }

    pub fn active_layer(&self) -> Option<&Surface> {
        self.layers.as_ref().map(|l| &l.active_layer)
    }

    pub fn is_drawing(&self) -> bool {
        self.live.is_some()
    }

    /// Points captured so far for the stroke in progress.
    pub fn live_points(&self) -> &[StrokePoint] {
        self.live.as_ref().map_or(&[], |live| live.stroke.points())
    }

    pub fn live_style(&self) -> Option<StrokeStyle> {
        self.live.as_ref().map(|live| live.style)
    }

    /// Clear the static layer and replay `strokes` in order.
    pub fn rebuild(&mut self, strokes: &[Stroke]) {
        let _timer = ScopedTimer::new("rebuild_static_layer", TARGET_FRAME_MS);
        let Some(layers) = self.layers.as_mut() else {
            return;
        };
        layers.static_layer.clear();
        paint_strokes(&mut layers.static_layer, &self.geometry, strokes);
        debug!(
            strokes = strokes.len(),
            digest = %layers.static_layer.digest(),
            "Rebuilt static layer"
        );
    }

    /// Start a new stroke. Returns `false` when no surface is attached.
    pub fn begin_stroke(&mut self, style: StrokeStyle) -> bool {
        if self.layers.is_none() {
            return false;
        }
        if self.live.is_some() {
            debug!("Dropping unfinished stroke");
            self.discard_stroke();
        }
        let Some(layers) = self.layers.as_ref() else {
            return false;
        };
        let (width, height) = (layers.static_layer.width(), layers.static_layer.height());
        let baseline = style.is_eraser().then(|| layers.static_layer.clone());
        self.live = Some(LiveState {
            style,
            stroke: self.geometry.begin(style.size, width, height),
            baseline,
            shown: None,
        });
        debug!(tool = ?style.tool, size = style.size, "Stroke started");
        true
    }

    /// Append samples to the stroke in progress and repaint what changed.
    /// Returns the repainted region.
    pub fn extend_stroke(&mut self, points: &[StrokePoint]) -> Option<PixelRect> {
        let layers = self.layers.as_mut()?;
        let live = self.live.as_mut()?;
        let dirty = live.stroke.extend(points)?;
        let mask = live.stroke.mask();

        if live.style.is_eraser() {
            if let Some(baseline) = live.baseline.as_ref() {
                layers.static_layer.restore_rect(baseline, dirty);
            }
            let mut erase = layers.static_layer.scoped(CompositeOp::DestinationOut);
            erase.paint_mask(mask, live.style.color, Some(dirty));
        } else {
            layers.active_layer.clear_rect(dirty);
            layers.active_layer.paint_mask(mask, live.style.color, Some(dirty));
            live.shown = PixelRect::union_opt(live.shown, Some(dirty));
        }
        Some(dirty)
    }

    /// Finish the stroke in progress. With at least two points the stroke is
    /// painted onto the static layer and returned; otherwise it is discarded.
    pub fn commit_stroke(&mut self) -> Option<Stroke> {
        crate::profile_scope!("commit_stroke");
        if self.layers.is_none() {
            self.live = None;
            return None;
        }
        let live = self.live.take()?;
        let Some(stroke) = Stroke::new(live.stroke.points().to_vec(), live.style) else {
            debug!(points = live.stroke.points().len(), "Discarded short stroke");
            self.live = Some(live);
            self.discard_stroke();
            return None;
        };

        let layers = self.layers.as_mut()?;
        if !live.style.is_eraser() {
            layers
                .static_layer
                .paint_mask(live.stroke.mask(), live.style.color, None);
        }
        if let Some(shown) = live.shown {
            layers.active_layer.clear_rect(shown);
        }
        debug!(
            stroke_id = %stroke.id,
            points = stroke.points.len(),
            tool = ?stroke.tool,
            "Committed stroke"
        );
        Some(stroke)
    }

    /// Abandon the stroke in progress, undoing anything it painted.
    pub fn discard_stroke(&mut self) {
        let Some(live) = self.live.take() else {
            return;
        };
        let Some(layers) = self.layers.as_mut() else {
            return;
        };
        if let (Some(baseline), Some(touched)) = (live.baseline.as_ref(), live.stroke.mask().bounds()) {
            layers.static_layer.restore_rect(baseline, touched);
        }
        if let Some(shown) = live.shown {
            layers.active_layer.clear_rect(shown);
        }
    }

    /// Static and active layers composited over `background`.
    pub fn flatten(&self, background: Color) -> Option<RgbaImage> {
        let layers = self.layers.as_ref()?;
        let mut combined = layers.static_layer.clone();
        combined.draw_surface(&layers.active_layer);
        Some(combined.flatten_over(background))
    }

    /// Render `strokes` onto a fresh `width`×`height` surface.
    pub fn replay(strokes: &[Stroke], width: u32, height: u32, geometry: &GeometryEngine) -> Surface {
        let mut surface = Surface::new(width, height);
        paint_strokes(&mut surface, geometry, strokes);
        surface
    }
}

/// Paint `strokes` in order through one reused coverage mask.
fn paint_strokes(surface: &mut Surface, geometry: &GeometryEngine, strokes: &[Stroke]) {
    let mut mask = CoverageMask::new(surface.width(), surface.height());
    for stroke in strokes {
        mask.clear();
        if geometry.rasterize(&stroke.points, stroke.size, &mut mask).is_none() {
            continue;
        }
        if stroke.is_eraser() {
            surface
                .scoped(CompositeOp::DestinationOut)
                .paint_mask(&mask, stroke.color, None);
        } else {
            surface.paint_mask(&mask, stroke.color, None);
        }
    }
}
