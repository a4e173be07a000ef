//! The stroke optimiser: rounds geometry/colour and elides strokes that are
//! indistinguishable from one already emitted, while still preserving the
//! turtle's position through the elided wrapper.

use crate::turtle::{round_stroke, Stroke};

/// Canonicalises strokes and tracks which canonical forms have already been
/// emitted.
///
/// Rounding happens before comparison, so two strokes that differ only in
/// sub-millimetre float noise are treated as the same stroke. A plain `Vec`
/// is enough to track "already emitted" — canonical-stroke sets in practice
/// stay small (most programs redraw a handful of distinct shapes).
#[derive(Debug, Default)]
pub struct StrokeOptimiser {
    emitted: Vec<Stroke>,
}

impl StrokeOptimiser {
    /// Creates an optimiser with no strokes emitted yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds `stroke` and either emits it as a fresh canonical stroke or
    /// wraps it as [`Stroke::Elided`] if an identical one is already in the
    /// emitted set.
    pub fn process(&mut self, stroke: &Stroke) -> Stroke {
        let canonical = round_stroke(stroke);
        if self.emitted.iter().any(|s| s == &canonical) {
            canonical.elide()
        } else {
            self.emitted.push(canonical.clone());
            canonical
        }
    }

    /// Removes `stroke` from the emitted set (after rounding), so that the
    /// next identical stroke is emitted unelided rather than suppressed.
    pub fn delete_stroke(&mut self, stroke: &Stroke) {
        let canonical = round_stroke(stroke);
        self.emitted.retain(|s| s != &canonical);
    }
}
