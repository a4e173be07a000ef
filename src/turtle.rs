//! Geometry and stroke types produced by the evaluator, plus the rounding
//! and colour-folding rules the optimiser applies to them.

/// A point in turtle-space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pt {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Pt {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An RGBA colour, each channel nominally in `0..100` but allowed to go
/// negative — the optimiser folds it back into range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    pub a: f64,
}

impl Color {
    /// Creates a colour from its four channels.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// The default colour drawn by a fresh turtle: opaque black.
    pub const fn default_black() -> Self {
        Self::new(0.0, 0.0, 0.0, 100.0)
    }
}

/// One atomic drawing primitive emitted by the evaluator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stroke {
    /// A line segment from `start` to `end`.
    Line {
        /// Where the segment starts.
        start: Pt,
        /// Where the segment ends.
        end: Pt,
        /// The segment's colour.
        color: Color,
        /// The segment's brush size.
        size: f64,
    },
    /// A single dot.
    Dot {
        /// Where the dot is drawn.
        pos: Pt,
        /// The dot's colour.
        color: Color,
        /// The dot's radius.
        size: f64,
    },
    /// Wraps a [`Stroke::Line`] or [`Stroke::Dot`] that the optimiser
    /// suppressed as a duplicate of one already emitted. The turtle still
    /// moved, so the position carried by the inner stroke remains
    /// meaningful to anything tracking turtle motion.
    Elided(Box<Stroke>),
}

impl Stroke {
    /// The point this stroke leaves the turtle at — `end` for a line, `pos`
    /// for a dot, recursing through any [`Stroke::Elided`] wrapper.
    pub fn end_position(&self) -> Pt {
        match self {
            Stroke::Line { end, .. } => *end,
            Stroke::Dot { pos, .. } => *pos,
            Stroke::Elided(inner) => inner.end_position(),
        }
    }

    /// Wraps `self` as elided. Panics if `self` is already an
    /// [`Stroke::Elided`] — elision never nests, by invariant.
    pub fn elide(self) -> Stroke {
        debug_assert!(
            !matches!(self, Stroke::Elided(_)),
            "Elided must never wrap Elided"
        );
        Stroke::Elided(Box::new(self))
    }
}

/// Rounds a single coordinate to one decimal place.
pub fn round_float(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Rounds both coordinates of a point to one decimal place.
pub fn round_pt(pt: Pt) -> Pt {
    Pt::new(round_float(pt.x), round_float(pt.y))
}

/// Folds a colour or size channel into `(-100, 100]`.
pub fn fold_channel(x: f64) -> f64 {
    let wrapped = ((x + 100.0).rem_euclid(200.0)) - 100.0;
    let rounded = round_float(wrapped);
    if rounded == -100.0 {
        100.0
    } else {
        rounded
    }
}

/// Folds every channel of a colour into `(-100, 100]`.
pub fn fold_color(c: Color) -> Color {
    Color::new(
        fold_channel(c.r),
        fold_channel(c.g),
        fold_channel(c.b),
        fold_channel(c.a),
    )
}

/// Rounds geometry and folds colour/size on a single stroke, matching the
/// canonicalisation the optimiser performs before deduplication.
pub fn round_stroke(stroke: &Stroke) -> Stroke {
    match stroke {
        Stroke::Line {
            start,
            end,
            color,
            size,
        } => Stroke::Line {
            start: round_pt(*start),
            end: round_pt(*end),
            color: fold_color(*color),
            size: fold_channel(*size),
        },
        Stroke::Dot { pos, color, size } => Stroke::Dot {
            pos: round_pt(*pos),
            color: fold_color(*color),
            size: fold_channel(*size),
        },
        Stroke::Elided(inner) => Stroke::Elided(Box::new(round_stroke(inner))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_idempotent() {
        let p = Pt::new(1.23456, -9.99);
        assert_eq!(round_pt(p), round_pt(round_pt(p)));
    }

    #[test]
    fn fold_channel_wraps_into_range() {
        assert_eq!(fold_channel(100.0), 100.0);
        assert_eq!(fold_channel(-100.0), 100.0);
        assert_eq!(fold_channel(150.0), -50.0);
        assert_eq!(fold_channel(0.0), 0.0);
    }

    #[test]
    fn elide_refuses_to_double_wrap() {
        let line = Stroke::Line {
            start: Pt::new(0.0, 0.0),
            end: Pt::new(1.0, 1.0),
            color: Color::default_black(),
            size: 1.0,
        };
        let elided = line.elide();
        assert!(matches!(elided, Stroke::Elided(_)));
    }
}
