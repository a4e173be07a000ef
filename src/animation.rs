//! The animation driver: turns a [`crate::scheduler::TickOutcome`] into a
//! windowed, optimised picture — a bounded history of strokes, each active
//! fork's current position, and a smoothly tracked viewport.

use std::collections::VecDeque;

use crate::optimiser::StrokeOptimiser;
use crate::scheduler::TickOutcome;
use crate::turtle::{Pt, Stroke};
use crate::window_animator::WindowAnimator;

/// An axis-aligned bounding box, trained incrementally by [`Extents::include`].
///
/// Starts empty — `x_min`/`y_min` at `+infinity`, `x_max`/`y_max` at
/// `-infinity` — so the first included point always widens it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    /// Minimum x seen so far.
    pub x_min: f64,
    /// Maximum x seen so far.
    pub x_max: f64,
    /// Minimum y seen so far.
    pub y_min: f64,
    /// Maximum y seen so far.
    pub y_max: f64,
}

impl Extents {
    /// An empty extents, ready to be widened by [`Extents::include`].
    pub fn empty() -> Self {
        Self {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        }
    }

    /// Widens the box to cover `pt`.
    pub fn include(&mut self, pt: Pt) {
        self.x_min = self.x_min.min(pt.x);
        self.x_max = self.x_max.max(pt.x);
        self.y_min = self.y_min.min(pt.y);
        self.y_max = self.y_max.max(pt.y);
    }

    /// Whether no point has ever been included.
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max
    }

    /// The box's centre, or the origin if empty.
    pub fn center(&self) -> Pt {
        if self.is_empty() {
            Pt::new(0.0, 0.0)
        } else {
            Pt::new((self.x_min + self.x_max) / 2.0, (self.y_min + self.y_max) / 2.0)
        }
    }

    /// The box's `(width, height)`, or `(0, 0)` if empty.
    pub fn size(&self) -> (f64, f64) {
        if self.is_empty() {
            (0.0, 0.0)
        } else {
            (self.x_max - self.x_min, self.y_max - self.y_min)
        }
    }
}

impl Default for Extents {
    fn default() -> Self {
        Self::empty()
    }
}

fn turtle_position(slot: &crate::scheduler::TickSlot) -> Pt {
    let x = slot.pe.get("x").as_number("animation driver: turtle x").unwrap_or(0.0);
    let y = slot.pe.get("y").as_number("animation driver: turtle y").unwrap_or(0.0);
    Pt::new(x, y)
}

fn widen_for_stroke(extents: &mut Extents, stroke: &Stroke) {
    match stroke {
        Stroke::Line { start, end, .. } => {
            extents.include(*start);
            extents.include(*end);
        }
        Stroke::Dot { pos, .. } => extents.include(*pos),
        Stroke::Elided(inner) => widen_for_stroke(extents, inner),
    }
}

/// Consumes scheduler ticks, runs strokes through a [`StrokeOptimiser`],
/// keeps a bounded history for the renderer, and drives a [`WindowAnimator`]
/// that tracks the drawing's extents.
///
/// The first `lookahead_steps` ticks are buffered rather than rendered
/// straight away: once that many have arrived (or the stream ends first),
/// their combined extents train the window with one [`WindowAnimator::snap_to`],
/// and only then are the buffered ticks replayed one per `step` call so the
/// window is already correctly framed from the very first frame shown. The
/// window stays frozen at that trained box for the whole replay; smoothing
/// only resumes once every buffered tick has been replayed. Without this, a
/// program whose drawing starts tiny and grows would spend its first several
/// seconds zoomed in on nothing, widening visibly tick by tick.
pub struct AnimationDriver {
    optimiser: StrokeOptimiser,
    history: VecDeque<Stroke>,
    max_strokes: usize,
    positions: Vec<Pt>,
    extents: Extents,
    window: WindowAnimator,
    lookahead_steps: usize,
    training_buffer: VecDeque<TickOutcome>,
    replay_queue: VecDeque<TickOutcome>,
    trained: bool,
}

impl AnimationDriver {
    /// Creates a driver with an empty history and an untrained window.
    pub fn new(max_strokes: usize, lookahead_steps: usize) -> Self {
        Self {
            optimiser: StrokeOptimiser::new(),
            history: VecDeque::new(),
            max_strokes,
            positions: Vec::new(),
            extents: Extents::empty(),
            window: WindowAnimator::new(),
            lookahead_steps,
            training_buffer: VecDeque::new(),
            replay_queue: VecDeque::new(),
            trained: lookahead_steps == 0,
        }
    }

    /// Feeds one scheduler tick through the optimiser and window, returning
    /// `tick.more` so the caller's pull loop can drive both in lockstep.
    ///
    /// While training, incoming ticks are buffered rather than rendered;
    /// once the lookahead window fills (or the stream ends), the buffer
    /// trains the viewport and is then drained back out one tick per call.
    pub fn step(&mut self, tick: &TickOutcome) -> bool {
        if !self.trained {
            self.training_buffer.push_back(tick.clone());
            if self.training_buffer.len() >= self.lookahead_steps || !tick.more {
                self.train();
            } else {
                return tick.more;
            }
        }

        if let Some(buffered) = self.replay_queue.pop_front() {
            let more = buffered.more;
            self.ingest(&buffered);
            more
        } else {
            self.ingest(tick);
            self.window.track(self.extents.center(), self.extents.size());
            tick.more
        }
    }

    /// Computes the final extents over every buffered tick, snaps the
    /// window to it once, then hands the buffer off to be replayed.
    fn train(&mut self) {
        let mut trained = Extents::empty();
        for buffered in &self.training_buffer {
            for slot in &buffered.slots {
                if let Some(stroke) = &slot.stroke {
                    widen_for_stroke(&mut trained, stroke);
                }
                trained.include(turtle_position(slot));
            }
        }
        self.window.snap_to(trained.center(), trained.size());
        self.trained = true;
        self.replay_queue = std::mem::take(&mut self.training_buffer);
    }

    /// Runs one tick's strokes through the optimiser and history, and
    /// recomputes `self.extents` and `self.positions` from the result.
    /// Does not move the window; callers decide whether to track or hold.
    fn ingest(&mut self, tick: &TickOutcome) {
        self.positions.clear();
        for slot in &tick.slots {
            self.positions.push(turtle_position(slot));
            if let Some(stroke) = &slot.stroke {
                let processed = self.optimiser.process(stroke);
                self.push_history(processed);
            }
        }

        self.extents = Extents::empty();
        for stroke in &self.history {
            widen_for_stroke(&mut self.extents, stroke);
        }
        for pos in &self.positions {
            self.extents.include(*pos);
        }
    }

    fn push_history(&mut self, stroke: Stroke) {
        self.history.push_back(stroke);
        if self.history.len() > self.max_strokes {
            if let Some(evicted) = self.history.pop_front() {
                self.optimiser.delete_stroke(&evicted);
            }
        }
    }

    /// The strokes currently retained for rendering, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Stroke> {
        self.history.iter()
    }

    /// Each active fork's current position, in the tick's slot order.
    pub fn positions(&self) -> &[Pt] {
        &self.positions
    }

    /// The viewport currently being tracked.
    pub fn window(&self) -> &WindowAnimator {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program_env::ProgramEnv;
    use crate::rng::fixed_rng_handle;
    use crate::scheduler::TickSlot;
    use crate::turtle::Color;

    fn tick_with(strokes: Vec<Option<Stroke>>) -> TickOutcome {
        let slots = strokes
            .into_iter()
            .map(|stroke| TickSlot {
                stroke,
                pe: ProgramEnv::new(fixed_rng_handle(vec![0.0])),
            })
            .collect();
        TickOutcome { slots, more: true }
    }

    fn line(x: f64, y: f64) -> Stroke {
        Stroke::Line {
            start: Pt::new(0.0, 0.0),
            end: Pt::new(x, y),
            color: Color::default_black(),
            size: 1.0,
        }
    }

    #[test]
    fn extents_widen_to_cover_every_included_point() {
        let mut extents = Extents::empty();
        assert!(extents.is_empty());
        extents.include(Pt::new(-5.0, 2.0));
        extents.include(Pt::new(5.0, -3.0));
        assert_eq!(extents.center(), Pt::new(0.0, -0.5));
        assert_eq!(extents.size(), (10.0, 5.0));
    }

    #[test]
    fn lookahead_window_snaps_instead_of_smoothing() {
        let mut driver = AnimationDriver::new(200, 1);
        driver.step(&tick_with(vec![Some(line(100.0, 0.0))]));
        assert_eq!(driver.window().center(), Pt::new(50.0, 0.0));
    }

    #[test]
    fn lookahead_trains_on_the_whole_window_before_the_first_frame() {
        let mut driver = AnimationDriver::new(200, 2);
        let first = tick_with(vec![Some(line(10.0, 0.0))]);
        let second = tick_with(vec![Some(line(100.0, 0.0))]);

        // Still buffering: nothing has been rendered yet, so the window
        // hasn't moved off its untrained default.
        driver.step(&first);
        assert_eq!(driver.window().center(), Pt::new(0.0, 0.0));
        assert_eq!(driver.history().count(), 0);

        // The buffer fills here, training on both strokes at once, then
        // replays the first of them. The window already reflects the full
        // two-tick extents rather than just this one stroke's.
        driver.step(&second);
        assert_eq!(driver.window().center(), Pt::new(50.0, 0.0));
        assert_eq!(driver.history().count(), 1);

        // Replaying the second buffered tick doesn't move the window: it
        // was already trained on both strokes.
        driver.step(&second);
        assert_eq!(driver.window().center(), Pt::new(50.0, 0.0));
        assert_eq!(driver.history().count(), 2);
    }

    #[test]
    fn eviction_past_max_strokes_lets_optimiser_re_emit() {
        let mut driver = AnimationDriver::new(1, 0);
        driver.step(&tick_with(vec![Some(line(10.0, 0.0))]));
        driver.step(&tick_with(vec![Some(line(20.0, 0.0))]));
        let reemitted = driver.step(&tick_with(vec![Some(line(10.0, 0.0))]));
        assert!(reemitted);
        assert!(matches!(
            driver.history().last().unwrap(),
            Stroke::Line { .. }
        ));
    }
}
