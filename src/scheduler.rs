//! The cooperative fork scheduler: advances every running program by one
//! statement per tick, admits new forks requested during the tick just
//! finished, and evicts from the front once `max_forks` is exceeded.

use std::collections::VecDeque;
use std::rc::Rc;

use crate::ast::Expr;
use crate::dialect::Dialect;
use crate::error::EvalError;
use crate::eval::eval_expr;
use crate::program_env::ProgramEnv;
use crate::turtle::Stroke;
use crate::value::Value;

/// One interpreter instance: shared program text, a program counter, the
/// jump-back label, and its own [`ProgramEnv`].
#[derive(Clone)]
pub struct RunningProgram {
    program: Rc<Vec<Expr>>,
    pc: usize,
    label: usize,
    /// This fork's evaluation context.
    pub pe: ProgramEnv,
    dialect: Dialect,
}

impl RunningProgram {
    /// Creates a running program at its first statement, with no label set.
    pub fn new(program: Rc<Vec<Expr>>, dialect: Dialect, pe: ProgramEnv) -> Self {
        Self {
            program,
            pc: 0,
            label: 0,
            pe,
            dialect,
        }
    }

    /// Evaluates exactly one top-level statement, advancing `pc` (wrapping to
    /// `label` at the end of the program) and returning any strokes it
    /// produced. A top-level `^` sets `label` instead of evaluating.
    pub fn step(&mut self) -> Result<Vec<Stroke>, EvalError> {
        if self.program.is_empty() {
            return Ok(Vec::new());
        }
        self.pe.strokes.borrow_mut().clear();
        let stmt = &self.program[self.pc];
        if matches!(stmt, Expr::Label) {
            self.label = self.pc + 1;
        } else {
            eval_expr(&self.pe, self.dialect, stmt)?;
        }
        self.pc += 1;
        if self.pc >= self.program.len() {
            self.pc = self.label;
        }
        Ok(self.pe.strokes.borrow_mut().drain(..).collect())
    }

    fn fork_clone(&self, fork_id: u32) -> RunningProgram {
        let pe = self.pe.clone_for_fork();
        pe.set("f", Value::Number(fork_id as f64));
        RunningProgram {
            program: Rc::clone(&self.program),
            pc: self.pc,
            label: self.label,
            pe,
            dialect: self.dialect,
        }
    }
}

/// One slot of a tick's parallel-frame: the stroke a fork produced (or
/// `None` if that statement drew nothing) plus the fork's environment.
#[derive(Clone)]
pub struct TickSlot {
    /// The stroke, if any, emitted in this fork's queue this tick.
    pub stroke: Option<Stroke>,
    /// The fork's environment as of this tick.
    pub pe: ProgramEnv,
}

/// The result of one scheduler tick.
#[derive(Clone)]
pub struct TickOutcome {
    /// One slot per active fork, in stable admission order.
    pub slots: Vec<TickSlot>,
    /// Whether the stream should keep being pulled.
    pub more: bool,
}

/// Counts frames — ticks that produced visible output — tolerating runs of
/// pure state mutation (e.g. a program that only rotates) by inserting a
/// synthetic frame after ten consecutive empty ticks, so such programs still
/// terminate within a frame budget.
pub struct FramesCounter {
    frames: u64,
    non_frames: u32,
    max_count: Option<u64>,
}

impl FramesCounter {
    /// Creates a counter that stops (`more == false`) once `max_count` frames
    /// have been counted, or never stops if `max_count` is `None`.
    pub fn new(max_count: Option<u64>) -> Self {
        Self {
            frames: 0,
            non_frames: 0,
            max_count,
        }
    }

    /// Records one tick's outcome, returning whether the stream should
    /// continue.
    pub fn record_tick(&mut self, had_stroke: bool) -> bool {
        if had_stroke {
            self.frames += 1;
            self.non_frames = 0;
        } else {
            self.non_frames += 1;
            if self.non_frames > 10 {
                self.frames += 1;
                self.non_frames = 0;
            }
        }
        match self.max_count {
            Some(max) => self.frames < max,
            None => true,
        }
    }

    /// The number of frames counted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Advances every active [`RunningProgram`] in lockstep, admitting forks
/// requested during the previous tick and evicting the oldest forks once
/// `max_forks` is exceeded.
pub struct Scheduler {
    active: VecDeque<(RunningProgram, VecDeque<Option<Stroke>>)>,
    staging: Vec<RunningProgram>,
    next_fork_id: u32,
    max_forks: usize,
    frames: FramesCounter,
}

impl Scheduler {
    /// Creates an empty scheduler with no programs admitted yet.
    pub fn new(max_forks: usize, max_frames: Option<u64>) -> Self {
        Self {
            active: VecDeque::new(),
            staging: Vec::new(),
            next_fork_id: 1,
            max_forks,
            frames: FramesCounter::new(max_frames),
        }
    }

    /// Admits a program as active starting from the next tick.
    pub fn spawn(&mut self, program: RunningProgram) {
        self.active.push_back((program, VecDeque::new()));
    }

    /// Advances every active program whose queue is empty by one statement,
    /// produces this tick's parallel-frame, then admits staged forks and
    /// enforces `max_forks` by evicting from the front.
    pub fn tick(&mut self) -> Result<TickOutcome, EvalError> {
        for (program, queue) in self.active.iter_mut() {
            if queue.is_empty() {
                let strokes = program.step()?;
                let fork_count = program.pe.fork_requests.get();
                if fork_count > 0 {
                    for _ in 0..fork_count {
                        let id = self.next_fork_id;
                        self.next_fork_id += 1;
                        self.staging.push(program.fork_clone(id));
                    }
                    program.pe.fork_requests.set(0);
                }
                if strokes.is_empty() {
                    queue.push_back(None);
                } else {
                    queue.extend(strokes.into_iter().map(Some));
                }
            }
        }

        let mut slots = Vec::with_capacity(self.active.len());
        for (program, queue) in self.active.iter_mut() {
            let stroke = queue.pop_front().expect("filled above");
            slots.push(TickSlot {
                stroke,
                pe: program.pe.clone(),
            });
        }

        for program in self.staging.drain(..) {
            log::debug!("admitting fork {:?}", program.pe.get("f"));
            self.active.push_back((program, VecDeque::new()));
        }
        while self.active.len() > self.max_forks {
            if let Some((evicted, _)) = self.active.pop_front() {
                log::debug!(
                    "evicting fork {:?} (max_forks {} exceeded)",
                    evicted.pe.get("f"),
                    self.max_forks
                );
            }
        }

        let had_stroke = slots.iter().any(|s| s.stroke.is_some());
        let more = self.frames.record_tick(had_stroke);
        Ok(TickOutcome { slots, more })
    }

    /// How many active forks are currently scheduled.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Frames counted so far.
    pub fn frame_count(&self) -> u64 {
        self.frames.frames()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::{install_cell_library, install_turtle_builtins};
    use crate::lexer::lex;
    use crate::parser::parse;
    use crate::rng::fixed_rng_handle;

    fn scheduler_for(src: &str, max_forks: usize) -> Scheduler {
        let mut scheduler = Scheduler::new(max_forks, None);
        let tokens = lex(src, Dialect::Cell).unwrap();
        let statements = parse(&tokens, Dialect::Cell).unwrap();
        let pe = ProgramEnv::new(fixed_rng_handle(vec![0.0]));
        install_turtle_builtins(&pe.env);
        install_cell_library(&pe.env);
        let program = RunningProgram::new(Rc::new(statements), Dialect::Cell, pe);
        scheduler.spawn(program);
        scheduler
    }

    #[test]
    fn two_steps_emit_two_lines_extending_down_y() {
        let mut scheduler = scheduler_for("S() S()", 20);
        let first = scheduler.tick().unwrap();
        assert_eq!(first.slots.len(), 1);
        match &first.slots[0].stroke {
            Some(Stroke::Line { start, end, .. }) => {
                assert_eq!(*start, crate::turtle::Pt::new(0.0, 0.0));
                assert_eq!(*end, crate::turtle::Pt::new(0.0, 10.0));
            }
            other => panic!("expected a line, got {other:?}"),
        }
        let second = scheduler.tick().unwrap();
        match &second.slots[0].stroke {
            Some(Stroke::Line { start, end, .. }) => {
                assert_eq!(*start, crate::turtle::Pt::new(0.0, 10.0));
                assert_eq!(*end, crate::turtle::Pt::new(0.0, 20.0));
            }
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn fork_then_step_emits_two_identical_lines_in_one_frame() {
        let mut scheduler = scheduler_for("F() S()", 20);
        let fork_tick = scheduler.tick().unwrap();
        assert_eq!(fork_tick.slots.len(), 1);
        assert!(fork_tick.slots[0].stroke.is_none());
        let tick = scheduler.tick().unwrap();
        assert_eq!(tick.slots.len(), 2);
        for slot in &tick.slots {
            match &slot.stroke {
                Some(Stroke::Line { start, end, .. }) => {
                    assert_eq!(*start, crate::turtle::Pt::new(0.0, 0.0));
                    assert_eq!(*end, crate::turtle::Pt::new(0.0, 10.0));
                }
                other => panic!("expected a line, got {other:?}"),
            }
        }
    }

    #[test]
    fn max_forks_one_survivor_has_highest_fork_id() {
        let mut scheduler = scheduler_for("T(5,{F() d+=10})", 1);
        scheduler.tick().unwrap();
        let second = scheduler.tick().unwrap();
        assert_eq!(scheduler.active_count(), 1);
        assert_eq!(second.slots.len(), 1);
        assert_eq!(second.slots[0].pe.get("f"), Value::Number(5.0));
    }

    #[test]
    fn frames_counter_inserts_a_synthetic_frame_after_ten_empty_ticks() {
        let mut counter = FramesCounter::new(None);
        for _ in 0..10 {
            assert!(counter.record_tick(false));
        }
        assert_eq!(counter.frames(), 0);
        counter.record_tick(false);
        assert_eq!(counter.frames(), 1);
    }
}
