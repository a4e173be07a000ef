//! End-to-end scenarios, cell and v1 dialects side by side, exercising
//! lexer → parser → evaluator → scheduler together.

use std::rc::Rc;

use strokelang_core::builtins::{install_cell_library, install_turtle_builtins};
use strokelang_core::dialect::Dialect;
use strokelang_core::lexer::lex;
use strokelang_core::parser::parse;
use strokelang_core::program_env::ProgramEnv;
use strokelang_core::rng::fixed_rng_handle;
use strokelang_core::scheduler::{RunningProgram, Scheduler};
use strokelang_core::turtle::{Pt, Stroke};
use strokelang_core::value::Value;

fn scheduler_for(src: &str, dialect: Dialect, max_forks: usize) -> Scheduler {
    let mut scheduler = Scheduler::new(max_forks, None);
    let tokens = lex(src, dialect).unwrap();
    let statements = parse(&tokens, dialect).unwrap();
    let pe = ProgramEnv::new(fixed_rng_handle(vec![0.0]));
    install_turtle_builtins(&pe.env);
    install_cell_library(&pe.env);
    let program = RunningProgram::new(Rc::new(statements), dialect, pe);
    scheduler.spawn(program);
    scheduler
}

fn expect_line(stroke: &Option<Stroke>, start: Pt, end: Pt) {
    match stroke {
        Some(Stroke::Line { start: s, end: e, .. }) => {
            assert_eq!(*s, start);
            assert_eq!(*e, end);
        }
        other => panic!("expected a line from {start:?} to {end:?}, got {other:?}"),
    }
}

fn expect_dot(stroke: &Option<Stroke>, pos: Pt) {
    match stroke {
        Some(Stroke::Dot { pos: p, .. }) => assert_eq!(*p, pos),
        other => panic!("expected a dot at {pos:?}, got {other:?}"),
    }
}

#[test]
fn two_steps_extend_down_y_in_both_dialects() {
    for (src, dialect) in [("S() S()", Dialect::Cell), (":S:S", Dialect::V1)] {
        let mut scheduler = scheduler_for(src, dialect, 20);
        let first = scheduler.tick().unwrap();
        expect_line(&first.slots[0].stroke, Pt::new(0.0, 0.0), Pt::new(0.0, 10.0));
        let second = scheduler.tick().unwrap();
        expect_line(&second.slots[0].stroke, Pt::new(0.0, 10.0), Pt::new(0.0, 20.0));
    }
}

#[test]
fn direction_and_step_size_in_both_dialects() {
    for (src, dialect) in [("d=90 s=25 S()", Dialect::Cell), ("90=d25=s:S", Dialect::V1)] {
        let mut scheduler = scheduler_for(src, dialect, 20);
        let tick = scheduler.tick().unwrap();
        expect_line(&tick.slots[0].stroke, Pt::new(0.0, 0.0), Pt::new(25.0, 0.0));
    }
}

#[test]
fn times_three_draws_three_lines_along_y() {
    for (src, dialect) in [("T(3,{S()})", Dialect::Cell), ("3:S", Dialect::V1)] {
        let mut scheduler = scheduler_for(src, dialect, 20);
        let expected = [(0.0, 10.0), (10.0, 20.0), (20.0, 30.0)];
        for (start_y, end_y) in expected {
            let tick = scheduler.tick().unwrap();
            expect_line(&tick.slots[0].stroke, Pt::new(0.0, start_y), Pt::new(0.0, end_y));
        }
    }
}

#[test]
fn single_fork_produces_two_identical_lines_one_tick_later() {
    for (src, dialect) in [("F() S()", Dialect::Cell), (":F:S", Dialect::V1)] {
        let mut scheduler = scheduler_for(src, dialect, 20);
        let fork_tick = scheduler.tick().unwrap();
        assert_eq!(fork_tick.slots.len(), 1);
        assert!(fork_tick.slots[0].stroke.is_none());
        let tick = scheduler.tick().unwrap();
        assert_eq!(tick.slots.len(), 2);
        for slot in &tick.slots {
            expect_line(&slot.stroke, Pt::new(0.0, 0.0), Pt::new(0.0, 10.0));
        }
    }
}

#[test]
fn max_forks_eviction_leaves_the_highest_fork_id_in_cell() {
    let mut scheduler = scheduler_for("T(5,{F() d+=10})", Dialect::Cell, 1);
    scheduler.tick().unwrap();
    let second = scheduler.tick().unwrap();
    assert_eq!(scheduler.active_count(), 1);
    assert_eq!(second.slots[0].pe.get("f"), Value::Number(5.0));
}

#[test]
fn max_forks_eviction_leaves_the_highest_fork_id_in_v1() {
    let mut scheduler = scheduler_for("5:F+d", Dialect::V1, 1);
    scheduler.tick().unwrap();
    let second = scheduler.tick().unwrap();
    assert_eq!(scheduler.active_count(), 1);
    assert_eq!(second.slots[0].pe.get("f"), Value::Number(5.0));
}

#[test]
fn dots_before_and_after_reposition_in_both_dialects() {
    for (src, dialect) in [
        ("D() x=20 y=15 D()", Dialect::Cell),
        (":D 20=x 15=y:D", Dialect::V1),
    ] {
        let mut scheduler = scheduler_for(src, dialect, 20);
        let first = scheduler.tick().unwrap();
        expect_dot(&first.slots[0].stroke, Pt::new(0.0, 0.0));
        let mut last_dot = None;
        for _ in 0..5 {
            let tick = scheduler.tick().unwrap();
            if tick.slots[0].stroke.is_some() {
                last_dot = tick.slots[0].stroke.clone();
                break;
            }
        }
        expect_dot(&last_dot, Pt::new(20.0, 15.0));
    }
}
