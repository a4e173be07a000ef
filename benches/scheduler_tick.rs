//! Benchmark for the fork scheduler's tick loop under heavy forking.

use std::rc::Rc;

use criterion::Criterion;
use strokelang_core::builtins::{install_cell_library, install_turtle_builtins};
use strokelang_core::dialect::Dialect;
use strokelang_core::lexer::lex;
use strokelang_core::parser::parse;
use strokelang_core::program_env::ProgramEnv;
use strokelang_core::rng::fixed_rng_handle;
use strokelang_core::scheduler::{RunningProgram, Scheduler};

fn build_scheduler(source: &str, max_forks: usize) -> Scheduler {
    let tokens = lex(source, Dialect::Cell).expect("benchmark program must lex");
    let statements = parse(&tokens, Dialect::Cell).expect("benchmark program must parse");
    let pe = ProgramEnv::new(fixed_rng_handle(vec![0.0]));
    install_turtle_builtins(&pe.env);
    install_cell_library(&pe.env);
    let program = RunningProgram::new(Rc::new(statements), Dialect::Cell, pe);
    let mut scheduler = Scheduler::new(max_forks, None);
    scheduler.spawn(program);
    scheduler
}

fn bench_forking_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler_tick");

    group.bench_function("forking_to_20", |b| {
        b.iter(|| {
            let mut scheduler = build_scheduler("S() F() d+=3", 20);
            for _ in 0..60 {
                std::hint::black_box(scheduler.tick().expect("tick must succeed"));
            }
        });
    });

    group.bench_function("ramping_to_200_forks", |b| {
        b.iter(|| {
            let mut scheduler = build_scheduler("S() F() d+=7", 200);
            for _ in 0..40 {
                std::hint::black_box(scheduler.tick().expect("tick must succeed"));
            }
        });
    });

    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_forking_tick(&mut criterion);
}
