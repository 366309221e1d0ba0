//! Integration tests for timer dispatch through the runner.

mod common;

use std::time::Duration;

use chrono::NaiveTime;
use rand::SeedableRng;
use rand::rngs::StdRng;

use microgrid_dash::config::DashboardConfig;
use microgrid_dash::dashboard::render::CountingRenderer;
use microgrid_dash::runner::Runner;
use microgrid_dash::sim::scheduler::Timer;

#[test]
fn one_minute_of_virtual_time() {
    let mut runner = common::seeded_runner(common::SEED);
    let mut r = CountingRenderer::default();
    let mut clock = 0;
    let mut connection = 0;
    for s in 1..=60 {
        for timer in runner.pump(Duration::from_secs(s), &mut r).unwrap() {
            match timer {
                Timer::Clock => clock += 1,
                Timer::Connection => connection += 1,
                Timer::Simulation => {}
            }
        }
    }
    assert_eq!(clock, 60);
    assert_eq!(connection, 2);
    assert_eq!(r.renders, 20);
    assert_eq!(runner.dashboard().ticks(), 20);
    assert_eq!(runner.dashboard().clock_label(), "12:01:00");
}

#[test]
fn stalled_poll_does_not_replay_ticks() {
    let mut runner = common::seeded_runner(common::SEED);
    let mut r = CountingRenderer::default();
    runner.pump(Duration::from_secs(20), &mut r).unwrap();
    assert_eq!(runner.dashboard().ticks(), 1);
}

#[test]
fn run_ticks_is_reproducible() {
    let mut a = common::seeded_runner(5);
    let mut b = common::seeded_runner(5);
    let mut r = CountingRenderer::default();
    a.run_ticks(25, &mut r).unwrap();
    b.run_ticks(25, &mut r).unwrap();
    assert_eq!(a.dashboard().snapshot(), b.dashboard().snapshot());
    assert_eq!(r.renders, 50);
}

#[test]
fn ticks_cross_midnight() {
    let mut runner = Runner::new(
        DashboardConfig::default(),
        StdRng::seed_from_u64(1),
        NaiveTime::from_hms_opt(23, 59, 58).unwrap(),
    );
    let mut r = CountingRenderer::default();
    runner.run_ticks(1, &mut r).unwrap();
    assert_eq!(runner.dashboard().chart().latest().unwrap().label, "00:00");
}
