use pretty_assertions::assert_eq;

use super::*;
use crate::animation::FrameList;
use crate::frame::{Frame, Recorder, SinkError};
use crate::intgen::IndexArray;
use crate::mask::Mask;
use crate::pattern::Single;
use crate::schedule::{Delays, FixedRate};
use crate::tick::ManualTicks;

type TestFrame = Frame<Single<char>, &'static str>;

/// A frame which sets slot `index` to `item`.
fn put(index: i32, item: &'static str) -> TestFrame {
    Frame::new(
        Single::new(index, 'x'),
        Mask::new().with('x', item),
        IndexArray::from([index]),
    )
}

fn frames(items: &[&'static str]) -> FrameList<TestFrame> {
    FrameList::new(items.iter().zip(0..).map(|(&item, index)| put(index, item))).unwrap()
}

struct Fixture {
    ticks: Arc<ManualTicks>,
    recorder: Recorder<&'static str>,
    runner: Runner<TestFrame>,
}

fn fixture(animation: FrameList<TestFrame>, schedule: impl Schedule) -> Fixture {
    let ticks = Arc::new(ManualTicks::new());
    let recorder = Recorder::new();
    let runner = Runner::new(animation, schedule, recorder.clone(), ticks.clone());
    Fixture {
        ticks,
        recorder,
        runner,
    }
}

#[test]
fn plays_at_scheduled_times_then_finishes() {
    let Fixture {
        ticks,
        recorder,
        runner,
    } = fixture(frames(&["a", "b", "c"]), Delays::of([2, 1]).append(FixedRate::new(3)));
    assert_eq!(runner.status(), RunStatus::NotStarted);
    assert!(runner.play());
    assert_eq!(runner.status(), RunStatus::Running);

    ticks.advance(1);
    assert_eq!(recorder.take(), vec![]);
    ticks.advance(1);
    assert_eq!(recorder.take(), vec![(0, Some("a"))]);
    ticks.advance(1);
    assert_eq!(recorder.take(), vec![(1, Some("b"))]);
    ticks.advance(2);
    assert_eq!(recorder.take(), vec![]);
    ticks.advance(1);
    assert_eq!(recorder.take(), vec![(2, Some("c"))]);
    assert_eq!(runner.status(), RunStatus::Running);

    // The next callback finds no more frames.
    ticks.advance(3);
    assert_eq!(runner.status(), RunStatus::Finished);
    assert_eq!(recorder.take(), vec![]);
    assert_eq!(ticks.pending(), 0);
}

#[test]
fn play_with_exhausted_animation_finishes_without_scheduling() {
    let mut animation = frames(&["a"]);
    animation.next_frame().unwrap();
    let Fixture { ticks, runner, .. } = fixture(animation, FixedRate::new(1));
    assert!(!runner.play());
    assert_eq!(runner.status(), RunStatus::Finished);
    assert_eq!(ticks.pending(), 0);
}

#[test]
fn play_with_exhausted_schedule_finishes_without_scheduling() {
    let Fixture { ticks, runner, .. } = fixture(frames(&["a"]), Delays::of([]));
    assert!(!runner.play());
    assert_eq!(runner.status(), RunStatus::Finished);
    assert_eq!(ticks.pending(), 0);
}

#[test]
fn schedule_running_out_finishes_after_frame() {
    let Fixture {
        ticks,
        recorder,
        runner,
    } = fixture(frames(&["a", "b", "c"]), Delays::once(1));
    runner.play();
    ticks.advance(10);
    assert_eq!(recorder.take(), vec![(0, Some("a"))]);
    assert_eq!(runner.status(), RunStatus::Finished);
}

#[test]
fn play_while_running_does_nothing() {
    let Fixture {
        ticks,
        recorder,
        runner,
    } = fixture(frames(&["a", "b"]), FixedRate::new(1));
    assert!(runner.play());
    assert!(runner.play());
    assert_eq!(ticks.pending(), 1);
    ticks.tick();
    assert_eq!(recorder.take(), vec![(0, Some("a"))]);
}

#[test]
fn stop_then_resume() {
    let Fixture {
        ticks,
        recorder,
        runner,
    } = fixture(frames(&["a", "b", "c"]), FixedRate::new(1));
    runner.play();
    ticks.tick();
    runner.stop();
    runner.stop();
    assert_eq!(runner.status(), RunStatus::Paused);
    ticks.advance(5);
    assert_eq!(recorder.take(), vec![(0, Some("a"))]);

    assert!(runner.play());
    ticks.tick();
    assert_eq!(recorder.take(), vec![(1, Some("b"))]);
}

#[test]
fn resume_waits_for_stopped_step_without_consuming_schedule() {
    let Fixture {
        ticks,
        recorder,
        runner,
    } = fixture(frames(&["a", "b", "c"]), Delays::of([1, 1, 1]));
    runner.play();
    runner.stop();
    assert!(runner.play());
    ticks.advance(10);
    assert_eq!(
        recorder.take(),
        vec![(0, Some("a")), (1, Some("b")), (2, Some("c"))]
    );
    assert_eq!(runner.status(), RunStatus::Finished);
}

#[test]
fn resume_under_time_limit_reuses_stopped_delay() {
    let Fixture {
        ticks,
        recorder,
        runner,
    } = fixture(frames(&["a", "b"]), FixedRate::new(5).limit_time(10));
    runner.play();
    ticks.advance(3);
    runner.stop();
    assert!(runner.play());

    // The stopped step's delay is waited in full from the time of resuming.
    ticks.advance(4);
    assert_eq!(recorder.take(), vec![]);
    ticks.advance(1);
    assert_eq!(recorder.take(), vec![(0, Some("a"))]);
    ticks.advance(20);
    assert_eq!(recorder.take(), vec![(1, Some("b"))]);
    assert_eq!(runner.status(), RunStatus::Finished);
}

#[test]
fn reset_forgets_stopped_delay() {
    let Fixture {
        ticks,
        recorder,
        runner,
    } = fixture(frames(&["a", "b"]), Delays::of([1, 4]));
    runner.play();
    ticks.advance(1);
    assert_eq!(recorder.take(), vec![(0, Some("a"))]);
    runner.stop();
    runner.reset();

    assert!(runner.play());
    ticks.advance(1);
    assert_eq!(recorder.take(), vec![(0, Some("a"))]);
}

#[test]
fn stop_before_play_pauses() {
    let Fixture { runner, .. } = fixture(frames(&["a"]), FixedRate::new(1));
    runner.stop();
    assert_eq!(runner.status(), RunStatus::Paused);
}

#[test]
fn finished_is_sticky_until_reset() {
    let Fixture {
        ticks,
        recorder,
        runner,
    } = fixture(frames(&["a"]), FixedRate::new(1));
    runner.play();
    ticks.advance(2);
    assert_eq!(runner.status(), RunStatus::Finished);
    runner.stop();
    assert_eq!(runner.status(), RunStatus::Finished);
    assert!(!runner.play());

    runner.reset();
    assert_eq!(runner.status(), RunStatus::NotStarted);
    recorder.take();
    assert!(runner.play());
    ticks.tick();
    assert_eq!(recorder.take(), vec![(0, Some("a"))]);
}

#[test]
fn reset_while_running_cancels_and_rewinds() {
    let Fixture {
        ticks,
        recorder,
        runner,
    } = fixture(frames(&["a", "b"]), Delays::of([1, 5]));
    runner.play();
    ticks.tick();
    runner.reset();
    assert_eq!(ticks.pending(), 0);
    ticks.advance(10);
    assert_eq!(recorder.take(), vec![(0, Some("a"))]);

    runner.play();
    ticks.advance(1);
    assert_eq!(recorder.take(), vec![(0, Some("a"))]);
}

#[test]
fn sink_failure_pauses() {
    struct Refuse;
    impl ContentSink<&'static str> for Refuse {
        fn set_content(&mut self, _: i32, _: Option<&&'static str>) -> Result<(), SinkError> {
            Err("player logged out".into())
        }
    }

    let ticks = Arc::new(ManualTicks::new());
    let runner = Runner::new(frames(&["a", "b"]), FixedRate::new(1), Refuse, ticks.clone());
    runner.play();
    let errors = ticks.tick();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], StepError::Sink { index: 0, .. }));
    assert_eq!(runner.status(), RunStatus::Paused);
    assert_eq!(ticks.pending(), 0);
}

#[test]
fn fixed_rate_ignores_schedule() {
    let Fixture {
        ticks,
        recorder,
        runner,
    } = fixture(frames(&["a", "b"]), Delays::of([]));
    assert!(runner.play_fixed_rate(2, 3));
    ticks.advance(2);
    assert_eq!(recorder.take(), vec![(0, Some("a"))]);
    ticks.advance(3);
    assert_eq!(recorder.take(), vec![(1, Some("b"))]);
    ticks.advance(3);
    assert_eq!(runner.status(), RunStatus::Finished);
    assert_eq!(ticks.pending(), 0);
}

#[test]
fn drop_cancels_pending() {
    let Fixture { ticks, runner, .. } = fixture(frames(&["a"]), FixedRate::new(1));
    runner.play();
    assert_eq!(ticks.pending(), 1);
    drop(runner);
    assert_eq!(ticks.pending(), 0);
    assert!(ticks.tick().is_empty());
}

#[test]
fn handle_stops_without_owning() {
    let Fixture {
        ticks,
        recorder,
        runner,
    } = fixture(frames(&["a", "b"]), FixedRate::new(1));
    let handle = runner.handle();
    runner.play();
    handle.stop();
    assert_eq!(runner.status(), RunStatus::Paused);
    ticks.advance(3);
    assert_eq!(recorder.take(), vec![]);

    drop(runner);
    handle.stop();
}

/// Provider which runs callbacks before returning, as some single-threaded hosts do.
#[derive(Debug)]
struct Inline;

impl TickProvider for Inline {
    fn schedule_once(&self, _: Ticks, mut callback: TickCallback) -> CancelHandle {
        callback().unwrap();
        CancelHandle::new()
    }

    fn schedule_repeating(&self, _: Ticks, _: Ticks, mut callback: TickCallback) -> CancelHandle {
        let handle = CancelHandle::new();
        for _ in 0..3 {
            callback().unwrap();
        }
        handle
    }
}

#[test]
fn inline_provider_schedule_driven() {
    let recorder = Recorder::new();
    let runner = Runner::new(
        frames(&["a", "b"]),
        FixedRate::new(1),
        recorder.clone(),
        Arc::new(Inline),
    );
    // Everything happens before `play()` returns.
    assert!(runner.play());
    assert_eq!(recorder.take(), vec![(0, Some("a")), (1, Some("b"))]);
    assert_eq!(runner.status(), RunStatus::Finished);
}

#[test]
fn inline_provider_fixed_rate_three_fires() {
    let recorder = Recorder::new();
    let runner = Runner::new(
        frames(&["a", "b"]),
        Delays::of([]),
        recorder.clone(),
        Arc::new(Inline),
    );
    assert!(runner.play_fixed_rate(0, 1));
    assert_eq!(recorder.take(), vec![(0, Some("a")), (1, Some("b"))]);
    assert_eq!(runner.status(), RunStatus::Finished);
}
