//! Plays animations through the public API only, the way a host would.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;

use slotmenu::Ticks;
use slotmenu::animation::FrameList;
use slotmenu::frame::{Frame, Recorder};
use slotmenu::intgen::Range;
use slotmenu::mask::Mask;
use slotmenu::pattern::{BorderPattern, BorderSymbol, GridPattern};
use slotmenu::registry::RunnerRegistry;
use slotmenu::runner::{RunStatus, Runner};
use slotmenu::schedule::{Delays, FixedRate, Schedule as _};
use slotmenu::tick::{CancelHandle, ManualTicks, TickCallback, TickProvider};

/// Provider which keeps the callback it is given so the test can fire it by hand.
#[derive(Default)]
struct HeldTicks {
    held: Mutex<Option<(CancelHandle, TickCallback)>>,
}

impl std::fmt::Debug for HeldTicks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeldTicks").finish_non_exhaustive()
    }
}

impl HeldTicks {
    /// Fires the held callback once, if it has not been cancelled.
    fn fire(&self) {
        let mut held = self.held.lock().unwrap();
        if let Some((handle, callback)) = held.as_mut() {
            if !handle.is_cancelled() {
                callback().unwrap();
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.held
            .lock()
            .unwrap()
            .as_ref()
            .is_none_or(|(handle, _)| handle.is_cancelled())
    }
}

impl TickProvider for HeldTicks {
    fn schedule_once(&self, _: Ticks, _: TickCallback) -> CancelHandle {
        unreachable!("only fixed-rate playback is used with this provider")
    }

    fn schedule_repeating(&self, _: Ticks, _: Ticks, callback: TickCallback) -> CancelHandle {
        let handle = CancelHandle::new();
        *self.held.lock().unwrap() = Some((handle.clone(), callback));
        handle
    }
}

fn reveal_frames() -> FrameList<Frame<GridPattern, &'static str>> {
    let grid = GridPattern::parse(["ab", "ba"]).unwrap();
    let base = Frame::new(
        grid,
        Mask::new().with('a', "apple").with_clear('b'),
        Range::up_to(0, 0),
    );
    FrameList::reveal(&base, Range::up_to(0, 4), NonZeroUsize::new(2).unwrap()).unwrap()
}

#[test]
fn fixed_rate_two_frames_three_fires() {
    let ticks = Arc::new(HeldTicks::default());
    let recorder = Recorder::new();
    let runner = Runner::new(
        reveal_frames(),
        Delays::of([]),
        recorder.clone(),
        ticks.clone(),
    );
    assert!(runner.play_fixed_rate(0, 1));

    ticks.fire();
    assert_eq!(recorder.take(), vec![(0, Some("apple")), (1, None)]);
    ticks.fire();
    assert_eq!(recorder.take(), vec![(2, None), (3, Some("apple"))]);
    assert_eq!(runner.status(), RunStatus::Running);

    ticks.fire();
    assert_eq!(recorder.take(), vec![]);
    assert_eq!(runner.status(), RunStatus::Finished);
    assert!(ticks.is_cancelled());
}

#[test]
fn border_menu_with_schedule_and_registry() {
    let border = BorderPattern::new(4, 3).unwrap();
    let mask = Mask::new().with(BorderSymbol::Outer, '#').with(BorderSymbol::Inner, '.');
    let base = Frame::new(border, mask, Range::up_to(0, 0));
    let animation =
        FrameList::reveal(&base, Range::up_to(0, 12), NonZeroUsize::new(4).unwrap()).unwrap();

    let ticks = Arc::new(ManualTicks::new());
    let recorder = Recorder::new();
    let runner = Runner::new(
        animation,
        Delays::once(5).append(FixedRate::new(2)),
        recorder.clone(),
        ticks.clone(),
    );
    let registry = RunnerRegistry::new();
    let registration = registry.register("steve", runner.handle());
    assert!(runner.play());

    ticks.advance(5);
    assert_eq!(
        recorder.take(),
        vec![(0, Some('#')), (1, Some('#')), (2, Some('#')), (3, Some('#'))]
    );
    ticks.advance(2);
    assert_eq!(
        recorder.take(),
        vec![(4, Some('#')), (5, Some('.')), (6, Some('.')), (7, Some('#'))]
    );

    // Closing the menu stops the runner before the last row is revealed.
    drop(registration);
    assert_eq!(runner.status(), RunStatus::Paused);
    assert!(registry.is_empty());
    ticks.advance(10);
    assert_eq!(recorder.take(), vec![]);
    assert_eq!(ticks.pending(), 0);

    // Reopening resumes where it left off.
    let _registration = registry.register("steve", runner.handle());
    assert!(runner.play());
    ticks.advance(2);
    assert_eq!(
        recorder.take(),
        vec![(8, Some('#')), (9, Some('#')), (10, Some('#')), (11, Some('#'))]
    );
    ticks.advance(2);
    assert_eq!(runner.status(), RunStatus::Finished);
}
