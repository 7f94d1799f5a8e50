//! Per-block gesture state machine.
//!
//! Each task block on the grid owns one machine. Pointer events advance it;
//! there is no shared "currently resizing" flag.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Dragging -> Idle                       (drop or cancel)
//! Idle -> Resizing -> JustFinishedResizing -> Idle (after click_suppress)
//!         Resizing -> Idle                       (cancel)
//! ```
//!
//! Like the rest of the crate the machine has no timer thread: every event
//! carries `now`, and a lapsed suppression window is noticed on the next
//! event or [`GestureMachine::tick`].

use chrono::{DateTime, Utc};

use super::{reschedule, resize, DropTarget, Edge, GestureResult, GestureSettings};
use crate::error::{GestureError, Result};
use crate::timeline::{pixels_to_duration, Interval};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging {
        task_id: String,
        original: Interval,
    },
    Resizing {
        task_id: String,
        original: Interval,
        edge: Edge,
    },
    /// A resize just ended; clicks are swallowed until `until`.
    JustFinishedResizing {
        task_id: String,
        until: DateTime<Utc>,
    },
}

impl GestureState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging { .. } => "dragging",
            Self::Resizing { .. } => "resizing",
            Self::JustFinishedResizing { .. } => "just finished resizing",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GestureMachine {
    state: GestureState,
    settings: GestureSettings,
}

impl GestureMachine {
    pub fn new(settings: GestureSettings) -> Self {
        Self {
            state: GestureState::Idle,
            settings,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn settings(&self) -> &GestureSettings {
        &self.settings
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Expire the click-suppression window once `now` has passed it.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        let expired = matches!(
            &self.state,
            GestureState::JustFinishedResizing { until, .. } if now >= *until
        );
        if expired {
            self.transition(GestureState::Idle);
        }
    }

    pub fn begin_drag(
        &mut self,
        task_id: impl Into<String>,
        original: Interval,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.tick(now);
        self.require_idle("begin a drag")?;
        self.transition(GestureState::Dragging {
            task_id: task_id.into(),
            original,
        });
        Ok(())
    }

    /// Finish a drag on `target`.
    pub fn drop_on(&mut self, target: &DropTarget) -> Result<GestureResult> {
        let GestureState::Dragging { task_id, original } = &self.state else {
            return Err(self.illegal("drop").into());
        };
        let interval = reschedule(original, target, &self.settings)?;
        let result = GestureResult::Reschedule {
            task_id: task_id.clone(),
            interval,
        };
        self.transition(GestureState::Idle);
        Ok(result)
    }

    pub fn begin_resize(
        &mut self,
        task_id: impl Into<String>,
        original: Interval,
        edge: Edge,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.tick(now);
        self.require_idle("begin a resize")?;
        self.transition(GestureState::Resizing {
            task_id: task_id.into(),
            original,
            edge,
        });
        Ok(())
    }

    /// Release a resize handle after a cumulative vertical move of
    /// `pixel_delta`.
    pub fn finish_resize(
        &mut self,
        edge: Edge,
        pixel_delta: f64,
        now: DateTime<Utc>,
    ) -> Result<GestureResult> {
        let GestureState::Resizing {
            task_id,
            original,
            edge: started,
        } = &self.state
        else {
            return Err(self.illegal("finish a resize").into());
        };
        if *started != edge {
            return Err(GestureError::EdgeMismatch {
                started: *started,
                finished: edge,
            }
            .into());
        }

        let delta = pixels_to_duration(
            pixel_delta,
            self.settings.grid.hour_height_px,
            self.settings.snap_minutes,
        );
        let interval = resize(original, edge, delta, self.settings.minimum_duration)?;
        let task_id = task_id.clone();
        let until = now + self.settings.click_suppress;
        let result = GestureResult::Resize {
            task_id: task_id.clone(),
            edge,
            interval,
        };
        self.transition(GestureState::JustFinishedResizing {
            task_id,
            until,
        });
        Ok(result)
    }

    /// Abort a drag or resize. Does nothing in any other state.
    pub fn cancel(&mut self) {
        if matches!(
            self.state,
            GestureState::Dragging { .. } | GestureState::Resizing { .. }
        ) {
            self.transition(GestureState::Idle);
        }
    }

    /// A click landed on the block. Returns whether it should open the task.
    pub fn click(&mut self, now: DateTime<Utc>) -> bool {
        self.tick(now);
        self.is_idle()
    }

    // ── Internals ────────────────────────────────────────────────────

    fn require_idle(&self, event: &'static str) -> std::result::Result<(), GestureError> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(self.illegal(event))
        }
    }

    fn illegal(&self, event: &'static str) -> GestureError {
        GestureError::IllegalTransition {
            event,
            state: self.state.name(),
        }
    }

    fn transition(&mut self, next: GestureState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "gesture transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::timeline::GridMetrics;
    use chrono::{Duration, FixedOffset, NaiveDate, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 20, hour, minute, 0).unwrap()
    }

    fn machine() -> GestureMachine {
        GestureMachine::new(GestureSettings {
            offset: FixedOffset::east_opt(0).unwrap(),
            grid: GridMetrics::default(),
            minimum_duration: Duration::minutes(15),
            snap_minutes: 15,
            click_suppress: Duration::milliseconds(100),
        })
    }

    fn nine_to_ten() -> Interval {
        Interval::try_new(at(9, 0), at(10, 0)).unwrap()
    }

    #[test]
    fn drag_and_drop_returns_to_idle() {
        let mut m = machine();
        m.begin_drag("a", nine_to_ten(), at(12, 0)).unwrap();
        assert_eq!(m.state().name(), "dragging");
        assert!(!m.click(at(12, 0)));

        let target = DropTarget::new(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(), 14, 1);
        let result = m.drop_on(&target).unwrap();
        assert_eq!(result.task_id(), "a");
        assert_eq!(result.interval().start, at(14, 15));
        assert!(m.is_idle());
    }

    #[test]
    fn resize_swallows_trailing_click_until_deadline() {
        let mut m = machine();
        let released = at(12, 0);
        m.begin_resize("a", nine_to_ten(), Edge::End, released).unwrap();
        assert!(matches!(m.begin_drag("a", nine_to_ten(), released), Err(CoreError::Gesture(_))));

        let result = m.finish_resize(Edge::End, 30.0, released).unwrap();
        assert_eq!(result.interval().end, at(10, 30));
        assert!(matches!(m.state(), GestureState::JustFinishedResizing { .. }));

        assert!(!m.click(released + Duration::milliseconds(10)));
        assert!(m.click(released + Duration::milliseconds(100)));
        assert!(m.is_idle());
    }

    #[test]
    fn oversized_pixel_delta_moves_at_most_a_day() {
        let mut m = machine();
        m.begin_resize("a", nine_to_ten(), Edge::End, at(12, 0)).unwrap();
        let result = m.finish_resize(Edge::End, 1e20, at(12, 0)).unwrap();
        assert_eq!(result.interval().start, at(9, 0));
        assert_eq!(result.interval().end, at(10, 0) + Duration::hours(24));
    }

    #[test]
    fn drag_cannot_start_during_click_suppression() {
        let mut m = machine();
        m.begin_resize("a", nine_to_ten(), Edge::Start, at(12, 0)).unwrap();
        m.finish_resize(Edge::Start, -60.0, at(12, 0)).unwrap();

        let err = m
            .begin_drag("a", nine_to_ten(), at(12, 0) + Duration::milliseconds(50))
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Gesture(GestureError::IllegalTransition {
                state: "just finished resizing",
                ..
            })
        ));

        m.tick(at(12, 1));
        assert!(m.begin_drag("a", nine_to_ten(), at(12, 1)).is_ok());
    }

    #[test]
    fn edge_mismatch_is_rejected() {
        let mut m = machine();
        m.begin_resize("a", nine_to_ten(), Edge::Start, at(12, 0)).unwrap();
        assert!(matches!(
            m.finish_resize(Edge::End, 10.0, at(12, 0)),
            Err(CoreError::Gesture(GestureError::EdgeMismatch { .. }))
        ));
        assert_eq!(m.state().name(), "resizing");
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut m = machine();
        m.cancel();
        assert!(m.is_idle());

        m.begin_drag("a", nine_to_ten(), at(12, 0)).unwrap();
        m.cancel();
        m.cancel();
        assert!(m.is_idle());
        let target = DropTarget::new(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(), 9, 0);
        assert!(m.drop_on(&target).is_err());
    }
}
