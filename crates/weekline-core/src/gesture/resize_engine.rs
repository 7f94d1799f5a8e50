use chrono::Duration;

use super::Edge;
use crate::error::TimeRangeError;
use crate::timeline::{Interval, TimeRangeValidator};

/// Move one edge of `original` by `delta`.
///
/// The other edge never moves. When the dragged edge would come closer than
/// `minimum` to it (or cross it), the dragged edge snaps to exactly
/// `minimum` away.
///
/// # Panics
/// Panics if `minimum` is not positive.
///
/// # Errors
/// [`TimeRangeError::Unrecoverable`] if the new edge is not representable.
pub fn resize(
    original: &Interval,
    edge: Edge,
    delta: Duration,
    minimum: Duration,
) -> Result<Interval, TimeRangeError> {
    let validator = TimeRangeValidator::new(minimum);

    let candidate = match edge {
        Edge::Start => {
            let moved = original
                .start
                .checked_add_signed(delta)
                .ok_or(TimeRangeError::Unrecoverable)?;
            let latest = original
                .end
                .checked_sub_signed(minimum)
                .ok_or(TimeRangeError::Unrecoverable)?;
            Interval::new_unchecked(moved.min(latest), original.end)
        }
        Edge::End => {
            let moved = original
                .end
                .checked_add_signed(delta)
                .ok_or(TimeRangeError::Unrecoverable)?;
            let earliest = original
                .start
                .checked_add_signed(minimum)
                .ok_or(TimeRangeError::Unrecoverable)?;
            Interval::new_unchecked(original.start, moved.max(earliest))
        }
    };

    let adjusted = validator.adjust(&candidate)?;
    Ok(adjusted.interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 20, hour, minute, 0).unwrap()
    }

    fn nine_to_ten() -> Interval {
        Interval::try_new(at(9, 0), at(10, 0)).unwrap()
    }

    #[test]
    fn shrinking_end_past_minimum_snaps_to_minimum() {
        let resized = resize(
            &nine_to_ten(),
            Edge::End,
            Duration::minutes(-50),
            Duration::minutes(15),
        )
        .unwrap();
        assert_eq!(resized.start, at(9, 0));
        assert_eq!(resized.end, at(9, 15));
    }

    #[test]
    fn end_dragged_before_start_does_not_invert() {
        let resized = resize(
            &nine_to_ten(),
            Edge::End,
            Duration::minutes(-120),
            Duration::minutes(15),
        )
        .unwrap();
        assert_eq!(resized.end, at(9, 15));
    }

    #[test]
    fn start_edge_moves_and_end_stays() {
        let earlier = resize(
            &nine_to_ten(),
            Edge::Start,
            Duration::minutes(-30),
            Duration::minutes(15),
        )
        .unwrap();
        assert_eq!(earlier.start, at(8, 30));
        assert_eq!(earlier.end, at(10, 0));

        let past_end = resize(
            &nine_to_ten(),
            Edge::Start,
            Duration::minutes(75),
            Duration::minutes(15),
        )
        .unwrap();
        assert_eq!(past_end.start, at(9, 45));
        assert_eq!(past_end.end, at(10, 0));
    }

    #[test]
    fn growing_end() {
        let resized = resize(
            &nine_to_ten(),
            Edge::End,
            Duration::minutes(45),
            Duration::minutes(15),
        )
        .unwrap();
        assert_eq!(resized.end, at(10, 45));
    }

    #[test]
    fn unrepresentable_edges_are_unrecoverable() {
        let near_max = Interval::try_new(
            DateTime::<Utc>::MAX_UTC - Duration::hours(1),
            DateTime::<Utc>::MAX_UTC,
        )
        .unwrap();
        assert_eq!(
            resize(&near_max, Edge::End, Duration::hours(2), Duration::minutes(15)),
            Err(TimeRangeError::Unrecoverable)
        );

        let near_min = Interval::try_new(
            DateTime::<Utc>::MIN_UTC,
            DateTime::<Utc>::MIN_UTC + Duration::hours(1),
        )
        .unwrap();
        assert_eq!(
            resize(&near_min, Edge::Start, Duration::zero(), Duration::days(1)),
            Err(TimeRangeError::Unrecoverable)
        );
    }

    #[test]
    #[should_panic]
    fn non_positive_minimum_panics() {
        let _ = resize(&nine_to_ten(), Edge::End, Duration::zero(), Duration::zero());
    }
}
