//! Week windows and the clock that anchors them.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc, Weekday};

/// Source of "today". Substituted in tests to pin the visible week.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date of `now()` as seen from `offset`.
    fn today(&self, offset: FixedOffset) -> NaiveDate {
        self.now().with_timezone(&offset).date_naive()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Seven consecutive calendar days starting on `week_start`.
///
/// Days are calendar dates in `offset`; the window covers the first day's
/// midnight through the last millisecond of the seventh day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub week_start: Weekday,
    pub offset: FixedOffset,
}

impl WeekWindow {
    /// The week containing `date`.
    pub fn containing(date: NaiveDate, week_start: Weekday, offset: FixedOffset) -> Self {
        let back = (7 + date.weekday().num_days_from_sunday()
            - week_start.num_days_from_sunday())
            % 7;
        Self {
            start: date - Duration::days(i64::from(back)),
            week_start,
            offset,
        }
    }

    /// The week containing the clock's current date.
    pub fn current(clock: &dyn Clock, week_start: Weekday, offset: FixedOffset) -> Self {
        Self::containing(clock.today(offset), week_start, offset)
    }

    pub fn days(&self) -> [NaiveDate; 7] {
        std::array::from_fn(|i| self.start + Duration::days(i as i64))
    }

    pub fn last_day(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.last_day()
    }

    /// First instant of the window.
    pub fn start_instant(&self) -> DateTime<Utc> {
        self.day_start(self.start)
    }

    /// Last millisecond of the window (inclusive).
    pub fn end_instant(&self) -> DateTime<Utc> {
        self.day_start(self.last_day() + Duration::days(1)) - Duration::milliseconds(1)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start_instant() <= instant && instant <= self.end_instant()
    }

    /// Midnight of `date` in this window's offset.
    pub fn day_start(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        self.offset
            .from_local_datetime(&midnight)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
    }

    /// Calendar date of `instant` in this window's offset.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub fn next(&self) -> Self {
        Self {
            start: self.start + Duration::days(7),
            ..*self
        }
    }

    pub fn previous(&self) -> Self {
        Self {
            start: self.start - Duration::days(7),
            ..*self
        }
    }
}
