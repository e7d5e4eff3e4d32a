use chrono::NaiveDate;

/// Format used for calendar-day keys, e.g. `Mon Oct 19 2026`.
pub const DAY_KEY_FORMAT: &str = "%a %b %d %Y";

/// Source of "today" for quota resets.
pub trait Clock {
    /// Current calendar day.
    fn today(&self) -> NaiveDate;
}

/// Host clock in the local timezone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Clock pinned to a fixed day. Used by tests and replay tooling.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Calendar-day key for `date`.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Calendar-day key for the clock's current day.
pub fn today_key(clock: &dyn Clock) -> String {
    day_key(clock.today())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/day.rs"]
mod tests;
