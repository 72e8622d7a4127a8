use chrono::{DateTime, NaiveDate, Utc};

/// Source of "now" for every date rule in the engine.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub use fixed::FixedClock;

#[cfg(test)]
mod fixed {
    use std::sync::Mutex;

    use chrono::{DateTime, NaiveDate, Utc};

    use super::Clock;

    /// Test clock pinned to noon UTC of a date; [`FixedClock::set`] moves it.
    #[derive(Debug)]
    pub struct FixedClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl FixedClock {
        pub fn on(date: NaiveDate) -> Self {
            Self {
                now: Mutex::new(Self::noon(date)),
            }
        }

        pub fn set(&self, date: NaiveDate) {
            *self.now.lock().unwrap() = Self::noon(date);
        }

        fn noon(date: NaiveDate) -> DateTime<Utc> {
            date.and_hms_opt(12, 0, 0).unwrap().and_utc()
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }
}
