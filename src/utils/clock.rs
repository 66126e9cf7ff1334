use chrono::{DateTime, Utc};

/// Source of the current moment for the whole application. Behind a trait so
/// tests can pin time instead of racing the wall clock.
pub trait Clock: Send + Sync + 'static {
    fn time(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
