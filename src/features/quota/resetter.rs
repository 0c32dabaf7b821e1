//! Daily quota reset
//!
//! Sleeps until the configured wall-clock time (UTC), zeroes every session's
//! counter in one bulk update, and repeats. History and persona are untouched.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Stop on shutdown signal
//! - 1.0.0: Initial release, fires at midnight UTC

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, TimeZone, Utc};
use log::{error, info};
use std::time::Duration;
use tokio::sync::watch;

use crate::core::error::SessionError;
use crate::features::sessions::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSchedule {
    at: NaiveTime,
}

impl ResetSchedule {
    pub fn daily_at(at: NaiveTime) -> Self {
        Self { at }
    }

    pub fn midnight() -> Self {
        Self::daily_at(NaiveTime::MIN)
    }

    /// Next firing strictly after `now`
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = Utc.from_utc_datetime(&now.date_naive().and_time(self.at));
        if today > now {
            today
        } else {
            today + ChronoDuration::days(1)
        }
    }

    pub fn duration_until_next(&self, now: DateTime<Utc>) -> Duration {
        (self.next_after(now) - now)
            .to_std()
            .unwrap_or(Duration::from_secs(1))
    }
}

pub struct DailyQuotaResetter {
    store: SessionStore,
    schedule: ResetSchedule,
}

impl DailyQuotaResetter {
    pub fn new(store: SessionStore, schedule: ResetSchedule) -> Self {
        Self { store, schedule }
    }

    /// One firing: every counter back to zero. Firing twice is harmless.
    pub async fn fire(&self) -> Result<usize, SessionError> {
        self.store.reset_all_counts().await
    }

    /// Fire at every scheduled time until `shutdown` turns true or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("Quota resetter started (daily at {} UTC)", self.schedule.at.format("%H:%M"));

        loop {
            let wait = self.schedule.duration_until_next(Utc::now());
            info!("Next quota reset in {}s", wait.as_secs());

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    if let Err(e) = self.fire().await {
                        error!("Quota reset failed, will try again at the next firing: {e}");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Quota resetter stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, h, m, s).unwrap()
    }

    #[test]
    fn test_next_midnight() {
        let schedule = ResetSchedule::midnight();
        assert_eq!(
            schedule.next_after(at(15, 30, 0)),
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
        );
        assert_eq!(
            schedule.duration_until_next(at(23, 59, 0)),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_exactly_at_time_waits_a_day() {
        let schedule = ResetSchedule::midnight();
        assert_eq!(
            schedule.duration_until_next(at(0, 0, 0)),
            Duration::from_secs(24 * 60 * 60)
        );
    }

    #[test]
    fn test_later_today() {
        let schedule = ResetSchedule::daily_at(NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(schedule.next_after(at(5, 0, 0)), at(6, 0, 0));
    }

    #[tokio::test]
    async fn test_fire_is_idempotent() {
        let store = SessionStore::new(Database::new(":memory:").await.unwrap(), "p");
        store.create_if_absent(1).await.unwrap();
        store.increment_count(1).await.unwrap();
        store.replace_history(1, "kept").await.unwrap();

        let resetter = DailyQuotaResetter::new(store.clone(), ResetSchedule::midnight());
        assert_eq!(resetter.fire().await.unwrap(), 1);
        assert_eq!(resetter.fire().await.unwrap(), 0);

        let session = store.get(1).await.unwrap().unwrap();
        assert_eq!(session.message_count, 0);
        assert_eq!(session.history, "kept");
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let store = SessionStore::new(Database::new(":memory:").await.unwrap(), "p");
        let resetter = DailyQuotaResetter::new(store, ResetSchedule::midnight());
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(resetter.run(rx));
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("resetter did not stop")
            .unwrap();
    }
}
