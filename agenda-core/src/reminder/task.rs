//! The background task that ticks a [`ReminderPoller`].

use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{Clock, EventSource, Reminder, ReminderMode, ReminderPoller};

/// Handle to a running poller. Dropping it also stops the poller.
pub struct PollerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Signal the poller to stop and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            warn!("Reminder poller ended abnormally: {}", e);
        }
    }
}

/// Spawn a poller that ticks every `interval`, reading events from `source`
/// and time from `clock`. The first tick happens immediately.
///
/// Reminders are delivered on the returned channel so the consumer can handle
/// them on its own thread. The task ends when stopped or when the receiver is
/// dropped.
pub fn spawn_poller<S, C>(
    mut source: S,
    clock: C,
    interval: Duration,
    mode: ReminderMode,
) -> (PollerHandle, mpsc::UnboundedReceiver<Reminder>)
where
    S: EventSource,
    C: Clock,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut poller = ReminderPoller::new(mode);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Reminder poller started ({} mode, every {:?})", mode, interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                    continue;
                }
                _ = tx.closed() => {
                    debug!("Reminder receiver dropped, stopping poller");
                    break;
                }
            }

            if *stop_rx.borrow() {
                break;
            }

            let now = clock.now();
            let events = source.snapshot();
            debug!("Tick at {} over {} events", now, events.len());

            for reminder in poller.tick(now, &events) {
                info!("Reminder due: {} {} {}", reminder.date, reminder.time, reminder.title);
                if tx.send(reminder).is_err() {
                    debug!("Reminder receiver dropped, stopping poller");
                    return;
                }
            }
        }

        info!("Reminder poller stopped");
    });

    (
        PollerHandle {
            stop: stop_tx,
            task,
        },
        rx,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::reminder::ManualClock;
    use crate::store::EventStore;
    use chrono::{NaiveDate, NaiveDateTime};

    const MINUTE: Duration = Duration::from_secs(60);

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn meeting() -> Vec<Event> {
        vec![Event::new("Meeting", "2024-03-01", "10:00", true).unwrap()]
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_at_the_scheduled_minute() {
        let clock = ManualClock::new(at(10, 0));
        let (handle, mut rx) = spawn_poller(meeting(), clock.clone(), MINUTE, ReminderMode::Exact);

        let reminder = rx.recv().await.unwrap();
        assert_eq!(reminder.message(), "Event Reminder: Meeting");

        clock.set(at(10, 1));
        tokio::time::sleep(MINUTE * 3).await;
        handle.stop().await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn exact_mode_misses_a_skipped_minute() {
        let clock = ManualClock::new(at(9, 59));
        let (handle, mut rx) = spawn_poller(meeting(), clock.clone(), MINUTE, ReminderMode::Exact);

        tokio::time::sleep(Duration::from_secs(1)).await;
        clock.set(at(10, 1));
        tokio::time::sleep(MINUTE * 2).await;
        handle.stop().await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn catch_up_mode_fires_a_skipped_minute() {
        let clock = ManualClock::new(at(9, 59));
        let (handle, mut rx) =
            spawn_poller(meeting(), clock.clone(), MINUTE, ReminderMode::CatchUp);

        tokio::time::sleep(Duration::from_secs(1)).await;
        clock.set(at(10, 1));

        let reminder = rx.recv().await.unwrap();
        assert_eq!(reminder.title, "Meeting");

        tokio::time::sleep(MINUTE * 2).await;
        handle.stop().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn sees_events_appended_after_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EventStore::load(dir.path().join("events.csv")).unwrap();
        let clock = ManualClock::new(at(10, 0));

        let (handle, mut rx) =
            spawn_poller(store.subscribe(), clock.clone(), MINUTE, ReminderMode::Exact);
        tokio::time::sleep(Duration::from_secs(1)).await;

        store.append("Meeting", "2024-03-01", "10:01", true).unwrap();
        clock.set(at(10, 1));

        let reminder = rx.recv().await.unwrap();
        assert_eq!(reminder.time, "10:01");

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_the_task() {
        let clock = ManualClock::new(at(8, 0));
        let (handle, mut rx) = spawn_poller(meeting(), clock, MINUTE, ReminderMode::Exact);

        handle.stop().await;

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_receiver_ends_an_idle_task() {
        let clock = ManualClock::new(at(8, 0));
        let (handle, rx) = spawn_poller(meeting(), clock, MINUTE, ReminderMode::Exact);

        drop(rx);

        let finished = tokio::time::timeout(MINUTE * 5, handle.task).await;
        assert!(finished.is_ok(), "poller kept ticking with no receiver");
    }
}
