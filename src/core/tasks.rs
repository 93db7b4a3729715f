//! Synchronization barrier over server-side tasks.
//!
//! Publish and promote run asynchronously on the server and the client holds
//! no handle on individual tasks. The only observable is the aggregate count
//! of running tasks matching a label filter, so the waiter polls that count
//! until it reaches zero. The wait is bounded; exceeding it is an error.

use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::api::SatelliteClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::oauth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCategory {
    Publish,
    Promote,
}

impl TaskCategory {
    /// Foreman task label this category matches on.
    pub fn label(&self) -> &'static str {
        match self {
            TaskCategory::Publish => "Actions::Katello::ContentView::Publish",
            TaskCategory::Promote => "Actions::Katello::ContentView::Promote",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Publish => "publish",
            TaskCategory::Promote => "promote",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WaitOptions {
    pub poll_interval: Duration,
    pub settle_delay: Duration,
    pub max_wait: Duration,
}

impl WaitOptions {
    pub fn for_publish(config: &Config) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.poll_interval_publish),
            settle_delay: Duration::from_secs(config.poll_settle_delay),
            max_wait: Duration::from_secs(config.poll_max_wait),
        }
    }

    pub fn for_promote(config: &Config) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.poll_interval_promote),
            settle_delay: Duration::from_secs(config.poll_settle_delay),
            max_wait: Duration::from_secs(config.poll_max_wait),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WaitOutcome {
    pub polls: u32,
    pub waited: Duration,
}

#[derive(Debug, Deserialize)]
struct TaskCount {
    subtotal: u64,
}

/// Count of running tasks carrying the category's label.
pub fn running_count(client: &SatelliteClient, category: TaskCategory) -> Result<u64> {
    let search = oauth::encode_component(&format!(
        "label = {} and state = running",
        category.label()
    ));
    let count: TaskCount = client.get_as(&client.tasks_url(&search))?;
    Ok(count.subtotal)
}

/// Blocks until no tasks of the category are running.
pub fn wait(
    client: &SatelliteClient,
    category: TaskCategory,
    options: &WaitOptions,
) -> Result<WaitOutcome> {
    wait_with(category, options, || running_count(client, category))
}

/// Polling loop over an arbitrary running-task counter.
pub fn wait_with(
    category: TaskCategory,
    options: &WaitOptions,
    mut running: impl FnMut() -> Result<u64>,
) -> Result<WaitOutcome> {
    log_status!("tasks", "Waiting for {} tasks to finish...", category.as_str());

    // Give the task a chance to register server-side before the first poll.
    thread::sleep(options.settle_delay);

    let started = Instant::now();
    let mut polls = 0u32;
    loop {
        let count = running()?;
        polls += 1;

        if count == 0 {
            let waited = started.elapsed();
            log_status!(
                "tasks",
                "Finished waiting after {} seconds",
                waited.as_secs()
            );
            return Ok(WaitOutcome { polls, waited });
        }

        if started.elapsed() >= options.max_wait {
            return Err(Error::task_wait_timeout(
                category.as_str(),
                options.max_wait.as_secs(),
                count,
            ));
        }

        thread::sleep(options.poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_options() -> WaitOptions {
        WaitOptions {
            poll_interval: Duration::from_millis(1),
            settle_delay: Duration::ZERO,
            max_wait: Duration::from_secs(5),
        }
    }

    #[test]
    fn returns_only_after_count_reaches_zero() {
        let mut counts = vec![2u64, 0].into_iter();

        let outcome = wait_with(TaskCategory::Publish, &fast_options(), || {
            Ok(counts.next().unwrap_or(0))
        })
        .unwrap();

        assert!(outcome.polls >= 2);
    }

    #[test]
    fn immediate_zero_needs_a_single_poll() {
        let outcome = wait_with(TaskCategory::Promote, &fast_options(), || Ok(0)).unwrap();

        assert_eq!(outcome.polls, 1);
    }

    #[test]
    fn times_out_when_tasks_never_finish() {
        let options = WaitOptions {
            poll_interval: Duration::from_millis(1),
            settle_delay: Duration::ZERO,
            max_wait: Duration::ZERO,
        };

        let err = wait_with(TaskCategory::Promote, &options, || Ok(3)).unwrap_err();

        assert_eq!(err.code, crate::ErrorCode::TaskWaitTimeout);
        assert_eq!(err.details["category"], "promote");
        assert_eq!(err.details["lastCount"], 3);
    }

    #[test]
    fn counter_errors_propagate() {
        let err = wait_with(TaskCategory::Publish, &fast_options(), || {
            Err(Error::api_request_failed("https://sat", "connection refused"))
        })
        .unwrap_err();

        assert_eq!(err.code, crate::ErrorCode::ApiRequestFailed);
    }

    #[test]
    fn labels_match_the_foreman_actions() {
        assert_eq!(
            TaskCategory::Publish.label(),
            "Actions::Katello::ContentView::Publish"
        );
        assert_eq!(
            TaskCategory::Promote.label(),
            "Actions::Katello::ContentView::Promote"
        );
    }
}
