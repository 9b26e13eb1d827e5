//!
//! # Dashboard statistics
//!
//! Pure reduction of a user's task list into the summary figures the
//! dashboard displays. The computation takes the evaluation instant as a
//! parameter, so given the same tasks and the same `now` it always produces
//! the same summary. It holds no state and caches nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Task, TaskStatus};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Hours between two instants, with sub-hour resolution.
fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_HOUR
}

/// Rounds an hour figure to one decimal place.
fn round_hours(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

/// Per-priority figures over the user's pending tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBucket {
    /// Priority this bucket covers (1-5).
    pub priority: i32,
    /// Number of pending tasks with this priority.
    pub pending_tasks: usize,
    /// Hours elapsed since each task's start time, summed. Tasks that have
    /// not started yet contribute negative hours.
    pub time_lapsed: f64,
    /// Hours remaining until each task's end time, summed. Negative when the
    /// bucket is overdue in aggregate.
    pub time_to_finish: f64,
}

/// The dashboard summary computed over a user's full task list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_tasks: usize,
    /// Percentage of tasks with status `finished`, rounded to the nearest
    /// integer. 0 when there are no tasks at all.
    pub completed_percentage: u32,
    /// Percentage of tasks with status `pending`, rounded likewise.
    pub pending_percentage: u32,
    /// Mean of (end time - start time) in hours over finished tasks, rounded
    /// to one decimal. 0 when no task is finished.
    pub avg_completion_time: f64,
    /// One bucket per priority 1 through 5, in order.
    pub by_priority: Vec<PriorityBucket>,
    pub total_time_lapsed: f64,
    pub total_time_to_finish: f64,
}

impl DashboardSummary {
    /// Computes the summary for `tasks` as observed at `now`.
    pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let total_tasks = tasks.len();
        let finished_count = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Finished)
            .count();
        let pending_count = total_tasks - finished_count;

        // Guard the zero-task case so the percentages stay defined.
        let (completed_percentage, pending_percentage) = if total_tasks == 0 {
            (0, 0)
        } else {
            (
                (100.0 * finished_count as f64 / total_tasks as f64).round() as u32,
                (100.0 * pending_count as f64 / total_tasks as f64).round() as u32,
            )
        };

        let avg_completion_time = if finished_count == 0 {
            0.0
        } else {
            let total_hours: f64 = tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Finished)
                .map(|t| hours_between(t.start_time, t.end_time))
                .sum();
            round_hours(total_hours / finished_count as f64)
        };

        let by_priority: Vec<PriorityBucket> = (1..=5)
            .map(|priority| {
                let mut pending_tasks = 0;
                let mut time_lapsed = 0.0;
                let mut time_to_finish = 0.0;
                for task in tasks
                    .iter()
                    .filter(|t| t.status == TaskStatus::Pending && t.priority == priority)
                {
                    pending_tasks += 1;
                    time_lapsed += hours_between(task.start_time, now);
                    time_to_finish += hours_between(now, task.end_time);
                }
                PriorityBucket {
                    priority,
                    pending_tasks,
                    time_lapsed: round_hours(time_lapsed),
                    time_to_finish: round_hours(time_to_finish),
                }
            })
            .collect();

        let total_time_lapsed =
            round_hours(by_priority.iter().map(|b| b.time_lapsed).sum());
        let total_time_to_finish =
            round_hours(by_priority.iter().map(|b| b.time_to_finish).sum());

        Self {
            total_tasks,
            completed_percentage,
            pending_percentage,
            avg_completion_time,
            by_priority,
            total_time_lapsed,
            total_time_to_finish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskInput;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn task(priority: i32, status: TaskStatus, start: DateTime<Utc>, end: DateTime<Utc>) -> Task {
        let mut task = Task::new(
            TaskInput {
                title: format!("p{} task", priority),
                start_time: start,
                end_time: end,
                priority,
            },
            1,
        );
        task.status = status;
        task
    }

    #[test]
    fn test_empty_task_list_is_all_zero() {
        let summary = DashboardSummary::compute(&[], fixed_now());

        assert_eq!(summary.total_tasks, 0);
        assert_eq!(summary.completed_percentage, 0);
        assert_eq!(summary.pending_percentage, 0);
        assert_eq!(summary.avg_completion_time, 0.0);
        assert_eq!(summary.total_time_lapsed, 0.0);
        assert_eq!(summary.total_time_to_finish, 0.0);
        for bucket in &summary.by_priority {
            assert_eq!(bucket.pending_tasks, 0);
            assert_eq!(bucket.time_lapsed, 0.0);
            assert_eq!(bucket.time_to_finish, 0.0);
        }
    }

    #[test]
    fn test_single_pending_task_bucket() {
        // One pending priority-1 task started 2h ago and due in 3h.
        let now = fixed_now();
        let tasks = vec![task(
            1,
            TaskStatus::Pending,
            now - Duration::hours(2),
            now + Duration::hours(3),
        )];

        let summary = DashboardSummary::compute(&tasks, now);

        assert_eq!(summary.total_tasks, 1);
        assert_eq!(summary.pending_percentage, 100);
        assert_eq!(summary.completed_percentage, 0);
        assert_eq!(summary.by_priority[0].pending_tasks, 1);
        assert_eq!(summary.by_priority[0].time_lapsed, 2.0);
        assert_eq!(summary.by_priority[0].time_to_finish, 3.0);
        assert_eq!(summary.total_time_lapsed, 2.0);
        assert_eq!(summary.total_time_to_finish, 3.0);
    }

    #[test]
    fn test_percentages_and_average() {
        let now = fixed_now();
        let tasks = vec![
            // Finished in 4h.
            task(
                2,
                TaskStatus::Finished,
                now - Duration::hours(10),
                now - Duration::hours(6),
            ),
            // Finished in 1h.
            task(
                3,
                TaskStatus::Finished,
                now - Duration::hours(3),
                now - Duration::hours(2),
            ),
            task(
                5,
                TaskStatus::Pending,
                now - Duration::hours(1),
                now + Duration::hours(1),
            ),
        ];

        let summary = DashboardSummary::compute(&tasks, now);

        assert_eq!(summary.total_tasks, 3);
        // 2/3 finished -> 67, 1/3 pending -> 33
        assert_eq!(summary.completed_percentage, 67);
        assert_eq!(summary.pending_percentage, 33);
        // mean of 4h and 1h
        assert_eq!(summary.avg_completion_time, 2.5);
        // finished tasks contribute nothing to the pending buckets
        assert_eq!(summary.by_priority[1].pending_tasks, 0);
        assert_eq!(summary.by_priority[4].pending_tasks, 1);
    }

    #[test]
    fn test_overdue_task_yields_negative_time_to_finish() {
        let now = fixed_now();
        let tasks = vec![task(
            4,
            TaskStatus::Pending,
            now - Duration::hours(5),
            now - Duration::minutes(90),
        )];

        let summary = DashboardSummary::compute(&tasks, now);

        assert_eq!(summary.by_priority[3].time_lapsed, 5.0);
        assert_eq!(summary.by_priority[3].time_to_finish, -1.5);
        assert_eq!(summary.total_time_to_finish, -1.5);
    }

    #[test]
    fn test_sub_hour_rounding() {
        let now = fixed_now();
        // 75 minutes lapsed = 1.25h -> rounds to 1.3
        let tasks = vec![task(
            1,
            TaskStatus::Pending,
            now - Duration::minutes(75),
            now + Duration::minutes(45),
        )];

        let summary = DashboardSummary::compute(&tasks, now);

        assert_eq!(summary.by_priority[0].time_lapsed, 1.3);
        assert_eq!(summary.by_priority[0].time_to_finish, 0.8);
    }

    #[test]
    fn test_deterministic_for_fixed_now() {
        let now = fixed_now();
        let tasks = vec![
            task(
                1,
                TaskStatus::Pending,
                now - Duration::hours(2),
                now + Duration::hours(3),
            ),
            task(
                2,
                TaskStatus::Finished,
                now - Duration::hours(8),
                now - Duration::hours(4),
            ),
        ];

        let first = DashboardSummary::compute(&tasks, now);
        let second = DashboardSummary::compute(&tasks, now);
        assert_eq!(first, second);
    }

    #[test]
    fn test_wire_shape() {
        let summary = DashboardSummary::compute(&[], fixed_now());
        let json = serde_json::to_value(&summary).unwrap();

        assert!(json.get("totalTasks").is_some());
        assert!(json.get("completedPercentage").is_some());
        assert!(json.get("avgCompletionTime").is_some());
        assert!(json.get("totalTimeLapsed").is_some());
        assert_eq!(json["byPriority"].as_array().unwrap().len(), 5);
        assert!(json["byPriority"][0].get("pendingTasks").is_some());
        assert!(json["byPriority"][0].get("timeToFinish").is_some());
    }
}
