use std::time::Duration;

use async_trait::async_trait;
use storage::dto::consensus::ProgressResponse;
use storage::services::progress::ProgressReport;

use crate::client::MenuApiClient;
use crate::error::{ClientError, Result};

/// Anything that can report consensus progress
#[async_trait]
pub trait ProgressSource: Send + Sync {
    async fn progress(&self) -> Result<ProgressResponse>;
}

#[async_trait]
impl ProgressSource for MenuApiClient {
    async fn progress(&self) -> Result<ProgressResponse> {
        MenuApiClient::progress(self).await
    }
}

/// One line per participant, then the gate
pub fn format_progress(report: &ProgressReport) -> String {
    let mut lines: Vec<String> = report
        .participants
        .iter()
        .map(|p| {
            format!(
                "{} {:<20} {}/{}",
                if p.is_done { "✓" } else { "…" },
                p.user_name,
                p.completed_duels,
                report.total_needed
            )
        })
        .collect();

    lines.push(format!(
        "{}/{} participants, {}",
        report.participants.len(),
        report.expected_participants,
        if report.everyone_ready {
            "everyone is ready"
        } else {
            "still voting"
        }
    ));

    lines.join("\n")
}

/// Poll until every participant is done.
///
/// `interval` overrides the server's advertised polling interval. Gives up
/// with [`ClientError::Timeout`] after `max_polls` polls when set.
pub async fn wait_until_ready<P>(
    source: &P,
    interval: Option<Duration>,
    max_polls: Option<u32>,
) -> Result<ProgressReport>
where
    P: ProgressSource + ?Sized,
{
    let mut polls = 0u32;
    let mut last_done = None;

    loop {
        let response = source.progress().await?;
        polls += 1;

        let report = response.report;
        if report.everyone_ready {
            tracing::info!(polls, "Everyone is ready");
            return Ok(report);
        }

        let done = report.participants.iter().filter(|p| p.is_done).count();
        if last_done != Some(done) {
            tracing::info!(
                done,
                participants = report.participants.len(),
                expected = report.expected_participants,
                "Waiting for the others"
            );
            last_done = Some(done);
        }

        if max_polls.is_some_and(|max| polls >= max) {
            return Err(ClientError::Timeout(polls));
        }

        let pause = interval.unwrap_or(Duration::from_secs(response.poll_interval_secs.max(1)));
        tracing::debug!(?pause, "Sleeping before next poll");
        tokio::time::sleep(pause).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use storage::services::progress::ParticipantProgress;

    use super::*;

    struct Scripted {
        ready_after: u32,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl ProgressSource for Scripted {
        async fn progress(&self) -> Result<ProgressResponse> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            Ok(response(*calls >= self.ready_after))
        }
    }

    fn response(ready: bool) -> ProgressResponse {
        ProgressResponse {
            report: ProgressReport {
                total_needed: 3,
                expected_participants: 2,
                participants: vec![
                    ParticipantProgress {
                        user_name: "anna".to_string(),
                        completed_duels: 3,
                        is_done: true,
                    },
                    ParticipantProgress {
                        user_name: "bram".to_string(),
                        completed_duels: if ready { 3 } else { 1 },
                        is_done: ready,
                    },
                ],
                everyone_ready: ready,
            },
            poll_interval_secs: 3,
        }
    }

    #[tokio::test]
    async fn test_waits_until_ready() {
        let source = Scripted {
            ready_after: 3,
            calls: Mutex::new(0),
        };

        let report = wait_until_ready(&source, Some(Duration::from_millis(1)), None)
            .await
            .unwrap();
        assert!(report.everyone_ready);
        assert_eq!(*source.calls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_polls() {
        let source = Scripted {
            ready_after: u32::MAX,
            calls: Mutex::new(0),
        };

        let err = wait_until_ready(&source, Some(Duration::from_millis(1)), Some(2))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout(2)));
    }

    #[test]
    fn test_format_progress() {
        let text = format_progress(&response(false).report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("✓ anna"));
        assert!(lines[1].ends_with("1/3"));
        assert_eq!(lines[2], "2/2 participants, still voting");
    }
}
