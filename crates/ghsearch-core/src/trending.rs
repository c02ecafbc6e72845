// Trending by date range - one fetch per range, all or nothing
use async_trait::async_trait;
use futures::future::try_join_all;
use std::time::Duration;
use tracing::debug;

use crate::{models::DateRange, Result};

/// Delay between launching consecutive range fetches (upstream rate limiting)
pub const LAUNCH_STAGGER: Duration = Duration::from_millis(200);

/// Fetches the trending list for a single date range
#[async_trait]
pub trait RangeFetcher<R>: Send + Sync {
    async fn fetch_range(&self, range: DateRange) -> Result<Vec<R>>;
}

/// Fetch every date range concurrently, launches spaced by `stagger`.
///
/// Fails fast: the first error is returned and nothing from the other ranges
/// is kept. On success the lists come back in `DateRange::ALL` order.
pub async fn fetch_all_ranges<R, F>(fetcher: &F, stagger: Duration) -> Result<Vec<(DateRange, Vec<R>)>>
where
    R: Send,
    F: RangeFetcher<R> + ?Sized,
{
    let launches = DateRange::ALL.iter().enumerate().map(|(i, &range)| async move {
        if i > 0 {
            tokio::time::sleep(stagger * i as u32).await;
        }
        debug!("fetching trending range {}", range.as_param());
        let rows = fetcher.fetch_range(range).await?;
        Ok::<_, crate::Error>((range, rows))
    });

    try_join_all(launches).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubRanges {
        failing: Option<DateRange>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl RangeFetcher<String> for StubRanges {
        async fn fetch_range(&self, range: DateRange) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing == Some(range) {
                return Err(crate::Error::ApiError(format!("{} failed", range.as_param())));
            }
            Ok(vec![format!("{}-1", range.as_param()), format!("{}-2", range.as_param())])
        }
    }

    #[tokio::test]
    async fn test_all_ranges_in_order() {
        let stub = StubRanges { failing: None, calls: AtomicU32::new(0) };
        let lists = fetch_all_ranges(&stub, Duration::from_millis(1)).await.unwrap();

        let ranges: Vec<_> = lists.iter().map(|(r, _)| *r).collect();
        assert_eq!(ranges, DateRange::ALL.to_vec());
        assert_eq!(lists[1].1, vec!["weekly-1".to_string(), "weekly-2".to_string()]);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_one_failure_fails_the_batch() {
        let stub = StubRanges { failing: Some(DateRange::Weekly), calls: AtomicU32::new(0) };
        let result = fetch_all_ranges(&stub, Duration::from_millis(1)).await;

        match result {
            Err(crate::Error::ApiError(msg)) => assert_eq!(msg, "weekly failed"),
            other => panic!("expected the weekly error, got {:?}", other),
        }
    }
}
