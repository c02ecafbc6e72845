use std::future::Future;

use crate::Result;

/// Source of one page of ranked rows.
///
/// Implementations return rows in rank order; callers keep that order as-is.
/// Pages are 1-based.
#[async_trait::async_trait]
pub trait PageFetcher<R>: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Vec<R>>;
}

// Closures make handy fetchers, mostly for stubbing.
#[async_trait::async_trait]
impl<R, F, Fut> PageFetcher<R> for F
where
    R: Send + 'static,
    F: Fn(u32) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<R>>> + Send,
{
    async fn fetch_page(&self, page: u32) -> Result<Vec<R>> {
        (self)(page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closure_fetcher_receives_page() {
        let fetcher = |page: u32| async move { Ok::<_, crate::Error>(vec![page, page * 10]) };
        let rows = PageFetcher::<u32>::fetch_page(&fetcher, 3).await.unwrap();
        assert_eq!(rows, vec![3, 30]);
    }
}
