use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Cancellation signal and optional deadline handed down to store calls.
///
/// Store futures are dropped when either fires. An uncommitted sqlx
/// transaction rolls back on drop, so a cancelled write never commits.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Cancellation {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Error::Cancelled),
            _ = deadline => Err(Error::DeadlineExceeded),
            res = fut => res,
        }
    }
}
