//! HTTP retry for transient upstream errors.
//!
//! Connection failures, timeouts, HTTP 429, and HTTP 5xx are retried with
//! exponential backoff. Any other 4xx is permanent.

use std::time::Duration;

use crate::SourceError;

/// Maximum number of retries after the first attempt.
const MAX_RETRIES: u32 = 3;

/// Sends the request built by `build_request` and returns the body text.
///
/// `build_request` is called once per attempt since builders are consumed
/// by `send()`.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the request cannot be sent or the body
/// cannot be read, and [`SourceError::Status`] for a non-success status
/// once retries are exhausted.
#[allow(clippy::future_not_send)]
pub async fn send_text<F>(build_request: F) -> Result<String, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;
    loop {
        if attempt > 0 {
            let delay = backoff(attempt);
            log::warn!("  retry {attempt}/{MAX_RETRIES} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }
        attempt += 1;
        let can_retry = attempt <= MAX_RETRIES;

        let response = match build_request().send().await {
            Ok(response) => response,
            Err(e) if can_retry && is_transient(&e) => {
                log::warn!("  transient error: {e}");
                continue;
            }
            Err(e) => return Err(SourceError::Http(e)),
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response.text().await?);
        }

        let retryable =
            status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
        if retryable && can_retry {
            log::warn!("  HTTP {status} from {}", response.url());
            continue;
        }

        return Err(SourceError::Status {
            url: response.url().to_string(),
            status: status.as_u16(),
        });
    }
}

/// 1s, 2s, 4s, ...
const fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1 << (attempt - 1))
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff(1), Duration::from_secs(1));
        assert_eq!(backoff(2), Duration::from_secs(2));
        assert_eq!(backoff(3), Duration::from_secs(4));
    }
}
