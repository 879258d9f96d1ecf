//! Handing an assembled payload to the submission provider.

use crate::error::{AcquireError, AcquireResult};
use crate::payload::Payload;
use crate::provider::{ArtifactRef, SubmissionProvider};
use labdesk_types::SessionContext;
use std::time::Duration;
use tracing::{info, warn};

/// Submits `payload` once. Failures leave the caller's form untouched; retry
/// by calling again with the same payload.
pub async fn submit(
    provider: &dyn SubmissionProvider,
    ctx: &SessionContext,
    payload: &Payload,
    request_timeout: Duration,
) -> AcquireResult<ArtifactRef> {
    match tokio::time::timeout(request_timeout, provider.submit(ctx, payload)).await {
        Ok(Ok(artifact)) => {
            info!("Submission accepted as {}", artifact);
            Ok(artifact)
        }
        Ok(Err(e)) => {
            warn!("Submission failed: {}", e);
            Err(e.into())
        }
        Err(_) => {
            warn!("Submission timed out after {:?}", request_timeout);
            Err(AcquireError::Timeout)
        }
    }
}
