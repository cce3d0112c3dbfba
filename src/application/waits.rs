//! Policy-aware bounded waits
//!
//! One wait implementation for every wait point: the attached policy decides
//! whether a lapse gets a second attempt (with a diagnostic snapshot between
//! the attempts). Interpreting a final `false` — abort the run or skip the
//! item — stays with the caller, since that is what distinguishes the
//! stages, not the waiting itself.

use crate::infrastructure::browser::{BrowserSession, SessionResult};
use crate::infrastructure::config::{FailurePolicy, WaitPoint};
use std::path::Path;
use tracing::warn;

pub(crate) async fn bounded_wait(
    session: &dyn BrowserSession,
    selector: &str,
    point: &WaitPoint,
    snapshot_path: &Path,
) -> SessionResult<bool> {
    if session.wait_for_selector(selector, point.timeout()).await? {
        return Ok(true);
    }

    if point.policy == FailurePolicy::RetryOnce {
        warn!(
            selector,
            timeout_ms = point.timeout_ms,
            "wait lapsed, snapshotting and retrying once"
        );
        if let Err(e) = session.screenshot(snapshot_path).await {
            warn!(error = %e, "diagnostic snapshot failed");
        }
        return session.wait_for_selector(selector, point.timeout()).await;
    }

    Ok(false)
}
