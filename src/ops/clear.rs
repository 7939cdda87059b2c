//! Cookie clear orchestration

use log::{info, warn};
use serde::Serialize;

use crate::config::ClearRequest;
use crate::cookies::CookieOps;
use crate::error::Result;
use crate::ops::ItemError;
use crate::utils::UrlUtils;

/// Outcome of a clear request, including the resolved host for user
/// feedback.
#[derive(Debug, Clone, Serialize)]
pub struct ClearSummary {
    pub removed: usize,
    pub total: usize,
    pub host: String,
    pub errors: Vec<ItemError>,
}

/// Read every cookie at the origin and attempt removal of each
/// independently, with the same no-abort policy as copy. Clearing an
/// origin that has no cookies succeeds with an empty summary.
pub async fn clear_cookies(store: &dyn CookieOps, request: &ClearRequest) -> Result<ClearSummary> {
    let url = UrlUtils::require_http_url(&request.url, "URL")?;

    let cookies = store.cookies_for_origin(&UrlUtils::origin(&url)).await?;
    let mut summary = ClearSummary {
        removed: 0,
        total: cookies.len(),
        host: UrlUtils::host(&url),
        errors: Vec::new(),
    };

    for cookie in &cookies {
        match store.remove_cookie(cookie).await {
            Ok(()) => summary.removed += 1,
            Err(err) => {
                warn!("cookie \"{}\" was not removed: {}", cookie.name, err);
                summary.errors.push(ItemError {
                    name: cookie.name.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    info!(
        "removed {}/{} cookies for {}",
        summary.removed, summary.total, summary.host
    );
    Ok(summary)
}
