//! Cookie copy orchestration

use log::{info, warn};
use serde::Serialize;
use url::Url;

use crate::config::CopyRequest;
use crate::cookies::{map_for_destination, CookieOps, KeyFilter};
use crate::error::Result;
use crate::ops::ItemError;
use crate::utils::UrlUtils;

/// Outcome of a copy request. `attempted` always equals
/// `copied + errors.len()`, and `attempted + skipped` equals the number
/// of cookies read at the source.
#[derive(Debug, Clone, Serialize)]
pub struct CopySummary {
    pub attempted: usize,
    pub copied: usize,
    pub skipped: usize,
    pub errors: Vec<ItemError>,
}

/// Validate the request's URLs before any side effect.
pub fn validate_request(request: &CopyRequest) -> Result<(Url, Url)> {
    let source = UrlUtils::require_http_url(&request.source_url, "source URL")?;
    let destination = UrlUtils::require_http_url(&request.destination_url, "destination URL")?;
    Ok((source, destination))
}

/// Read cookies at the source origin, narrow them by the requested
/// filter, and write each surviving cookie to the destination. One
/// cookie's failure is recorded against its name and never stops the
/// rest of the batch; cookie sets are heterogeneous and a malformed
/// entry must not block the others.
pub async fn copy_cookies(store: &dyn CookieOps, request: &CopyRequest) -> Result<CopySummary> {
    let (source, destination) = validate_request(request)?;
    let filter = KeyFilter::from_request(request.copy_all, &request.keys);

    let cookies = store.cookies_for_origin(&UrlUtils::origin(&source)).await?;
    let total = cookies.len();
    let selected: Vec<_> = cookies
        .into_iter()
        .filter(|cookie| filter.matches(&cookie.name))
        .collect();

    let mut summary = CopySummary {
        attempted: selected.len(),
        copied: 0,
        skipped: total - selected.len(),
        errors: Vec::new(),
    };

    for cookie in &selected {
        let outcome = match map_for_destination(cookie, &destination) {
            Ok(params) => store.set_cookie(&params).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(()) => summary.copied += 1,
            Err(err) => {
                warn!("cookie \"{}\" was not copied: {}", cookie.name, err);
                summary.errors.push(ItemError {
                    name: cookie.name.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    info!(
        "copied {}/{} cookies from {} to {}",
        summary.copied,
        summary.attempted,
        UrlUtils::origin(&source),
        UrlUtils::origin(&destination)
    );
    Ok(summary)
}
