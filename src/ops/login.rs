//! Login form automation
//!
//! One invocation walks validate → open tab → wait for load → inject →
//! poll. The injected routine runs inside the page and reports a single
//! structured result back across the isolation boundary; the opened tab
//! stays visible so the user can observe the authenticated session.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cdp::{Browser, PageSession};
use crate::config::{LoginRequest, PollConfig};
use crate::error::{CookieportError, Result};
use crate::utils::{SelectorUtils, UrlUtils};

pub const USERNAME_LABEL: &str = "username field";
pub const PASSWORD_LABEL: &str = "password field";
pub const SUBMIT_LABEL: &str = "submit control";

/// Tab control needed by the login flow. The CDP binding lives in
/// [`CdpTabDriver`]; tests drive the flow with a fake.
#[async_trait]
pub trait TabDriver {
    /// Open a tab at the URL and keep it open.
    async fn open_tab(&mut self, url: &str) -> Result<()>;

    /// Wait for the opened tab to reach the loaded state.
    async fn wait_until_loaded(&mut self) -> Result<()>;

    /// Run a script in the page and resolve to its structured result.
    async fn run_script(&mut self, script: &str) -> Result<Value>;
}

/// Successful login outcome.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct PollReport {
    found: bool,
    #[serde(default)]
    missing: Vec<String>,
}

/// Reject bad input before any tab is opened.
pub fn validate_request(request: &LoginRequest) -> Result<()> {
    UrlUtils::require_http_url(&request.url, "login URL")?;
    if request.username.trim().is_empty() {
        return Err(CookieportError::Validation("username is not set".to_string()));
    }
    if request.password.is_empty() {
        return Err(CookieportError::Validation("password is not set".to_string()));
    }
    SelectorUtils::validate(&request.selectors.username, USERNAME_LABEL)?;
    SelectorUtils::validate(&request.selectors.password, PASSWORD_LABEL)?;
    SelectorUtils::validate(&request.selectors.submit, SUBMIT_LABEL)?;
    Ok(())
}

/// Drive one login attempt to completion. Failures at any stage are
/// terminal for this request; there is no retry here.
pub async fn automate_login(
    driver: &mut dyn TabDriver,
    request: &LoginRequest,
    poll: &PollConfig,
) -> Result<LoginOutcome> {
    validate_request(request)?;

    driver.open_tab(&request.url).await?;
    driver.wait_until_loaded().await?;

    debug!("injecting login poller into {}", request.url);
    let script = build_login_script(request, poll);
    let value = driver.run_script(&script).await?;

    let report: PollReport = serde_json::from_value(value).map_err(|err| {
        CookieportError::Automation {
            message: format!("login script returned an undecodable result: {}", err),
            missing: Vec::new(),
        }
    })?;

    if report.found {
        info!("submitted login form at {}", request.url);
        Ok(LoginOutcome {
            message: format!("login form submitted at {}", request.url),
        })
    } else {
        Err(CookieportError::Automation {
            message: format!(
                "login form elements not found: {}",
                report.missing.join(", ")
            ),
            missing: report.missing,
        })
    }
}

/// Build the polling routine injected into the page. It looks the three
/// elements up on each attempt; once all are present it fills the
/// fields, dispatches input/change so reactive listeners observe the
/// values, and activates the submit control. Budget exhaustion resolves
/// with the labels never found.
fn build_login_script(request: &LoginRequest, poll: &PollConfig) -> String {
    format!(
        r#"new Promise((resolve) => {{
    const username = '{username}';
    const password = '{password}';
    const budget = {attempts};
    const intervalMs = {interval_ms};
    let attempts = 0;
    const fill = (el, value) => {{
        el.focus();
        el.value = value;
        el.dispatchEvent(new Event('input', {{ bubbles: true }}));
        el.dispatchEvent(new Event('change', {{ bubbles: true }}));
    }};
    const tick = () => {{
        attempts += 1;
        const userField = document.querySelector('{user_selector}');
        const passField = document.querySelector('{pass_selector}');
        const submitControl = document.querySelector('{submit_selector}');
        if (userField && passField && submitControl) {{
            fill(userField, username);
            fill(passField, password);
            submitControl.click();
            resolve({{ found: true }});
            return;
        }}
        if (attempts >= budget) {{
            const missing = [];
            if (!userField) missing.push('{user_label}');
            if (!passField) missing.push('{pass_label}');
            if (!submitControl) missing.push('{submit_label}');
            resolve({{ found: false, missing }});
            return;
        }}
        setTimeout(tick, intervalMs);
    }};
    tick();
}})"#,
        username = escape_js(&request.username),
        password = escape_js(&request.password),
        attempts = poll.attempts,
        interval_ms = poll.interval.as_millis(),
        user_selector = escape_js(&request.selectors.username),
        pass_selector = escape_js(&request.selectors.password),
        submit_selector = escape_js(&request.selectors.submit),
        user_label = USERNAME_LABEL,
        pass_label = PASSWORD_LABEL,
        submit_label = SUBMIT_LABEL,
    )
}

/// Escape a string for embedding inside a single-quoted JS literal.
fn escape_js(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '`' => result.push_str("\\`"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\u{2028}' => result.push_str("\\u2028"),
            '\u{2029}' => result.push_str("\\u2029"),
            _ => result.push(ch),
        }
    }
    result
}

/// The DevTools-backed tab driver.
pub struct CdpTabDriver<'a> {
    browser: &'a Browser,
    session: Option<PageSession>,
    load_timeout: Duration,
}

impl<'a> CdpTabDriver<'a> {
    pub fn new(browser: &'a Browser, load_timeout: Duration) -> Self {
        CdpTabDriver {
            browser,
            session: None,
            load_timeout,
        }
    }

    fn session(&self) -> Result<&PageSession> {
        self.session
            .as_ref()
            .ok_or_else(|| CookieportError::Tab("no tab is open".to_string()))
    }
}

#[async_trait]
impl TabDriver for CdpTabDriver<'_> {
    async fn open_tab(&mut self, url: &str) -> Result<()> {
        self.session = Some(self.browser.open_tab(url).await?);
        Ok(())
    }

    async fn wait_until_loaded(&mut self) -> Result<()> {
        self.session()?.wait_until_loaded(self.load_timeout).await
    }

    async fn run_script(&mut self, script: &str) -> Result<Value> {
        self.session()?.evaluate(script).await
    }
}
