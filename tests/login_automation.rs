use async_trait::async_trait;
use cookieport::config::{LoginRequest, PollConfig, Selectors};
use cookieport::error::{CookieportError, Result};
use cookieport::ops::{automate_login, TabDriver};
use serde_json::{json, Value};

fn request() -> LoginRequest {
    LoginRequest {
        url: "https://staging.example.com/login".to_string(),
        username: "alice".to_string(),
        password: "s3cret".to_string(),
        selectors: Selectors {
            username: "#user".to_string(),
            password: ".password".to_string(),
            submit: "#submit".to_string(),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Open(String),
    WaitLoaded,
    RunScript,
}

/// Scripted tab driver recording the controller's state sequence.
struct FakeDriver {
    steps: Vec<Step>,
    open_error: Option<CookieportError>,
    load_error: Option<CookieportError>,
    script_result: Value,
}

impl FakeDriver {
    fn succeeding() -> Self {
        FakeDriver {
            steps: Vec::new(),
            open_error: None,
            load_error: None,
            script_result: json!({ "found": true }),
        }
    }
}

#[async_trait]
impl TabDriver for FakeDriver {
    async fn open_tab(&mut self, url: &str) -> Result<()> {
        self.steps.push(Step::Open(url.to_string()));
        match self.open_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn wait_until_loaded(&mut self) -> Result<()> {
        self.steps.push(Step::WaitLoaded);
        match self.load_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn run_script(&mut self, script: &str) -> Result<Value> {
        assert!(script.contains("document.querySelector"));
        self.steps.push(Step::RunScript);
        Ok(self.script_result.clone())
    }
}

#[tokio::test]
async fn successful_login_walks_every_stage_once() {
    let mut driver = FakeDriver::succeeding();

    let outcome = automate_login(&mut driver, &request(), &PollConfig::default())
        .await
        .expect("login");

    assert_eq!(
        driver.steps,
        vec![
            Step::Open("https://staging.example.com/login".to_string()),
            Step::WaitLoaded,
            Step::RunScript,
        ]
    );
    assert!(outcome.message.contains("staging.example.com"));
}

#[tokio::test]
async fn validation_failure_never_opens_a_tab() {
    let mut driver = FakeDriver::succeeding();
    let mut bad = request();
    bad.selectors.username = "input[name=user]".to_string();

    let err = automate_login(&mut driver, &bad, &PollConfig::default())
        .await
        .expect_err("bad selector");

    assert!(matches!(err, CookieportError::Validation(_)));
    assert!(driver.steps.is_empty());
}

#[tokio::test]
async fn tab_open_failure_is_fatal_and_skips_the_rest() {
    let mut driver = FakeDriver::succeeding();
    driver.open_error = Some(CookieportError::Tab(
        "browser returned no tab handle".to_string(),
    ));

    let err = automate_login(&mut driver, &request(), &PollConfig::default())
        .await
        .expect_err("tab error");

    assert!(matches!(err, CookieportError::Tab(_)));
    assert_eq!(driver.steps.len(), 1);
}

#[tokio::test]
async fn load_timeout_is_terminal_and_not_retried() {
    let mut driver = FakeDriver::succeeding();
    driver.load_error = Some(CookieportError::Timeout(
        "tab did not finish loading within 15 seconds".to_string(),
    ));

    let err = automate_login(&mut driver, &request(), &PollConfig::default())
        .await
        .expect_err("timeout");

    assert!(matches!(err, CookieportError::Timeout(_)));
    assert_eq!(driver.steps, vec![
        Step::Open("https://staging.example.com/login".to_string()),
        Step::WaitLoaded,
    ]);
}

#[tokio::test]
async fn closed_tab_cancels_the_request() {
    let mut driver = FakeDriver::succeeding();
    driver.load_error = Some(CookieportError::TabClosed(
        "the tab was closed before it finished loading".to_string(),
    ));

    let err = automate_login(&mut driver, &request(), &PollConfig::default())
        .await
        .expect_err("tab closed");

    assert!(matches!(err, CookieportError::TabClosed(_)));
}

#[tokio::test]
async fn exhausted_poll_budget_lists_every_missing_element() {
    let mut driver = FakeDriver::succeeding();
    driver.script_result = json!({
        "found": false,
        "missing": ["username field", "password field", "submit control"],
    });

    let err = automate_login(&mut driver, &request(), &PollConfig::default())
        .await
        .expect_err("nothing found");

    match err {
        CookieportError::Automation { message, missing } => {
            assert_eq!(missing.len(), 3);
            assert!(message.contains("username field"));
            assert!(message.contains("password field"));
            assert!(message.contains("submit control"));
        }
        other => panic!("expected automation error, got {:?}", other),
    }
}

#[tokio::test]
async fn partially_missing_elements_are_named_precisely() {
    let mut driver = FakeDriver::succeeding();
    driver.script_result = json!({
        "found": false,
        "missing": ["submit control"],
    });

    let err = automate_login(&mut driver, &request(), &PollConfig::default())
        .await
        .expect_err("submit missing");

    match err {
        CookieportError::Automation { message, missing } => {
            assert_eq!(missing, vec!["submit control".to_string()]);
            assert!(!message.contains("username field"));
        }
        other => panic!("expected automation error, got {:?}", other),
    }
}

#[tokio::test]
async fn undecodable_script_result_is_an_automation_error() {
    let mut driver = FakeDriver::succeeding();
    driver.script_result = json!("unexpected");

    let err = automate_login(&mut driver, &request(), &PollConfig::default())
        .await
        .expect_err("bad payload");

    assert!(matches!(err, CookieportError::Automation { .. }));
}
