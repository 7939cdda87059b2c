use crate::error::CookieportError;

pub fn exit_code_for_error(err: &CookieportError) -> i32 {
    match err {
        CookieportError::Validation(_) => 2,
        CookieportError::Lookup(_) => 3,
        CookieportError::IncompatibleCookie(_) => 4,
        CookieportError::Write(_) => 5,
        CookieportError::Removal(_) | CookieportError::NotFound(_) => 6,
        CookieportError::Tab(_) => 7,
        CookieportError::TabClosed(_) => 8,
        CookieportError::Timeout(_) => 28,
        CookieportError::Automation { .. } => 22,
        CookieportError::Cdp(_) => 43,
        CookieportError::WebSocket(_) => 35,
        CookieportError::Io(_) => 23,
        CookieportError::Json(_) => 26,
        CookieportError::Http(err) => http_exit_code(err),
    }
}

fn http_exit_code(err: &reqwest::Error) -> i32 {
    if err.is_timeout() {
        return 28;
    }
    if err.is_connect() {
        return 7;
    }
    if err.is_request() {
        return 2;
    }
    43
}
