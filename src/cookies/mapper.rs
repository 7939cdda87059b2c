//! Source-to-destination cookie attribute mapping
//!
//! Naive copy-as-is would leak domain scoping or drop secure-only cookies
//! onto insecure destinations; this module applies the compatibility and
//! scoping rules that make a cookie valid for a different origin.

use url::Url;

use crate::cookies::{Cookie, SetCookieParams};
use crate::error::{CookieportError, Result};
use crate::utils::UrlUtils;

/// Transform one source cookie into a write request against the
/// destination origin.
///
/// Secure cookies cannot land on a non-https destination; host-only
/// cookies must omit the domain so the browser scopes them to the exact
/// destination host; session cookies never carry an expiration.
pub fn map_for_destination(cookie: &Cookie, destination: &Url) -> Result<SetCookieParams> {
    let path = cookie.write_path();
    let url = format!("{}{}", UrlUtils::origin(destination), path);

    if cookie.secure && destination.scheme() != "https" {
        return Err(CookieportError::IncompatibleCookie(format!(
            "cookie \"{}\" requires HTTPS but the destination URL uses {}",
            cookie.name,
            destination.scheme()
        )));
    }

    let domain = if cookie.is_host_only() {
        None
    } else {
        destination.host_str().map(str::to_string)
    };

    Ok(SetCookieParams {
        url,
        name: cookie.name.clone(),
        value: cookie.value.clone(),
        path: path.to_string(),
        secure: cookie.secure,
        http_only: cookie.http_only,
        same_site: cookie.same_site,
        domain,
        expires: cookie.expiration(),
        partition_key: cookie.partition_key.clone(),
        priority: cookie.priority.clone(),
        same_party: cookie.same_party,
    })
}

#[cfg(test)]
mod tests {
    use super::map_for_destination;
    use crate::cookies::{test_cookie, SameSite};
    use crate::error::CookieportError;
    use url::Url;

    fn destination(url: &str) -> Url {
        Url::parse(url).expect("destination url")
    }

    #[test]
    fn secure_cookie_to_http_destination_fails_before_write() {
        let mut cookie = test_cookie("sid");
        cookie.secure = true;

        let err = map_for_destination(&cookie, &destination("http://localhost:3000"))
            .expect_err("secure to http");
        assert!(matches!(err, CookieportError::IncompatibleCookie(_)));
        assert!(err.to_string().contains("sid"));
        assert!(err.to_string().contains("HTTPS"));
    }

    #[test]
    fn secure_cookie_to_https_destination_is_mapped() {
        let mut cookie = test_cookie("sid");
        cookie.secure = true;

        let params = map_for_destination(&cookie, &destination("https://staging.example.com"))
            .expect("mapped");
        assert!(params.secure);
        assert_eq!(params.url, "https://staging.example.com/");
    }

    #[test]
    fn host_only_cookie_omits_domain() {
        let mut cookie = test_cookie("sid");
        cookie.host_only = Some(true);

        let params =
            map_for_destination(&cookie, &destination("http://localhost:3000")).expect("mapped");
        assert_eq!(params.domain, None);
    }

    #[test]
    fn domain_cookie_gets_destination_host() {
        let mut cookie = test_cookie("sid");
        cookie.domain = ".example.com".to_string();

        let params =
            map_for_destination(&cookie, &destination("http://localhost:3000")).expect("mapped");
        assert_eq!(params.domain, Some("localhost".to_string()));
    }

    #[test]
    fn session_cookie_never_carries_expiration() {
        let mut cookie = test_cookie("sid");
        cookie.session = true;
        cookie.expires = Some(1_900_000_000.0);

        let params =
            map_for_destination(&cookie, &destination("http://localhost:3000")).expect("mapped");
        assert_eq!(params.expires, None);
    }

    #[test]
    fn persistent_cookie_keeps_expiration() {
        let mut cookie = test_cookie("sid");
        cookie.session = false;
        cookie.expires = Some(1_900_000_000.0);

        let params =
            map_for_destination(&cookie, &destination("http://localhost:3000")).expect("mapped");
        assert_eq!(params.expires, Some(1_900_000_000.0));
    }

    #[test]
    fn cookie_path_joins_destination_origin() {
        let mut cookie = test_cookie("sid");
        cookie.path = "/api".to_string();

        let params = map_for_destination(&cookie, &destination("http://localhost:3000/other"))
            .expect("mapped");
        assert_eq!(params.url, "http://localhost:3000/api");
        assert_eq!(params.path, "/api");
    }

    #[test]
    fn empty_path_defaults_to_root() {
        let mut cookie = test_cookie("sid");
        cookie.path = String::new();

        let params =
            map_for_destination(&cookie, &destination("http://localhost:3000")).expect("mapped");
        assert_eq!(params.path, "/");
        assert_eq!(params.url, "http://localhost:3000/");
    }

    #[test]
    fn verbatim_attributes_are_copied() {
        let mut cookie = test_cookie("sid");
        cookie.value = "v".to_string();
        cookie.http_only = true;
        cookie.same_site = Some(SameSite::Strict);
        cookie.priority = Some("High".to_string());
        cookie.same_party = Some(true);

        let params =
            map_for_destination(&cookie, &destination("http://localhost:3000")).expect("mapped");
        assert_eq!(params.value, "v");
        assert!(params.http_only);
        assert_eq!(params.same_site, Some(SameSite::Strict));
        assert_eq!(params.priority, Some("High".to_string()));
        assert_eq!(params.same_party, Some(true));
    }
}
