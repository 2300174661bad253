//! Cookie Rendering
//!
//! Renders `Set-Cookie` values from a declarative config. The backend's
//! only cookie is the script-readable CSRF one, so there is no parsing
//! half; verification reads the `X-CSRF-Token` header instead.

use axum::http::HeaderValue;

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Declarative cookie attributes
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    /// Off for cookies the frontend script must read
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    /// Session cookie when absent
    pub max_age_secs: Option<i64>,
}

impl CookieConfig {
    /// Render the full `Set-Cookie` value for the given cookie value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut parts = vec![format!("{}={}", self.name, value)];

        parts.push(format!("Path={}", self.path));
        if let Some(max_age) = self.max_age_secs {
            parts.push(format!("Max-Age={max_age}"));
        }
        parts.push(format!("SameSite={}", self.same_site.as_str()));
        if self.secure {
            parts.push("Secure".to_string());
        }
        if self.http_only {
            parts.push("HttpOnly".to_string());
        }

        parts.join("; ")
    }
}

/// Render a `Set-Cookie` header value. Falls back to an empty value if
/// the rendered string is not a valid header, which hex and base64
/// cookie values never trigger.
pub fn set_cookie_header(config: &CookieConfig, value: &str) -> HeaderValue {
    HeaderValue::from_str(&config.build_set_cookie(value))
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> CookieConfig {
        CookieConfig {
            name: "csrf".to_string(),
            secure: true,
            http_only: false,
            same_site: SameSite::None,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }

    #[test]
    fn test_renders_all_attributes() {
        let config = CookieConfig {
            http_only: true,
            same_site: SameSite::Lax,
            path: "/api".to_string(),
            max_age_secs: Some(3600),
            ..base_config()
        };

        let cookie = config.build_set_cookie("value123");
        assert!(cookie.starts_with("csrf=value123; "));
        assert!(cookie.contains("Path=/api"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.ends_with("HttpOnly"));
    }

    #[test]
    fn test_script_readable_cookie_skips_http_only() {
        let cookie = base_config().build_set_cookie("abc123");
        assert!(!cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=None"));
    }

    #[test]
    fn test_session_cookie_has_no_max_age() {
        let cookie = base_config().build_set_cookie("abc123");
        assert!(!cookie.contains("Max-Age"));
    }

    #[test]
    fn test_header_value_is_valid() {
        let header = set_cookie_header(&base_config(), "deadbeef");
        assert_eq!(
            header.to_str().unwrap(),
            "csrf=deadbeef; Path=/; SameSite=None; Secure"
        );
    }
}
