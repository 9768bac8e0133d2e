use url::Url;

use crate::error::AppError;

/// Strips markup from user supplied free text (descriptions, bios).
///
/// Whitelist based: harmless formatting tags survive, `<script>` and friends
/// are removed along with their content, event handler attributes are dropped.
pub fn clean_text(input: &str) -> String {
    ammonia::clean(input).trim().to_string()
}

/// Requires an absolute http(s) URL, as used for social links.
pub fn require_web_url(field: &str, raw: &str) -> Result<(), AppError> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(AppError::BadRequest(format!("{} must be an http(s) URL", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_are_removed() {
        assert_eq!(clean_text("<script>alert(1)</script>Hello <b>there</b>"), "Hello <b>there</b>");
    }

    #[test]
    fn only_web_urls_pass() {
        assert!(require_web_url("instagram", "https://instagram.com/someone").is_ok());
        assert!(require_web_url("instagram", "javascript:alert(1)").is_err());
        assert!(require_web_url("instagram", "not a url").is_err());
    }
}
