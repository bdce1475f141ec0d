//! Relative link rewriting for relayed HTML.
//!
//! The rewrite is textual: every `src="..."` / `href="..."` (single or double
//! quoted, attribute name case-insensitive) is inspected once and, when its value is
//! root-relative or document-relative, replaced with an absolute URL anchored at the
//! page's final URL. `srcset`, CSS `url()` references and script contents are not
//! touched.
//!
//! Document-relative means no scheme at all, not merely "not starting with `http`":
//! `mailto:`, `data:`, `#fragment` and empty values stay as written.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use reqwest::Url;

static ATTRIBUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?P<lead>\b(?:src|href)\s*=\s*)(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#)
        .expect("attribute pattern is a valid regex")
});

/// Where relative references in one page resolve to.
///
/// Derived once from a page's final URL and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteContext {
    origin: String,
    base_dir: String,
}

impl RewriteContext {
    /// Builds the context for a page served from `final_url`.
    pub fn new(final_url: &Url) -> Self {
        let path = final_url.path();
        let base_dir = match path.rfind('/') {
            Some(idx) => path[..=idx].to_string(),
            None => "/".to_string(),
        };
        Self {
            origin: final_url.origin().ascii_serialization(),
            base_dir,
        }
    }

    /// Scheme, host and non-default port, e.g. `https://a.com` or `http://a.com:8080`.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Directory of the final URL's path, always starting and ending with `/`.
    pub fn base_path(&self) -> &str {
        &self.base_dir
    }

    /// Returns the absolute form of an attribute value, or `None` when the value is
    /// left as is (already absolute, protocol-relative, fragment-only, empty, or
    /// carrying any scheme such as `mailto:` or `data:`).
    pub fn absolutize(&self, value: &str) -> Option<String> {
        if value.is_empty() || value.starts_with("//") || value.starts_with('#') {
            return None;
        }
        if value.starts_with('/') {
            return Some(format!("{}{}", self.origin, value));
        }
        if has_scheme(value) {
            return None;
        }
        Some(format!("{}{}{}", self.origin, self.base_dir, value))
    }

    /// Rewrites every matching `src`/`href` value in `body`.
    ///
    /// Each attribute is matched exactly once, so a value made absolute by the
    /// root-relative rule is never prefixed again by the document-relative rule.
    pub fn rewrite(&self, body: &str) -> String {
        ATTRIBUTE_PATTERN
            .replace_all(body, |caps: &Captures| {
                let (quote, value) = match (caps.name("dq"), caps.name("sq")) {
                    (Some(v), _) => ('"', v.as_str()),
                    (None, Some(v)) => ('\'', v.as_str()),
                    (None, None) => return caps[0].to_string(),
                };
                match self.absolutize(value) {
                    Some(absolute) => format!("{}{quote}{absolute}{quote}", &caps["lead"]),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Rewrites root-relative and document-relative `src`/`href` values in `body` into
/// absolute URLs anchored at `final_url`.
pub fn rewrite(body: &str, final_url: &Url) -> String {
    RewriteContext::new(final_url).rewrite(body)
}

/// True when `value` starts with an RFC 3986 scheme followed by `:`.
fn has_scheme(value: &str) -> bool {
    let Some(colon) = value.find(':') else {
        return false;
    };
    let scheme = &value[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
