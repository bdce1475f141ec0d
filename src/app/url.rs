//! URL resolution for user-supplied addresses.

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::RelayError;

/// Resolves raw address-bar input into an absolute http(s) URL.
///
/// Surrounding whitespace is trimmed. Input without an `http://` or `https://`
/// prefix (compared case-insensitively) gets `https://` prepended. The result must
/// parse as a URL with an http(s) scheme and a host, and must not exceed
/// `MAX_URL_LENGTH`.
///
/// The normalized string is returned as written (no trailing slash is added), so
/// `example.com` resolves to exactly `https://example.com`.
///
/// # Errors
///
/// Returns `RelayError::InvalidUrl` when the input is empty, too long, unparseable,
/// has no host, or uses a scheme other than http/https.
pub fn resolve_url(raw: &str) -> Result<String, RelayError> {
    let invalid = |reason: String| RelayError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty address".to_string()));
    }

    let normalized = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    // Checked after normalization, the https:// prefix can push it over the limit
    if normalized.len() > MAX_URL_LENGTH {
        return Err(invalid(format!(
            "exceeds maximum length ({} > {})",
            normalized.len(),
            MAX_URL_LENGTH
        )));
    }

    let parsed = url::Url::parse(&normalized).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(normalized),
        _ => Err(invalid("missing host".to_string())),
    }
}

fn has_http_scheme(input: &str) -> bool {
    let lower = input
        .get(..8)
        .unwrap_or(input)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
