//! Input/output sanitization and injection screening.
//!
//! Two independent transforms with different threat models: query
//! sanitization protects the provider and downstream consumers from
//! malformed or oversized input; response sanitization protects the calling
//! agent from content injected by untrusted web results the provider
//! surfaces. The injection screen is advisory defense-in-depth, not a
//! security boundary; false negatives are expected.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

/// Placed where a flagged hijack phrase (and its trailing context) was.
pub const REDACTION_MARKER: &str = "[content removed]";

/// Appended when a response is cut at the length limit.
pub const TRUNCATION_MARKER: &str = "\n[truncated]";

/// HTML-like tags, matched conservatively with no tag-content awareness.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Script blocks including their content.
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?</script>").expect("script pattern"));

/// Runs of whitespace.
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Known agent-hijack phrases plus up to 200 trailing characters on the
/// same line.
static HIJACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:IMPORTANT SYSTEM NOTE|INSTRUCTION FOR AGENT|EXECUTE COMMAND)[:\s].{0,200}")
        .expect("hijack pattern")
});

/// Clean an untrusted query before it reaches the provider.
///
/// Trims, strips control characters (below 0x20 except tab/newline/carriage
/// return, plus 0x7F), collapses whitespace runs to single spaces, strips
/// HTML-like tags, and truncates to `max_len` characters preserving the
/// prefix. An empty result is valid output; rejecting it is the pipeline's
/// job.
pub fn sanitize_query(raw: &str, max_len: usize) -> String {
    let stripped: String = raw.trim().chars().filter(|c| !is_stripped_control(*c)).collect();
    let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");
    let cleaned = TAG_RE.replace_all(&collapsed, "");
    truncate_chars(&cleaned, max_len)
}

/// Clean an untrusted provider summary before it reaches the caller.
///
/// Strips script blocks entirely, strips remaining HTML-like tags, redacts
/// known hijack phrases together with their trailing context, and truncates
/// to `max_len` characters with a marker when cut.
pub fn sanitize_response(text: &str, max_len: usize) -> String {
    let no_scripts = SCRIPT_RE.replace_all(text, "");
    let no_tags = TAG_RE.replace_all(&no_scripts, "");
    let redacted = HIJACK_RE.replace_all(&no_tags, REDACTION_MARKER);

    if redacted.chars().count() > max_len {
        let mut truncated = truncate_chars(&redacted, max_len);
        truncated.push_str(TRUNCATION_MARKER);
        truncated
    } else {
        redacted.into_owned()
    }
}

/// Case-insensitive screen for prompt-injection / agent-hijack phrases.
///
/// Compiled once at startup from the configured pattern list. Heuristic and
/// best-effort only: it catches common instruction-override phrasing, not
/// every adversarial input.
#[derive(Debug, Clone)]
pub struct InjectionFilter {
    patterns: RegexSet,
}

impl InjectionFilter {
    /// Compile the configured patterns, each applied case-insensitively.
    pub fn new(patterns: &[String]) -> Result<Self, crate::config::ConfigError> {
        let prefixed: Vec<String> = patterns.iter().map(|p| format!("(?i){p}")).collect();
        let patterns = RegexSet::new(&prefixed).map_err(|e| crate::config::ConfigError::Invalid {
            field: "injection_patterns".into(),
            reason: e.to_string(),
        })?;
        Ok(Self { patterns })
    }

    /// Whether the (already sanitized) query looks like an injection attempt.
    pub fn is_match(&self, query: &str) -> bool {
        self.patterns.is_match(query)
    }
}

fn is_stripped_control(c: char) -> bool {
    (c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')) || c == '\u{7f}'
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() > max { s.chars().take(max).collect() } else { s.to_string() }
}
