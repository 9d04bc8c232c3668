/*!
`WildcardPattern` — compiles a `*`-bearing resource pattern string into an anchored regex matcher,
and answers the conservative subsumption question one pattern poses of another.
*/

use regex::Regex;

const ESCAPE_CHARS: &[char] = &['-', '/', '\\', '^', '$', '+', '?', '.', '(', ')', '|', '[', ']', '{', '}'];

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// A compiled resource pattern. `*` matches any run of characters (including none); every other
/// regex metacharacter is escaped to its literal meaning.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    raw: String,
    regex: Regex,
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for WildcardPattern {}

impl WildcardPattern {
    /// Compile `pattern` into a matcher. Never fails: every input string, wildcarded or not, is a
    /// legal pattern.
    pub fn compile(pattern: &str) -> Self {
        Self {
            raw: pattern.to_string(),
            regex: Regex::new(&to_anchored_regex(pattern)).expect("escaped pattern is valid regex"),
        }
    }

    /// The original, uncompiled pattern string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Does this pattern match the literal string `candidate`?
    pub fn matches(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// Conservative subsumption: does every concrete string matched by pattern `other` also match
    /// this pattern? Approximated, per the standard IAM-tooling convention, by testing whether
    /// this pattern's matcher accepts `other`'s literal text (its own wildcards included).
    pub fn includes(&self, other: &str) -> bool {
        self.raw == other || self.matches(other)
    }
}

fn to_anchored_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');
    for c in pattern.chars() {
        if c == '*' {
            out.push_str(".*");
        } else if ESCAPE_CHARS.contains(&c) {
            out.push('\\');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out.push('$');
    out
}

/// `p1 includes p2` — does every pattern `p2` expands to also match `p1`?
pub fn pattern_includes(p1: &str, p2: &str) -> bool {
    WildcardPattern::compile(p1).includes(p2)
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let p = WildcardPattern::compile("arn:aws:s3:::bucket/key");
        assert!(p.matches("arn:aws:s3:::bucket/key"));
        assert!(!p.matches("arn:aws:s3:::bucket/other"));
    }

    #[test]
    fn test_wildcard_match() {
        let p = WildcardPattern::compile("arn:aws:s3:::bucket/*");
        assert!(p.matches("arn:aws:s3:::bucket/key"));
        assert!(p.matches("arn:aws:s3:::bucket/"));
        assert!(!p.matches("arn:aws:s3:::other/key"));
    }

    #[test]
    fn test_universal_wildcard_includes_everything() {
        assert!(pattern_includes("*", "arn:aws:s3:::bucket/*"));
        assert!(pattern_includes("*", "anything-at-all"));
    }

    #[test]
    fn test_narrower_pattern_does_not_include_wider() {
        assert!(!pattern_includes("arn:aws:s3:::bucket/*", "*"));
    }

    #[test]
    fn test_metacharacters_are_escaped() {
        let p = WildcardPattern::compile("a.b+c");
        assert!(p.matches("a.b+c"));
        assert!(!p.matches("axbyc"));
    }

    #[test]
    fn test_includes_is_reflexive() {
        assert!(pattern_includes("arn:aws:s3:::bucket/*", "arn:aws:s3:::bucket/*"));
    }
}
