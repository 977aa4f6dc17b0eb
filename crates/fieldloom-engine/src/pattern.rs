//! Pattern tokens and compiled matchers.
//!
//! A simple token (no `.`, `[`, `]`, `*`) expands to two matchers: the
//! subtree rooted at that name, and any path whose leaf segment equals the
//! name. A complex token compiles to one case-insensitive full-path regex
//! with `*` matching any sequence and `[*]` matching any numeric index.

use once_cell::sync::Lazy;
use regex::Regex;

static BRACKET_INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\]").unwrap());

/// Leaf segment of a path: strip `[i]` occurrences, take the final
/// `.`-delimited segment, lowercased.
pub fn leaf_name(path: &str) -> String {
    let stripped = BRACKET_INDEX.replace_all(path, "");
    stripped
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// One compiled matcher. All matching is full-path and case-insensitive.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// The token itself, or any path descending from it (`tok.…` / `tok[…`).
    Subtree(String),
    /// Any path whose leaf segment equals the token.
    Leaf(String),
    /// Wildcard-translated regex over the full path.
    Wildcard(Regex),
}

impl Pattern {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Pattern::Subtree(token) => {
                let path = path.to_ascii_lowercase();
                path == *token
                    || path
                        .strip_prefix(token.as_str())
                        .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('['))
            }
            Pattern::Leaf(token) => leaf_name(path) == *token,
            Pattern::Wildcard(re) => re.is_match(path),
        }
    }
}

/// Parse a raw token-list field: a JSON array, a JSON string (itself split on
/// commas), or a plain comma-separated string. Tokens are trimmed, unwrapped
/// of surrounding quotes, lowercased; empties dropped.
pub fn parse_token_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
        match value {
            serde_json::Value::Array(items) => {
                return items
                    .iter()
                    .map(crate::flatten::stringify)
                    .filter_map(|t| clean_token(&t))
                    .collect();
            }
            serde_json::Value::String(s) => {
                return s.split(',').filter_map(clean_token).collect();
            }
            _ => {}
        }
    }
    raw.split(',').filter_map(clean_token).collect()
}

fn clean_token(token: &str) -> Option<String> {
    let token = token
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_ascii_lowercase();
    (!token.is_empty()).then_some(token)
}

fn is_complex(token: &str) -> bool {
    token.contains(['.', '[', ']', '*'])
}

/// Translate a complex token into a full-path regex. `[*]` matches any
/// bracketed index, `*` any sequence; everything else is literal.
fn wildcard_regex(token: &str) -> Result<Regex, regex::Error> {
    // Sentinel keeps `[*]` intact through escaping.
    const SENTINEL: char = '\u{0}';
    let token = token.replace("[*]", &SENTINEL.to_string());
    let escaped = regex::escape(&token)
        .replace(r"\*", ".*")
        .replace(SENTINEL, r"\[\d+\]");
    Regex::new(&format!("(?i)^{escaped}$"))
}

fn compile_token(token: &str) -> Vec<Pattern> {
    if is_complex(token) {
        match wildcard_regex(token) {
            Ok(re) => vec![Pattern::Wildcard(re)],
            // Malformed tokens degrade to a literal (likely non-matching)
            // pattern instead of failing the request.
            Err(_) => vec![Pattern::Subtree(token.to_string())],
        }
    } else {
        vec![
            Pattern::Subtree(token.to_string()),
            Pattern::Leaf(token.to_string()),
        ]
    }
}

/// A compiled set of patterns from one token-list field.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    pub fn compile(tokens: &[String]) -> Self {
        Self {
            patterns: tokens.iter().flat_map(|t| compile_token(t)).collect(),
        }
    }

    /// Parse and compile a raw token-list field in one step.
    pub fn from_raw(raw: &str) -> Self {
        Self::compile(&parse_token_list(raw))
    }

    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_array_string_and_csv() {
        assert_eq!(
            parse_token_list(r#"["Caption"," description ",""]"#),
            vec!["caption", "description"]
        );
        assert_eq!(
            parse_token_list(r#""title, html""#),
            vec!["title", "html"]
        );
        assert_eq!(
            parse_token_list("title, 'html' , "),
            vec!["title", "html"]
        );
        assert!(parse_token_list("  ").is_empty());
    }

    #[test]
    fn simple_token_matches_subtree_and_leaf() {
        let set = PatternSet::from_raw("crawl");
        assert!(set.matches("crawl"));
        assert!(set.matches("crawl.loadedUrl"));
        assert!(set.matches("crawl[0]"));
        assert!(set.matches("nested.crawl"));
        assert!(!set.matches("crawler.url"));
    }

    #[test]
    fn simple_token_matches_leaf_at_any_depth() {
        let set = PatternSet::from_raw("loadedurl");
        assert!(set.matches("crawl.loadedUrl"));
        assert!(set.matches("a.b[3].loadedURL"));
        assert!(!set.matches("crawl.loadedUrl.extra"));
    }

    #[test]
    fn wildcard_star_matches_any_sequence() {
        let set = PatternSet::from_raw("crawl.*");
        assert!(set.matches("crawl.loadedUrl"));
        assert!(set.matches("crawl.deep.nested"));
        assert!(!set.matches("crawl"));

        let set = PatternSet::from_raw("*.html");
        assert!(set.matches("crawl.html"));
        assert!(set.matches("a.b.html"));
        assert!(!set.matches("html"));
    }

    #[test]
    fn bracket_star_matches_numeric_indices_only() {
        let set = PatternSet::from_raw("tags[*]");
        assert!(set.matches("tags[0]"));
        assert!(set.matches("tags[17]"));
        assert!(!set.matches("tags[x]"));
        assert!(!set.matches("tags"));
    }

    #[test]
    fn explicit_path_is_literal_and_case_insensitive() {
        let set = PatternSet::from_raw("crawl.loadedUrl");
        assert!(set.matches("CRAWL.LOADEDURL"));
        assert!(!set.matches("nested.crawl.loadedUrl"));
    }

    #[test]
    fn leaf_name_strips_indices() {
        assert_eq!(leaf_name("crawl.tags[0]"), "tags");
        assert_eq!(leaf_name("Title"), "title");
        assert_eq!(leaf_name("a.b[2].C"), "c");
    }
}
