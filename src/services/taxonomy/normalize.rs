//! Category string cleanup and token extraction.
//!
//! Category strings arrive from several importers and are decorated
//! inconsistently: quoted, bulleted, suffixed with a volume count such as
//! `(12 권)`, and sometimes written as a `>`-delimited path.

/// Markers importers put in front of a category
const BULLETS: &[char] = &[
    '-', '*', '+', '•', '·', '‧', '∙', '▶', '▷', '►', '■', '□', '▪', '●', '○', '◆', '◇', '※', '★',
    '☆',
];

/// Opening/closing quote pairs stripped when they surround the whole string
const QUOTE_PAIRS: &[(char, char)] = &[
    ('"', '"'),
    ('\'', '\''),
    ('“', '”'),
    ('‘', '’'),
    ('「', '」'),
    ('『', '』'),
    ('`', '`'),
];

const PATH_DELIMITER: char = '>';
const SUB_DELIMITERS: &[char] = &['/', '·'];
const COUNT_UNIT: char = '권';

/// Normalizes a raw category string
///
/// Trims, strips surrounding quotes, a leading bullet marker and a trailing
/// `(N 권)` count suffix, and collapses whitespace runs to one space. The
/// steps are repeated until nothing changes, so the result is a fixpoint:
/// `normalize(&normalize(s)) == normalize(s)` for every input.
pub fn normalize(raw: &str) -> String {
    let mut current = collapse_whitespace(raw);
    loop {
        let next = collapse_whitespace(strip_count_suffix(strip_bullet(strip_quotes(&current))));
        if next == current {
            return current;
        }
        current = next;
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_quotes(s: &str) -> &str {
    let mut chars = s.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return s;
    };
    if QUOTE_PAIRS.contains(&(first, last)) {
        s[first.len_utf8()..s.len() - last.len_utf8()].trim()
    } else {
        s
    }
}

fn strip_bullet(s: &str) -> &str {
    match s.strip_prefix(BULLETS) {
        Some(rest) => rest.trim_start(),
        None => s,
    }
}

/// Removes a trailing `(N 권)` / `(N권)` / `(1,234 권)` suffix
fn strip_count_suffix(s: &str) -> &str {
    let Some(body) = s.strip_suffix(')') else {
        return s;
    };
    let Some(open) = body.rfind('(') else {
        return s;
    };
    let inner = body[open + 1..].trim();
    let Some(number) = inner.strip_suffix(COUNT_UNIT) else {
        return s;
    };
    let number = number.trim();
    let is_count = !number.is_empty()
        && number.chars().any(|c| c.is_ascii_digit())
        && number.chars().all(|c| c.is_ascii_digit() || c == ',');
    if is_count {
        body[..open].trim_end()
    } else {
        s
    }
}

/// Splits a token on `/` and `·`, keeping non-empty trimmed parts
fn sub_splits(token: &str) -> Vec<String> {
    token
        .split(SUB_DELIMITERS)
        .map(normalize)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Normalized category broken into the pieces the resolver matches against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTokens {
    /// The whole normalized string
    pub normalized: String,
    /// Most specific segment of the path
    pub leaf: String,
    /// Ordered, deduplicated match candidates, most specific first
    pub tokens: Vec<String>,
}

impl CategoryTokens {
    /// Builds the token list for a raw category string
    ///
    /// Order: leaf, the leaf's `/`/`·` parts, every path segment in path
    /// order, then every segment's `/`/`·` parts.
    pub fn from_raw(raw: &str) -> Self {
        let normalized = normalize(raw);
        let segments: Vec<String> = if normalized.contains(PATH_DELIMITER) {
            normalized
                .split(PATH_DELIMITER)
                .map(normalize)
                .filter(|segment| !segment.is_empty())
                .collect()
        } else if normalized.is_empty() {
            Vec::new()
        } else {
            vec![normalized.clone()]
        };
        let leaf = segments.last().map(|s| normalize(s)).unwrap_or_default();

        let mut tokens: Vec<String> = Vec::new();
        let mut push = |token: String| {
            if !token.is_empty() && !tokens.contains(&token) {
                tokens.push(token);
            }
        };

        push(leaf.clone());
        for part in sub_splits(&leaf) {
            if part != leaf {
                push(part);
            }
        }
        for segment in &segments {
            push(segment.clone());
        }
        for segment in &segments {
            for part in sub_splits(segment) {
                if &part != segment {
                    push(part);
                }
            }
        }

        Self {
            normalized,
            leaf,
            tokens,
        }
    }
}
