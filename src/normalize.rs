// src/normalize.rs

/// Sentinel appended to every candidate list. Selecting it hands off to
/// an unmodified interactive commit.
pub const CUSTOM_MESSAGE_OPTION: &str = "[write own message]...";

const QUOTE_CHARS: &[char] = &['`', '"', '\''];

/// Turn a raw model response into an ordered list of candidate commit
/// messages, with the custom-message sentinel always last.
///
/// Lines that normalize to one character or less are dropped, as are
/// duplicates (first occurrence wins).
pub fn normalize(raw: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    for line in raw.lines() {
        let message = normalize_line(line);
        if message.chars().count() <= 1 || message == CUSTOM_MESSAGE_OPTION {
            continue;
        }
        if !candidates.contains(&message) {
            candidates.push(message);
        }
    }
    candidates.push(CUSTOM_MESSAGE_OPTION.to_string());
    candidates
}

/// Clean one response line. Models decorate suggestions with list
/// markers, quoting, and escaped newlines; strip all of that.
pub fn normalize_line(line: &str) -> String {
    let s = line.trim();
    let s = strip_list_marker(s);
    let s = s.strip_prefix(QUOTE_CHARS).unwrap_or(s);
    let s = s.strip_suffix(QUOTE_CHARS).unwrap_or(s);
    let s = collapse_quote_colon(s);
    let s = collapse_colon_quote(&s);
    let s = s.replace("\\n", "");
    s.trim().to_string()
}

/// Strip a leading `1.` / `-` / `*` list marker, but only when followed
/// by whitespace.
fn strip_list_marker(line: &str) -> &str {
    let rest = if let Some(r) = line.strip_prefix('-') {
        Some(r)
    } else if let Some(r) = line.strip_prefix('*') {
        Some(r)
    } else {
        let digits = line.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 {
            line[digits..].strip_prefix('.')
        } else {
            None
        }
    };

    match rest {
        Some(r) if r.starts_with(char::is_whitespace) => r.trim_start(),
        _ => line,
    }
}

/// Models sometimes emit `` `feat`: message ``; drop the first quote
/// that sits directly before a colon.
fn collapse_quote_colon(s: &str) -> String {
    for (i, c) in s.char_indices() {
        if QUOTE_CHARS.contains(&c) && s[i + c.len_utf8()..].starts_with(':') {
            let mut out = String::with_capacity(s.len());
            out.push_str(&s[..i]);
            out.push_str(&s[i + c.len_utf8()..]);
            return out;
        }
    }
    s.to_string()
}

/// The inverse decoration, `` feat:` message ``: drop the first quote
/// that sits directly after a colon.
fn collapse_colon_quote(s: &str) -> String {
    for (i, c) in s.char_indices() {
        if c == ':' {
            let after = i + 1;
            if let Some(q) = s[after..].chars().next() {
                if QUOTE_CHARS.contains(&q) {
                    let mut out = String::with_capacity(s.len());
                    out.push_str(&s[..after]);
                    out.push_str(&s[after + q.len_utf8()..]);
                    return out;
                }
            }
        }
    }
    s.to_string()
}

// =============================================================================
// MODULE TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_numbered_list_marker() {
        assert_eq!(normalize_line("1. fix(auth): add regex"), "fix(auth): add regex");
        assert_eq!(normalize_line("12. feat: twelve"), "feat: twelve");
    }

    #[test]
    fn strips_dash_and_star_markers() {
        assert_eq!(normalize_line("- fix: dash"), "fix: dash");
        assert_eq!(normalize_line("* fix: star"), "fix: star");
    }

    #[test]
    fn marker_without_whitespace_kept() {
        assert_eq!(normalize_line("-fix: dash"), "-fix: dash");
        assert_eq!(normalize_line("1.fix"), "1.fix");
    }

    #[test]
    fn strips_surrounding_quotes() {
        assert_eq!(normalize_line("\"fix: quoted\""), "fix: quoted");
        assert_eq!(normalize_line("`fix: ticked`"), "fix: ticked");
        assert_eq!(normalize_line("'fix: single'"), "fix: single");
    }

    #[test]
    fn collapses_quoted_type_prefix() {
        assert_eq!(normalize_line("`feat`: add tests"), "feat: add tests");
    }

    #[test]
    fn collapses_quote_after_colon() {
        // strip_suffix removes the trailing quote, collapse_colon_quote the inner one
        assert_eq!(normalize_line("feat:`add tests`"), "feat:add tests");
    }

    #[test]
    fn removes_escaped_newlines() {
        assert_eq!(normalize_line("fix: part one\\npart two"), "fix: part onepart two");
    }

    #[test]
    fn normalize_line_is_idempotent() {
        let inputs = [
            "1. fix(auth): add regex",
            "`feat`: add tests",
            "- chore: bump deps",
            "\"docs: update readme\"",
            "plain message with no decoration",
            "fix: part one\\npart two",
        ];
        for input in inputs {
            let once = normalize_line(input);
            let twice = normalize_line(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn normalize_is_idempotent_on_whole_responses() {
        let raw = "1. fix(auth): add regex\n2. `feat`: add tests\n\n- chore: tidy";
        let once = normalize(raw);
        let twice = normalize(&once.join("\n"));
        assert_eq!(once, twice);
    }

    #[test]
    fn sentinel_is_always_last_and_unique() {
        let raw = format!("fix: real one\n{}\nfeat: another", CUSTOM_MESSAGE_OPTION);
        let candidates = normalize(&raw);
        let count = candidates.iter().filter(|c| *c == CUSTOM_MESSAGE_OPTION).count();
        assert_eq!(count, 1);
        assert_eq!(candidates.last().unwrap(), CUSTOM_MESSAGE_OPTION);
    }

    #[test]
    fn empty_response_yields_only_sentinel() {
        let candidates = normalize("");
        assert_eq!(candidates, vec![CUSTOM_MESSAGE_OPTION.to_string()]);
    }

    #[test]
    fn short_lines_discarded() {
        let candidates = normalize("a\n-\n``\nfix: keep me");
        assert_eq!(candidates, vec!["fix: keep me".to_string(), CUSTOM_MESSAGE_OPTION.to_string()]);
    }

    #[test]
    fn duplicate_lines_collapsed() {
        let candidates = normalize("fix: same\n1. fix: same\nfix: other");
        assert_eq!(
            candidates,
            vec![
                "fix: same".to_string(),
                "fix: other".to_string(),
                CUSTOM_MESSAGE_OPTION.to_string(),
            ]
        );
    }

    #[test]
    fn order_of_survivors_preserved() {
        let candidates = normalize("3. feat: c\n1. feat: a\n2. feat: b");
        assert_eq!(&candidates[..3], &["feat: c", "feat: a", "feat: b"]);
    }
}
