//! Splitting of the Python-style collection literals mapmaker prints.

/// Split a `[...]`, `(...)` or `{...}` literal into its top-level elements.
///
/// Elements are returned trimmed, in order. `set()` is the empty set.
/// Returns `None` when the text is not a single balanced collection.
pub(crate) fn split_collection(text: &str) -> Option<Vec<&str>> {
    let text = text.trim();
    if text == "set()" {
        return Some(Vec::new());
    }

    let close = match text.chars().next()? {
        '[' => ']',
        '(' => ')',
        '{' => '}',
        _ => return None,
    };
    if !text.ends_with(close) || balanced_end(text)? != text.len() {
        return None;
    }

    let inner = &text[1..text.len() - 1];
    let mut elements = Vec::new();
    let mut start = 0;
    let mut scanner = Scanner::default();
    for (i, c) in inner.char_indices() {
        if scanner.step(c)? && c == ',' {
            elements.push(inner[start..i].trim());
            start = i + 1;
        }
    }
    if !scanner.at_top() {
        return None;
    }
    let last = inner[start..].trim();
    if !last.is_empty() {
        elements.push(last);
    }
    if elements.iter().any(|e| e.is_empty()) {
        return None;
    }
    Some(elements)
}

/// Byte length of the balanced bracketed literal at the start of `text`.
pub(crate) fn balanced_end(text: &str) -> Option<usize> {
    if !matches!(text.chars().next(), Some('(' | '[' | '{')) {
        return None;
    }
    let mut scanner = Scanner::default();
    for (i, c) in text.char_indices() {
        scanner.step(c)?;
        if scanner.at_top() {
            return Some(i + c.len_utf8());
        }
    }
    None
}

/// Tracks bracket nesting and quoted strings.
#[derive(Debug, Default)]
struct Scanner {
    stack: Vec<char>,
    quote: Option<char>,
    escaped: bool,
}

impl Scanner {
    /// Consume `c`. Returns whether `c` sits at nesting depth zero outside
    /// any string, or `None` on a mismatched closing bracket.
    fn step(&mut self, c: char) -> Option<bool> {
        if let Some(q) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == q {
                self.quote = None;
            }
            return Some(false);
        }
        match c {
            '\'' | '"' => {
                self.quote = Some(c);
                Some(false)
            }
            '(' | '[' | '{' => {
                self.stack.push(c);
                Some(false)
            }
            ')' | ']' | '}' => {
                let open = self.stack.pop()?;
                let expected = match open {
                    '(' => ')',
                    '[' => ']',
                    _ => '}',
                };
                (c == expected).then_some(false)
            }
            _ => Some(self.at_top()),
        }
    }

    fn at_top(&self) -> bool {
        self.stack.is_empty() && self.quote.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_flat_list() {
        assert_eq!(
            split_collection("['UBERON:1', 'UBERON:2']"),
            Some(vec!["'UBERON:1'", "'UBERON:2'"])
        );
    }

    #[test]
    fn test_split_nested_tuples() {
        assert_eq!(
            split_collection("[('UBERON:1', ('UBERON:2',)), ('ILX:3', ())]"),
            Some(vec!["('UBERON:1', ('UBERON:2',))", "('ILX:3', ())"])
        );
    }

    #[test]
    fn test_split_quoted_commas_and_brackets() {
        assert_eq!(
            split_collection(r#"["a, b", 'c)', 'it\'s']"#),
            Some(vec![r#""a, b""#, "'c)'", r"'it\'s'"])
        );
    }

    #[test]
    fn test_split_empty_collections() {
        assert_eq!(split_collection("[]"), Some(vec![]));
        assert_eq!(split_collection(" set() "), Some(vec![]));
        assert_eq!(split_collection("{'a',}"), Some(vec!["'a'"]));
    }

    #[test]
    fn test_split_malformed() {
        assert_eq!(split_collection("['a', 'b'"), None);
        assert_eq!(split_collection("['a'] ['b']"), None);
        assert_eq!(split_collection("[('a']"), None);
        assert_eq!(split_collection("[,]"), None);
        assert_eq!(split_collection("'a'"), None);
        assert_eq!(split_collection(""), None);
    }

    #[test]
    fn test_balanced_end() {
        assert_eq!(balanced_end("('a', ('b',)) (label)"), Some(13));
        assert_eq!(balanced_end("('a'"), None);
        assert_eq!(balanced_end("a"), None);
    }
}
