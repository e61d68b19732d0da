/// One piece of a SQL template: literal text or an `@identifier` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Segment<'a> {
    Literal(&'a str),
    /// The full token including the leading `@`.
    Token(&'a str),
}

pub(super) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// Returns the end index of the identifier run starting at `start`, if it is non-empty.
pub(super) fn scan_identifier(bytes: &[u8], start: usize) -> Option<usize> {
    let mut idx = start;
    while idx < bytes.len() && is_ident_byte(bytes[idx]) {
        idx += 1;
    }
    if idx == start { None } else { Some(idx) }
}

/// Left-to-right tokenizer over a SQL template.
///
/// An `@` that is not followed by at least one `[A-Za-z_]` byte stays in the literal text.
pub(super) struct Segments<'a> {
    sql: &'a str,
    pos: usize,
}

impl<'a> Segments<'a> {
    pub(super) fn new(sql: &'a str) -> Self {
        Self { sql, pos: 0 }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.sql.as_bytes();
        let start = self.pos;
        if start >= bytes.len() {
            return None;
        }

        let mut idx = start;
        while idx < bytes.len() {
            if bytes[idx] == b'@'
                && let Some(end) = scan_identifier(bytes, idx + 1)
            {
                if idx > start {
                    self.pos = idx;
                    return Some(Segment::Literal(&self.sql[start..idx]));
                }
                self.pos = end;
                return Some(Segment::Token(&self.sql[idx..end]));
            }
            idx += 1;
        }

        self.pos = bytes.len();
        Some(Segment::Literal(&self.sql[start..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(sql: &str) -> Vec<Segment<'_>> {
        Segments::new(sql).collect()
    }

    #[test]
    fn splits_literals_and_tokens() {
        assert_eq!(
            collect("a = @a and b=@b_c;"),
            vec![
                Segment::Literal("a = "),
                Segment::Token("@a"),
                Segment::Literal(" and b="),
                Segment::Token("@b_c"),
                Segment::Literal(";"),
            ]
        );
    }

    #[test]
    fn digits_end_identifier() {
        assert_eq!(
            collect("@id2"),
            vec![Segment::Token("@id"), Segment::Literal("2")]
        );
    }

    #[test]
    fn bare_at_signs_are_literal() {
        assert_eq!(collect("x @ 1"), vec![Segment::Literal("x @ 1")]);
        assert_eq!(
            collect("@@version"),
            vec![Segment::Literal("@"), Segment::Token("@version")]
        );
        assert_eq!(collect("a@1"), vec![Segment::Literal("a@1")]);
    }

    #[test]
    fn empty_template_has_no_segments() {
        assert!(collect("").is_empty());
    }

    #[test]
    fn multibyte_text_is_preserved() {
        assert_eq!(
            collect("'é' = @é"),
            vec![Segment::Literal("'é' = @é")]
        );
        assert_eq!(
            collect("'ü'@x"),
            vec![Segment::Literal("'ü'"), Segment::Token("@x")]
        );
    }
}
