//! Whitespace-preserving tokenizer for the credential file.

pub(super) struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub(super) fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn advance(&mut self, len: usize) -> &'a str {
        let taken = &self.src[self.pos..self.pos + len];
        self.line += taken.matches('\n').count();
        self.pos += len;
        taken
    }

    /// Consume whitespace and `#` comments, returning them verbatim.
    pub(super) fn skip_trivia(&mut self) -> String {
        let start = self.pos;
        loop {
            let rest = self.rest();
            if rest.starts_with('#') {
                let len = rest.find('\n').unwrap_or(rest.len());
                self.advance(len);
                continue;
            }
            match rest.char_indices().find(|(_, c)| !c.is_whitespace()) {
                Some((0, _)) => break,
                Some((len, _)) => {
                    self.advance(len);
                }
                None => {
                    self.advance(rest.len());
                    break;
                }
            }
        }
        self.src[start..self.pos].to_string()
    }

    /// Consume the next whitespace-delimited word and its starting line.
    pub(super) fn word(&mut self) -> Option<(String, usize)> {
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        let line = self.line;
        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        Some((self.advance(len).to_string(), line))
    }

    /// Consume a `macdef` body: everything up to and including the first
    /// blank line, or the rest of the input. A line holding only `\r`
    /// counts as blank.
    pub(super) fn macro_body(&mut self) -> String {
        let rest = self.rest();
        let mut len = rest.len();
        let mut offset = 0;
        while let Some(nl) = rest[offset..].find('\n') {
            let line_start = offset + nl + 1;
            let Some(line_len) = rest[line_start..].find('\n') else {
                break;
            };
            let line_end = line_start + line_len;
            if rest[line_start..line_end].trim_end_matches('\r').is_empty() {
                len = line_end + 1;
                break;
            }
            offset = line_start;
        }
        self.advance(len).to_string()
    }
}
