//! Credential file format (`.netrc`).
//!
//! The file is kept as a sequence of tokens, each carrying the whitespace and
//! comments that preceded it. Serializing concatenates them back, so a parse
//! followed by a render is byte-identical and edits only touch the tokens of
//! the record being changed.
//!
//! # Example
//!
//! ```
//! use hk::netrc::Netrc;
//!
//! let src = "machine api.heroku.com\n  login me@example.com\n  password token\n";
//! let mut netrc = Netrc::parse(src).unwrap();
//! assert_eq!(netrc.to_string(), src);
//!
//! let m = netrc.find_machine("api.heroku.com").unwrap();
//! assert_eq!(m.login.as_deref(), Some("me@example.com"));
//!
//! netrc.set_credentials("git.heroku.com", "me@example.com", "token").unwrap();
//! assert_eq!(netrc.machines().len(), 2);
//! ```

mod lexer;

use std::fmt;

use thiserror::Error;

use lexer::Lexer;

/// Error produced when the credential file cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 1-based line of the offending token.
    pub line: usize,
    /// Description of the problem.
    pub message: String,
}

/// Error produced when a value cannot be written into the file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} value")]
pub struct InvalidValue {
    /// Field that was rejected.
    pub field: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Machine,
    Default,
    Login,
    Password,
    Account,
    Port,
    Macdef,
    Value,
    MacroBody,
}

impl TokenKind {
    fn keyword(word: &str) -> Option<Self> {
        match word {
            "machine" => Some(Self::Machine),
            "default" => Some(Self::Default),
            "login" => Some(Self::Login),
            "password" => Some(Self::Password),
            "account" => Some(Self::Account),
            "port" => Some(Self::Port),
            "macdef" => Some(Self::Macdef),
            _ => None,
        }
    }

    fn is_field(self) -> bool {
        matches!(
            self,
            Self::Login | Self::Password | Self::Account | Self::Port
        )
    }
}

#[derive(Debug, Clone)]
struct Token {
    leading: String,
    text: String,
    kind: TokenKind,
}

impl Token {
    fn new(leading: &str, text: &str, kind: TokenKind) -> Self {
        Self {
            leading: leading.to_string(),
            text: text.to_string(),
            kind,
        }
    }
}

/// Token positions of one `machine` or `default` record.
#[derive(Debug, Clone, Default)]
struct Entry {
    start: usize,
    end: usize,
    name: Option<usize>,
    login: Option<usize>,
    password: Option<usize>,
    account: Option<usize>,
}

/// A single credential record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    /// Host name; `None` for the `default` record.
    pub name: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub account: Option<String>,
}

impl Machine {
    /// Whether this is the `default` record that matches any host.
    pub fn is_default(&self) -> bool {
        self.name.is_none()
    }
}

/// A parsed credential file.
#[derive(Debug, Clone, Default)]
pub struct Netrc {
    tokens: Vec<Token>,
    trailing: String,
    entries: Vec<Entry>,
}

impl Netrc {
    /// Parse credential file contents.
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(src);
        let mut tokens: Vec<Token> = Vec::new();
        let mut in_entry = false;

        let trailing = loop {
            let leading = lexer.skip_trivia();
            let Some((word, line)) = lexer.word() else {
                break leading;
            };

            let Some(kind) = TokenKind::keyword(&word) else {
                return Err(ParseError {
                    line,
                    message: format!("unexpected token '{word}'"),
                });
            };

            if kind.is_field() && !in_entry {
                return Err(ParseError {
                    line,
                    message: format!("'{word}' outside of a machine entry"),
                });
            }

            tokens.push(Token::new(&leading, &word, kind));

            match kind {
                TokenKind::Default => {
                    in_entry = true;
                    continue;
                }
                TokenKind::Machine => in_entry = true,
                TokenKind::Macdef => in_entry = false,
                _ => {}
            }

            let value_leading = lexer.skip_trivia();
            let Some((value, _)) = lexer.word() else {
                return Err(ParseError {
                    line,
                    message: format!("expected value after '{word}'"),
                });
            };
            tokens.push(Token::new(&value_leading, &value, TokenKind::Value));

            if kind == TokenKind::Macdef {
                let body = lexer.macro_body();
                tokens.push(Token::new("", &body, TokenKind::MacroBody));
            }
        };

        let entries = index(&tokens);
        Ok(Self {
            tokens,
            trailing,
            entries,
        })
    }

    /// All `machine` and `default` records in file order.
    pub fn machines(&self) -> Vec<Machine> {
        self.entries.iter().map(|e| self.machine_at(e)).collect()
    }

    /// Find the record for `host`, falling back to the `default` record.
    pub fn find_machine(&self, host: &str) -> Option<Machine> {
        self.concrete_entry(host)
            .or_else(|| self.entries.iter().position(|e| e.name.is_none()))
            .map(|i| self.machine_at(&self.entries[i]))
    }

    /// Set login and password for `host`.
    ///
    /// Updates the first record for `host` in place and drops any later
    /// duplicates. When there is none, a new record is inserted ahead of any
    /// `default` record, which itself is never modified.
    pub fn set_credentials(
        &mut self,
        host: &str,
        login: &str,
        password: &str,
    ) -> Result<(), InvalidValue> {
        validate("host", host)?;
        validate("login", login)?;
        validate("password", password)?;

        match self.concrete_entry(host) {
            Some(i) => {
                self.set_field(i, TokenKind::Login, login);
                self.set_field(i, TokenKind::Password, password);
                self.remove_records(host, 1);
            }
            None => self.insert_machine(host, login, password),
        }
        Ok(())
    }

    /// Remove every record for `host`. Returns whether anything was removed.
    pub fn remove_machine(&mut self, host: &str) -> bool {
        self.remove_records(host, 0)
    }

    /// Remove the records for `host` after the first `keep` of them.
    fn remove_records(&mut self, host: &str, keep: usize) -> bool {
        let ranges: Vec<(usize, usize)> = self
            .entries
            .iter()
            .filter(|e| self.entry_name(e) == Some(host))
            .skip(keep)
            .map(|e| (e.start, e.end))
            .collect();
        if ranges.is_empty() {
            return false;
        }

        for &(start, end) in ranges.iter().rev() {
            if end < self.tokens.len() && !self.tokens[end].leading.contains('#') {
                self.tokens[end].leading = self.tokens[start].leading.clone();
            }
            self.tokens.drain(start..end);
        }

        self.entries = index(&self.tokens);
        true
    }

    fn entry_name(&self, entry: &Entry) -> Option<&str> {
        entry.name.map(|i| self.tokens[i].text.as_str())
    }

    fn concrete_entry(&self, host: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| self.entry_name(e) == Some(host))
    }

    fn machine_at(&self, entry: &Entry) -> Machine {
        let text = |i: Option<usize>| i.map(|i| self.tokens[i].text.clone());
        Machine {
            name: text(entry.name),
            login: text(entry.login),
            password: text(entry.password),
            account: text(entry.account),
        }
    }

    fn set_field(&mut self, entry: usize, kind: TokenKind, value: &str) {
        let current = match kind {
            TokenKind::Login => self.entries[entry].login,
            TokenKind::Password => self.entries[entry].password,
            _ => self.entries[entry].account,
        };

        if let Some(i) = current {
            self.tokens[i].text = value.to_string();
            return;
        }

        // Missing field: append it to the end of the record.
        let at = self.entries[entry].end;
        let keyword = match kind {
            TokenKind::Login => "login",
            TokenKind::Password => "password",
            _ => "account",
        };
        self.tokens.splice(
            at..at,
            [
                Token::new("\n  ", keyword, kind),
                Token::new(" ", value, TokenKind::Value),
            ],
        );
        self.entries = index(&self.tokens);
    }

    fn insert_machine(&mut self, host: &str, login: &str, password: &str) {
        let default_start = self
            .entries
            .iter()
            .find(|e| e.name.is_none())
            .map(|e| e.start);

        let at = default_start.unwrap_or(self.tokens.len());
        let leading = match default_start {
            // The new record takes over whatever preceded `default` at file start.
            Some(0) => std::mem::take(&mut self.tokens[0].leading),
            Some(_) => "\n".to_string(),
            None => {
                let trailing = std::mem::replace(&mut self.trailing, "\n".to_string());
                if !trailing.is_empty() && !trailing.ends_with('\n') {
                    trailing + "\n"
                } else if trailing.is_empty() && !self.tokens.is_empty() {
                    "\n".to_string()
                } else {
                    trailing
                }
            }
        };
        if at < self.tokens.len() && self.tokens[at].leading.is_empty() {
            self.tokens[at].leading = "\n".to_string();
        }

        self.tokens.splice(
            at..at,
            [
                Token::new(&leading, "machine", TokenKind::Machine),
                Token::new(" ", host, TokenKind::Value),
                Token::new("\n  ", "login", TokenKind::Login),
                Token::new(" ", login, TokenKind::Value),
                Token::new("\n  ", "password", TokenKind::Password),
                Token::new(" ", password, TokenKind::Value),
            ],
        );
        self.entries = index(&self.tokens);
    }
}

impl fmt::Display for Netrc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str(&token.leading)?;
            f.write_str(&token.text)?;
        }
        f.write_str(&self.trailing)
    }
}

fn validate(field: &'static str, value: &str) -> Result<(), InvalidValue> {
    if value.is_empty() || value.starts_with('#') || value.chars().any(char::is_whitespace) {
        return Err(InvalidValue { field });
    }
    Ok(())
}

/// Derive record boundaries from a well-formed token stream.
fn index(tokens: &[Token]) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut current: Option<Entry> = None;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Machine | TokenKind::Default | TokenKind::Macdef => {
                if let Some(mut entry) = current.take() {
                    entry.end = i;
                    entries.push(entry);
                }
                current = match token.kind {
                    TokenKind::Machine => Some(Entry {
                        start: i,
                        name: Some(i + 1),
                        ..Default::default()
                    }),
                    TokenKind::Default => Some(Entry {
                        start: i,
                        ..Default::default()
                    }),
                    _ => None,
                };
            }
            TokenKind::Login | TokenKind::Password | TokenKind::Account => {
                if let Some(entry) = current.as_mut() {
                    let slot = match token.kind {
                        TokenKind::Login => &mut entry.login,
                        TokenKind::Password => &mut entry.password,
                        _ => &mut entry.account,
                    };
                    *slot = Some(i + 1);
                }
            }
            TokenKind::Port | TokenKind::Value | TokenKind::MacroBody => {}
        }
    }

    if let Some(mut entry) = current {
        entry.end = tokens.len();
        entries.push(entry);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# heroku credentials\n\
machine api.heroku.com\n  login a@example.com\n  password tok-a\n\
machine code.heroku.com login a@example.com password tok-b # inline\n\
\n\
macdef init\ncd /pub\nbinary\n\n\
default\n  login anonymous\n  password guest\n";

    #[test]
    fn round_trip_is_byte_identical() {
        let netrc = Netrc::parse(SAMPLE).unwrap();
        assert_eq!(netrc.to_string(), SAMPLE);
    }

    #[test]
    fn round_trip_preserves_odd_spacing_and_missing_newline() {
        let src = "\t machine  h1\tlogin x   password y\n\n\nmachine h2 login z password w";
        let netrc = Netrc::parse(src).unwrap();
        assert_eq!(netrc.to_string(), src);
    }

    #[test]
    fn empty_file_parses() {
        let netrc = Netrc::parse("").unwrap();
        assert!(netrc.machines().is_empty());
        assert_eq!(netrc.to_string(), "");
    }

    #[test]
    fn lists_machines_in_order() {
        let netrc = Netrc::parse(SAMPLE).unwrap();
        let names: Vec<_> = netrc.machines().into_iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec![
                Some("api.heroku.com".to_string()),
                Some("code.heroku.com".to_string()),
                None
            ]
        );
    }

    #[test]
    fn find_machine_exact_match() {
        let netrc = Netrc::parse(SAMPLE).unwrap();
        let m = netrc.find_machine("code.heroku.com").unwrap();
        assert_eq!(m.password.as_deref(), Some("tok-b"));
    }

    #[test]
    fn find_machine_falls_back_to_default() {
        let netrc = Netrc::parse(SAMPLE).unwrap();
        let m = netrc.find_machine("elsewhere.example.com").unwrap();
        assert!(m.is_default());
        assert_eq!(m.login.as_deref(), Some("anonymous"));
    }

    #[test]
    fn find_machine_none_without_default() {
        let netrc = Netrc::parse("machine a login b password c\n").unwrap();
        assert!(netrc.find_machine("z").is_none());
    }

    #[test]
    fn account_is_parsed() {
        let netrc = Netrc::parse("machine a login b password c account d\n").unwrap();
        let m = netrc.find_machine("a").unwrap();
        assert_eq!(m.account.as_deref(), Some("d"));
    }

    #[test]
    fn update_existing_touches_only_that_record() {
        let mut netrc = Netrc::parse(SAMPLE).unwrap();
        netrc
            .set_credentials("api.heroku.com", "b@example.com", "tok-new")
            .unwrap();

        let expected = SAMPLE
            .replace("login a@example.com\n  password tok-a", "login b@example.com\n  password tok-new");
        assert_eq!(netrc.to_string(), expected);
    }

    #[test]
    fn new_host_is_inserted_before_default_which_is_untouched() {
        let mut netrc = Netrc::parse(SAMPLE).unwrap();
        netrc
            .set_credentials("git.heroku.com", "c@example.com", "tok-c")
            .unwrap();

        let machines = netrc.machines();
        assert_eq!(machines.len(), 4);
        assert_eq!(machines[2].name.as_deref(), Some("git.heroku.com"));
        assert_eq!(machines[2].login.as_deref(), Some("c@example.com"));
        assert!(machines[3].is_default());
        assert_eq!(machines[3].login.as_deref(), Some("anonymous"));
        assert_eq!(machines[3].password.as_deref(), Some("guest"));

        let out = netrc.to_string();
        assert!(out.starts_with(&SAMPLE[..SAMPLE.find("default").unwrap()]));
        assert!(out.ends_with("machine git.heroku.com\n  login c@example.com\n  password tok-c\ndefault\n  login anonymous\n  password guest\n"));
    }

    #[test]
    fn new_host_before_default_at_file_start() {
        let mut netrc = Netrc::parse("default login anonymous password guest\n").unwrap();
        netrc.set_credentials("h", "l", "p").unwrap();
        assert_eq!(
            netrc.to_string(),
            "machine h\n  login l\n  password p\ndefault login anonymous password guest\n"
        );
    }

    #[test]
    fn new_host_appended_to_empty_file() {
        let mut netrc = Netrc::parse("").unwrap();
        netrc.set_credentials("h", "l", "p").unwrap();
        assert_eq!(netrc.to_string(), "machine h\n  login l\n  password p\n");
    }

    #[test]
    fn new_host_appended_after_trailing_comment() {
        let src = "machine a login b password c\n# keep me\n";
        let mut netrc = Netrc::parse(src).unwrap();
        netrc.set_credentials("h", "l", "p").unwrap();
        assert_eq!(
            netrc.to_string(),
            "machine a login b password c\n# keep me\nmachine h\n  login l\n  password p\n"
        );
    }

    #[test]
    fn missing_fields_are_added_to_existing_record() {
        let mut netrc = Netrc::parse("machine h\n").unwrap();
        netrc.set_credentials("h", "l", "p").unwrap();
        let m = netrc.find_machine("h").unwrap();
        assert_eq!(m.login.as_deref(), Some("l"));
        assert_eq!(m.password.as_deref(), Some("p"));
        assert_eq!(netrc.machines().len(), 1);
        assert_eq!(Netrc::parse(&netrc.to_string()).unwrap().machines(), netrc.machines());
    }

    #[test]
    fn upsert_twice_keeps_single_record() {
        let mut netrc = Netrc::parse("").unwrap();
        netrc.set_credentials("h", "l1", "p1").unwrap();
        netrc.set_credentials("h", "l2", "p2").unwrap();
        let machines = netrc.machines();
        assert_eq!(machines.len(), 1);
        assert_eq!(machines[0].login.as_deref(), Some("l2"));
    }

    #[test]
    fn upsert_collapses_duplicate_host_records() {
        let src = "machine h login a password 1\nmachine other login o password o\nmachine h login b password 2\n";
        let mut netrc = Netrc::parse(src).unwrap();
        netrc.set_credentials("h", "new", "tok").unwrap();

        let hosts: Vec<Option<String>> = netrc.machines().into_iter().map(|m| m.name).collect();
        assert_eq!(hosts, [Some("h".to_string()), Some("other".to_string())]);
        let m = netrc.find_machine("h").unwrap();
        assert_eq!(m.login.as_deref(), Some("new"));
        assert_eq!(m.password.as_deref(), Some("tok"));
        assert_eq!(
            netrc.to_string(),
            "machine h login new password tok\nmachine other login o password o\n"
        );
    }

    #[test]
    fn rejects_values_that_cannot_round_trip() {
        let mut netrc = Netrc::parse("").unwrap();
        assert_eq!(
            netrc.set_credentials("h", "has space", "p"),
            Err(InvalidValue { field: "login" })
        );
        assert_eq!(
            netrc.set_credentials("h", "l", ""),
            Err(InvalidValue { field: "password" })
        );
        assert_eq!(
            netrc.set_credentials("h", "l", "#secret"),
            Err(InvalidValue { field: "password" })
        );
        assert!(netrc.machines().is_empty());
    }

    #[test]
    fn remove_middle_record() {
        let src = "machine a login 1 password 1\nmachine b login 2 password 2\nmachine c login 3 password 3\n";
        let mut netrc = Netrc::parse(src).unwrap();
        assert!(netrc.remove_machine("b"));
        assert_eq!(
            netrc.to_string(),
            "machine a login 1 password 1\nmachine c login 3 password 3\n"
        );
    }

    #[test]
    fn remove_first_record_does_not_leave_blank_line() {
        let src = "machine a login 1 password 1\nmachine b login 2 password 2\n";
        let mut netrc = Netrc::parse(src).unwrap();
        assert!(netrc.remove_machine("a"));
        assert_eq!(netrc.to_string(), "machine b login 2 password 2\n");
    }

    #[test]
    fn remove_never_matches_default() {
        let mut netrc = Netrc::parse(SAMPLE).unwrap();
        assert!(!netrc.remove_machine("anonymous"));
        assert_eq!(netrc.to_string(), SAMPLE);
    }

    #[test]
    fn remove_unknown_host_is_noop() {
        let mut netrc = Netrc::parse(SAMPLE).unwrap();
        assert!(!netrc.remove_machine("nope"));
        assert_eq!(netrc.to_string(), SAMPLE);
    }

    #[test]
    fn macdef_body_is_preserved_and_ends_entry() {
        let src = "machine a login b\nmacdef init\nlogin inside macro\n\npassword x\n";
        let err = Netrc::parse(src).unwrap_err();
        assert_eq!(err.line, 5);

        let src = "machine a login b password c\nmacdef init\nlogin inside macro\n\n";
        let netrc = Netrc::parse(src).unwrap();
        assert_eq!(netrc.to_string(), src);
        assert_eq!(netrc.machines().len(), 1);
    }

    #[test]
    fn crlf_macdef_does_not_swallow_later_records() {
        let src = "machine a login l password p\r\nmacdef init\r\ncd /pub\r\n\r\nmachine h login x password y\r\n";
        let netrc = Netrc::parse(src).unwrap();
        assert_eq!(netrc.to_string(), src);

        let hosts: Vec<Option<String>> = netrc.machines().into_iter().map(|m| m.name).collect();
        assert_eq!(hosts, [Some("a".to_string()), Some("h".to_string())]);
        assert_eq!(netrc.find_machine("h").unwrap().password.as_deref(), Some("y"));
    }

    #[test]
    fn unknown_keyword_is_a_parse_error_with_line() {
        let err = Netrc::parse("machine a\n  login b\n  passwd c\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("passwd"));
    }

    #[test]
    fn missing_value_is_a_parse_error() {
        let err = Netrc::parse("machine a login").unwrap_err();
        assert!(err.message.contains("expected value after 'login'"));
    }

    #[test]
    fn field_before_machine_is_a_parse_error() {
        let err = Netrc::parse("login x\n").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn comment_hash_inside_token_is_literal() {
        let netrc = Netrc::parse("machine a login b password p#q\n").unwrap();
        let m = netrc.find_machine("a").unwrap();
        assert_eq!(m.password.as_deref(), Some("p#q"));
    }
}
