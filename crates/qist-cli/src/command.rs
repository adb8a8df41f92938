use qist_core::types::{EntityId, Timestamp};
use std::{fmt, path::PathBuf, str::FromStr};
use thiserror::Error as ThisError;

///
/// ParseError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("unknown collection '{0}' (products, plans, branches, carts, queries)")]
    UnknownKind(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("expected field=value, got '{0}'")]
    BadAssignment(String),

    #[error("invalid id: {0}")]
    BadId(String),

    #[error("invalid date: {0}")]
    BadDate(String),

    #[error("unterminated quote")]
    UnterminatedQuote,
}

///
/// Kind
/// Collection a command targets.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Product,
    Plan,
    Branch,
    Cart,
    Query,
}

impl FromStr for Kind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "product" | "products" => Ok(Self::Product),
            "plan" | "plans" | "installment-plans" => Ok(Self::Plan),
            "branch" | "branches" => Ok(Self::Branch),
            "cart" | "carts" | "order" | "orders" => Ok(Self::Cart),
            "query" | "queries" => Ok(Self::Query),
            _ => Err(ParseError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Product => "product",
            Self::Plan => "plan",
            Self::Branch => "branch",
            Self::Cart => "cart",
            Self::Query => "query",
        };
        write!(f, "{label}")
    }
}

///
/// Command
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Login { username: String, password: String },
    Logout,
    Whoami,
    Profile { name: String, email: String },
    Password { old: String, new: String, confirm: String },
    List {
        kind: Kind,
        query: String,
        status: Option<String>,
        since: Option<Timestamp>,
    },
    Add { kind: Kind, fields: Vec<(String, String)> },
    Edit { kind: Kind, id: EntityId, fields: Vec<(String, String)> },
    Delete { kind: Kind, id: EntityId },
    Upload { id: EntityId, path: PathBuf },
    Process(EntityId),
    Resolve(EntityId),
    Plans(EntityId),
    Summary,
    Metrics,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  login <username> <password>       start a session
  logout | whoami
  profile <name> <email>            update the signed-in user
  password <old> <new> <confirm>    check a password change
  list <kind> [status=s] [since=date] [query]
                                    filtered listing
  add <kind> field=value...         create via the form rules
  edit <kind> <id> field=value...   update via the form rules
  delete <kind> <id>                asks for confirmation
  upload <product-id> <file>        attach an image file to a product
  process <cart-id>                 pending -> processed
  resolve <query-id>                open -> resolved
  plans <product-id>                installment plans a product offers
  summary | metrics | help | quit
kinds: products, plans, branches, carts, queries";

impl Command {
    /// Parse one shell line. `Ok(None)` for blank input.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let tokens = tokenize(line)?;
        let Some((head, rest)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "login" => match rest {
                [username, password] => Self::Login {
                    username: username.clone(),
                    password: password.clone(),
                },
                _ => return Err(ParseError::Usage("login <username> <password>")),
            },
            "logout" => Self::Logout,
            "whoami" => Self::Whoami,
            "profile" => match rest {
                [name, email] => Self::Profile {
                    name: name.clone(),
                    email: email.clone(),
                },
                _ => return Err(ParseError::Usage("profile <name> <email>")),
            },
            "password" => match rest {
                [old, new, confirm] => Self::Password {
                    old: old.clone(),
                    new: new.clone(),
                    confirm: confirm.clone(),
                },
                _ => return Err(ParseError::Usage("password <old> <new> <confirm>")),
            },
            "list" | "ls" => match rest {
                [kind, words @ ..] => list(kind, words)?,
                [] => return Err(ParseError::Usage("list <kind> [query]")),
            },
            "add" => match rest {
                [kind, fields @ ..] => Self::Add {
                    kind: kind.parse()?,
                    fields: assignments(fields)?,
                },
                [] => return Err(ParseError::Usage("add <kind> field=value...")),
            },
            "edit" => match rest {
                [kind, id, fields @ ..] => Self::Edit {
                    kind: kind.parse()?,
                    id: parse_id(id)?,
                    fields: assignments(fields)?,
                },
                _ => return Err(ParseError::Usage("edit <kind> <id> field=value...")),
            },
            "delete" | "rm" => match rest {
                [kind, id] => Self::Delete {
                    kind: kind.parse()?,
                    id: parse_id(id)?,
                },
                _ => return Err(ParseError::Usage("delete <kind> <id>")),
            },
            "upload" => match rest {
                [id, path] => Self::Upload {
                    id: parse_id(id)?,
                    path: PathBuf::from(path),
                },
                _ => return Err(ParseError::Usage("upload <product-id> <file>")),
            },
            "process" => Self::Process(single_id(rest, "process <cart-id>")?),
            "resolve" => Self::Resolve(single_id(rest, "resolve <query-id>")?),
            "plans" => Self::Plans(single_id(rest, "plans <product-id>")?),
            "summary" | "dashboard" => Self::Summary,
            "metrics" => Self::Metrics,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

// `status=` and `since=` words are filters; the rest is the search text.
fn list(kind: &str, words: &[String]) -> Result<Command, ParseError> {
    let mut status = None;
    let mut since = None;
    let mut query = Vec::new();

    for word in words {
        if let Some(value) = word.strip_prefix("status=") {
            status = Some(value.to_string());
        } else if let Some(value) = word.strip_prefix("since=") {
            let at = Timestamp::parse_flexible(value)
                .map_err(|err| ParseError::BadDate(err.to_string()))?;
            since = Some(at);
        } else {
            query.push(word.as_str());
        }
    }

    Ok(Command::List {
        kind: kind.parse()?,
        query: query.join(" "),
        status,
        since,
    })
}

fn parse_id(token: &str) -> Result<EntityId, ParseError> {
    token
        .parse()
        .map_err(|err: qist_core::types::EntityIdError| ParseError::BadId(err.to_string()))
}

fn single_id(rest: &[String], usage: &'static str) -> Result<EntityId, ParseError> {
    match rest {
        [id] => parse_id(id),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn assignments(tokens: &[String]) -> Result<Vec<(String, String)>, ParseError> {
    tokens
        .iter()
        .map(|token| {
            token
                .split_once('=')
                .filter(|(field, _)| !field.is_empty())
                .map(|(field, value)| (field.to_string(), value.to_string()))
                .ok_or_else(|| ParseError::BadAssignment(token.clone()))
        })
        .collect()
}

/// Split on whitespace; double quotes group, and may appear mid-token
/// (`name="Smart Watch"`).
fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(ParseError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> EntityId {
        EntityId::new(n).unwrap()
    }

    #[test]
    fn tokenizer_groups_quotes() {
        assert_eq!(
            tokenize(r#"add product name="Smart Watch" price=199"#).unwrap(),
            ["add", "product", "name=Smart Watch", "price=199"]
        );
        assert_eq!(tokenize(r#"x """#).unwrap(), ["x", ""]);
        assert_eq!(tokenize("   ").unwrap(), Vec::<String>::new());
        assert_eq!(tokenize(r#"say "hi"#), Err(ParseError::UnterminatedQuote));
    }

    #[test]
    fn blank_line_is_no_command() {
        assert_eq!(Command::parse("").unwrap(), None);
    }

    #[test]
    fn list_joins_the_remaining_words() {
        assert_eq!(
            Command::parse("list carts ahmed hassan").unwrap(),
            Some(Command::List {
                kind: Kind::Cart,
                query: "ahmed hassan".into(),
                status: None,
                since: None,
            })
        );
        assert_eq!(
            Command::parse("ls plans").unwrap(),
            Some(Command::List {
                kind: Kind::Plan,
                query: String::new(),
                status: None,
                since: None,
            })
        );
    }

    #[test]
    fn list_pulls_out_status_and_date_filters() {
        assert_eq!(
            Command::parse("list carts status=pending fatima since=2025-01-16").unwrap(),
            Some(Command::List {
                kind: Kind::Cart,
                query: "fatima".into(),
                status: Some("pending".into()),
                since: Some(Timestamp::from_seconds(1_736_985_600)),
            })
        );
        assert!(matches!(
            Command::parse("list queries since=yesterday"),
            Err(ParseError::BadDate(_))
        ));
    }

    #[test]
    fn edit_parses_id_and_assignments() {
        let command = Command::parse("edit branch 2 phone=+966-13-0 mapLink=").unwrap();

        assert_eq!(
            command,
            Some(Command::Edit {
                kind: Kind::Branch,
                id: id(2),
                fields: vec![
                    ("phone".into(), "+966-13-0".into()),
                    ("mapLink".into(), String::new()),
                ],
            })
        );
    }

    #[test]
    fn malformed_input_is_reported() {
        assert!(matches!(
            Command::parse("frobnicate"),
            Err(ParseError::UnknownCommand(_))
        ));
        assert!(matches!(
            Command::parse("list widgets"),
            Err(ParseError::UnknownKind(_))
        ));
        assert!(matches!(
            Command::parse("process 0"),
            Err(ParseError::BadId(_))
        ));
        assert!(matches!(
            Command::parse("add product price"),
            Err(ParseError::BadAssignment(_))
        ));
        assert!(matches!(Command::parse("login admin"), Err(ParseError::Usage(_))));
    }
}
