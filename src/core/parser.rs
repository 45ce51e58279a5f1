//! Parser for the Paradox descriptor dialect.
//!
//! Descriptors are line-oriented: `key=value` pairs, bare values, and
//! `key={` blocks nesting either kind until a closing `}`. A block holds
//! pairs or bare values, never both; the shape is committed by its first
//! statement. Quote characters are stripped from every token wherever they
//! appear, not just at the edges, matching what the launcher accepts.

use std::io::BufRead;

use crate::models::error::Error;

/// A value parsed from the dialect: a bare string, an ordered list, or an
/// ordered key/value table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Text(String),
    List(Vec<ConfigValue>),
    Table(Vec<(String, ConfigValue)>),
}

impl ConfigValue {
    /// Looks a key up in a table value. Anything else has no keys.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        match self {
            ConfigValue::Table(pairs) => {
                pairs.iter().find(|(k, _)| k == key).map(|(_, value)| value)
            }
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Parses an in-memory descriptor. Empty input parses to `None`.
pub fn parse(input: &str) -> Result<Option<ConfigValue>, Error> {
    parse_reader(input.as_bytes())
}

/// Parses a descriptor from any line source (a file, a zip entry). The
/// reader is consumed as one forward stream: nested blocks resume exactly
/// where the enclosing scope left off.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Option<ConfigValue>, Error> {
    let mut lines = LineCursor { reader, lineno: 0 };
    parse_scope(&mut lines)
}

/// One shared cursor over the input, so line numbers stay absolute across
/// recursive scope parses.
struct LineCursor<R> {
    reader: R,
    lineno: usize,
}

impl<R: BufRead> LineCursor<R> {
    fn next_line(&mut self) -> Result<Option<String>, Error> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.lineno += 1;
        Ok(Some(buf.trim().to_owned()))
    }
}

/// Accumulator for one scope: undecided until the first statement commits
/// it to a table or a list.
enum Scope {
    Unset,
    Table(Vec<(String, ConfigValue)>),
    List(Vec<ConfigValue>),
}

impl Scope {
    fn finish(self) -> Option<ConfigValue> {
        match self {
            Scope::Unset => None,
            Scope::Table(pairs) => Some(ConfigValue::Table(pairs)),
            Scope::List(items) => Some(ConfigValue::List(items)),
        }
    }
}

const PAIR_IN_LIST: &str = "mixes a key=value pair into a value list";
const ATOM_IN_TABLE: &str = "mixes a bare value into a key=value block";

fn parse_scope<R: BufRead>(lines: &mut LineCursor<R>) -> Result<Option<ConfigValue>, Error> {
    let mut scope = Scope::Unset;

    while let Some(line) = lines.next_line()? {
        if line == "}" {
            break;
        } else if line.contains("={") {
            let (key, _) = line.split_once('=').unwrap_or((line.as_str(), ""));
            let key = strip_quotes(key);
            // Commit the shape before descending so the error, if any,
            // names the `key={` line rather than something inside the block.
            scope = match scope {
                Scope::Unset => Scope::Table(Vec::new()),
                Scope::List(_) => return Err(malformed(lines.lineno, PAIR_IN_LIST)),
                table => table,
            };
            let value = parse_scope(lines)?.unwrap_or_else(|| ConfigValue::Table(Vec::new()));
            scope = add_pair(scope, key, value, lines.lineno)?;
        } else if let Some((key, value)) = line.split_once('=') {
            let value = ConfigValue::Text(strip_quotes(value));
            scope = add_pair(scope, strip_quotes(key), value, lines.lineno)?;
        } else if !line.is_empty() {
            scope = add_atom(scope, ConfigValue::Text(strip_quotes(&line)), lines.lineno)?;
        } else {
            return Err(malformed(lines.lineno, "could not be parsed"));
        }
    }

    Ok(scope.finish())
}

fn add_pair(scope: Scope, key: String, value: ConfigValue, lineno: usize) -> Result<Scope, Error> {
    match scope {
        Scope::Unset => Ok(Scope::Table(vec![(key, value)])),
        Scope::Table(mut pairs) => {
            // A repeated key rebinds rather than duplicating.
            if let Some(slot) = pairs.iter_mut().find(|(existing, _)| *existing == key) {
                slot.1 = value;
            } else {
                pairs.push((key, value));
            }
            Ok(Scope::Table(pairs))
        }
        Scope::List(_) => Err(malformed(lineno, PAIR_IN_LIST)),
    }
}

fn add_atom(scope: Scope, atom: ConfigValue, lineno: usize) -> Result<Scope, Error> {
    match scope {
        Scope::Unset => Ok(Scope::List(vec![atom])),
        Scope::List(mut items) => {
            items.push(atom);
            Ok(Scope::List(items))
        }
        Scope::Table(_) => Err(malformed(lineno, ATOM_IN_TABLE)),
    }
}

/// Removes every quote character from a token. The dialect has no
/// escaping; embedded quotes are dropped too.
fn strip_quotes(token: &str) -> String {
    token.chars().filter(|c| !matches!(c, '\'' | '"')).collect()
}

fn malformed(line: usize, reason: &str) -> Error {
    Error::MalformedDescriptor {
        line,
        reason: reason.to_owned(),
    }
}
