//! Built-in dotted-path evaluator.
//!
//! Grammar, after trimming surrounding whitespace:
//!
//! ```text
//! expression := field ( "." field | "[" index "]" )*
//! field      := identifier | '"' quoted '"'
//! identifier := [A-Za-z_] [A-Za-z0-9_]*
//! index      := "-"? [0-9]+
//! ```
//!
//! Quoted identifiers accept `\"` and `\\` escapes. Negative indices count
//! from the end of the sequence.

use std::iter::Peekable;
use std::str::CharIndices;

use serde_json::{Map, Value};

use super::{QueryError, QueryEvaluator};

/// Evaluator for dotted paths with sequence indices, such as `Hello.World`,
/// `Hello[1]`, or `"my-key".items[-1]`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stratum::{PathQuery, QueryEvaluator};
///
/// let scope = json!({"Hello": {"World": [1, 2, 3]}});
/// let scope = scope.as_object().cloned().unwrap_or_default();
/// let found = PathQuery.evaluate("Hello.World[-1]", &scope)?;
/// assert_eq!(found, Some(json!(3)));
/// assert_eq!(PathQuery.evaluate("Hello.Missing", &scope)?, None);
/// # Ok::<_, stratum::QueryError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct PathQuery;

impl QueryEvaluator for PathQuery {
    fn evaluate(
        &self,
        expression: &str,
        scope: &Map<String, Value>,
    ) -> Result<Option<Value>, QueryError> {
        let segments = parse(expression)?;
        Ok(lookup(scope, &segments).cloned())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(i64),
}

fn parse(expression: &str) -> Result<Vec<Segment>, QueryError> {
    let mut parser = Parser::new(expression.trim());
    let mut segments = vec![parser.field()?];
    while let Some((offset, ch)) = parser.chars.next() {
        match ch {
            '.' => segments.push(parser.field()?),
            '[' => segments.push(parser.index()?),
            found => return Err(QueryError::UnexpectedCharacter { found, offset }),
        }
    }
    Ok(segments)
}

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl<'a> Parser<'a> {
    fn new(expression: &'a str) -> Self {
        Self {
            chars: expression.char_indices().peekable(),
            len: expression.len(),
        }
    }

    fn field(&mut self) -> Result<Segment, QueryError> {
        match self.chars.peek().copied() {
            None => Err(QueryError::UnexpectedEnd { offset: self.len }),
            Some((offset, '"')) => {
                self.chars.next();
                self.quoted(offset)
            }
            Some((_, ch)) if ch.is_ascii_alphabetic() || ch == '_' => Ok(self.identifier()),
            Some((offset, found)) => Err(QueryError::UnexpectedCharacter { found, offset }),
        }
    }

    fn identifier(&mut self) -> Segment {
        let mut name = String::new();
        while let Some((_, ch)) = self
            .chars
            .next_if(|(_, ch)| ch.is_ascii_alphanumeric() || *ch == '_')
        {
            name.push(ch);
        }
        Segment::Field(name)
    }

    fn quoted(&mut self, start: usize) -> Result<Segment, QueryError> {
        let mut name = String::new();
        while let Some((_, ch)) = self.chars.next() {
            match ch {
                '"' => return Ok(Segment::Field(name)),
                '\\' => match self.chars.next() {
                    Some((_, escaped)) => name.push(escaped),
                    None => break,
                },
                other => name.push(other),
            }
        }
        Err(QueryError::UnterminatedQuote { offset: start })
    }

    fn index(&mut self) -> Result<Segment, QueryError> {
        let mut text = String::new();
        if let Some((_, sign)) = self.chars.next_if(|(_, ch)| *ch == '-') {
            text.push(sign);
        }
        while let Some((_, digit)) = self.chars.next_if(|(_, ch)| ch.is_ascii_digit()) {
            text.push(digit);
        }
        match self.chars.next() {
            Some((_, ']')) => {}
            Some((offset, found)) => {
                return Err(QueryError::UnexpectedCharacter { found, offset });
            }
            None => return Err(QueryError::UnexpectedEnd { offset: self.len }),
        }
        text.parse::<i64>()
            .map(Segment::Index)
            .map_err(|_| QueryError::InvalidIndex { text })
    }
}

fn lookup<'v>(scope: &'v Map<String, Value>, segments: &[Segment]) -> Option<&'v Value> {
    let (first, rest) = segments.split_first()?;
    let Segment::Field(name) = first else {
        return None;
    };
    let mut current = scope.get(name)?;
    for segment in rest {
        current = match segment {
            Segment::Field(field) => current.as_object()?.get(field)?,
            Segment::Index(position) => element(current.as_array()?, *position)?,
        };
    }
    Some(current)
}

fn element(items: &[Value], position: i64) -> Option<&Value> {
    let resolved = if position < 0 {
        let back = usize::try_from(position.unsigned_abs()).ok()?;
        items.len().checked_sub(back)?
    } else {
        usize::try_from(position).ok()?
    };
    items.get(resolved)
}

#[cfg(test)]
mod tests {
    use super::{Segment, parse};
    use crate::QueryError;

    #[test]
    fn parses_fields_quotes_and_indices() {
        let segments = parse(r#" a."b\"c"[2][-1] "#).expect("expression parses");
        assert_eq!(
            segments,
            vec![
                Segment::Field("a".into()),
                Segment::Field("b\"c".into()),
                Segment::Index(2),
                Segment::Index(-1),
            ]
        );
    }

    #[test]
    fn rejects_empty_index() {
        let err = parse("a[]").expect_err("empty index is invalid");
        assert!(matches!(err, QueryError::InvalidIndex { ref text } if text.is_empty()));
    }
}
