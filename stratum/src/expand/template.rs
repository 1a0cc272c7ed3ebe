//! Tokeniser for placeholder templates.
//!
//! `{{` and `}}` stand for literal braces. Any other `{expr}` is a
//! placeholder whose text, between the braces, is handed to the query
//! evaluator untouched.

use thiserror::Error;

/// Syntax problems found while tokenising a template.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum TemplateSyntaxError {
    /// A `}` that neither closes a placeholder nor is doubled.
    #[error("single '}}' encountered at offset {offset}")]
    UnmatchedClose {
        /// Byte offset of the brace.
        offset: usize,
    },

    /// A placeholder that is never closed.
    #[error("expected '}}' before end of template for placeholder at offset {offset}")]
    Unterminated {
        /// Byte offset of the opening brace.
        offset: usize,
    },

    /// A `{` inside a placeholder.
    #[error("unexpected '{{' in placeholder at offset {offset}")]
    NestedOpen {
        /// Byte offset of the nested brace.
        offset: usize,
    },

    /// A placeholder with no expression.
    #[error("empty placeholder at offset {offset}")]
    EmptyPlaceholder {
        /// Byte offset of the opening brace.
        offset: usize,
    },
}

/// One piece of a tokenised template.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Piece {
    /// Text copied to the output as is.
    Literal(String),
    /// Expression to resolve and substitute.
    Placeholder(String),
}

/// Split `template` into literal text and placeholders.
pub(crate) fn tokenise(template: &str) -> Result<Vec<Piece>, TemplateSyntaxError> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            '{' if chars.next_if(|(_, next)| *next == '{').is_some() => literal.push('{'),
            '}' if chars.next_if(|(_, next)| *next == '}').is_some() => literal.push('}'),
            '}' => return Err(TemplateSyntaxError::UnmatchedClose { offset }),
            '{' => {
                let mut expression = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((nested, '{')) => {
                            return Err(TemplateSyntaxError::NestedOpen { offset: nested });
                        }
                        Some((_, inner)) => expression.push(inner),
                        None => return Err(TemplateSyntaxError::Unterminated { offset }),
                    }
                }
                if expression.trim().is_empty() {
                    return Err(TemplateSyntaxError::EmptyPlaceholder { offset });
                }
                if !literal.is_empty() {
                    pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                }
                pieces.push(Piece::Placeholder(expression));
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}
