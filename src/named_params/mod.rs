use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Write;

mod scanner;

use scanner::{Segment, Segments};

use crate::error::SqlFacadeError;
use crate::types::RowValues;

/// Target placeholder style for prepared statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style placeholders like `$1`.
    #[default]
    Postgres,
    /// SQLite-style placeholders like `?1`.
    Sqlite,
    /// Any other numbered marker, e.g. `Custom(":")` for `:1`.
    Custom(&'static str),
}

impl PlaceholderStyle {
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            PlaceholderStyle::Postgres => "$",
            PlaceholderStyle::Sqlite => "?",
            PlaceholderStyle::Custom(prefix) => prefix,
        }
    }

    /// Render the marker for the 1-based `position`.
    #[must_use]
    pub fn placeholder(self, position: usize) -> String {
        format!("{}{position}", self.prefix())
    }
}

/// Named parameter values keyed by identifier (without the `@`).
///
/// Lookups are case-sensitive; insertion order does not matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedParams {
    values: HashMap<String, RowValues>,
}

impl NamedParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Insert a value, returning the previous value for `name`, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<RowValues>,
    ) -> Option<RowValues> {
        self.values.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RowValues> {
        self.values.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, RowValues>> for NamedParams {
    fn from(values: HashMap<String, RowValues>) -> Self {
        Self { values }
    }
}

impl<K, V> FromIterator<(K, V)> for NamedParams
where
    K: Into<String>,
    V: Into<RowValues>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Build [`NamedParams`] inline.
///
/// ```rust
/// use sql_facade::named_params;
///
/// let params = named_params! { "id" => 1, "name" => "x" };
/// assert_eq!(params.len(), 2);
/// ```
#[macro_export]
macro_rules! named_params {
    () => {
        $crate::named_params::NamedParams::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::named_params::NamedParams::new()$(.with($name, $value))+
    };
}

/// A template rewritten into positional placeholders.
///
/// `values[i]` binds placeholder `i + 1`. A template without tokens keeps its original text
/// and has no values.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatement<'a> {
    pub sql: Cow<'a, str>,
    pub values: Vec<RowValues>,
}

impl PreparedStatement<'_> {
    #[must_use]
    pub fn has_params(&self) -> bool {
        !self.values.is_empty()
    }
}

/// Rewrite `@name` tokens into PostgreSQL `$N` placeholders.
///
/// # Errors
/// Returns `SqlFacadeError::MissingParameter` for the first token without a value.
pub fn prepare<'a>(
    template: &'a str,
    params: Option<&NamedParams>,
) -> Result<PreparedStatement<'a>, SqlFacadeError> {
    prepare_with_style(template, params, PlaceholderStyle::default())
}

/// Rewrite `@name` tokens into numbered placeholders of the given style.
///
/// Every occurrence gets its own position, so a name used twice binds its value twice:
/// ```rust
/// use sql_facade::prelude::*;
///
/// let params = NamedParams::new().with("id", 7);
/// let prepared = prepare_with_style(
///     "select * from t where a = @id or b = @id",
///     Some(&params),
///     PlaceholderStyle::Sqlite,
/// )?;
/// assert_eq!(prepared.sql, "select * from t where a = ?1 or b = ?2");
/// assert_eq!(prepared.values, vec![RowValues::Int(7), RowValues::Int(7)]);
/// # Ok::<(), SqlFacadeError>(())
/// ```
///
/// Tokens are found anywhere in the text, including inside quoted literals.
///
/// Names never contain digits, so `@id2` is the token `@id` followed by a literal `2` and
/// becomes `$12` (or `?12`), a placeholder with no value bound to it. Separate a trailing
/// digit from the name, e.g. `@id || '2'`, or pick a name without one.
///
/// # Errors
/// Returns `SqlFacadeError::MissingParameter` for the first token without a value; nothing
/// of the partial rewrite is returned.
pub fn prepare_with_style<'a>(
    template: &'a str,
    params: Option<&NamedParams>,
    style: PlaceholderStyle,
) -> Result<PreparedStatement<'a>, SqlFacadeError> {
    let mut out: Option<String> = None;
    let mut values = Vec::new();
    let mut consumed = 0;
    let prefix = style.prefix();

    for segment in Segments::new(template) {
        match segment {
            Segment::Literal(text) => {
                if let Some(buf) = out.as_mut() {
                    buf.push_str(text);
                }
                consumed += text.len();
            }
            Segment::Token(token) => {
                let value = params.and_then(|p| p.get(&token[1..])).ok_or_else(|| {
                    SqlFacadeError::MissingParameter {
                        token: token.to_string(),
                    }
                })?;
                let buf = out.get_or_insert_with(|| {
                    let mut buf = String::with_capacity(template.len() + 8);
                    buf.push_str(&template[..consumed]);
                    buf
                });
                values.push(value.clone());
                // Writing to a String cannot fail.
                let _ = write!(buf, "{prefix}{}", values.len());
                consumed += token.len();
            }
        }
    }

    Ok(PreparedStatement {
        sql: out.map_or(Cow::Borrowed(template), Cow::Owned),
        values,
    })
}
