//! Positional and named parameter sets plus the placeholder rewrite
//!
//! Named placeholders (`:name`) are rewritten into whatever positional
//! style the target driver understands before binding. The scanner leaves
//! quoted literals alone and never treats a Postgres `::type` cast as the
//! start of a placeholder.

use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum Params {
    None,
    Positional(Vec<Value>),
    Named(Vec<(String, Value)>),
}

/// Positional placeholder style of the target driver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaceholderStyle {
    /// `?`, one placeholder per occurrence (SQLite)
    Question,
    /// `$1`, `$2`, ... reused for repeats of the same name (Postgres)
    Dollar,
}

impl Params {
    pub fn positional(values: Vec<Value>) -> Params {
        Params::Positional(values)
    }

    pub fn named(pairs: Vec<(String, Value)>) -> Params {
        Params::Named(pairs)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Params::None => true,
            Params::Positional(values) => values.is_empty(),
            Params::Named(pairs) => pairs.is_empty(),
        }
    }

    /// Produce the SQL the driver will see plus the values in binding order.
    pub fn prepare(
        &self,
        sql: &str,
        style: PlaceholderStyle,
    ) -> Result<(String, Vec<Value>), ParamsError> {
        match self {
            Params::None => Ok((sql.to_string(), Vec::new())),
            Params::Positional(values) => Ok((sql.to_string(), values.clone())),
            Params::Named(pairs) => rewrite_named(sql, pairs, style),
        }
    }
}

fn rewrite_named(
    sql: &str,
    pairs: &[(String, Value)],
    style: PlaceholderStyle,
) -> Result<(String, Vec<Value>), ParamsError> {
    let mut output = String::with_capacity(sql.len());
    let mut values: Vec<Value> = Vec::new();
    //Distinct names in first-use order, drives the $n numbering
    let mut ordinals: Vec<String> = Vec::new();
    let mut used = vec![false; pairs.len()];

    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            output.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                output.push(c);
            }
            ':' => {
                if chars.peek() == Some(&':') {
                    //A cast, both colons pass through untouched
                    output.push(c);
                    if let Some(second) = chars.next() {
                        output.push(second);
                    }
                    continue;
                }

                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }

                if name.is_empty() {
                    //A stray colon, not a placeholder
                    output.push(c);
                    continue;
                }

                let index = pairs
                    .iter()
                    .position(|(n, _)| *n == name)
                    .ok_or_else(|| ParamsError::UnknownParameter(name.clone()))?;
                used[index] = true;
                let value = &pairs[index].1;

                match style {
                    PlaceholderStyle::Question => {
                        values.push(value.clone());
                        output.push('?');
                    }
                    PlaceholderStyle::Dollar => {
                        let ordinal = match ordinals.iter().position(|n| *n == name) {
                            Some(existing) => existing,
                            None => {
                                ordinals.push(name.clone());
                                values.push(value.clone());
                                ordinals.len() - 1
                            }
                        };
                        output.push('$');
                        output.push_str(&(ordinal + 1).to_string());
                    }
                }
            }
            _ => output.push(c),
        }
    }

    for (index, (name, _)) in pairs.iter().enumerate() {
        if !used[index] {
            return Err(ParamsError::UnusedParameter(name.clone()));
        }
    }

    Ok((output, values))
}

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("Query references :{0} but no value was supplied for it")]
    UnknownParameter(String),
    #[error("A value was supplied for :{0} but the query never references it")]
    UnusedParameter(String),
}
