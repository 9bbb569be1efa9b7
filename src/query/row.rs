//! Wrapper type for a single result row unattached to any table schema

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::iter::FromIterator;
use std::ops::{Deref, DerefMut};

/// One record of a result set, column name to value in select order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(pub Map<String, Value>);

impl Row {
    pub fn new() -> Row {
        Row(Map::new())
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(column.into(), value)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }
}

impl Deref for Row {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Row {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for Row {
    fn from(columns: Map<String, Value>) -> Row {
        Row(columns)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Row {
        Row(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_as_an_object_in_insert_order() -> Result<(), Box<dyn std::error::Error>> {
        let mut row = Row::new();
        row.insert("zulu", json!(1));
        row.insert("alpha", json!("two"));
        row.insert("mike", json!(null));

        assert_eq!(
            serde_json::to_string(&row)?,
            r#"{"zulu":1,"alpha":"two","mike":null}"#
        );

        Ok(())
    }

    #[test]
    fn test_get_and_overwrite() {
        let mut row: Row = vec![("age".to_string(), json!(30))].into_iter().collect();
        assert_eq!(row.get("age"), Some(&json!(30)));
        assert_eq!(row.get("missing"), None);

        let previous = row.insert("age", json!(31));
        assert_eq!(previous, Some(json!(30)));
        assert_eq!(row.get("age"), Some(&json!(31)));
    }
}
