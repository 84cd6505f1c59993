//! Result records returned by `select`

use serde_json::{Map, Value as JsonValue};

use crate::index::RowId;
use crate::schema::{Row, Value};

/// Name of the row id field added by `Record::to_json`
pub const ROW_ID_FIELD: &str = "_id";

/// An owned copy of a stored row plus the row id it came from.
///
/// Mutating a record never affects the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub row_id: RowId,
    pub values: Row,
}

impl Record {
    pub fn new(row_id: RowId, values: Row) -> Self {
        Self { row_id, values }
    }

    pub fn row_id(&self) -> RowId {
        self.row_id
    }

    /// Returns the value of `column`
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn into_values(self) -> Row {
        self.values
    }

    /// JSON object of all columns plus `_id`
    pub fn to_json(&self) -> JsonValue {
        let mut map: Map<String, JsonValue> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        map.insert(ROW_ID_FIELD.to_string(), JsonValue::from(self.row_id));
        JsonValue::Object(map)
    }
}

/// Converts a plain row to a JSON object
pub fn row_to_json(row: &Row) -> JsonValue {
    JsonValue::Object(row.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_json_carries_row_id() {
        let mut values = Row::new();
        values.insert("name".into(), Value::from("Alice"));
        let record = Record::new(4, values);

        assert_eq!(record.to_json(), json!({"name": "Alice", "_id": 4}));
        assert_eq!(record.get("name"), Some(&Value::from("Alice")));
    }

    #[test]
    fn test_row_to_json() {
        let mut row = Row::new();
        row.insert("price".into(), Value::Float(9.5));
        assert_eq!(row_to_json(&row), json!({"price": 9.5}));
    }
}
