//! Row-wise construction: keyed rows, attribute rows and positional rows

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

use super::accessor::{must_get_column, ColumnSource};
use super::cast::values_to_column;
use super::columns::finish_with_rows;
use crate::config::ConstructionConfig;
use crate::error::{TableError, TableResult};
use crate::metadata::{ResolvedField, SchemaRef};
use crate::storage::ColumnarBatch;
use crate::types::Value;

/// An object exposing named attributes
pub trait AttributeRow: fmt::Debug {
    /// Value of the named attribute, or None when the object has no such attribute
    fn attribute(&self, name: &str) -> Option<Value>;
}

/// A mapping row: cells looked up by key, in insertion order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyedRow {
    entries: IndexMap<String, Value>,
}

impl KeyedRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell; a repeated key replaces the earlier value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from a JSON object; nested arrays and objects are rejected
    pub fn from_json(object: serde_json::Map<String, serde_json::Value>) -> TableResult<Self> {
        let mut row = KeyedRow::new();
        for (key, value) in object {
            let cell = Value::from_json(value.clone()).ok_or_else(|| {
                TableError::row(format!("{{{}: {}}}", key, value), "a flat JSON object")
            })?;
            row.insert(key, cell);
        }
        Ok(row)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for KeyedRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = KeyedRow::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for KeyedRow {
    fn from(map: HashMap<String, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for KeyedRow {
    fn from(map: BTreeMap<String, V>) -> Self {
        map.into_iter().collect()
    }
}

impl ColumnSource for &KeyedRow {
    type Column = Value;

    fn column_names(&self) -> Vec<String> {
        self.keys().map(str::to_string).collect()
    }

    fn take_column(&mut self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Attribute lookups through the same alias-resolving accessor as columns
struct Attributes<'a>(&'a dyn AttributeRow);

impl ColumnSource for Attributes<'_> {
    type Column = Value;

    fn column_names(&self) -> Vec<String> {
        vec![format!("{:?}", self.0)]
    }

    fn take_column(&mut self, name: &str) -> Option<Value> {
        self.0.attribute(name)
    }
}

/// One row-like record
pub enum Row {
    Keyed(KeyedRow),
    Attributes(Box<dyn AttributeRow>),
    Positional(Vec<Value>),
}

/// Row accessor strategy, decided once per construction call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Keyed,
    Attributes,
    Positional,
}

impl Row {
    pub fn keyed(row: impl Into<KeyedRow>) -> Self {
        Row::Keyed(row.into())
    }

    pub fn attributes(row: impl AttributeRow + 'static) -> Self {
        Row::Attributes(Box::new(row))
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Row::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> RowKind {
        match self {
            Row::Keyed(_) => RowKind::Keyed,
            Row::Attributes(_) => RowKind::Attributes,
            Row::Positional(_) => RowKind::Positional,
        }
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Row::Keyed(row) => f.debug_map().entries(row.entries.iter().map(|(k, v)| (k, v))).finish(),
            Row::Attributes(row) => write!(f, "{:?}", row),
            Row::Positional(values) => f.debug_tuple("").field(values).finish(),
        }
    }
}

impl From<KeyedRow> for Row {
    fn from(row: KeyedRow) -> Self {
        Row::Keyed(row)
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::Positional(values)
    }
}

const ROW_KINDS: &str = "(keyed row, attribute row, positional row with allow_positional)";

/// Pick the accessor strategy from the first row
fn resolve_row_kind(row: &Row, allow_positional: bool) -> TableResult<RowKind> {
    match row.kind() {
        RowKind::Positional if !allow_positional => Err(TableError::row(format!("{:?}", row), ROW_KINDS)),
        kind => Ok(kind),
    }
}

/// Expected-shape description for row cell errors
fn cell_repr(field: &ResolvedField) -> String {
    format!("Value[{}]", field.type_label())
}

/// Build a batch from a sequence of rows
///
/// The first row decides the accessor strategy for the whole call; a later row
/// of another kind is rejected. Rows are consumed once, so lazy sequences work.
pub fn from_rows<I>(
    schema: &SchemaRef,
    rows: I,
    allow_positional: bool,
    config: &ConstructionConfig,
) -> TableResult<ColumnarBatch>
where
    I: IntoIterator<Item = Row>,
{
    let fields = schema.fields();
    let num_fields = fields.len();
    let mut buffers: Vec<Vec<Value>> = vec![Vec::new(); num_fields];
    let mut kind: Option<RowKind> = None;
    let mut row_count = 0usize;

    for row in rows {
        match kind {
            None => kind = Some(resolve_row_kind(&row, allow_positional)?),
            Some(k) if k != row.kind() => {
                return Err(TableError::row(
                    format!("{:?}", row),
                    format!("a {:?} row like the first row", k),
                ));
            }
            Some(_) => {}
        }

        match &row {
            Row::Keyed(keyed) => {
                if keyed.len() != num_fields {
                    return Err(TableError::row(
                        format!("{:?}", row),
                        format!("a keyed row with {} keys", num_fields),
                    ));
                }
                if config.validation.reject_unknown {
                    schema.validate_allowed(keyed.keys())?;
                }
                let mut source = keyed;
                for (field, buffer) in fields.iter().zip(buffers.iter_mut()) {
                    buffer.push(must_get_column(&mut source, field, &cell_repr(field))?);
                }
            }
            Row::Attributes(object) => {
                let mut source = Attributes(&**object);
                for (field, buffer) in fields.iter().zip(buffers.iter_mut()) {
                    buffer.push(must_get_column(&mut source, field, &cell_repr(field))?);
                }
            }
            Row::Positional(values) => {
                if values.len() != num_fields {
                    return Err(TableError::row(
                        format!("{:?}", row),
                        format!("(..., len == {})", num_fields),
                    ));
                }
                for (value, buffer) in values.iter().zip(buffers.iter_mut()) {
                    buffer.push(value.clone());
                }
            }
        }
        row_count += 1;
    }

    debug!(
        "{}::from_rows gathered {} row(s) as {:?}",
        schema.name(),
        row_count,
        kind
    );

    let mut arrays = Vec::with_capacity(num_fields);
    for (field, values) in fields.iter().zip(buffers) {
        arrays.push(values_to_column(&values, field, config.cast.strict)?);
    }

    finish_with_rows(schema, arrays, row_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{build_schema, field, FieldDecl};
    use crate::types::NativeType;
    use arrow::array::{Array, Int32Array, StringArray};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Point {
        a: i32,
        b: &'static str,
    }

    impl AttributeRow for Point {
        fn attribute(&self, name: &str) -> Option<Value> {
            match name {
                "a" => Some(self.a.into()),
                "b" => Some(self.b.into()),
                _ => None,
            }
        }
    }

    fn schema() -> SchemaRef {
        Arc::new(
            build_schema(
                "Point",
                vec![
                    FieldDecl::with_meta("a", NativeType::Int, field("int32").alias("x")),
                    FieldDecl::bare("b", NativeType::Str),
                ],
            )
            .unwrap(),
        )
    }

    fn ints(batch: &ColumnarBatch, name: &str) -> Vec<i32> {
        batch
            .column_by_name(name)
            .unwrap()
            .as_any()
            .downcast_ref::<Int32Array>()
            .unwrap()
            .values()
            .to_vec()
    }

    #[test]
    fn test_keyed_rows_with_alias() {
        let rows = vec![
            Row::keyed(KeyedRow::new().with("x", 1).with("b", "p")),
            Row::keyed(KeyedRow::new().with("a", 2).with("b", "q")),
        ];
        let batch = from_rows(&schema(), rows, false, &ConstructionConfig::default()).unwrap();
        assert_eq!(ints(&batch, "a"), vec![1, 2]);
    }

    #[test]
    fn test_keyed_row_with_extra_key() {
        let rows = vec![Row::keyed(KeyedRow::new().with("a", 1).with("b", "p").with("c", 0))];
        let err = from_rows(&schema(), rows, false, &ConstructionConfig::default()).unwrap_err();
        assert!(matches!(err, TableError::Row { .. }));
    }

    #[test]
    fn test_keyed_row_with_unknown_key() {
        let rows = vec![Row::keyed(KeyedRow::new().with("a", 1).with("zz", "p"))];
        let err = from_rows(&schema(), rows, false, &ConstructionConfig::default()).unwrap_err();
        assert!(matches!(err, TableError::Data { ref unknown, .. } if unknown == &vec!["zz"]));
    }

    #[test]
    fn test_attribute_rows() {
        let rows = vec![
            Row::attributes(Point { a: 1, b: "p" }),
            Row::attributes(Point { a: 2, b: "q" }),
        ];
        let batch = from_rows(&schema(), rows, false, &ConstructionConfig::default()).unwrap();
        assert_eq!(ints(&batch, "a"), vec![1, 2]);
        let b = batch.column_by_name("b").unwrap();
        assert_eq!(b.as_any().downcast_ref::<StringArray>().unwrap().value(1), "q");
    }

    #[test]
    fn test_missing_attribute_is_column_error() {
        #[derive(Debug)]
        struct OnlyA;
        impl AttributeRow for OnlyA {
            fn attribute(&self, name: &str) -> Option<Value> {
                (name == "a").then(|| Value::Int(1))
            }
        }

        let err = from_rows(&schema(), vec![Row::attributes(OnlyA)], false, &ConstructionConfig::default())
            .unwrap_err();
        assert!(matches!(err, TableError::Column { ref column, .. } if column == "b"));
    }

    #[test]
    fn test_positional_rows_need_opt_in() {
        let rows = || vec![Row::positional(vec![Value::Int(1), "p".into()])];

        let err = from_rows(&schema(), rows(), false, &ConstructionConfig::default()).unwrap_err();
        assert!(matches!(err, TableError::Row { .. }));

        let batch = from_rows(&schema(), rows(), true, &ConstructionConfig::default()).unwrap();
        assert_eq!(ints(&batch, "a"), vec![1]);
    }

    #[test]
    fn test_positional_length_checked() {
        let rows = vec![Row::positional(vec![Value::Int(1)])];
        let err = from_rows(&schema(), rows, true, &ConstructionConfig::default()).unwrap_err();
        assert!(matches!(err, TableError::Row { ref allowed, .. } if allowed.contains("len == 2")));
    }

    #[test]
    fn test_first_row_decides_kind() {
        let rows = vec![
            Row::keyed(KeyedRow::new().with("a", 1).with("b", "p")),
            Row::positional(vec![Value::Int(2), "q".into()]),
        ];
        let err = from_rows(&schema(), rows, true, &ConstructionConfig::default()).unwrap_err();
        assert!(matches!(err, TableError::Row { .. }));
    }

    #[test]
    fn test_lazy_rows_and_empty_input() {
        let rows = (0..3).map(|i| Row::keyed(KeyedRow::new().with("a", i).with("b", "p")));
        let batch = from_rows(&schema(), rows, false, &ConstructionConfig::default()).unwrap();
        assert_eq!(ints(&batch, "a"), vec![0, 1, 2]);

        let empty = from_rows(&schema(), std::iter::empty(), false, &ConstructionConfig::default()).unwrap();
        assert_eq!(empty.num_rows(), 0);
        assert_eq!(empty.column_by_name("b").unwrap().len(), 0);
    }

    #[test]
    fn test_keyed_row_from_json() {
        let object = serde_json::json!({"a": 1, "b": "p"});
        let row = KeyedRow::from_json(object.as_object().unwrap().clone()).unwrap();
        assert_eq!(row.get("a"), Some(&Value::Int(1)));

        let nested = serde_json::json!({"a": [1]});
        assert!(KeyedRow::from_json(nested.as_object().unwrap().clone()).is_err());
    }
}
