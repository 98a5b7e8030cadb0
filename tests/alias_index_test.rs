//! Alias fallback, row index and type registry behaviour across all constructors

use arrow::array::*;
use arrow::datatypes::DataType;
use tableclasses::{
    field, ColumnLike, FieldDecl, KeyedRow, NamedColumns, NativeType, Row, TableClass,
    TableError, TypeRegistry, Value,
};

/// `f` is reachable through `g`; `a` and `b` key the rows
fn indexed_class() -> TableClass {
    TableClass::new(
        "Indexed",
        vec![
            FieldDecl::with_meta("a", NativeType::Int, field("int32").index(true)),
            FieldDecl::with_meta("b", NativeType::Str, field("string").index(true)),
            FieldDecl::with_meta("f", NativeType::Float, field("float64").alias("g")),
        ],
    )
    .unwrap()
}

fn float_values(batch: &tableclasses::ColumnarBatch, name: &str) -> Vec<f64> {
    batch
        .column_by_name(name)
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap()
        .values()
        .to_vec()
}

#[test]
fn test_width_explicit_date_spellings() {
    let registry = TypeRegistry::standard();
    for (alias, expected) in [
        ("date32", DataType::Date32),
        ("date64", DataType::Date64),
        ("datetime64", DataType::Date64),
    ] {
        assert_eq!(registry.resolve(&NativeType::Str, alias).unwrap(), expected, "alias {}", alias);
    }
    assert!(registry.aliases().contains(&"datetime64"));
}

#[test]
fn test_unsupported_alias_and_native() {
    let registry = TypeRegistry::standard();
    let err = registry
        .resolve(&NativeType::Other("Widget".to_string()), "nope")
        .unwrap_err();
    assert_eq!(err.to_string(), "The provided Widget (nope) is not supported");

    let class = TableClass::new(
        "Broken",
        vec![FieldDecl::with_meta(
            "w",
            NativeType::Other("Widget".to_string()),
            field("nope"),
        )],
    );
    assert!(matches!(class, Err(TableError::UnsupportedType { .. })));
}

#[test]
fn test_alias_fallback_from_columns() {
    let class = indexed_class();
    let batch = class
        .from_columns(
            NamedColumns::new()
                .with("a", vec![1, 2])
                .with("b", vec!["x", "y"])
                .with("g", vec![0.5, 1.5]),
        )
        .unwrap();

    assert_eq!(batch.column_names(), vec!["a", "b", "f"]);
    assert_eq!(float_values(&batch, "f"), vec![0.5, 1.5]);
}

#[test]
fn test_primary_name_wins_over_alias() {
    let class = indexed_class();
    let batch = class
        .from_columns(
            NamedColumns::new()
                .with("a", vec![1])
                .with("b", vec!["x"])
                .with("g", vec![2.0])
                .with("f", vec![1.0]),
        )
        .unwrap();

    assert_eq!(float_values(&batch, "f"), vec![1.0]);
}

#[test]
fn test_alias_fallback_from_keyed_rows() {
    let class = indexed_class();
    let rows = vec![
        Row::keyed(KeyedRow::new().with("a", 1).with("b", "x").with("g", 0.5)),
        Row::keyed(KeyedRow::new().with("a", 2).with("b", "y").with("g", 1.5)),
    ];

    let batch = class.from_rows(rows, false).unwrap();
    assert_eq!(float_values(&batch, "f"), vec![0.5, 1.5]);
}

#[test]
fn test_alias_fallback_from_existing() {
    let class = indexed_class();
    let aliased = TableClass::new(
        "Aliased",
        vec![
            FieldDecl::with_meta("a", NativeType::Int, field("int32")),
            FieldDecl::with_meta("b", NativeType::Str, field("string")),
            FieldDecl::with_meta("g", NativeType::Float, field("float64")),
        ],
    )
    .unwrap()
    .from_columns(
        NamedColumns::new()
            .with("a", vec![1])
            .with("b", vec!["x"])
            .with("g", vec![3.5]),
    )
    .unwrap();

    let batch = class.from_existing(&aliased).unwrap();
    assert_eq!(float_values(&batch, "f"), vec![3.5]);
}

#[test]
fn test_index_on_every_strategy() {
    let class = indexed_class();
    let keys = vec![3, 1, 2];
    let names = vec!["c", "a", "b"];

    let by_columns = class
        .from_columns(
            NamedColumns::new()
                .with("a", keys.clone())
                .with("b", names.clone())
                .with("f", vec![3.0, 1.0, 2.0]),
        )
        .unwrap();
    let rows: Vec<Row> = keys
        .iter()
        .zip(&names)
        .map(|(k, n)| Row::positional(vec![Value::from(*k), (*n).into(), (*k as f64).into()]))
        .collect();
    let by_rows = class.from_rows(rows, true).unwrap();
    let by_existing = class.from_existing(&by_columns).unwrap();

    for batch in [&by_columns, &by_rows, &by_existing] {
        let index = batch.index().unwrap();
        assert_eq!(index.names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(index.columns().len(), 2);
        assert_eq!(index.len(), 3);

        // index levels keep the input row order
        let ids = index.level(0).unwrap().as_any().downcast_ref::<Int32Array>().unwrap();
        assert_eq!(ids.values().to_vec(), vec![3, 1, 2]);
        let labels = index.level(1).unwrap().as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(labels.iter().flatten().collect::<Vec<_>>(), vec!["c", "a", "b"]);
    }
}

#[test]
fn test_from_existing_with_extra_column_is_data_error() {
    let class = indexed_class();
    let wider = TableClass::new(
        "Wider",
        vec![
            FieldDecl::with_meta("a", NativeType::Int, field("int32")),
            FieldDecl::with_meta("b", NativeType::Str, field("string")),
            FieldDecl::with_meta("f", NativeType::Float, field("float64")),
            FieldDecl::with_meta("extra", NativeType::Int, field("int64")),
        ],
    )
    .unwrap()
    .from_columns(
        NamedColumns::new()
            .with("a", vec![1])
            .with("b", vec!["x"])
            .with("f", vec![1.0])
            .with("extra", vec![7]),
    )
    .unwrap();

    match class.from_existing(&wider).unwrap_err() {
        TableError::Data { unknown, .. } => assert_eq!(unknown, vec!["extra"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_from_existing_with_missing_column_is_column_error() {
    let class = indexed_class();
    let narrow = TableClass::new(
        "Narrow",
        vec![
            FieldDecl::with_meta("a", NativeType::Int, field("int32")),
            FieldDecl::with_meta("b", NativeType::Str, field("string")),
        ],
    )
    .unwrap()
    .from_columns(NamedColumns::new().with("a", vec![1]).with("b", vec!["x"]))
    .unwrap();

    let record = narrow.to_record_batch().unwrap();
    match class.from_existing(&record).unwrap_err() {
        TableError::Column { column, given, .. } => {
            assert_eq!(column, "f");
            assert!(given.contains("\"a\""));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_keyed_row_with_extra_key_is_row_error() {
    let class = indexed_class();
    let rows = vec![Row::keyed(
        KeyedRow::new()
            .with("a", 1)
            .with("b", "x")
            .with("f", 1.0)
            .with("extra", 9),
    )];

    let err = class.from_rows(rows, false).unwrap_err();
    match err {
        TableError::Row { allowed, .. } => assert!(allowed.contains("3 keys")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_mixed_row_kinds_rejected() {
    let class = indexed_class();
    let rows = vec![
        Row::keyed(KeyedRow::new().with("a", 1).with("b", "x").with("f", 1.0)),
        Row::positional(vec![Value::Int(2), "y".into(), 2.0.into()]),
    ];

    let err = class.from_rows(rows, true).unwrap_err();
    assert!(matches!(err, TableError::Row { .. }));
}

#[test]
fn test_lazy_column_source() {
    let class = indexed_class();
    let batch = class
        .from_columns(
            NamedColumns::new()
                .with("a", ColumnLike::lazy((1..=3).map(|i| i as i64)))
                .with("b", vec!["x", "y", "z"])
                .with("f", ColumnLike::lazy((1..=3).map(|i| i as f64 / 2.0))),
        )
        .unwrap();

    assert_eq!(batch.num_rows(), 3);
    assert_eq!(float_values(&batch, "f"), vec![0.5, 1.0, 1.5]);
}

#[test]
fn test_lazy_rows() {
    let class = indexed_class();
    let rows = (0..4).map(|i| {
        Row::keyed(
            KeyedRow::new()
                .with("a", i)
                .with("b", format!("row{i}"))
                .with("f", i as f64),
        )
    });

    let batch = class.from_rows(rows, false).unwrap();
    assert_eq!(batch.num_rows(), 4);
    assert_eq!(float_values(&batch, "f"), vec![0.0, 1.0, 2.0, 3.0]);
}
