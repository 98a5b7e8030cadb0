use anyhow::Result;
use chrono::NaiveDate;
use tableclasses::{
    field, tabled, AttributeRow, ConstructionConfig, FieldDecl, KeyedRow, NamedColumns,
    NativeType, Record, Row, Value,
};
use tracing_subscriber::EnvFilter;

struct Quote;

impl Record for Quote {
    const NAME: &'static str = "Quote";

    fn declare() -> Vec<FieldDecl> {
        vec![
            FieldDecl::with_meta("symbol", NativeType::Str, field("string").index(true)),
            FieldDecl::with_meta("day", NativeType::Date, field("date")),
            FieldDecl::with_meta("close", NativeType::Float, field("float32").aliases(["last", "px"])),
            FieldDecl::bare("volume", NativeType::Int),
        ]
    }
}

#[derive(Debug)]
struct Fill {
    symbol: &'static str,
    day: NaiveDate,
    px: f64,
    volume: i64,
}

impl AttributeRow for Fill {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "symbol" => Some(self.symbol.into()),
            "day" => Some(self.day.into()),
            "px" => Some(self.px.into()),
            "volume" => Some(self.volume.into()),
            _ => None,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("tableclasses - Basic Usage Example");

    let config = ConstructionConfig::from_json(r#"{ "rows": { "allow_positional": true } }"#)?;
    let quotes = tabled::<Quote>()?.with_config(config);
    println!("Accepted names: {:?}", quotes.allowed());

    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default();

    // --- from named columns ---
    let by_columns = quotes.from_columns(
        NamedColumns::new()
            .with("symbol", vec!["AAPL", "MSFT"])
            .with("day", vec![day, day])
            .with("last", vec![179.66, 415.5])
            .with("volume", vec![73_488_000, 19_000_000]),
    )?;
    println!("\n--- from_columns ---");
    println!("{} row(s), columns {:?}", by_columns.num_rows(), by_columns.column_names());

    // --- from an existing table ---
    let by_existing = quotes.from_existing(&by_columns.to_record_batch()?)?;
    println!("\n--- from_existing ---");
    println!("{:?}", by_existing.arrow_schema());

    // --- from rows ---
    let keyed = quotes.from_rows(
        vec![Row::keyed(
            KeyedRow::new()
                .with("symbol", "NVDA")
                .with("day", day)
                .with("close", 822.79)
                .with("volume", 47_000_000),
        )],
        false,
    )?;
    let attributes = quotes.from_rows(
        vec![Row::attributes(Fill { symbol: "AMZN", day, px: 178.22, volume: 31_000_000 })],
        false,
    )?;
    let positional = quotes.from_rows_default(vec![Row::positional(vec![
        Value::from("TSLA"),
        day.into(),
        202.64.into(),
        81_000_000.into(),
    ])])?;
    println!("\n--- from_rows ---");
    for batch in [&keyed, &attributes, &positional] {
        let index = batch.index().map(|i| i.names().to_vec()).unwrap_or_default();
        println!("{} row(s), index {:?}", batch.num_rows(), index);
    }

    // --- validation ---
    println!("\n--- validation ---");
    match quotes.from_columns(NamedColumns::new().with("ticker", vec!["IBM"])) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("rejected: {}", e),
    }

    Ok(())
}
