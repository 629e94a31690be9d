use chrono::NaiveDate;
use flatfile::{record, ColumnCodec, Decimal, DelimitedOptions, RecordWriter, Schema, Value};

#[test]
fn test_record_macro_null() {
    let values = record![null];
    assert_eq!(values, vec![Value::Null]);
}

#[test]
fn test_record_macro_booleans() {
    assert_eq!(record![true, false], vec![Value::Bool(true), Value::Bool(false)]);
}

#[test]
fn test_record_macro_numbers() {
    assert_eq!(record![42], vec![Value::Int(42)]);
    assert_eq!(record![-123], vec![Value::Int(-123)]);
    assert_eq!(record![3.5], vec![Value::Float(3.5)]);
    assert_eq!(record![7u8], vec![Value::UInt(7)]);
}

#[test]
fn test_record_macro_strings_and_chars() {
    let owned = String::from("owned");
    assert_eq!(
        record!["borrowed", owned, 'c'],
        vec![
            Value::String("borrowed".to_string()),
            Value::String("owned".to_string()),
            Value::Char('c'),
        ]
    );
}

#[test]
fn test_record_macro_rich_types() {
    let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let price: Decimal = "9.99".parse().unwrap();
    let values = record![day, price.clone(), vec![1u8, 2u8]];
    assert_eq!(
        values,
        vec![Value::Date(day), Value::Decimal(price), Value::Bytes(vec![1, 2])]
    );
}

#[test]
fn test_record_macro_empty() {
    let values = record![];
    assert!(values.is_empty());
}

#[test]
fn test_record_macro_feeds_a_writer() {
    let schema = Schema::new()
        .with_column(ColumnCodec::int32("Id"))
        .unwrap()
        .with_column(ColumnCodec::string("Note"))
        .unwrap();
    let options = DelimitedOptions::new().with_record_separator("\n");
    let mut writer = flatfile::DelimitedWriter::with_schema(Vec::new(), schema, options).unwrap();
    writer.write(&record![1, null]).unwrap();
    writer.write(&record![2, "two"]).unwrap();
    let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(text, "1,\n2,two\n");
}
