use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use flatfile::{
    record, ByteEncoding, ColumnCodec, CustomConverter, DelimitedOptions, DelimitedReader,
    ColumnType, DelimitedWriter, EnumFormat, Error, FixedWidthOptions, FixedWidthReader, FixedWidthWriter,
    GuidFormat, IntegerKind, NullFormatter, NumberFormat, RecordWriter, Schema, TypeMapper, Value,
    Window,
};
use uuid::Uuid;

#[test]
fn test_column_names_are_unique_ignoring_case() {
    let schema = Schema::new().with_column(ColumnCodec::string("Name")).unwrap();
    let err = schema.with_column(ColumnCodec::int32("NAME")).unwrap_err();
    assert!(matches!(err, Error::DuplicateColumn(name) if name == "NAME"));
}

#[test]
fn test_blank_column_name_is_rejected() {
    let err = Schema::new().with_column(ColumnCodec::string("   ")).unwrap_err();
    assert!(matches!(err, Error::InvalidColumnName(_)));
}

#[test]
fn test_lookup_by_name() {
    let schema = Schema::new()
        .with_column(ColumnCodec::int32(" Id "))
        .unwrap()
        .with_column(ColumnCodec::string("Name"))
        .unwrap();
    assert_eq!(schema.index_of("id"), Some(0));
    assert_eq!(schema.column("NAME").map(ColumnCodec::name), Some("Name"));
    assert_eq!(schema.column_names(), vec!["Id", "Name"]);
    assert!(schema.column("missing").is_none());
}

#[test]
fn test_ignored_columns_are_skipped() {
    let schema = Schema::new()
        .with_column(ColumnCodec::int32("Id"))
        .unwrap()
        .with_column(ColumnCodec::ignored("Filler"))
        .unwrap()
        .with_column(ColumnCodec::string("Name"))
        .unwrap();
    assert_eq!(schema.len(), 3);
    assert_eq!(schema.logical_len(), 2);

    let raw = vec!["1".to_string(), "junk".to_string(), "Ada".to_string()];
    let values = schema.parse_values(&raw, 1, None).unwrap();
    assert_eq!(values, record![1, "Ada"]);

    let text = schema.format_values(&values, 1, None).unwrap();
    assert_eq!(text, vec!["1", "", "Ada"]);
}

#[test]
fn test_integer_ranges() {
    let small = ColumnCodec::integer("Small", IntegerKind::I8);
    assert_eq!(small.parse("-128").unwrap(), Value::Int(-128));
    assert!(small.parse("128").is_err());
    assert!(small.format(&Value::Int(300)).is_err());

    let unsigned = ColumnCodec::integer("Count", IntegerKind::U16);
    assert_eq!(unsigned.parse("65535").unwrap(), Value::UInt(65535));
    assert!(unsigned.parse("-1").is_err());
}

#[test]
fn test_number_format_with_currency_and_thousands() {
    let format = NumberFormat::new()
        .with_thousands(true)
        .with_currency_symbol("$");
    let amount = ColumnCodec::decimal("Amount").with_number_format(format);
    assert_eq!(amount.parse("$1,234.50").unwrap().to_string(), "1234.50");
    assert!(ColumnCodec::decimal("Plain").parse("1,234.50").is_err());
}

#[test]
fn test_decimal_scale_on_write() {
    let price = ColumnCodec::decimal("Price").with_format("2").unwrap();
    let value = price.parse("3.14159").unwrap();
    assert_eq!(price.format(&value).unwrap(), "3.14");
    assert_eq!(price.format(&Value::Int(5)).unwrap(), "5.00");
}

#[test]
fn test_float_precision() {
    let ratio = ColumnCodec::float64("Ratio").with_format("3").unwrap();
    assert_eq!(ratio.format(&Value::Float(2.0 / 3.0)).unwrap(), "0.667");
    assert_eq!(ratio.parse(" 1.5 ").unwrap(), Value::Float(1.5));
}

#[test]
fn test_invalid_precision_and_scale_are_rejected() {
    assert!(matches!(
        ColumnCodec::float64("Ratio").with_format("three"),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        ColumnCodec::decimal("Price").with_format("-1"),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_invalid_date_format_is_an_error() {
    assert!(matches!(
        ColumnCodec::date("Day").with_format("%Q"),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        ColumnCodec::datetime("At").with_format("%Y-%Q"),
        Err(Error::Configuration(_))
    ));

    let day = ColumnCodec::new(
        "Day",
        ColumnType::Date {
            format: Some("%Q".to_string()),
        },
    );
    let value = Value::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert!(matches!(day.format(&value), Err(Error::Format(_))));

    let schema = Schema::new().with_column(day).unwrap();
    let err = schema.format_values(&[value], 3, None).unwrap_err();
    assert!(matches!(err, Error::Column { record: 3, .. }));
}

#[test]
fn test_boolean_words() {
    let flag = ColumnCodec::boolean("Flag").with_bool_text("Y", "N");
    assert_eq!(flag.parse("y").unwrap(), Value::Bool(true));
    assert_eq!(flag.parse("N").unwrap(), Value::Bool(false));
    assert_eq!(flag.format(&Value::Bool(true)).unwrap(), "Y");
    assert!(flag.parse("maybe").is_err());
}

#[test]
fn test_dates_and_datetimes() {
    let date = ColumnCodec::date("Day").with_format("%d/%m/%Y").unwrap();
    let expected = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
    assert_eq!(date.parse("25/12/2023").unwrap(), Value::Date(expected));
    assert_eq!(date.format(&Value::Date(expected)).unwrap(), "25/12/2023");

    let stamp = ColumnCodec::datetime("At");
    let parsed = stamp.parse("2023-12-25T08:30:00").unwrap();
    let expected = NaiveDateTime::parse_from_str("2023-12-25 08:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
    assert_eq!(parsed, Value::DateTime(expected));
}

#[test]
fn test_guid_layouts() {
    let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
    let hyphenated = ColumnCodec::guid("Id");
    assert_eq!(hyphenated.format(&Value::Guid(id)).unwrap(), "67e55044-10b1-426f-9247-bb680e5fe0c8");

    let simple = ColumnCodec::guid("Id").with_guid_format(GuidFormat::Simple);
    assert_eq!(simple.format(&Value::Guid(id)).unwrap(), "67e5504410b1426f9247bb680e5fe0c8");
    assert_eq!(simple.parse("67e5504410b1426f9247bb680e5fe0c8").unwrap(), Value::Guid(id));
    assert!(simple.parse("67e55044-10b1-426f-9247-bb680e5fe0c8").is_err());
}

#[test]
fn test_enum_by_number() {
    let status = ColumnCodec::enumeration("Status", &[("Open", 1), ("Closed", 2)])
        .with_enum_format(EnumFormat::Number);
    assert_eq!(status.format(&Value::Enum("Closed".into())).unwrap(), "2");
    assert_eq!(status.parse("1").unwrap(), Value::Enum("Open".into()));
    assert!(status.format(&Value::Enum("Pending".into())).is_err());
}

#[test]
fn test_bytes_as_hex() {
    let blob = ColumnCodec::bytes("Blob", ByteEncoding::Hex);
    assert_eq!(blob.format(&Value::Bytes(vec![0xde, 0xad])).unwrap(), "dead");
    assert_eq!(blob.parse("BEEF").unwrap(), Value::Bytes(vec![0xbe, 0xef]));
    assert!(blob.parse("xyz").is_err());
}

#[test]
fn test_non_nullable_column_with_default() {
    let required = ColumnCodec::int32("Qty").with_nullable(false);
    assert!(required.parse("").is_err());
    assert!(required.format(&Value::Null).is_err());

    let defaulted = ColumnCodec::int32("Qty").with_nullable(false).with_default(0);
    assert_eq!(defaulted.parse("").unwrap(), Value::Int(0));
    assert_eq!(defaulted.format(&Value::Null).unwrap(), "0");
}

#[test]
fn test_constant_null_formatter() {
    let note = ColumnCodec::int32("Note").with_null_formatter(NullFormatter::Constant("N/A".into()));
    assert_eq!(note.parse("n/a").unwrap(), Value::Null);
    assert_eq!(note.format(&Value::Null).unwrap(), "N/A");
    assert!(note.parse("").is_err());
}

#[test]
fn test_hooks_run_in_order() {
    let code = ColumnCodec::string("Code")
        .with_preprocessor(|raw| raw.replace('-', ""))
        .on_parsed(|value| match value {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        })
        .on_formatting(|value| match value {
            Value::String(s) => Value::String(s.to_lowercase()),
            other => other,
        })
        .on_formatted(|text| format!("[{}]", text));

    assert_eq!(code.parse("ab-cd").unwrap(), Value::from("ABCD"));
    assert_eq!(code.format(&Value::from("XY")).unwrap(), "[xy]");
}

struct Celsius;

impl CustomConverter for Celsius {
    fn type_name(&self) -> &'static str {
        "celsius"
    }

    fn parse(&self, text: &str) -> flatfile::Result<Value> {
        let number = text.trim().trim_end_matches("C");
        number
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| Error::conversion(text, "celsius", e))
    }

    fn format(&self, value: &Value) -> flatfile::Result<String> {
        value
            .as_f64()
            .map(|v| format!("{}C", v))
            .ok_or_else(|| Error::format("not a temperature"))
    }
}

#[test]
fn test_custom_converter() {
    let temperature = ColumnCodec::custom("Temp", Arc::new(Celsius));
    assert_eq!(temperature.parse("21.5C").unwrap(), Value::Float(21.5));
    assert_eq!(temperature.format(&Value::Float(-3.0)).unwrap(), "-3C");

    let err = temperature.parse("warm").unwrap_err();
    assert!(err.to_string().contains("celsius"));
}

#[test]
fn test_column_error_handler_on_write() {
    let schema = Schema::new().with_column(ColumnCodec::int32("Id")).unwrap();
    let options = DelimitedOptions::new().with_record_separator("\n");
    let mut writer = DelimitedWriter::with_schema(Vec::new(), schema, options).unwrap();
    writer.on_column_error(|event| {
        assert!(event.value.is_some());
        event.handled = true;
    });
    writer.write(&record!["not a number"]).unwrap();
    let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(text, "\n");
}

#[derive(Debug, Default, PartialEq, Clone)]
struct Order {
    id: i64,
    customer: String,
    shipped: bool,
}

fn order_mapper() -> TypeMapper<Order> {
    TypeMapper::new()
        .map(
            ColumnCodec::int64("Id"),
            |o: &Order| Value::from(o.id),
            |o, v| {
                o.id = i64::try_from(v)?;
                Ok(())
            },
        )
        .map(
            ColumnCodec::string("Customer"),
            |o: &Order| Value::from(o.customer.as_str()),
            |o, v| {
                o.customer = String::try_from(v)?;
                Ok(())
            },
        )
        .map(
            ColumnCodec::boolean("Shipped"),
            |o: &Order| Value::from(o.shipped),
            |o, v| {
                o.shipped = bool::try_from(v)?;
                Ok(())
            },
        )
}

fn orders() -> Vec<Order> {
    vec![
        Order {
            id: 10,
            customer: "Acme, Inc".to_string(),
            shipped: true,
        },
        Order {
            id: 11,
            customer: "Globex".to_string(),
            shipped: false,
        },
    ]
}

#[test]
fn test_mapper_delimited_round_trip() {
    let mapper = order_mapper();
    let options = DelimitedOptions::new()
        .with_record_separator("\n")
        .with_first_record_schema(true);

    let mut writer = DelimitedWriter::with_schema(Vec::new(), mapper.schema().unwrap(), options.clone()).unwrap();
    assert_eq!(mapper.write_all(&mut writer, &orders()).unwrap(), 2);
    let bytes = writer.into_inner().unwrap();
    assert_eq!(
        String::from_utf8(bytes.clone()).unwrap(),
        "Id,Customer,Shipped\n10,\"Acme, Inc\",true\n11,Globex,false\n"
    );

    let mut reader = DelimitedReader::with_schema(bytes.as_slice(), mapper.schema().unwrap(), options).unwrap();
    assert_eq!(mapper.read_all(&mut reader).unwrap(), orders());
}

#[test]
fn test_mapper_fixed_width_round_trip() {
    let mapper = order_mapper();
    let schema = mapper
        .fixed_width_schema(&[Window::new(4), Window::new(12), Window::new(5)])
        .unwrap();
    let options = FixedWidthOptions::new().with_record_separator("\n");

    let mut writer = FixedWidthWriter::new(Vec::new(), schema.clone(), options.clone()).unwrap();
    mapper.write_all(&mut writer, &orders()).unwrap();
    let bytes = writer.into_inner().unwrap();

    let mut reader = FixedWidthReader::new(bytes.as_slice(), schema, options).unwrap();
    assert_eq!(mapper.read_all(&mut reader).unwrap(), orders());

    assert!(mapper.fixed_width_schema(&[Window::new(1)]).is_err());
}

#[test]
fn test_mapper_setter_error_names_column() {
    let mapper = order_mapper();
    let schema = Schema::new()
        .with_column(ColumnCodec::int64("Id"))
        .unwrap()
        .with_column(ColumnCodec::string("Customer"))
        .unwrap()
        .with_column(ColumnCodec::string("Shipped"))
        .unwrap();
    let text = "1,Acme,yes\n";
    let mut reader = DelimitedReader::with_schema(text.as_bytes(), schema, DelimitedOptions::new()).unwrap();

    match mapper.read_all(&mut reader).unwrap_err() {
        Error::Column { column, record, .. } => {
            assert_eq!(column, "Shipped");
            assert_eq!(record, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_mapper_values() {
    let mapper = order_mapper();
    let order = orders().remove(0);
    let values = mapper.to_values(&order);
    assert_eq!(values, record![10i64, "Acme, Inc", true]);
    assert_eq!(mapper.from_values(&values).unwrap(), order);
    assert!(mapper.from_values(&values[..1]).is_err());
}

#[test]
fn test_mapper_skips_ignored_columns() {
    let mapper = TypeMapper::<Order>::new()
        .map(
            ColumnCodec::int64("Id"),
            |o| Value::from(o.id),
            |o, v| {
                o.id = i64::try_from(v)?;
                Ok(())
            },
        )
        .map(
            ColumnCodec::ignored("Filler"),
            |_| Value::Null,
            |_, _| Err(Error::custom("filler has no value")),
        )
        .map(
            ColumnCodec::string("Customer"),
            |o| Value::from(o.customer.as_str()),
            |o, v| {
                o.customer = String::try_from(v)?;
                Ok(())
            },
        );
    let order = Order {
        id: 7,
        customer: "Initech".to_string(),
        shipped: false,
    };
    assert_eq!(mapper.to_values(&order), record![7i64, "Initech"]);

    let options = DelimitedOptions::new().with_record_separator("\n");
    let mut writer = DelimitedWriter::with_schema(Vec::new(), mapper.schema().unwrap(), options.clone()).unwrap();
    mapper.write_all(&mut writer, [&order]).unwrap();
    let bytes = writer.into_inner().unwrap();
    assert_eq!(String::from_utf8(bytes.clone()).unwrap(), "7,,Initech\n");

    let mut reader = DelimitedReader::with_schema(bytes.as_slice(), mapper.schema().unwrap(), options).unwrap();
    assert_eq!(mapper.read_all(&mut reader).unwrap(), vec![order.clone()]);
    assert_eq!(mapper.from_values(&record![7i64, "Initech"]).unwrap(), order);
}
