use chrono::NaiveDate;
use flatfile::{
    record, Alignment, ColumnCodec, Error, FixedWidthOptions, FixedWidthReader, FixedWidthSchema,
    FixedWidthWriter, RecordReader, RecordWriter, SchemaSelector, TruncationPolicy, Value, Window,
};

fn people() -> FixedWidthSchema {
    FixedWidthSchema::new()
        .with_column(ColumnCodec::int32("Id"), Window::new(10))
        .unwrap()
        .with_column(ColumnCodec::string("Name"), Window::new(25))
        .unwrap()
}

fn unix() -> FixedWidthOptions {
    FixedWidthOptions::new().with_record_separator("\n")
}

fn write_all(schema: FixedWidthSchema, options: FixedWidthOptions, records: &[Vec<Value>]) -> String {
    let mut writer = FixedWidthWriter::new(Vec::new(), schema, options).unwrap();
    for record in records {
        writer.write(record).unwrap();
    }
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

#[test]
fn test_round_trip_id_and_name() {
    let records = vec![record![1, "Bob"], record![2, "Alice"]];
    let text = write_all(people(), unix(), &records);
    assert_eq!(text.lines().next().map(str::len), Some(35));

    let back = flatfile::from_fixed_width_str(&text, &people(), unix()).unwrap();
    assert_eq!(back, records);
}

#[test]
fn test_empty_input_yields_no_records() {
    let separated = FixedWidthOptions::new();
    let unseparated = FixedWidthOptions::new().with_record_separator_present(false);
    for options in [separated, unseparated] {
        let mut reader = FixedWidthReader::new("".as_bytes(), people(), options).unwrap();
        assert!(!reader.read().unwrap());
        assert!(!reader.read().unwrap());
        assert_eq!(reader.physical_record_number(), 0);
        assert!(reader.get_values().is_err());
    }
}

#[test]
fn test_truncation_policies() {
    let leading = FixedWidthSchema::new()
        .with_column(ColumnCodec::string("Fruit"), Window::new(5))
        .unwrap();
    assert_eq!(write_all(leading, unix(), &[record!["Pineapple"]]), "apple\n");

    let trailing = FixedWidthSchema::new()
        .with_column(
            ColumnCodec::string("Fruit"),
            Window::new(5).with_truncation(TruncationPolicy::TruncateTrailing),
        )
        .unwrap();
    assert_eq!(write_all(trailing, unix(), &[record!["Pineapple"]]), "Pinea\n");

    let by_option = FixedWidthSchema::new()
        .with_column(ColumnCodec::string("Fruit"), Window::new(5))
        .unwrap();
    let options = unix().with_truncation_policy(TruncationPolicy::TruncateTrailing);
    assert_eq!(write_all(by_option, options, &[record!["Pineapple"]]), "Pinea\n");
}

#[test]
fn test_alignment_and_fill() {
    let schema = FixedWidthSchema::new()
        .with_column(
            ColumnCodec::int32("Amount"),
            Window::new(6).with_alignment(Alignment::Right).with_fill('0'),
        )
        .unwrap()
        .with_column(ColumnCodec::string("Code"), Window::new(4))
        .unwrap();
    let text = write_all(schema.clone(), unix().with_fill_character('.'), &[record![42, "AB"]]);
    assert_eq!(text, "000042AB..\n");

    let back = flatfile::from_fixed_width_str(&text, &schema, unix().with_fill_character('.')).unwrap();
    assert_eq!(back, vec![record![42, "AB"]]);
}

#[test]
fn test_options_alignment_applies_to_windows_without_one() {
    let schema = FixedWidthSchema::new()
        .with_column(ColumnCodec::string("Code"), Window::new(4))
        .unwrap();
    let text = write_all(schema, unix().with_alignment(Alignment::Right), &[record!["AB"]]);
    assert_eq!(text, "  AB\n");
}

#[test]
fn test_width_mismatch_is_an_error() {
    let text = "1         Bob                      \n2 short\n";
    let mut reader = FixedWidthReader::new(text.as_bytes(), people(), unix()).unwrap();
    assert!(reader.read().unwrap());
    let err = reader.read().unwrap_err();
    assert!(matches!(
        err,
        Error::RecordWidth {
            record: 2,
            expected: 35,
            found: 7
        }
    ));
    assert!(matches!(reader.read(), Err(Error::InvalidState(_))));
}

#[test]
fn test_handled_width_mismatch_skips_record() {
    let text = "bad\n1         Bob                      \n";
    let mut reader = FixedWidthReader::new(text.as_bytes(), people(), unix()).unwrap();
    reader.on_record_error(|event| event.handled = event.error.is_record_shape());

    assert!(reader.read().unwrap());
    assert_eq!(reader.get_values().unwrap(), &record![1, "Bob"][..]);
    assert_eq!(reader.physical_record_number(), 2);
    assert_eq!(reader.logical_record_number(), 1);
}

#[test]
fn test_records_without_separator() {
    let schema = FixedWidthSchema::new()
        .with_column(ColumnCodec::int32("Id"), Window::new(3))
        .unwrap()
        .with_column(ColumnCodec::char("Flag"), Window::new(1))
        .unwrap();
    let options = FixedWidthOptions::new().with_record_separator_present(false);

    let text = write_all(schema.clone(), options.clone(), &[record![1, 'Y'], record![22, 'N']]);
    assert_eq!(text, "1  Y22 N");

    let back = flatfile::from_fixed_width_str(&text, &schema, options).unwrap();
    assert_eq!(back, vec![record![1, 'Y'], record![22, 'N']]);
}

#[test]
fn test_short_final_record_without_separator() {
    let schema = FixedWidthSchema::new()
        .with_column(ColumnCodec::string("A"), Window::new(4))
        .unwrap();
    let options = FixedWidthOptions::new().with_record_separator_present(false);
    let err = flatfile::from_fixed_width_str("abcdef", &schema, options).unwrap_err();
    assert!(matches!(err, Error::RecordWidth { record: 2, found: 2, .. }));
}

#[test]
fn test_header_is_written_and_skipped() {
    let options = unix().with_first_record_header(true);
    let text = write_all(people(), options.clone(), &[record![5, "Eve"]]);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Id        Name                     "));

    let mut reader = FixedWidthReader::new(text.as_bytes(), people(), options).unwrap();
    assert!(reader.read().unwrap());
    assert_eq!(reader.get_values().unwrap(), &record![5, "Eve"][..]);
    assert_eq!(reader.physical_record_number(), 2);
    assert!(!reader.read().unwrap());
}

#[test]
fn test_preserved_whitespace_keeps_fill() {
    let schema = FixedWidthSchema::new()
        .with_column(ColumnCodec::string("Name").with_trim(false), Window::new(5))
        .unwrap();
    let options = unix().with_preserve_whitespace(true);
    let records = flatfile::from_fixed_width_str("ab   \n", &schema, options).unwrap();
    assert_eq!(records, vec![record!["ab   "]]);
}

#[test]
fn test_blank_window_is_null() {
    let schema = FixedWidthSchema::new()
        .with_column(ColumnCodec::date("When"), Window::new(10))
        .unwrap();
    let text = write_all(
        schema.clone(),
        unix(),
        &[
            vec![Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())],
            record![null],
        ],
    );
    assert_eq!(text, "2024-02-29\n          \n");

    let back = flatfile::from_fixed_width_str(&text, &schema, unix()).unwrap();
    assert_eq!(back[1], record![null]);
}

#[test]
fn test_write_raw_and_comment() {
    let mut writer = FixedWidthWriter::new(Vec::new(), people(), unix()).unwrap();
    writer.write_comment("#").unwrap();
    writer.write_raw(&["7", "Raw"]).unwrap();
    assert!(matches!(writer.write_raw(&["only one"]), Err(Error::FieldCount { .. })));
    let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(text, "#\n7         Raw                      \n");
}

#[test]
fn test_write_schema_after_records_fails() {
    let mut writer = FixedWidthWriter::new(Vec::new(), people(), unix()).unwrap();
    writer.write(&record![1, "a"]).unwrap();
    assert!(matches!(writer.write_schema(), Err(Error::InvalidState(_))));
}

#[test]
fn test_selector_by_record_type() {
    let header = FixedWidthSchema::new()
        .with_column(ColumnCodec::string("Type"), Window::new(1))
        .unwrap()
        .with_column(ColumnCodec::date("Date"), Window::new(10))
        .unwrap();
    let detail = FixedWidthSchema::new()
        .with_column(ColumnCodec::string("Type"), Window::new(1))
        .unwrap()
        .with_column(ColumnCodec::int32("Qty"), Window::new(4).with_alignment(Alignment::Right))
        .unwrap();
    let selector = SchemaSelector::new()
        .when(|line: &str| line.starts_with('H'), header)
        .otherwise(detail);

    let text = "H2024-03-01\nD  12\nD   3\n";
    let mut reader = FixedWidthReader::with_selector(text.as_bytes(), selector, unix()).unwrap();

    assert!(reader.read().unwrap());
    assert_eq!(reader.fixed_width_schema().unwrap().total_width(), 11);

    let mut total = 0;
    while reader.read().unwrap() {
        total += reader.get_values().unwrap()[1].as_i64().unwrap();
    }
    assert_eq!(total, 15);
}

#[test]
fn test_selector_requires_separator() {
    let selector: SchemaSelector<str, FixedWidthSchema> = SchemaSelector::new().otherwise(people());
    let options = FixedWidthOptions::new().with_record_separator_present(false);
    assert!(matches!(
        FixedWidthReader::with_selector("".as_bytes(), selector, options),
        Err(Error::Configuration(_))
    ));
}
