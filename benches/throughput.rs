use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flatfile::{
    from_delimited_str, from_fixed_width_str, to_delimited_string, to_fixed_width_string,
    ColumnCodec, Decimal, DelimitedOptions, FixedWidthOptions, FixedWidthSchema, Schema, Value,
    Window,
};

fn products_schema() -> Schema {
    Schema::new()
        .with_column(ColumnCodec::int32("Id"))
        .unwrap()
        .with_column(ColumnCodec::string("Name"))
        .unwrap()
        .with_column(ColumnCodec::decimal("Price"))
        .unwrap()
        .with_column(ColumnCodec::boolean("Active"))
        .unwrap()
}

fn products_fixed_width_schema() -> FixedWidthSchema {
    FixedWidthSchema::new()
        .with_column(ColumnCodec::int32("Id"), Window::new(8))
        .unwrap()
        .with_column(ColumnCodec::string("Name"), Window::new(20))
        .unwrap()
        .with_column(ColumnCodec::decimal("Price"), Window::new(10))
        .unwrap()
        .with_column(ColumnCodec::boolean("Active"), Window::new(5))
        .unwrap()
}

fn products(count: usize) -> Vec<Vec<Value>> {
    (0..count)
        .map(|i| {
            vec![
                Value::Int(i as i64),
                Value::from(format!("Product, no. {}", i)),
                Value::Decimal(Decimal::new(999 + i as i64, 2)),
                Value::Bool(i % 2 == 0),
            ]
        })
        .collect()
}

fn delimited_options() -> DelimitedOptions {
    DelimitedOptions::new().with_record_separator("\n")
}

fn fixed_width_options() -> FixedWidthOptions {
    FixedWidthOptions::new().with_record_separator("\n")
}

fn benchmark_write_delimited(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_delimited");
    let schema = products_schema();

    for size in [10, 100, 1000].iter() {
        let records = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_delimited_string(black_box(&records), &schema, delimited_options()))
        });
    }
    group.finish();
}

fn benchmark_read_delimited(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_delimited");
    let schema = products_schema();

    for size in [10, 100, 1000].iter() {
        let text = to_delimited_string(&products(*size), &schema, delimited_options()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| from_delimited_str(black_box(&text), &schema, delimited_options()))
        });
    }
    group.finish();
}

fn benchmark_read_multichar_separator(c: &mut Criterion) {
    let schema = products_schema();
    let options = DelimitedOptions::new()
        .with_separator("<>")
        .with_record_separator("<EOR>");
    let text = to_delimited_string(&products(500), &schema, options.clone()).unwrap();

    c.bench_function("read_delimited_multichar_separator", |b| {
        b.iter(|| from_delimited_str(black_box(&text), &schema, options.clone()))
    });
}

fn benchmark_write_fixed_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_fixed_width");
    let schema = products_fixed_width_schema();

    for size in [10, 100, 1000].iter() {
        let records = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_fixed_width_string(black_box(&records), &schema, fixed_width_options()))
        });
    }
    group.finish();
}

fn benchmark_read_fixed_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_fixed_width");
    let schema = products_fixed_width_schema();

    for size in [10, 100, 1000].iter() {
        let text =
            to_fixed_width_string(&products(*size), &schema, fixed_width_options()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| from_fixed_width_str(black_box(&text), &schema, fixed_width_options()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_write_delimited,
    benchmark_read_delimited,
    benchmark_read_multichar_separator,
    benchmark_write_fixed_width,
    benchmark_read_fixed_width
);
criterion_main!(benches);
