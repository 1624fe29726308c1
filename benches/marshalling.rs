use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use yamlish::{from_str, json, parse_value, schema, to_string, write_value, StringStyle};

schema! {
    pub struct User {
        pub id: u32 = 0,
        pub name: String = String::new(),
        pub email: String = String::new(),
        pub active: bool = false,
    }
}

schema! {
    pub struct Product {
        pub sku: String = String::new(),
        pub name: String = String::new(),
        pub price: f64 = 0.0,
        pub quantity: u32 = 0,
    }
}

schema! {
    pub struct Metadata {
        pub created: String = String::new(),
        pub updated: String = String::new(),
        pub version: u32 = 0,
    }
}

schema! {
    pub struct NestedData {
        pub id: u32 = 0,
        pub metadata: Metadata = Metadata::default(),
        pub tags: Vec<String> = Vec::new(),
    }
}

schema! {
    pub struct Catalog {
        pub products: Vec<Product> = Vec::new(),
    }
}

schema! {
    pub struct Banner {
        pub motd: String = String::new() => with_style(StringStyle::LiteralAutoClipped),
    }
}

fn sample_user() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    }
}

fn sample_catalog(size: u32) -> Catalog {
    Catalog {
        products: (0..size)
            .map(|i| Product {
                sku: format!("SKU{}", i),
                name: format!("Product {}", i),
                price: 9.99 + f64::from(i),
                quantity: i,
            })
            .collect(),
    }
}

fn sample_nested() -> NestedData {
    NestedData {
        id: 42,
        metadata: Metadata {
            created: "2023-01-01T00:00:00Z".to_string(),
            updated: "2023-12-31T23:59:59Z".to_string(),
            version: 3,
        },
        tags: vec![
            "important".to_string(),
            "verified".to_string(),
            "production".to_string(),
        ],
    }
}

fn benchmark_write_simple(c: &mut Criterion) {
    let user = sample_user();

    c.bench_function("write_simple_struct", |b| {
        b.iter(|| to_string(black_box(&user)))
    });
}

fn benchmark_read_simple(c: &mut Criterion) {
    let text = "id: 123\nname: Alice\nemail: alice@example.com\nactive: true\n";

    c.bench_function("read_simple_struct", |b| {
        b.iter(|| from_str::<User>(black_box(text)))
    });
}

fn benchmark_write_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_sequence");

    for size in [10, 50, 100, 500].iter() {
        let catalog = sample_catalog(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&catalog)))
        });
    }
    group.finish();
}

fn benchmark_read_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_sequence");

    for size in [10, 50, 100, 500].iter() {
        let text = to_string(&sample_catalog(*size)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str::<Catalog>(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_write_nested(c: &mut Criterion) {
    let data = sample_nested();

    c.bench_function("write_nested_struct", |b| {
        b.iter(|| to_string(black_box(&data)))
    });
}

fn benchmark_read_nested(c: &mut Criterion) {
    let text = to_string(&sample_nested()).unwrap();

    c.bench_function("read_nested_struct", |b| {
        b.iter(|| from_str::<NestedData>(black_box(&text)))
    });
}

fn benchmark_string_styles(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_styles");

    let plain = Banner {
        motd: "a single plain line".to_string(),
    };
    let multiline = Banner {
        motd: "first line\nsecond line\nthird line\n".to_string(),
    };
    let awkward = Banner {
        motd: "needs: quoting\tand \"escapes\"".to_string(),
    };

    group.bench_function("plain", |b| b.iter(|| to_string(black_box(&plain))));
    group.bench_function("block", |b| b.iter(|| to_string(black_box(&multiline))));
    group.bench_function("quoted", |b| b.iter(|| to_string(black_box(&awkward))));

    group.finish();
}

fn benchmark_dynamic_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic");

    let text = to_string(&sample_catalog(50)).unwrap();
    group.bench_function("parse", |b| b.iter(|| parse_value(black_box(&text))));

    let value = parse_value(&text).unwrap();
    group.bench_function("write", |b| b.iter(|| write_value(black_box(&value))));

    group.finish();
}

fn benchmark_dialect_comparison(c: &mut Criterion) {
    let user = sample_user();

    let mut group = c.benchmark_group("dialects");

    group.bench_function("yaml_write", |b| b.iter(|| to_string(black_box(&user))));

    group.bench_function("json_write", |b| {
        b.iter(|| json::to_string(black_box(&user)))
    });

    let yaml_text = to_string(&user).unwrap();
    let json_text = json::to_string(&user).unwrap();

    group.bench_function("yaml_read", |b| {
        b.iter(|| from_str::<User>(black_box(&yaml_text)))
    });

    group.bench_function("json_read", |b| {
        b.iter(|| json::from_str::<User>(black_box(&json_text)))
    });

    group.finish();
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let user = sample_user();

    c.bench_function("roundtrip_simple", |b| {
        b.iter(|| {
            let text = to_string(black_box(&user)).unwrap();
            let _back: User = from_str(black_box(&text)).unwrap().value;
        })
    });
}

criterion_group!(
    benches,
    benchmark_write_simple,
    benchmark_read_simple,
    benchmark_write_sequence,
    benchmark_read_sequence,
    benchmark_write_nested,
    benchmark_read_nested,
    benchmark_string_styles,
    benchmark_dynamic_values,
    benchmark_dialect_comparison,
    benchmark_roundtrip
);
criterion_main!(benches);
