use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use havencart::models::{CatalogEntry, CreateProductRequest, PageRequest, Product, ProductFilters};
use havencart::repositories::InMemoryDocumentRepository;
use havencart::services::ProductService;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const CATEGORIES: [&str; 4] = ["Kitchen", "Dining", "Living", "Garden"];

fn build_products(count: usize) -> Vec<Product> {
    (0..count)
        .map(|i| {
            Product::from_request(CreateProductRequest {
                name: format!("Benchmark Product {}", i),
                description: format!("Description for benchmark product {}", i),
                price: dec!(9.99) + Decimal::new(i as i64 % 500, 1),
                category: CATEGORIES[i % CATEGORIES.len()].to_string(),
                stock: (i % 7) as u32,
                images: vec![format!("products/bench-{}.jpg", i)],
                is_featured: i % 10 == 0,
                is_new_arrival: i % 5 == 0,
                on_sale: false,
            })
        })
        .collect()
}

fn combined_filters() -> ProductFilters {
    ProductFilters {
        category: Some("kitchen".to_string()),
        search: Some("product 1".to_string()),
        min_price: Some(dec!(10)),
        max_price: Some(dec!(40)),
        in_stock_only: Some(true),
        featured: None,
    }
}

fn bench_filter_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("product_filter_matching");
    group.measurement_time(Duration::from_secs(5));

    for dataset_size in [100, 1000, 10000].iter() {
        let products = build_products(*dataset_size);
        let filters = combined_filters();

        group.bench_with_input(
            BenchmarkId::new("dataset_size", dataset_size),
            &products,
            |b, products| {
                b.iter(|| {
                    black_box(
                        products
                            .iter()
                            .filter(|product| product.matches_filters(&filters))
                            .count(),
                    )
                })
            },
        );
    }
    group.finish();
}

fn bench_asset_resolution(c: &mut Criterion) {
    let products = build_products(1000);

    c.bench_function("resolve_product_assets_1000", |b| {
        b.iter(|| {
            let resolved: Vec<Product> = products
                .iter()
                .map(|product| product.with_resolved_assets("https://cdn.example.com/"))
                .collect();
            black_box(resolved)
        })
    });
}

fn bench_service_listing(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("product_service_list");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(10));

    for dataset_size in [100, 1000].iter() {
        let service = rt.block_on(async {
            let repository = Arc::new(InMemoryDocumentRepository::<Product>::new());
            let service = ProductService::new(repository);
            for product in build_products(*dataset_size) {
                let request = CreateProductRequest {
                    name: product.name,
                    description: product.description,
                    price: product.price,
                    category: product.category,
                    stock: product.stock,
                    images: product.images,
                    is_featured: product.is_featured,
                    is_new_arrival: product.is_new_arrival,
                    on_sale: product.on_sale,
                };
                let _ = service.create(request).await;
            }
            service
        });

        group.bench_with_input(
            BenchmarkId::new("combined_filters", dataset_size),
            &service,
            |b, service| {
                b.iter(|| {
                    rt.block_on(async {
                        black_box(
                            service
                                .list(combined_filters(), PageRequest::new(0, 20))
                                .await
                                .ok(),
                        )
                    })
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_filter_matching,
    bench_asset_resolution,
    bench_service_listing
);
criterion_main!(benches);
