use criterion::{black_box, criterion_group, criterion_main, Criterion};
use srvlookup::dns::{
    AddressRecord, Name, Origin, ResolvingAddresses, ResolvingService, ServiceResolve, SrvTarget,
};
use srvlookup::srv::ttl::normalize_ttl;
use srvlookup::{LookupOptions, SrvLookup};
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::runtime::Runtime;

/// In-memory resolver: four targets with four addresses each.
struct MemoryResolver;

impl ServiceResolve for MemoryResolver {
    fn resolve_service(&self, _hostname: Name) -> ResolvingService {
        Box::pin(async {
            Ok((1..=4)
                .map(|i| SrvTarget::new(format!("{i}.svc.example"), 9000 + i))
                .collect())
        })
    }

    fn resolve_addresses(&self, _hostname: Name) -> ResolvingAddresses {
        Box::pin(async {
            Ok((1..=4)
                .map(|i| AddressRecord::new(Ipv4Addr::new(10, 0, 0, i), Some(30)))
                .collect())
        })
    }
}

/// Pipeline and single-flight overhead without network I/O.
fn benchmark_lookup(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let origin = Origin::parse("http://svc.example").unwrap();
    let options = LookupOptions::default();

    let plain = SrvLookup::builder().resolver(MemoryResolver).build();
    c.bench_function("lookup_fan_out", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(plain.lookup(&origin, &options).await.unwrap()) })
    });

    let deduped = SrvLookup::builder()
        .resolver(MemoryResolver)
        .dedupe(true)
        .build();
    c.bench_function("lookup_fan_out_dedupe", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(deduped.lookup(&origin, &options).await.unwrap()) })
    });

    c.bench_function("normalize_ttl", |b| {
        b.iter(|| black_box(normalize_ttl(black_box(Some(30)), Duration::from_secs(10))))
    });
}

criterion_group!(benches, benchmark_lookup);
criterion_main!(benches);
