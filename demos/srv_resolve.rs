use srvlookup::dns::Origin;
use srvlookup::srv::TracingObserver;
use srvlookup::{LookupOptions, SrvLookup};
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "srvlookup=debug".into()),
        )
        .init();

    let origin = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://_xmpp-server._tcp.jabber.org".to_string());
    let origin = Origin::parse(&origin)?;

    let lookup = SrvLookup::builder()
        .dedupe(true)
        .observer(TracingObserver)
        .build();
    let options = LookupOptions::new(Duration::from_secs(10));

    println!("=== Concurrent lookups for {} ===", origin);
    let start = Instant::now();
    let (first, second) = tokio::join!(
        lookup.lookup(&origin, &options),
        lookup.lookup(&origin, &options)
    );
    println!("Time: {:?}", start.elapsed());

    for endpoint in first? {
        println!("{} ttl={}ms", endpoint.socket_addr(), endpoint.ttl_millis());
    }
    println!("Second caller saw {} endpoints", second?.len());

    Ok(())
}
