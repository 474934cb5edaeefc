//! SRV and address resolution backed by hickory-dns.
//!
//! This is the default [`ServiceResolve`] backend. It reads the system DNS
//! configuration (`/etc/resolv.conf` and friends) and talks to the
//! configured name servers directly, fully async.
//!
//! # Error mapping
//!
//! | hickory                                  | [`ResolveError`] |
//! |------------------------------------------|------------------|
//! | no records found, response code NOERROR  | `NoData`         |
//! | no records found, response code NXDOMAIN | `NotFound`       |
//! | timeout                                  | `Timeout`        |
//! | anything else                            | `Failed`         |

use super::{AddressRecord, Name, ResolvingAddresses, ResolvingService, ServiceResolve, SrvTarget};
use crate::base::lookuperror::ResolveError;
use hickory_resolver::{
    config::ResolverConfig,
    lookup::Lookup,
    name_server::TokioConnectionProvider,
    proto::{op::ResponseCode, rr::RData, ProtoErrorKind},
    ResolveErrorKind, TokioResolver,
};
use std::sync::{Arc, LazyLock};

/// [`ServiceResolve`] implementation backed by hickory-dns.
///
/// [`HickoryServiceResolver::new`] shares one lazily-initialized resolver
/// across all instances; [`HickoryServiceResolver::with_resolver`] wraps a
/// caller-configured one, e.g. for custom DNS infrastructure.
///
/// # Example
///
/// ```rust,ignore
/// use srvlookup::dns::{HickoryServiceResolver, Name, ServiceResolve};
///
/// let resolver = HickoryServiceResolver::new();
/// let targets = resolver.resolve_service(Name::new("_http._tcp.example.com")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HickoryServiceResolver {
    resolver: Arc<TokioResolver>,
}

impl HickoryServiceResolver {
    /// Creates a resolver using the system DNS configuration.
    ///
    /// The underlying resolver is built on first use. If the system
    /// configuration cannot be read it falls back to hickory's defaults.
    pub fn new() -> Self {
        static RESOLVER: LazyLock<Arc<TokioResolver>> = LazyLock::new(|| {
            let builder = match TokioResolver::builder_tokio() {
                Ok(builder) => {
                    tracing::debug!("Using system DNS configuration");
                    builder
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Failed to read system DNS config, using defaults"
                    );
                    TokioResolver::builder_with_config(
                        ResolverConfig::default(),
                        TokioConnectionProvider::default(),
                    )
                }
            };

            Arc::new(builder.build())
        });

        Self {
            resolver: Arc::clone(&RESOLVER),
        }
    }

    /// Wraps an already-configured hickory resolver.
    pub fn with_resolver(resolver: TokioResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

impl Default for HickoryServiceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceResolve for HickoryServiceResolver {
    fn resolve_service(&self, hostname: Name) -> ResolvingService {
        let resolver = Arc::clone(&self.resolver);
        Box::pin(async move {
            let domain = hostname.as_str();
            tracing::debug!(domain = %domain, "SRV lookup via hickory-dns");

            let lookup = resolver
                .srv_lookup(domain)
                .await
                .map_err(|e| map_error(domain, e))?;

            let targets: Vec<SrvTarget> = lookup
                .iter()
                .map(|srv| {
                    let name = srv.target().to_utf8();
                    SrvTarget::new(name.trim_end_matches('.'), srv.port())
                        .with_priority(srv.priority(), srv.weight())
                })
                .collect();

            tracing::debug!(domain = %domain, count = targets.len(), "SRV lookup complete");
            Ok(targets)
        })
    }

    fn resolve_addresses(&self, hostname: Name) -> ResolvingAddresses {
        let resolver = Arc::clone(&self.resolver);
        Box::pin(async move {
            let domain = hostname.as_str();
            tracing::debug!(domain = %domain, "A lookup via hickory-dns");

            let lookup = resolver
                .ipv4_lookup(domain)
                .await
                .map_err(|e| map_error(domain, e))?;

            let records = address_records(lookup.as_lookup());

            tracing::debug!(domain = %domain, count = records.len(), "A lookup complete");
            Ok(records)
        })
    }
}

/// Walk the raw answer so each address keeps its own TTL; CNAME records
/// along the chain are skipped.
fn address_records(lookup: &Lookup) -> Vec<AddressRecord> {
    lookup
        .record_iter()
        .filter_map(|record| match record.data() {
            RData::A(a) => Some(AddressRecord::new(a.0, Some(record.ttl()))),
            _ => None,
        })
        .collect()
}

fn map_error(domain: &str, err: hickory_resolver::ResolveError) -> ResolveError {
    let name = domain.to_string();
    if let ResolveErrorKind::Proto(proto) = err.kind() {
        match proto.kind() {
            ProtoErrorKind::NoRecordsFound { response_code, .. } => {
                return if *response_code == ResponseCode::NXDomain {
                    ResolveError::NotFound { name }
                } else {
                    ResolveError::NoData { name }
                };
            }
            ProtoErrorKind::Timeout => return ResolveError::Timeout { name },
            _ => {}
        }
    }
    tracing::debug!(domain = %domain, error = %err, "hickory-dns lookup failed");
    ResolveError::failed(name, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::proto::{
        op::Query,
        rr::{
            rdata::{A, CNAME},
            Name as DnsName, Record, RecordType,
        },
        ProtoError,
    };
    use std::net::Ipv4Addr;

    fn no_records(code: ResponseCode) -> hickory_resolver::ResolveError {
        let query = Query::query(DnsName::from_ascii("svc.example.").unwrap(), RecordType::A);
        ProtoError::nx_error(Box::new(query), None, None, None, code, false, None).into()
    }

    #[test]
    fn test_noerror_without_records_is_no_data() {
        let err = map_error("svc.example", no_records(ResponseCode::NoError));
        assert!(err.is_no_data());
        assert_eq!(err.name(), "svc.example");
    }

    #[test]
    fn test_nxdomain_is_not_found() {
        let err = map_error("svc.example", no_records(ResponseCode::NXDomain));
        assert!(matches!(err, ResolveError::NotFound { ref name } if name == "svc.example"));
    }

    #[test]
    fn test_timeout_is_classified() {
        let err = map_error("svc.example", ProtoError::from(ProtoErrorKind::Timeout).into());
        assert!(matches!(err, ResolveError::Timeout { .. }));
    }

    #[test]
    fn test_other_errors_are_failed() {
        let err = map_error(
            "svc.example",
            ProtoError::from(ProtoErrorKind::Message("refused")).into(),
        );
        assert!(matches!(err, ResolveError::Failed { .. }));
        assert!(!err.is_no_data());
    }

    #[test]
    fn test_address_records_keep_ttl_and_skip_cname() {
        let alias = DnsName::from_ascii("1.svc.example.").unwrap();
        let canonical = DnsName::from_ascii("host.svc.example.").unwrap();
        let records: Vec<Record> = vec![
            Record::from_rdata(alias.clone(), 300, RData::CNAME(CNAME(canonical.clone()))),
            Record::from_rdata(canonical.clone(), 30, RData::A(A(Ipv4Addr::new(10, 0, 0, 1)))),
            Record::from_rdata(canonical, 0, RData::A(A(Ipv4Addr::new(10, 0, 0, 2)))),
        ];
        let lookup = Lookup::new_with_max_ttl(Query::query(alias, RecordType::A), records.into());

        assert_eq!(
            address_records(&lookup),
            vec![
                AddressRecord::new(Ipv4Addr::new(10, 0, 0, 1), Some(30)),
                AddressRecord::new(Ipv4Addr::new(10, 0, 0, 2), Some(0)),
            ]
        );
    }

    #[test]
    fn test_default_resolvers_share_backend() {
        let r1 = HickoryServiceResolver::new();
        let r2 = HickoryServiceResolver::default();
        assert!(Arc::ptr_eq(&r1.resolver, &r2.resolver));
    }

    #[test]
    fn test_custom_resolver_is_separate() {
        let custom = TokioResolver::builder_with_config(
            ResolverConfig::default(),
            TokioConnectionProvider::default(),
        )
        .build();
        let r1 = HickoryServiceResolver::with_resolver(custom);
        let r2 = HickoryServiceResolver::new();
        assert!(!Arc::ptr_eq(&r1.resolver, &r2.resolver));
    }

    #[tokio::test]
    async fn test_invalid_domain_reports_name() {
        let resolver = HickoryServiceResolver::new();
        let result = resolver
            .resolve_service(Name::new("this-domain-definitely-does-not-exist.invalid"))
            .await;

        // NXDOMAIN, a timeout or a transport failure depending on network access.
        match result {
            Err(err) => assert_eq!(err.name(), "this-domain-definitely-does-not-exist.invalid"),
            Ok(targets) => assert!(targets.is_empty()),
        }
    }
}
