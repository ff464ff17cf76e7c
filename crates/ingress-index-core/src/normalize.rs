//! Normalization of raw Ingress objects into endpoint records.
//!
//! Pure functions only: the watch layer reduces whatever the cluster
//! hands it to a [`RawIngress`] and this module decides whether that
//! shape is representable as an [`EndpointRecord`].

use std::collections::HashSet;

use url::Url;

use crate::error::NormalizeError;
use crate::record::EndpointRecord;

/// The inbound shape of a watched Ingress: identity plus the two spec
/// sections the address derivation cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIngress {
    pub namespace: String,
    pub name: String,
    /// Hostnames declared under the object's TLS section.
    pub tls_hosts: Vec<String>,
    /// Hosts of the object's rules, in declared order.
    pub rule_hosts: Vec<String>,
}

impl RawIngress {
    pub fn new(namespace: &str, name: &str, tls_hosts: &[&str], rule_hosts: &[&str]) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            tls_hosts: tls_hosts.iter().map(|h| h.to_string()).collect(),
            rule_hosts: rule_hosts.iter().map(|h| h.to_string()).collect(),
        }
    }
}

/// Derive an endpoint record, or fail with
/// [`NormalizeError::EmptyAddress`] when no rule yields a usable URL.
///
/// Scheme selection: `https` when `force_tls` is set or the rule host
/// appears in the TLS section, `http` otherwise. Only the first rule
/// producing a valid, non-loopback URL is used; multiple addresses per
/// object are out of scope.
pub fn normalize(raw: &RawIngress, force_tls: bool) -> Result<EndpointRecord, NormalizeError> {
    let address = derive_address(raw, force_tls).ok_or(NormalizeError::EmptyAddress)?;
    Ok(EndpointRecord {
        namespace: raw.namespace.clone(),
        name: raw.name.clone(),
        address,
    })
}

fn derive_address(raw: &RawIngress, force_tls: bool) -> Option<String> {
    let tls_hosts: HashSet<&str> = raw.tls_hosts.iter().map(String::as_str).collect();

    for host in &raw.rule_hosts {
        let scheme = if force_tls || tls_hosts.contains(host.as_str()) {
            "https"
        } else {
            "http"
        };
        let candidate = format!("{scheme}://{host}");

        // Validate without reformatting: `Url::to_string` would append
        // a trailing slash, and the rendered link should stay exactly
        // scheme://host.
        let Ok(url) = Url::parse(&candidate) else {
            continue;
        };
        let Some(parsed_host) = url.host_str() else {
            continue;
        };
        if parsed_host.is_empty() {
            continue;
        }
        // Loopback alias, e.g. localhost:8080 from a dev manifest.
        // Checked on the rule text rather than the parsed URL: parsed
        // URLs hide scheme-default ports, so localhost:443 would
        // otherwise slip through. Bare `localhost` stays accepted.
        if host.starts_with("localhost:") {
            continue;
        }

        return Some(candidate);
    }
    None
}
