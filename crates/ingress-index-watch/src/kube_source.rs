//! Kubernetes-backed event source.
//!
//! The only module that knows about the cluster. Each namespace gets
//! its own `kube::runtime::watcher` over the Ingress API; reconnects,
//! backoff, and re-listing are the watcher's job and surface here as
//! ordinary events, never as a distinct code path.

use std::time::Duration;

use futures::TryStreamExt;
use k8s_openapi::api::networking::v1::Ingress;
use kube::Api;
use kube::runtime::watcher::{self, Config, Event};
use tracing::{info, warn};

use ingress_index_core::RawIngress;

use crate::dispatcher::Dispatcher;
use crate::event::IngressEvent;

/// Per-namespace Ingress watch backed by the cluster API.
#[derive(Clone)]
pub struct KubeSource {
    client: kube::Client,
    resync: Duration,
}

impl KubeSource {
    pub fn new(client: kube::Client, resync: Duration) -> Self {
        Self { client, resync }
    }

    /// Watch one namespace for the lifetime of the process, feeding
    /// every notification through `dispatcher`.
    ///
    /// Bounding the watch session to the resync interval makes the
    /// watcher re-list on expiry, which replays the full state and
    /// heals from missed events.
    pub async fn run(self, namespace: String, dispatcher: Dispatcher) {
        let api: Api<Ingress> = Api::namespaced(self.client.clone(), &namespace);
        // The API server caps watch timeouts at around five minutes.
        let config = Config::default().timeout(self.resync.as_secs().min(300) as u32);

        info!(%namespace, resync_secs = self.resync.as_secs(), "watching ingresses");

        let mut events = std::pin::pin!(watcher::watcher(api, config));
        loop {
            match events.try_next().await {
                Ok(Some(event)) => {
                    if let Some(event) = convert(event) {
                        dispatcher.apply(event).await;
                    }
                }
                Ok(None) => {
                    warn!(%namespace, "watch stream ended");
                    break;
                }
                Err(err) => {
                    // The watcher restarts itself; nothing to do here
                    // beyond surfacing the error.
                    warn!(%namespace, error = %err, "ingress watch error");
                }
            }
        }
    }
}

/// Reduce a watcher notification to at most one dispatchable event.
///
/// Re-list pages arrive as `InitApply` and are treated as adds; live
/// changes arrive as `Apply` and are treated as updates (both funnel
/// into the same upsert). Marker events carry no object.
fn convert(event: Event<Ingress>) -> Option<IngressEvent> {
    match event {
        Event::InitApply(obj) => raw_from_ingress(&obj).map(IngressEvent::Added),
        Event::Apply(obj) => raw_from_ingress(&obj).map(IngressEvent::Updated),
        Event::Delete(obj) => raw_from_ingress(&obj).map(IngressEvent::Deleted),
        Event::Init | Event::InitDone => None,
    }
}

/// Flatten an Ingress object into the shape normalization works on.
/// Returns `None` for objects with no name, which the API server does
/// not deliver in practice.
fn raw_from_ingress(ing: &Ingress) -> Option<RawIngress> {
    let name = ing.metadata.name.clone()?;
    let namespace = ing.metadata.namespace.clone().unwrap_or_default();

    let spec = ing.spec.as_ref();
    let tls_hosts = spec
        .and_then(|s| s.tls.as_ref())
        .map(|tls| {
            tls.iter()
                .flat_map(|t| t.hosts.clone().unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();
    let rule_hosts = spec
        .and_then(|s| s.rules.as_ref())
        .map(|rules| rules.iter().filter_map(|r| r.host.clone()).collect())
        .unwrap_or_default();

    Some(RawIngress {
        namespace,
        name,
        tls_hosts,
        rule_hosts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::networking::v1::{IngressRule, IngressSpec, IngressTLS};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn ingress(namespace: &str, name: &str, tls_hosts: &[&str], rule_hosts: &[&str]) -> Ingress {
        Ingress {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: Some(IngressSpec {
                tls: Some(vec![IngressTLS {
                    hosts: Some(tls_hosts.iter().map(|h| h.to_string()).collect()),
                    ..Default::default()
                }]),
                rules: Some(
                    rule_hosts
                        .iter()
                        .map(|h| IngressRule {
                            host: Some(h.to_string()),
                            ..Default::default()
                        })
                        .collect(),
                ),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn flattens_tls_and_rule_hosts_in_order() {
        let ing = ingress(
            "default",
            "web",
            &["secure.example.com"],
            &["a.example.com", "b.example.com"],
        );
        let raw = raw_from_ingress(&ing).unwrap();

        assert_eq!(raw.namespace, "default");
        assert_eq!(raw.name, "web");
        assert_eq!(raw.tls_hosts, ["secure.example.com"]);
        assert_eq!(raw.rule_hosts, ["a.example.com", "b.example.com"]);
    }

    #[test]
    fn missing_spec_yields_empty_hosts() {
        let ing = Ingress {
            metadata: ObjectMeta {
                name: Some("bare".to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let raw = raw_from_ingress(&ing).unwrap();

        assert!(raw.tls_hosts.is_empty());
        assert!(raw.rule_hosts.is_empty());
    }

    #[test]
    fn nameless_object_is_discarded() {
        let ing = Ingress::default();
        assert!(raw_from_ingress(&ing).is_none());
    }

    #[test]
    fn relist_pages_become_adds_and_live_changes_become_updates() {
        let ing = ingress("default", "web", &[], &["app.example.com"]);

        match convert(Event::InitApply(ing.clone())) {
            Some(IngressEvent::Added(raw)) => assert_eq!(raw.name, "web"),
            other => panic!("expected Added, got {other:?}"),
        }
        match convert(Event::Apply(ing.clone())) {
            Some(IngressEvent::Updated(raw)) => assert_eq!(raw.name, "web"),
            other => panic!("expected Updated, got {other:?}"),
        }
        match convert(Event::Delete(ing)) {
            Some(IngressEvent::Deleted(raw)) => assert_eq!(raw.name, "web"),
            other => panic!("expected Deleted, got {other:?}"),
        }
        assert!(convert(Event::Init).is_none());
        assert!(convert(Event::InitDone).is_none());
    }
}
