// Copyright 2026, The kube-harness authors
// SPDX-License-Identifier: Apache-2.0

//! Resolution of apiVersion/kind pairs to addressable server resources

use kube::api::{Api, DynamicObject};
use kube::core::GroupVersionKind;
use kube::discovery::{ApiCapabilities, ApiResource, Scope};
use tracing::debug;

use crate::cluster::Cluster;
use crate::error::{Error, Result};

/// Split an apiVersion string into group and version.
///
/// `apps/v1` -> (`apps`, `v1`); a bare `v1` is the core group.
pub(crate) fn parse_api_version(api_version: &str) -> (String, String) {
    match api_version.rsplit_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        None => (String::new(), api_version.to_string()),
    }
}

pub(crate) fn gvk(api_version: &str, kind: &str) -> GroupVersionKind {
    let (group, version) = parse_api_version(api_version);
    GroupVersionKind {
        group,
        version,
        kind: kind.to_string(),
    }
}

impl Cluster {
    /// Resolve an apiVersion/kind pair against server discovery.
    ///
    /// Mappings are cached for the lifetime of the handle; a cache miss
    /// costs one discovery round-trip. Only successful resolutions touch
    /// the cache, so unrelated failures can never poison it.
    pub(crate) async fn resolve(
        &self,
        api_version: &str,
        kind: &str,
    ) -> Result<(ApiResource, ApiCapabilities)> {
        let key = (api_version.to_string(), kind.to_string());
        if let Some(found) = self
            .mappings
            .read()
            .expect("mapping cache poisoned")
            .get(&key)
        {
            return Ok(found.clone());
        }

        let gvk = gvk(api_version, kind);
        let resolved = kube::discovery::pinned_kind(self.client(), &gvk)
            .await
            .map_err(|e| match e {
                // The group/version document exists but has no such kind,
                // or the group/version itself is absent.
                kube::Error::Discovery(_) => Error::UnknownResourceKind {
                    api_version: api_version.to_string(),
                    kind: kind.to_string(),
                },
                kube::Error::Api(ref resp) if resp.code == 404 => Error::UnknownResourceKind {
                    api_version: api_version.to_string(),
                    kind: kind.to_string(),
                },
                other => Error::Api(other),
            })?;

        debug!(
            api_version,
            kind,
            plural = %resolved.0.plural,
            scope = ?resolved.1.scope,
            "resolved resource mapping"
        );
        self.mappings
            .write()
            .expect("mapping cache poisoned")
            .insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Dynamic API handle for a resolved mapping. Cluster-scoped kinds
    /// ignore the namespace entirely.
    pub(crate) fn dynamic_api(
        &self,
        resource: &ApiResource,
        capabilities: &ApiCapabilities,
        namespace: &str,
    ) -> Api<DynamicObject> {
        if capabilities.scope == Scope::Namespaced {
            Api::namespaced_with(self.client().clone(), namespace, resource)
        } else {
            Api::all_with(self.client().clone(), resource)
        }
    }
}
