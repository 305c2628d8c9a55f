// Copyright 2026, The kube-harness authors
// SPDX-License-Identifier: Apache-2.0

//! Apply, get, list and delete for arbitrary resource kinds
//!
//! All operations decode or address resources as [`DynamicObject`], so no
//! compiled type is needed for the kinds a test touches. Namespaced kinds
//! land in the cluster's test namespace unless overridden; cluster-scoped
//! kinds ignore the namespace. Failures surface to the caller untouched,
//! each operation makes exactly one attempt.

use std::path::Path;

use kube::api::{DeleteParams, DynamicObject, ListParams, Patch, PatchParams, TypeMeta};
use tracing::{debug, info, instrument};

use crate::cluster::Cluster;
use crate::constants::FIELD_MANAGER;
use crate::error::{Error, Result};

/// Options for [`Cluster::apply_with`]
#[derive(Clone, Debug, Default)]
pub struct ApplyOpts {
    /// Namespace to apply into. Falls back to the manifest's own namespace,
    /// then the cluster's test namespace. Ignored for cluster-scoped kinds.
    pub namespace: Option<String>,
}

/// Options for [`Cluster::get_with`]
#[derive(Clone, Debug, Default)]
pub struct GetOpts {
    /// Namespace holding the resource. Falls back to the cluster's test
    /// namespace.
    pub namespace: Option<String>,
}

/// Options for [`Cluster::list_with`]
#[derive(Clone, Debug, Default)]
pub struct ListOpts {
    /// Namespace to list in. Falls back to the cluster's test namespace.
    pub namespace: Option<String>,
}

/// Options for [`Cluster::delete_with`]
#[derive(Clone, Debug, Default)]
pub struct DeleteOpts {
    /// Namespace holding the resource. Falls back to the manifest's own
    /// namespace, then the cluster's test namespace. Ignored for
    /// cluster-scoped kinds.
    pub namespace: Option<String>,
}

impl Cluster {
    /// Same as `kubectl apply`: server-side apply a single-document YAML
    /// manifest into the test namespace, creating the object if absent or
    /// merging into it if present. Applying the same manifest twice is
    /// idempotent.
    pub async fn apply(&self, yaml: &str) -> Result<DynamicObject> {
        self.apply_with(yaml, ApplyOpts::default()).await
    }

    /// More verbose version of [`Cluster::apply`] with a namespace override.
    #[instrument(skip(self, yaml))]
    pub async fn apply_with(&self, yaml: &str, opts: ApplyOpts) -> Result<DynamicObject> {
        let (obj, types) = decode_manifest(yaml)?;
        let name = object_name(&obj)?.to_string();
        let override_ns = opts.namespace.as_deref().or(obj.metadata.namespace.as_deref());
        let namespace = self.namespace_for(override_ns)?;

        let (resource, capabilities) = self.resolve(&types.api_version, &types.kind).await?;
        let api = self.dynamic_api(&resource, &capabilities, &namespace);

        let params = PatchParams::apply(FIELD_MANAGER);
        let applied = api
            .patch(&name, &params, &Patch::Apply(&obj))
            .await
            .map_err(|e| Error::from_api(e, &types.kind, &name))?;

        info!(kind = %types.kind, name = %name, namespace = %namespace, "applied resource");
        Ok(applied)
    }

    /// Read a manifest from a file and apply it.
    pub async fn apply_file(&self, path: impl AsRef<Path>) -> Result<DynamicObject> {
        let yaml = tokio::fs::read_to_string(path).await?;
        self.apply(&yaml).await
    }

    /// Fetch the named resource as an unstructured document. The resource
    /// is identified by apiVersion (e.g. `networking.k8s.io/v1`) and kind
    /// (e.g. `NetworkPolicy`).
    pub async fn get(&self, api_version: &str, kind: &str, name: &str) -> Result<DynamicObject> {
        self.get_with(api_version, kind, name, GetOpts::default()).await
    }

    /// More verbose version of [`Cluster::get`] with a namespace override.
    #[instrument(skip(self))]
    pub async fn get_with(
        &self,
        api_version: &str,
        kind: &str,
        name: &str,
        opts: GetOpts,
    ) -> Result<DynamicObject> {
        let namespace = self.namespace_for(opts.namespace.as_deref())?;
        let (resource, capabilities) = self.resolve(api_version, kind).await?;
        let api = self.dynamic_api(&resource, &capabilities, &namespace);

        api.get(name).await.map_err(|e| Error::from_api(e, kind, name))
    }

    /// List resources of the given kind whose labels match the selector.
    /// An empty selector matches everything; ordering is server-defined.
    pub async fn list(
        &self,
        api_version: &str,
        kind: &str,
        label_selector: &str,
    ) -> Result<Vec<DynamicObject>> {
        self.list_with(api_version, kind, label_selector, ListOpts::default())
            .await
    }

    /// More verbose version of [`Cluster::list`] with a namespace override.
    #[instrument(skip(self))]
    pub async fn list_with(
        &self,
        api_version: &str,
        kind: &str,
        label_selector: &str,
        opts: ListOpts,
    ) -> Result<Vec<DynamicObject>> {
        let namespace = self.namespace_for(opts.namespace.as_deref())?;
        let (resource, capabilities) = self.resolve(api_version, kind).await?;
        let api = self.dynamic_api(&resource, &capabilities, &namespace);

        // The selector string is passed through to the server verbatim.
        let mut params = ListParams::default();
        if !label_selector.is_empty() {
            params = params.labels(label_selector);
        }

        let list = api.list(&params).await.map_err(Error::Api)?;
        debug!(kind, selector = label_selector, items = list.items.len(), "listed resources");
        Ok(list.items)
    }

    /// Delete the resource described by a single-document YAML manifest.
    ///
    /// A successful return means the server accepted the deletion, not
    /// that the object is gone. Callers needing confirmation should follow
    /// up with `wait_for(checkers::not_exists(..))`. Deleting an absent
    /// resource surfaces [`Error::NotFound`].
    pub async fn delete(&self, yaml: &str) -> Result<()> {
        self.delete_with(yaml, DeleteOpts::default()).await
    }

    /// More verbose version of [`Cluster::delete`] with a namespace override.
    #[instrument(skip(self, yaml))]
    pub async fn delete_with(&self, yaml: &str, opts: DeleteOpts) -> Result<()> {
        let (obj, types) = decode_manifest(yaml)?;
        let name = object_name(&obj)?.to_string();
        let override_ns = opts.namespace.as_deref().or(obj.metadata.namespace.as_deref());
        let namespace = self.namespace_for(override_ns)?;

        let (resource, capabilities) = self.resolve(&types.api_version, &types.kind).await?;
        let api = self.dynamic_api(&resource, &capabilities, &namespace);

        api.delete(&name, &DeleteParams::default())
            .await
            .map_err(|e| Error::from_api(e, &types.kind, &name))?;

        info!(kind = %types.kind, name = %name, namespace = %namespace, "deletion accepted");
        Ok(())
    }

    /// Read a manifest from a file and delete the resource it describes.
    pub async fn delete_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let yaml = tokio::fs::read_to_string(path).await?;
        self.delete(&yaml).await
    }
}

/// Decode a single-document YAML manifest into an unstructured object,
/// requiring apiVersion and kind to be present.
fn decode_manifest(yaml: &str) -> Result<(DynamicObject, TypeMeta)> {
    let obj: DynamicObject =
        serde_yaml::from_str(yaml).map_err(|e| Error::Decode(e.to_string()))?;
    let types = obj
        .types
        .clone()
        .ok_or_else(|| Error::Decode("manifest is missing apiVersion or kind".to_string()))?;
    Ok((obj, types))
}

fn object_name(obj: &DynamicObject) -> Result<&str> {
    obj.metadata
        .name
        .as_deref()
        .ok_or_else(|| Error::Decode("manifest is missing metadata.name".to_string()))
}
