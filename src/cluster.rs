// Copyright 2026, The kube-harness authors
// SPDX-License-Identifier: Apache-2.0

//! Cluster handle creation and namespace handling

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::discovery::{ApiCapabilities, ApiResource};
use kube::Client;
use tracing::info;

use crate::error::{Error, Result};

/// Handle to a running cluster used by the tests.
///
/// Owns the API client, the default test namespace and the discovery
/// mapping cache. Create one per test session; all operations borrow it.
pub struct Cluster {
    client: Client,

    /// Namespace used by all operations when no override is given, so
    /// tests don't step on the rest of the cluster.
    test_namespace: String,

    /// Set when the handle was built from a kubeconfig file. Collaborators
    /// that shell out (helm) need the path, not the parsed config.
    kubeconfig_path: Option<PathBuf>,

    /// Resolved (apiVersion, kind) -> discovery mappings. Read-mostly and
    /// populated lazily; racing populations just redo a discovery call.
    pub(crate) mappings: RwLock<HashMap<(String, String), (ApiResource, ApiCapabilities)>>,
}

impl Cluster {
    /// Create a cluster handle from the kubeconfig named by `KUBECONFIG`.
    pub async fn from_env() -> Result<Self> {
        let path = std::env::var("KUBECONFIG").map_err(|_| {
            Error::Kubeconfig("KUBECONFIG environment variable not set".to_string())
        })?;
        Self::from_file(path).await
    }

    /// Create a cluster handle from the given kubeconfig file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let kubeconfig = Kubeconfig::read_from(path)
            .map_err(|e| Error::Kubeconfig(format!("failed to read {}: {}", path.display(), e)))?;

        let mut cluster = Self::from_kubeconfig(kubeconfig).await?;
        cluster.kubeconfig_path = Some(path.to_path_buf());
        Ok(cluster)
    }

    /// Create a cluster handle from an already parsed kubeconfig.
    ///
    /// The default test namespace is taken from the kubeconfig's current
    /// context. Fails with [`Error::NamespaceUnset`] when the context has
    /// no namespace, so tests never silently run against `default`.
    pub async fn from_kubeconfig(kubeconfig: Kubeconfig) -> Result<Self> {
        let namespace = default_namespace(&kubeconfig).ok_or(Error::NamespaceUnset)?;

        let config =
            kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(|e| Error::Kubeconfig(format!("failed to build client config: {e}")))?;
        let client = Client::try_from(config).map_err(Error::Api)?;

        info!(namespace = %namespace, "connected to cluster");
        Ok(Self::with_client(client, &namespace))
    }

    /// Wrap an existing client. This is the injection point for mock
    /// clients in tests.
    pub fn with_client(client: Client, test_namespace: &str) -> Self {
        Self {
            client,
            test_namespace: test_namespace.to_string(),
            kubeconfig_path: None,
            mappings: RwLock::new(HashMap::new()),
        }
    }

    /// The underlying API client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Default namespace used by all operations.
    pub fn test_namespace(&self) -> &str {
        &self.test_namespace
    }

    /// Path of the kubeconfig file this handle was built from, if any.
    pub fn kubeconfig_path(&self) -> Option<&Path> {
        self.kubeconfig_path.as_deref()
    }

    /// Resolve the namespace for one operation from an optional override.
    pub(crate) fn namespace_for(&self, override_ns: Option<&str>) -> Result<String> {
        resolve_namespace(override_ns, &self.test_namespace)
    }

    /// Drop all cached discovery mappings.
    ///
    /// Cached mappings are otherwise valid for the lifetime of the handle;
    /// call this after CRD schema changes on the server.
    pub fn invalidate_discovery(&self) {
        self.mappings.write().expect("mapping cache poisoned").clear();
    }
}

/// Namespace fallback chain: explicit override, else the cluster default,
/// else an error. Pure so the chain is testable without a cluster.
pub(crate) fn resolve_namespace(override_ns: Option<&str>, default_ns: &str) -> Result<String> {
    match override_ns {
        Some(ns) if !ns.is_empty() => Ok(ns.to_string()),
        _ if !default_ns.is_empty() => Ok(default_ns.to_string()),
        _ => Err(Error::NamespaceUnset),
    }
}

/// Default namespace of the kubeconfig's current context, if set.
pub(crate) fn default_namespace(kubeconfig: &Kubeconfig) -> Option<String> {
    let current = kubeconfig.current_context.as_deref()?;
    kubeconfig
        .contexts
        .iter()
        .find(|c| c.name == current)
        .and_then(|c| c.context.as_ref())
        .and_then(|c| c.namespace.clone())
}
