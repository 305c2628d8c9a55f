// Copyright 2026, The kube-harness authors
// SPDX-License-Identifier: Apache-2.0

//! Reusable checkers for the common wait conditions

use futures::future::BoxFuture;
use k8s_openapi::api::core::v1::Pod;
use kube::Api;

use crate::cluster::Cluster;
use crate::error::{Error, Result};
use crate::wait::Checker;

/// Condition that the named resource exists in the test namespace.
///
/// `NotFound` counts as "not yet" and keeps the poll going; any other
/// error aborts it.
pub fn exists(api_version: &str, kind: &str, name: &str) -> Exists {
    Exists {
        api_version: api_version.to_string(),
        kind: kind.to_string(),
        name: name.to_string(),
    }
}

pub struct Exists {
    api_version: String,
    kind: String,
    name: String,
}

impl Checker for Exists {
    fn check<'a>(&'a self, cluster: &'a Cluster) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            match cluster.get(&self.api_version, &self.kind, &self.name).await {
                Ok(_) => Ok(true),
                Err(e) if e.is_not_found() => Ok(false),
                Err(e) => Err(e),
            }
        })
    }
}

/// Condition that the named resource does not exist in the test namespace.
///
/// Quirk kept for compatibility: any get failure counts as absence, not
/// just `NotFound`, so a broken transport satisfies this condition too.
pub fn not_exists(api_version: &str, kind: &str, name: &str) -> NotExists {
    NotExists {
        api_version: api_version.to_string(),
        kind: kind.to_string(),
        name: name.to_string(),
    }
}

pub struct NotExists {
    api_version: String,
    kind: String,
    name: String,
}

impl Checker for NotExists {
    fn check<'a>(&'a self, cluster: &'a Cluster) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            match cluster.get(&self.api_version, &self.kind, &self.name).await {
                Ok(_) => Ok(false),
                Err(_) => Ok(true),
            }
        })
    }
}

/// Condition that the named pod reports the `Running` phase. An empty
/// namespace means the cluster's test namespace. Unlike [`exists`], a
/// missing pod is an error here, not "not yet".
pub fn pod_running(namespace: &str, name: &str) -> PodRunning {
    PodRunning {
        namespace: namespace.to_string(),
        name: name.to_string(),
    }
}

pub struct PodRunning {
    namespace: String,
    name: String,
}

impl Checker for PodRunning {
    fn check<'a>(&'a self, cluster: &'a Cluster) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            let override_ns = (!self.namespace.is_empty()).then_some(self.namespace.as_str());
            let namespace = cluster.namespace_for(override_ns)?;

            let pods: Api<Pod> = Api::namespaced(cluster.client().clone(), &namespace);
            let pod = pods
                .get(&self.name)
                .await
                .map_err(|e| Error::from_api(e, "Pod", &self.name))?;

            let phase = pod.status.as_ref().and_then(|s| s.phase.as_deref());
            Ok(phase == Some("Running"))
        })
    }
}
