// Copyright 2026, The kube-harness authors
// SPDX-License-Identifier: Apache-2.0

//! kube-harness - test helpers for exercising live Kubernetes clusters
//!
//! A [`Cluster`] handle wraps a cluster connection, a default test
//! namespace and a discovery cache. On top of it sit generic apply, get,
//! list and delete for arbitrary resource kinds (no compiled types
//! needed), condition polling with [`Cluster::wait_for`], a small checker
//! library, pod exec and a thin helm install wrapper.
//!
//! # Example
//!
//! ```no_run
//! use kube_harness::{checkers, Cluster};
//!
//! # async fn run() -> kube_harness::Result<()> {
//! // Connect using the kubeconfig named by KUBECONFIG
//! let cluster = Cluster::from_env().await?;
//!
//! // Apply any YAML manifest into the test namespace
//! cluster.apply_file("testdata/test-agent.yaml").await?;
//!
//! // Block until the pod is up, then poke at it
//! cluster.wait_for(checkers::pod_running("", "test-agent")).await?;
//! let output = cluster.exec_sh("test-agent", "test-container", "echo hello").await?;
//! assert_eq!(output.stdout.trim(), "hello");
//! # Ok(())
//! # }
//! ```

pub mod checkers;
pub mod cluster;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod exec;
pub mod helm;
pub mod resources;
pub mod wait;

#[cfg(test)]
mod mock;

// Re-export commonly used types
pub use cluster::Cluster;
pub use error::{Error, Result};
pub use exec::{ExecOpts, ExecOutput};
pub use resources::{ApplyOpts, DeleteOpts, GetOpts, ListOpts};
pub use wait::{Checker, WaitOpts};
