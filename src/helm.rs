// Copyright 2026, The kube-harness authors
// SPDX-License-Identifier: Apache-2.0

//! Thin wrapper around the helm CLI for installing charts under test
//!
//! Only the glue this crate needs: point helm at the cluster's kubeconfig
//! and test namespace and run an install. Chart loading, rendering and
//! release management stay helm's problem.

use std::path::Path;

use tokio::process::Command;
use tracing::{info, instrument};

use crate::cluster::Cluster;
use crate::error::{Error, Result};

/// Options for [`install`]
#[derive(Clone, Debug, Default)]
pub struct InstallOpts {
    /// Release name, defaults to the chart directory name
    pub release_name: Option<String>,

    /// Namespace to install into. Falls back to the cluster's test
    /// namespace.
    pub namespace: Option<String>,

    /// Skip `--replace`. Test runs reinstall the same chart over and
    /// over, so replacing an existing release is the default here, unlike
    /// production helm.
    pub no_replace: bool,
}

/// Install a chart from a local directory with the given `--set` values.
pub async fn install(
    cluster: &Cluster,
    chart_dir: impl AsRef<Path>,
    values: &[(&str, &str)],
    opts: InstallOpts,
) -> Result<()> {
    let chart_dir = chart_dir.as_ref();
    let release = release_name(opts.release_name.as_deref(), chart_dir)?;
    run_install(cluster, chart_dir, &release, values, &opts).await
}

#[instrument(skip(cluster, values, opts))]
async fn run_install(
    cluster: &Cluster,
    chart_dir: &Path,
    release: &str,
    values: &[(&str, &str)],
    opts: &InstallOpts,
) -> Result<()> {
    let namespace = cluster.namespace_for(opts.namespace.as_deref())?;
    let kubeconfig = cluster
        .kubeconfig_path()
        .ok_or_else(|| Error::Helm("cluster handle has no kubeconfig path".to_string()))?;

    let mut cmd = Command::new("helm");
    cmd.arg("install")
        .arg(release)
        .arg(chart_dir)
        .arg("--namespace")
        .arg(&namespace)
        .arg("--kubeconfig")
        .arg(kubeconfig);
    if !opts.no_replace {
        cmd.arg("--replace");
    }
    for (key, value) in values {
        cmd.arg("--set").arg(format!("{key}={value}"));
    }

    let output = cmd
        .output()
        .await
        .map_err(|e| Error::Helm(format!("failed to run helm: {e}")))?;
    if !output.status.success() {
        return Err(Error::Helm(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    info!(release, namespace = %namespace, "installed chart");
    Ok(())
}

/// Release name fallback: explicit option, else the chart directory name.
fn release_name(explicit: Option<&str>, chart_dir: &Path) -> Result<String> {
    match explicit {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => chart_dir
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::Helm(format!(
                    "cannot derive release name from {}",
                    chart_dir.display()
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_name_prefers_explicit_name() {
        let name = release_name(Some("my-release"), Path::new("charts/echo")).unwrap();
        assert_eq!(name, "my-release");
    }

    #[test]
    fn test_release_name_falls_back_to_chart_dir() {
        let name = release_name(None, Path::new("charts/echo")).unwrap();
        assert_eq!(name, "echo");

        let name = release_name(Some(""), Path::new("charts/echo")).unwrap();
        assert_eq!(name, "echo");
    }

    #[test]
    fn test_release_name_rejects_unusable_path() {
        assert!(release_name(None, Path::new("/")).is_err());
    }
}
