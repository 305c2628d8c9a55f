// Copyright 2026, The kube-harness authors
// SPDX-License-Identifier: Apache-2.0

//! Remote command execution inside running pods

use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, AttachParams};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, instrument};

use crate::cluster::Cluster;
use crate::error::{Error, Result};

/// Options for [`Cluster::exec`]
#[derive(Clone, Debug, Default)]
pub struct ExecOpts {
    /// Namespace holding the pod. Falls back to the cluster's test
    /// namespace.
    pub namespace: Option<String>,
}

/// Captured output of a remote command
#[derive(Debug, Default)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

impl Cluster {
    /// Run a shell command line in the given pod and container, wrapping
    /// it in `/bin/sh -c`.
    pub async fn exec_sh(&self, pod: &str, container: &str, cmdline: &str) -> Result<ExecOutput> {
        self.exec(pod, container, shell_command(cmdline), ExecOpts::default())
            .await
    }

    /// Run a command, given as an argument vector without any shell, in
    /// the given pod and container and capture its output.
    #[instrument(skip(self, command))]
    pub async fn exec<I, T>(
        &self,
        pod: &str,
        container: &str,
        command: I,
        opts: ExecOpts,
    ) -> Result<ExecOutput>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let namespace = self.namespace_for(opts.namespace.as_deref())?;
        let command: Vec<String> = command.into_iter().map(Into::into).collect();

        let pods: Api<Pod> = Api::namespaced(self.client().clone(), &namespace);
        let params = AttachParams::default()
            .container(container)
            .stdout(true)
            .stderr(true);

        let mut attached = pods
            .exec(pod, command.clone(), &params)
            .await
            .map_err(|e| Error::Exec(e.to_string()))?;

        let stdout = attached.stdout();
        let stderr = attached.stderr();
        let (stdout, stderr) = tokio::join!(read_stream(stdout), read_stream(stderr));

        debug!(namespace = %namespace, pod, command = ?command, "executed command in pod");
        Ok(ExecOutput {
            stdout: stdout?,
            stderr: stderr?,
        })
    }
}

async fn read_stream<R: AsyncRead + Unpin>(reader: Option<R>) -> Result<String> {
    let mut buf = String::new();
    if let Some(mut reader) = reader {
        reader
            .read_to_string(&mut buf)
            .await
            .map_err(|e| Error::Exec(e.to_string()))?;
    }
    Ok(buf)
}

/// Wrap a command line for execution through the pod's shell.
pub(crate) fn shell_command(cmdline: &str) -> Vec<String> {
    vec!["/bin/sh".to_string(), "-c".to_string(), cmdline.to_string()]
}
