// Copyright 2026, The kube-harness authors
// SPDX-License-Identifier: Apache-2.0

//! Error types shared across the crate

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Manifest could not be decoded into a resource document.
    #[error("failed to decode manifest: {0}")]
    Decode(String),

    /// Server discovery has no resource for the given apiVersion/kind.
    #[error("unknown resource kind {api_version}/{kind}")]
    UnknownResourceKind { api_version: String, kind: String },

    /// The named resource does not exist on the server.
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: String, name: String },

    /// Any other backend or transport failure.
    #[error("Kubernetes API error: {0}")]
    Api(#[source] kube::Error),

    /// Condition was not met within the configured wait timeout.
    #[error("condition not met within {0:?}")]
    WaitTimeout(Duration),

    /// The caller cancelled the wait before the timeout elapsed.
    #[error("wait cancelled by caller")]
    WaitCancelled,

    #[error("invalid wait configuration: {0}")]
    InvalidWaitConfig(&'static str),

    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(String),

    /// No namespace override was given and the cluster has no default
    /// test namespace.
    #[error("test namespace is empty")]
    NamespaceUnset,

    #[error("exec failed: {0}")]
    Exec(String),

    #[error("helm failed: {0}")]
    Helm(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for `NotFound`, so tests can tell "never appeared" apart from
    /// "transport broke".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Map a kube API failure for a named resource, turning HTTP 404 into
    /// `NotFound` and everything else into `Api`.
    pub(crate) fn from_api(err: kube::Error, kind: &str, name: &str) -> Self {
        match err {
            kube::Error::Api(ref resp) if resp.code == 404 => Error::NotFound {
                kind: kind.to_string(),
                name: name.to_string(),
            },
            other => Error::Api(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "err".to_string(),
            reason: "err".to_string(),
            code,
        })
    }

    #[test]
    fn test_from_api_maps_404_to_not_found() {
        let err = Error::from_api(api_error(404), "Service", "echo-service");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Service \"echo-service\" not found");
    }

    #[test]
    fn test_from_api_keeps_other_codes_as_api_error() {
        let err = Error::from_api(api_error(500), "Service", "echo-service");
        assert!(!err.is_not_found());
        assert!(matches!(err, Error::Api(_)));
    }
}
