// Copyright 2026, The kube-harness authors
// SPDX-License-Identifier: Apache-2.0

/// Field manager identity used for server-side apply
pub const FIELD_MANAGER: &str = "kube-harness";

/// Condition polling configuration
pub mod wait {
    use std::time::Duration;

    /// Maximum time a `wait_for` blocks when no timeout is set
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
    /// Pause between checker invocations when no interval is set
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);
}
