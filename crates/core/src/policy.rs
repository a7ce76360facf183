// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policy profile: opaque to the Bridge, forwarded verbatim to the worker.
//!
//! The Bridge never enforces any field here — capability gating is the
//! worker's responsibility. The shape mirrors the original profile schema
//! (tool allow-lists, approval threshold, runtime/step ceilings, capability
//! flags) so a faithful `task_start` round trip is representable, but the
//! Bridge itself only ever passes this struct through.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyProfile {
    pub name: String,
    #[serde(default)]
    pub auto_allow_tools: Vec<String>,
    #[serde(default)]
    pub approval_risk_threshold: RiskLevel,
    #[serde(default)]
    pub max_steps: Option<u32>,
    #[serde(default)]
    pub allow_file_deletion: bool,
    #[serde(default)]
    pub allow_shell_execution: bool,
    #[serde(default)]
    pub allow_network_requests: bool,
    #[serde(default)]
    pub allow_external_messages: bool,
    #[serde(default)]
    pub capture_screenshots: bool,
}

impl PolicyProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auto_allow_tools: Vec::new(),
            approval_risk_threshold: RiskLevel::default(),
            max_steps: None,
            allow_file_deletion: false,
            allow_shell_execution: false,
            allow_network_requests: false,
            allow_external_messages: false,
            capture_screenshots: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

crate::simple_display! {
    RiskLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}
