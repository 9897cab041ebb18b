//! Skip decisions, made before any state is touched.
//!
//! Rules, first match wins:
//! 1. the case declares a `skipReason`
//! 2. a fixture or case run requirement is not met by the deployment
//! 3. an entry of [`EXCLUSIONS`] matches
//!
//! The exclusion table covers cases the fixture format has no way to scope
//! to a topology. It is meant to stay short; every entry is a known gap.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crudcheck_core::{Deployment, RunRequirement, Topology};

use crate::fixture::{CaseDefinition, Fixture};

/// Why a case was not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The case itself carries a `skipReason`
    Declared(String),
    /// A version or topology requirement is not met
    Requirement(String),
    /// Matched an entry of the exclusion table
    Excluded(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Declared(reason) => write!(f, "skipped by fixture: {}", reason),
            SkipReason::Requirement(reason) => write!(f, "requirement not met: {}", reason),
            SkipReason::Excluded(reason) => write!(f, "excluded: {}", reason),
        }
    }
}

/// A known-excluded `(topology, description prefix)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exclusion {
    /// Applies when the deployment satisfies this topology
    pub topology: Topology,
    /// Applies to cases whose description starts with this
    pub description_prefix: &'static str,
    /// Reported reason
    pub reason: &'static str,
}

impl Exclusion {
    /// True when this entry excludes `description` on `topology`.
    pub fn matches(&self, topology: Topology, description: &str) -> bool {
        topology.satisfies(self.topology) && description.starts_with(self.description_prefix)
    }
}

/// Cases excluded regardless of what their fixture declares.
pub const EXCLUSIONS: &[Exclusion] = &[Exclusion {
    topology: Topology::Sharded,
    description_prefix: "Aggregate with $currentOp",
    reason: "$currentOp output cannot be asserted through a mongos",
}];

/// Decides whether cases apply to a deployment.
pub struct SkipEvaluator<'a> {
    deployment: &'a dyn Deployment,
    exclusions: &'a [Exclusion],
}

impl<'a> SkipEvaluator<'a> {
    /// Evaluator using the built-in [`EXCLUSIONS`].
    pub fn new(deployment: &'a dyn Deployment) -> Self {
        Self::with_exclusions(deployment, EXCLUSIONS)
    }

    /// Evaluator with a custom exclusion table.
    pub fn with_exclusions(deployment: &'a dyn Deployment, exclusions: &'a [Exclusion]) -> Self {
        Self {
            deployment,
            exclusions,
        }
    }

    /// `Some(reason)` when `case` must not run.
    pub fn evaluate(&self, fixture: &Fixture, case: &CaseDefinition) -> Option<SkipReason> {
        let reason = self
            .declared(case)
            .or_else(|| self.requirements(fixture, case))
            .or_else(|| self.excluded(&case.description));
        if let Some(reason) = &reason {
            debug!(target: "crudcheck::skip", file = %fixture.filename, case = %case.description, %reason, "Skipping");
        }
        reason
    }

    fn declared(&self, case: &CaseDefinition) -> Option<SkipReason> {
        case.skip_reason.clone().map(SkipReason::Declared)
    }

    fn requirements(&self, fixture: &Fixture, case: &CaseDefinition) -> Option<SkipReason> {
        if let Some(unmet) = [&fixture.requirement, &case.requirement]
            .into_iter()
            .find(|req| !self.deployment.satisfies(req))
        {
            return Some(self.unmet(unmet));
        }
        if !fixture.run_on.is_empty() && !fixture.run_on.iter().any(|req| self.deployment.satisfies(req)) {
            let options: Vec<String> = fixture.run_on.iter().map(describe).collect();
            return Some(SkipReason::Requirement(format!(
                "runOn [{}]; deployment is {}",
                options.join(" | "),
                self.deployment_summary()
            )));
        }
        None
    }

    fn excluded(&self, description: &str) -> Option<SkipReason> {
        let topology = self.deployment.topology();
        self.exclusions
            .iter()
            .find(|e| e.matches(topology, description))
            .map(|e| SkipReason::Excluded(e.reason.to_string()))
    }

    fn unmet(&self, requirement: &RunRequirement) -> SkipReason {
        SkipReason::Requirement(format!(
            "{}; deployment is {}",
            describe(requirement),
            self.deployment_summary()
        ))
    }

    fn deployment_summary(&self) -> String {
        format!(
            "{} {}",
            self.deployment.topology(),
            self.deployment.server_version()
        )
    }
}

fn describe(requirement: &RunRequirement) -> String {
    let mut parts = Vec::new();
    if let Some(min) = &requirement.min_server_version {
        parts.push(format!("server >= {}", min));
    }
    if let Some(max) = &requirement.max_server_version {
        parts.push(format!("server <= {}", max));
    }
    if let Some(topologies) = &requirement.topologies {
        let names: Vec<&str> = topologies.iter().map(|t| t.as_str()).collect();
        parts.push(format!("topology in [{}]", names.join(", ")));
    }
    if parts.is_empty() {
        "any deployment".to_string()
    } else {
        parts.join(", ")
    }
}
