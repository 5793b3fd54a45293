//! Public models for the `instance-query` module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::language::LanguageTag;

/// Setup lifecycle step recorded for an instance.
///
/// Steps are ordered; the write side guarantees that `setup_done` never
/// precedes `setup_started`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SetupStep(u32);

impl SetupStep {
    pub const UNSPECIFIED: Self = Self(0);

    #[must_use]
    pub const fn new(step: u32) -> Self {
        Self(step)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for SetupStep {
    fn from(step: u32) -> Self {
        Self(step)
    }
}

/// An instance (tenant) read-model snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub creation_date: DateTime<Utc>,
    pub change_date: DateTime<Utc>,
    pub sequence: u64,

    pub global_org_id: String,
    pub project_id: String,
    pub console_id: String,
    pub console_app_id: String,
    pub default_language: LanguageTag,
    pub setup_started: SetupStep,
    pub setup_done: SetupStep,
    /// Host of the request that resolved this instance. Not persisted.
    #[serde(default)]
    pub host: String,
}

/// A page of instances together with the total number of matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instances {
    pub count: u64,
    pub instances: Vec<Instance>,
}

/// Identity view of a resolved instance, consumed by authorization and
/// branding code that does not need the full record.
pub trait InstanceIdentity: Send + Sync {
    fn instance_id(&self) -> &str;
    fn project_id(&self) -> &str;
    fn console_client_id(&self) -> &str;
    fn console_application_id(&self) -> &str;
    /// The host exactly as supplied by the resolving request.
    fn requested_domain(&self) -> &str;
}

impl InstanceIdentity for Instance {
    fn instance_id(&self) -> &str {
        &self.id
    }

    fn project_id(&self) -> &str {
        &self.project_id
    }

    fn console_client_id(&self) -> &str {
        &self.console_id
    }

    fn console_application_id(&self) -> &str {
        &self.console_app_id
    }

    fn requested_domain(&self) -> &str {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_steps_are_ordered() {
        assert!(SetupStep::UNSPECIFIED < SetupStep::new(1));
        assert!(SetupStep::new(3) > SetupStep::from(2));
        assert_eq!(SetupStep::default(), SetupStep::UNSPECIFIED);
    }

    #[test]
    fn identity_view_exposes_instance_fields() {
        let instance = Instance {
            id: "inst-1".to_owned(),
            creation_date: DateTime::<Utc>::UNIX_EPOCH,
            change_date: DateTime::<Utc>::UNIX_EPOCH,
            sequence: 7,
            global_org_id: "org".to_owned(),
            project_id: "proj".to_owned(),
            console_id: "console".to_owned(),
            console_app_id: "console-app".to_owned(),
            default_language: LanguageTag::from("en"),
            setup_started: SetupStep::new(2),
            setup_done: SetupStep::new(1),
            host: "acme.example.com:8080".to_owned(),
        };

        let identity: &dyn InstanceIdentity = &instance;
        assert_eq!(identity.instance_id(), "inst-1");
        assert_eq!(identity.project_id(), "proj");
        assert_eq!(identity.console_client_id(), "console");
        assert_eq!(identity.console_application_id(), "console-app");
        assert_eq!(identity.requested_domain(), "acme.example.com:8080");
    }
}
