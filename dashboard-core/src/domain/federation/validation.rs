//! Required-field checks for documents posted by the federation build plugin

use crate::domain::DomainError;

use super::entities::{ApplicationVersion, Consume, Dependency, Module, Override, Remote};

fn require(value: &str, entity: &'static str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::missing(entity, field));
    }
    Ok(())
}

impl Remote {
    pub fn validate(&self) -> Result<(), DomainError> {
        require(&self.name, "Remote", "name")
    }
}

impl Dependency {
    pub fn validate(&self) -> Result<(), DomainError> {
        require(&self.name, "Dependency", "name")
    }
}

impl Module {
    pub fn validate(&self) -> Result<(), DomainError> {
        require(&self.name, "Module", "name")
    }
}

impl Consume {
    pub fn validate(&self) -> Result<(), DomainError> {
        require(
            &self.consuming_application_id,
            "Consume",
            "consumingApplicationId",
        )?;
        require(&self.name, "Consume", "name")
    }
}

impl Override {
    pub fn validate(&self) -> Result<(), DomainError> {
        require(&self.id, "Override", "id")?;
        require(&self.name, "Override", "name")
    }
}

impl ApplicationVersion {
    /// Validate the version and every nested record.
    ///
    /// `version` is only mandatory when version management is enabled.
    pub fn validate(&self, version_manager: bool) -> Result<(), DomainError> {
        require(&self.application_id, "ApplicationVersion", "applicationId")?;
        require(&self.environment, "ApplicationVersion", "environment")?;
        require(&self.remote, "ApplicationVersion", "remote")?;
        if version_manager {
            require(&self.version, "ApplicationVersion", "version")?;
        }

        for remote in &self.remotes {
            remote.validate()?;
        }
        for dependency in &self.dependencies {
            dependency.validate()?;
        }
        for module in &self.modules {
            module.validate()?;
        }
        for consume in &self.consumes {
            consume.validate()?;
        }
        for o in &self.overrides {
            o.validate()?;
        }

        Ok(())
    }
}
