//! Provisioning ("grant access") and revocation ("revoke access") step lists.

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::catalog::StepKind;
use crate::model::IntegrationStep;

use super::PolicyForm;

/// Text field of an integration step that the form can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepField {
    Type,
    Target,
    Provider,
    Description,
    ApiEndpoint,
}

impl FromStr for StepField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "type" => Ok(Self::Type),
            "target" => Ok(Self::Target),
            "provider" => Ok(Self::Provider),
            "description" => Ok(Self::Description),
            "api_endpoint" | "apiEndpoint" => Ok(Self::ApiEndpoint),
            other => Err(format!("unknown step field \"{other}\"")),
        }
    }
}

impl PolicyForm {
    pub fn steps(&self, kind: StepKind) -> &[IntegrationStep] {
        match kind {
            StepKind::Provisioning => &self.provisioning_steps,
            StepKind::Revocation => &self.revocation_steps,
        }
    }

    fn steps_mut(&mut self, kind: StepKind) -> &mut Vec<IntegrationStep> {
        match kind {
            StepKind::Provisioning => &mut self.provisioning_steps,
            StepKind::Revocation => &mut self.revocation_steps,
        }
    }

    pub fn add_step(&mut self, kind: StepKind) {
        if self.editable() {
            self.steps_mut(kind).push(kind.new_step());
        }
    }

    /// Appends a fully specified step, e.g. one assembled outside the form.
    pub fn push_step(&mut self, kind: StepKind, step: IntegrationStep) {
        if self.editable() {
            self.steps_mut(kind).push(step);
        }
    }

    pub fn remove_step(&mut self, kind: StepKind, index: usize) {
        if !self.editable() {
            return;
        }
        let steps = self.steps_mut(kind);
        if index < steps.len() {
            steps.remove(index);
        }
    }

    /// Replaces the list with the single default step of a new policy.
    pub fn reset_steps(&mut self, kind: StepKind) {
        if self.editable() {
            *self.steps_mut(kind) = vec![kind.initial_step()];
        }
    }

    pub fn clear_steps(&mut self, kind: StepKind) {
        if self.editable() {
            self.steps_mut(kind).clear();
        }
    }

    pub fn update_step(&mut self, kind: StepKind, index: usize, field: StepField, value: &str) {
        if !self.editable() {
            return;
        }
        let Some(step) = self.steps_mut(kind).get_mut(index) else {
            return;
        };
        let value = value.to_string();
        match field {
            StepField::Type => step.step_type = value,
            StepField::Target => step.target = value,
            StepField::Provider => step.provider = value,
            StepField::Description => step.description = Some(value),
            StepField::ApiEndpoint => step.api_endpoint = Some(value),
        }
    }

    pub fn set_step_parameters(
        &mut self,
        kind: StepKind,
        index: usize,
        parameters: Option<Map<String, Value>>,
    ) {
        if !self.editable() {
            return;
        }
        if let Some(step) = self.steps_mut(kind).get_mut(index) {
            step.parameters = parameters;
        }
    }
}
