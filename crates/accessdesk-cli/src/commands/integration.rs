use accessdesk_client::HttpPolicyClient;
use accessdesk_core::{IntegrationStep, PolicyApi, StepKind};
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{Map, Value};

use crate::cli::{OutputFormat, TestIntegrationArgs};
use crate::output::{print_success, print_value};

/// Parses `key=value` pairs. Values that are valid JSON keep their type.
pub fn parse_params(params: &[String]) -> Result<Option<Map<String, Value>>> {
    if params.is_empty() {
        return Ok(None);
    }
    let mut out = Map::new();
    for param in params {
        let (key, raw) = param
            .split_once('=')
            .with_context(|| format!("Invalid parameter \"{param}\". Expected key=value"))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        out.insert(key.to_string(), value);
    }
    Ok(Some(out))
}

async fn step_from_policy(
    client: &HttpPolicyClient,
    policy_id: &str,
    kind: StepKind,
    index: usize,
) -> Result<IntegrationStep> {
    let policy = client.get_policy(policy_id).await?;
    let steps = match kind {
        StepKind::Provisioning => policy.provisioning_steps,
        StepKind::Revocation => policy.revocation_steps,
    }
    .unwrap_or_default();
    let count = steps.len();
    steps
        .into_iter()
        .nth(index)
        .with_context(|| format!("Policy {policy_id} has {count} {kind} steps; no step at index {index}"))
}

pub async fn test(
    client: &HttpPolicyClient,
    args: &TestIntegrationArgs,
    format: OutputFormat,
) -> Result<()> {
    let kind = StepKind::from(args.kind);
    let mut step = match &args.policy {
        Some(policy_id) => step_from_policy(client, policy_id, kind, args.index).await?,
        None => IntegrationStep {
            provider: args.provider.clone().unwrap_or_default(),
            step_type: args.step_type.clone().unwrap_or_default(),
            target: args.target.clone().unwrap_or_default(),
            ..IntegrationStep::default()
        },
    };
    if let Some(extra) = parse_params(&args.params)? {
        step.parameters.get_or_insert_with(Map::new).extend(extra);
    }

    let result = match kind {
        StepKind::Provisioning => client.test_provisioning_step(&step).await?,
        StepKind::Revocation => client.test_revocation_step(&step).await?,
    };

    if !matches!(format, OutputFormat::Table) {
        print_value(&result, format)?;
    }
    let label = format!("{} {} -> {}", step.provider, step.step_type, step.target);
    if result.success {
        print_success(&format!("{} {}", label.cyan(), result.message));
        Ok(())
    } else {
        anyhow::bail!("Integration test failed for {label}: {}", result.message)
    }
}
