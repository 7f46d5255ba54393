use std::io::{self, BufRead, Write};

use accessdesk_client::HttpPolicyClient;
use accessdesk_core::prelude::*;
use accessdesk_core::generate_id;
use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::{OutputFormat, PolicyArgs};
use crate::output::{
    print_notices, print_policy_detail, print_policy_table, print_value, print_warning,
};

/// One `--approval` value: `app_owner`, or `specific:u1,u2`, optionally suffixed by `!`.
#[derive(Debug, PartialEq, Eq)]
pub struct ApprovalSpec {
    pub step_type: ApprovalStepType,
    pub user_ids: Vec<String>,
    pub escalate: bool,
}

pub fn parse_approval(spec: &str) -> Result<ApprovalSpec> {
    let (body, escalate) = match spec.strip_suffix('!') {
        Some(body) => (body, true),
        None => (spec, false),
    };
    let (kind, users) = body.split_once(':').unwrap_or((body, ""));
    let step_type: ApprovalStepType = kind.parse().map_err(anyhow::Error::msg)?;
    let user_ids: Vec<String> = users
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();
    if step_type == ApprovalStepType::AppOwner && !user_ids.is_empty() {
        anyhow::bail!("Approval step \"{spec}\": app_owner steps take no users");
    }
    Ok(ApprovalSpec {
        step_type,
        user_ids,
        escalate,
    })
}

/// Parses `PROVIDER:TYPE:TARGET[:DESCRIPTION]` into a step with a fresh id.
pub fn parse_step(spec: &str) -> Result<IntegrationStep> {
    let mut parts = spec.splitn(4, ':');
    let mut next = |what: &str| -> Result<String> {
        parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .with_context(|| format!("Step \"{spec}\" is missing its {what}"))
    };
    let provider = next("provider")?;
    let step_type = next("type")?;
    let target = next("target")?;
    let description = parts.next().map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
    Ok(IntegrationStep {
        id: generate_id(),
        step_type,
        target,
        provider,
        description,
        ..IntegrationStep::default()
    })
}

/// Applies command-line edits to a draft through the same operations the
/// console form exposes.
pub fn apply_args(form: &mut PolicyForm, args: &PolicyArgs) -> Result<()> {
    if let Some(name) = &args.name {
        form.set_name(name.as_str());
    }
    if let Some(description) = &args.description {
        form.set_description(description.as_str());
    }
    if let Some(app) = &args.app {
        if !form.apps().iter().any(|a| &a.id == app) {
            anyhow::bail!("Unknown app: {app}");
        }
        form.select_app(app.as_str());
    }

    if !args.groups.is_empty() || !args.users.is_empty() {
        form.set_visibility(Visibility::Specific);
    }
    if let Some(visibility) = args.visibility {
        form.set_visibility(visibility);
    }
    if !args.groups.is_empty() {
        for _ in 0..form.selected_groups().len() {
            form.remove_group_row(0);
        }
        for id in &args.groups {
            if !form.all_groups().iter().any(|g| &g.id == id) {
                anyhow::bail!("Unknown group: {id}");
            }
            form.add_group_row();
            form.select_group(form.selected_groups().len() - 1, id);
        }
    }
    if !args.users.is_empty() {
        for _ in 0..form.selected_users().len() {
            form.remove_user_row(0);
        }
        for id in &args.users {
            if !form.all_users().iter().any(|u| &u.id == id) {
                anyhow::bail!("Unknown user: {id}");
            }
            form.add_user_row();
            form.select_user(form.selected_users().len() - 1, id);
        }
    }

    if let Some(duration) = args.duration {
        form.set_duration_type(duration);
    }
    if let Some(days) = args.days {
        form.set_duration_days(days);
    }
    if let Some(days) = args.min_days {
        form.set_min_days(days);
    }
    if let Some(days) = args.max_days {
        form.set_max_days(days);
    }
    if let Some(require) = args.require_reason {
        form.set_require_reason(require);
    }

    if let Some(enabled) = args.app_owner_reviewer {
        form.set_use_app_owner_as_reviewer(enabled);
    }
    if !args.reviewers.is_empty() {
        let current = form.reviewer_ids().to_vec();
        for id in current.iter().filter(|id| !args.reviewers.contains(id)) {
            form.toggle_reviewer(id);
        }
        for id in &args.reviewers {
            if !form.reviewer_ids().contains(id) {
                form.toggle_reviewer(id);
            }
        }
    }
    if !args.approvals.is_empty() {
        let specs = args
            .approvals
            .iter()
            .map(|s| parse_approval(s))
            .collect::<Result<Vec<_>>>()?;
        for spec in &specs {
            if let Some(missing) = spec
                .user_ids
                .iter()
                .find(|id| !form.reviewer_ids().contains(id))
            {
                anyhow::bail!("User {missing} is not a reviewer; add it with --reviewer");
            }
        }
        for _ in 0..form.approval_steps().len() {
            form.remove_approval_step(0);
        }
        for (i, spec) in specs.into_iter().enumerate() {
            form.add_approval_step(spec.step_type);
            form.set_approval_step_users(i, spec.user_ids);
            form.set_approval_step_escalate(i, spec.escalate);
        }
    }

    for (kind, specs, clear) in [
        (StepKind::Provisioning, &args.provisioning, args.no_provisioning),
        (StepKind::Revocation, &args.revocation, args.no_revocation),
    ] {
        if clear {
            form.clear_steps(kind);
        }
        if !specs.is_empty() {
            let steps = specs
                .iter()
                .map(|s| parse_step(s))
                .collect::<Result<Vec<_>>>()?;
            form.clear_steps(kind);
            for step in steps {
                form.push_step(kind, step);
            }
        }
    }
    Ok(())
}

async fn resolve_acting_as(
    client: &HttpPolicyClient,
    acting_as: Option<&str>,
    admin_email: &str,
) -> Result<UserContext> {
    let mut ctx = UserContext::load(client, admin_email).await;
    if let Some(who) = acting_as {
        if let Some(err) = ctx.user_error() {
            anyhow::bail!("{err}");
        }
        if !ctx.select(who) {
            anyhow::bail!("Unknown user: {who}");
        }
    }
    Ok(ctx)
}

pub async fn list(
    client: &HttpPolicyClient,
    acting_as: Option<&str>,
    admin_email: &str,
    format: OutputFormat,
) -> Result<()> {
    let ctx = resolve_acting_as(client, acting_as, admin_email).await?;
    let mut page = PolicyListPage::new();
    page.load(client, ctx.selected_user_id()).await;
    if let Some(err) = page.error() {
        anyhow::bail!("{err}");
    }

    if matches!(format, OutputFormat::Table) {
        if let Some(user) = ctx.selected_user() {
            println!("{}: {} <{}>", "Acting as".cyan(), user.display_name(), user.email);
        }
        print_policy_table(page.policies());
    } else {
        print_value(page.policies(), format)?;
    }
    Ok(())
}

pub async fn show(client: &HttpPolicyClient, id: &str, format: OutputFormat) -> Result<()> {
    let mut page = PolicyDetailPage::open(client, id).await;
    let Some(policy) = page.policy().cloned() else {
        anyhow::bail!("{}", page.error().unwrap_or("Failed to load policy."));
    };
    print_notices(page.notices_mut().drain());
    print_policy(&policy, format)
}

pub async fn create(client: &HttpPolicyClient, args: &PolicyArgs, format: OutputFormat) -> Result<()> {
    let mut page = PolicyCreatePage::open(client).await;
    print_notices(page.notices_mut().drain());
    if let Some(err) = page.form().resource_error() {
        print_warning(err);
    }
    apply_args(page.form_mut(), args)?;

    let result = page.submit(client).await;
    let notices = page.notices_mut().drain();
    result?;
    print_notices(notices);
    if let Some(created) = page.created() {
        print_policy(created, format)?;
    }
    Ok(())
}

pub async fn edit(
    client: &HttpPolicyClient,
    id: &str,
    args: &PolicyArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut page = PolicyDetailPage::open(client, id).await;
    if page.policy().is_none() {
        anyhow::bail!("{}", page.error().unwrap_or("Failed to load policy."));
    }
    print_notices(page.notices_mut().drain());

    page.begin_edit();
    let form = page.form_mut().context("Policy is not editable")?;
    apply_args(form, args)?;
    let result = page.submit(client).await;
    let notices = page.notices_mut().drain();
    result?;
    print_notices(notices);
    if let Some(policy) = page.policy() {
        print_policy(policy, format)?;
    }
    Ok(())
}

pub async fn delete(client: &HttpPolicyClient, id: &str, yes: bool) -> Result<()> {
    let confirmed = yes || confirm(&format!("Delete policy {id}? This cannot be undone."))?;
    if !confirmed {
        println!("Aborted.");
        return Ok(());
    }
    let mut page = PolicyListPage::new();
    let deleted = page.delete(client, id, confirmed).await;
    if !deleted {
        anyhow::bail!("{}", page.error().unwrap_or("Failed to delete policy"));
    }
    print_notices(page.notices_mut().drain());
    Ok(())
}

fn print_policy(policy: &Policy, format: OutputFormat) -> Result<()> {
    if matches!(format, OutputFormat::Table) {
        print_policy_detail(policy);
        Ok(())
    } else {
        print_value(policy, format)
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read from stdin")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
