use accessdesk_core::{App, Group, Notice, Policy, StepKind, User};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::cli::OutputFormat;

/// Prints any serializable value as JSON or YAML. Table output is rendered by
/// the per-record printers below, so it falls back to JSON here.
pub fn print_value<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Table => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
        }
    }
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Flushes page notifications: errors to stderr, confirmations to stdout.
pub fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        if notice.is_error() {
            print_warning(&notice.description);
        } else {
            print_success(&notice.description);
        }
    }
}

fn table(builder: Builder) -> String {
    builder.build().with(Style::rounded()).to_string()
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|s| !s.is_empty()).unwrap_or("-")
}

fn timestamp(value: Option<OffsetDateTime>) -> String {
    value
        .and_then(|ts| ts.format(&Rfc3339).ok())
        .unwrap_or_else(|| "-".to_string())
}

fn visibility_summary(policy: &Policy) -> String {
    if policy.visible_to_everyone {
        return "Everyone".to_string();
    }
    // Records may carry either the id lists or the object lists.
    let groups = policy
        .visible_group_ids
        .as_ref()
        .map_or(0, Vec::len)
        .max(policy.visible_groups.as_ref().map_or(0, Vec::len));
    let users = policy
        .visible_user_ids
        .as_ref()
        .map_or(0, Vec::len)
        .max(policy.visible_users.as_ref().map_or(0, Vec::len));
    format!("{groups} groups, {users} users")
}

pub fn print_policy_table(policies: &[Policy]) {
    if policies.is_empty() {
        println!("No policies found.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "App", "Visibility", "Duration", "Approval steps"]);
    for p in policies {
        let app = p.app.as_ref().map_or(p.app_id.as_str(), |a| a.name.as_str());
        let steps = p.approval_steps.as_ref().map_or(0, Vec::len);
        builder.push_record([
            p.id.clone(),
            p.name.clone(),
            app.to_string(),
            visibility_summary(p),
            p.duration_summary(),
            steps.to_string(),
        ]);
    }
    println!("{}", table(builder));
    println!("Total: {}", policies.len());
}

pub fn print_policy_detail(policy: &Policy) {
    let app = policy
        .app
        .as_ref()
        .map_or(policy.app_id.clone(), |a| format!("{} ({})", a.name, a.id));
    println!("{} {} ({})", "Policy:".cyan(), policy.name.bold(), policy.id);
    println!(
        "{}: {}",
        "Description".cyan(),
        or_dash(policy.description.as_deref())
    );
    println!("{}: {}", "App".cyan(), app);
    println!("{}: {}", "Visibility".cyan(), visibility_summary(policy));
    if !policy.visible_to_everyone {
        let groups: Vec<&str> = policy
            .visible_groups
            .iter()
            .flatten()
            .map(|g| g.name.as_str())
            .collect();
        let users: Vec<String> = policy
            .visible_users
            .iter()
            .flatten()
            .map(User::display_name)
            .collect();
        if !groups.is_empty() {
            println!("  groups: {}", groups.join(", "));
        }
        if !users.is_empty() {
            println!("  users: {}", users.join(", "));
        }
    }
    println!("{}: {}", "Access".cyan(), policy.duration_summary());
    if let (Some(min), Some(max)) = (policy.min_days, policy.max_days) {
        println!("  range: {min}-{max} days");
    }
    if policy.require_reason == Some(true) {
        println!("  reason required");
    }

    let reviewers: Vec<String> = policy
        .reviewers
        .iter()
        .flatten()
        .map(User::display_name)
        .collect();
    println!(
        "{}: {}{}",
        "Reviewers".cyan(),
        if policy.use_app_owner_as_reviewer {
            "app owner; "
        } else {
            ""
        },
        if reviewers.is_empty() {
            "-".to_string()
        } else {
            reviewers.join(", ")
        }
    );

    if let Some(steps) = policy.approval_steps.as_ref().filter(|s| !s.is_empty()) {
        let mut builder = Builder::default();
        builder.push_record(["#", "Type", "Users", "Escalate"]);
        for (i, step) in steps.iter().enumerate() {
            let users = step.user_ids.as_ref().map_or(String::new(), |ids| ids.join(", "));
            builder.push_record([
                (i + 1).to_string(),
                step.step_type.to_string(),
                users,
                if step.escalate { "yes" } else { "no" }.to_string(),
            ]);
        }
        println!("{}", "Approval chain".cyan());
        println!("{}", table(builder));
    }

    for kind in [StepKind::Provisioning, StepKind::Revocation] {
        let steps = match kind {
            StepKind::Provisioning => policy.provisioning_steps.as_deref(),
            StepKind::Revocation => policy.revocation_steps.as_deref(),
        };
        let Some(steps) = steps.filter(|s| !s.is_empty()) else {
            continue;
        };
        let mut builder = Builder::default();
        builder.push_record(["Provider", "Type", "Target", "Description"]);
        for step in steps {
            builder.push_record([
                step.provider.as_str(),
                step.step_type.as_str(),
                step.target.as_str(),
                or_dash(step.description.as_deref()),
            ]);
        }
        println!("{} steps", kind.to_string().cyan());
        println!("{}", table(builder));
    }

    println!("{}: {}", "Created".cyan(), timestamp(policy.created_at));
    println!("{}: {}", "Updated".cyan(), timestamp(policy.updated_at));
}

pub fn print_user_table(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Email", "Title", "Department"]);
    for u in users {
        builder.push_record([
            u.id.clone(),
            u.display_name(),
            u.email.clone(),
            or_dash(u.title.as_deref()).to_string(),
            or_dash(u.department.as_deref()).to_string(),
        ]);
    }
    println!("{}", table(builder));
}

pub fn print_group_table(groups: &[Group]) {
    if groups.is_empty() {
        println!("No groups found.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Description"]);
    for g in groups {
        builder.push_record([
            g.id.as_str(),
            g.name.as_str(),
            or_dash(g.description.as_deref()),
        ]);
    }
    println!("{}", table(builder));
}

pub fn print_app_table(apps: &[App]) {
    if apps.is_empty() {
        println!("No apps found.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "URL", "Owner"]);
    for a in apps {
        let owner = a
            .owner
            .as_ref()
            .map(User::display_name)
            .or_else(|| a.owner_id.clone())
            .unwrap_or_else(|| "-".to_string());
        builder.push_record([
            a.id.clone(),
            a.name.clone(),
            or_dash(a.url.as_deref()).to_string(),
            owner,
        ]);
    }
    println!("{}", table(builder));
}
