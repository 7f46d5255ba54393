use accessdesk_client::HttpPolicyClient;
use accessdesk_core::PolicyApi;
use anyhow::Result;

use crate::cli::OutputFormat;
use crate::output::{print_app_table, print_group_table, print_user_table, print_value};

pub async fn users(client: &HttpPolicyClient, format: OutputFormat) -> Result<()> {
    let users = client.list_users().await?;
    match format {
        OutputFormat::Table => print_user_table(&users),
        _ => print_value(&users, format)?,
    }
    Ok(())
}

pub async fn groups(client: &HttpPolicyClient, format: OutputFormat) -> Result<()> {
    let groups = client.list_groups().await?;
    match format {
        OutputFormat::Table => print_group_table(&groups),
        _ => print_value(&groups, format)?,
    }
    Ok(())
}

pub async fn apps(client: &HttpPolicyClient, format: OutputFormat) -> Result<()> {
    let apps = client.list_apps().await?;
    match format {
        OutputFormat::Table => print_app_table(&apps),
        _ => print_value(&apps, format)?,
    }
    Ok(())
}
