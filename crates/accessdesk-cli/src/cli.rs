use accessdesk_core::{AccessDurationType, StepKind, Visibility};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "accessdesk")]
#[command(about = "AccessDesk CLI: manage access policies for your apps")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides config and ACCESSDESK_URL env var)
    #[arg(short, long, global = true, env = "ACCESSDESK_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "ACCESSDESK_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Act as this user (id or email) when listing policies
    #[arg(long = "as", global = true, value_name = "USER")]
    pub acting_as: Option<String>,

    /// Log level when RUST_LOG is unset (e.g. debug, info, warn)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List policies visible to the acting user
    List,
    /// Show a single policy
    Show(ShowArgs),
    /// Create a new policy
    Create(CreateArgs),
    /// Edit an existing policy
    Edit(EditArgs),
    /// Delete a policy
    Delete(DeleteArgs),
    /// List directory users
    Users,
    /// List directory groups
    Groups,
    /// List applications
    Apps,
    /// Show known integration providers, step types and targets
    Catalog(CatalogArgs),
    /// Dry-run a provisioning or revocation step against its provider
    TestIntegration(TestIntegrationArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StepKindArg {
    Provisioning,
    Revocation,
}

impl From<StepKindArg> for StepKind {
    fn from(arg: StepKindArg) -> Self {
        match arg {
            StepKindArg::Provisioning => StepKind::Provisioning,
            StepKindArg::Revocation => StepKind::Revocation,
        }
    }
}

#[derive(clap::Args)]
pub struct ShowArgs {
    /// Policy id
    pub id: String,
}

/// Field edits shared by `create` and `edit`. Omitted flags leave the draft unchanged.
#[derive(clap::Args, Default, Debug)]
pub struct PolicyArgs {
    /// Policy name
    #[arg(long)]
    pub name: Option<String>,
    /// Policy description (empty string clears it)
    #[arg(long)]
    pub description: Option<String>,
    /// App id the policy governs
    #[arg(long)]
    pub app: Option<String>,
    /// Who can see the policy: everyone or specific
    #[arg(long)]
    pub visibility: Option<Visibility>,
    /// Group allowed to see the policy (repeatable, replaces the current list)
    #[arg(long = "group", value_name = "GROUP_ID")]
    pub groups: Vec<String>,
    /// User allowed to see the policy (repeatable, replaces the current list)
    #[arg(long = "user", value_name = "USER_ID")]
    pub users: Vec<String>,
    /// Access duration: indefinite, fixed or user-requested
    #[arg(long)]
    pub duration: Option<AccessDurationType>,
    /// Days of access for a fixed duration
    #[arg(long)]
    pub days: Option<u32>,
    /// Shortest duration a requester may ask for
    #[arg(long)]
    pub min_days: Option<u32>,
    /// Longest duration a requester may ask for
    #[arg(long)]
    pub max_days: Option<u32>,
    /// Whether requesters must give a reason
    #[arg(long)]
    pub require_reason: Option<bool>,
    /// Whether the app owner reviews requests
    #[arg(long)]
    pub app_owner_reviewer: Option<bool>,
    /// Reviewer user id (repeatable, replaces the reviewer pool)
    #[arg(long = "reviewer", value_name = "USER_ID")]
    pub reviewers: Vec<String>,
    /// Approval step: `app_owner` or `specific:USER,USER`; a trailing `!` escalates
    /// (repeatable, replaces the chain)
    #[arg(long = "approval", value_name = "STEP")]
    pub approvals: Vec<String>,
    /// Provisioning step as PROVIDER:TYPE:TARGET[:DESCRIPTION] (repeatable, replaces the list)
    #[arg(long = "provision", value_name = "STEP")]
    pub provisioning: Vec<String>,
    /// Revocation step as PROVIDER:TYPE:TARGET[:DESCRIPTION] (repeatable, replaces the list)
    #[arg(long = "revoke", value_name = "STEP")]
    pub revocation: Vec<String>,
    /// Remove every provisioning step
    #[arg(long, conflicts_with = "provisioning")]
    pub no_provisioning: bool,
    /// Remove every revocation step
    #[arg(long, conflicts_with = "revocation")]
    pub no_revocation: bool,
}

#[derive(clap::Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub fields: PolicyArgs,
}

#[derive(clap::Args)]
pub struct EditArgs {
    /// Policy id
    pub id: String,
    #[command(flatten)]
    pub fields: PolicyArgs,
}

#[derive(clap::Args)]
pub struct DeleteArgs {
    /// Policy id
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(clap::Args)]
pub struct CatalogArgs {
    /// Only show one step kind
    #[arg(long)]
    pub kind: Option<StepKindArg>,
}

#[derive(clap::Args)]
pub struct TestIntegrationArgs {
    /// Test a step stored on this policy
    #[arg(long, conflicts_with_all = ["provider", "step_type", "target"])]
    pub policy: Option<String>,
    /// Which step list of the policy to read
    #[arg(long, default_value = "provisioning")]
    pub kind: StepKindArg,
    /// Zero-based index of the step within the list
    #[arg(long, default_value_t = 0)]
    pub index: usize,
    /// Provider to call (e.g. okta)
    #[arg(long, required_unless_present = "policy")]
    pub provider: Option<String>,
    /// Step type (e.g. add_to_group)
    #[arg(long, required_unless_present = "policy")]
    pub step_type: Option<String>,
    /// Step target (e.g. sales)
    #[arg(long, required_unless_present = "policy")]
    pub target: Option<String>,
    /// Extra step parameter as key=value (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, format, admin_email)
    pub key: String,
    /// Value
    pub value: String,
}
