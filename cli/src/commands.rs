use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use crm::models::{
    ComponentType, CustomerStatus, PaymentStage, PaymentStatus, ProjectStatus, ProjectType,
    QuotationStatus, Role, ServiceStatus, ServiceType,
};
use crm::queries::{payment_totals, service_counts};
use crm::models::PaymentPatch;
use crm::views::{
    ComponentFilter, CustomerFilter, PackageFilter, PaymentFilter, ProjectFilter, QuotationFilter,
    ServiceFilter, UserFilter,
};
use crm::{AppContext, Config, CustomerForm, EnumFilter, visible_sections};
use serde_json::json;
use tracing::info;

use crate::logging::init_logging;
use crate::output::{money, write_json, write_table};
use crate::Error;

/// Solarhub CLI
///
/// Loads the installer's records into simulated stores (with latency and
/// random failures, like the hosted API) and prints the filtered screens.
#[derive(Debug, Parser)]
#[command(name = "solarhub", version = "0.1.0")]
#[command(about = "Customer records for a solar installation business")]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command. They override the config file and the
/// `SOLARHUB_*` environment.
#[derive(Debug, Args)]
struct GlobalArgs {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the failure RNG
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Probability in [0, 1] that a store call fails
    #[arg(long, global = true)]
    failure_rate: Option<f64>,

    /// Simulated latency per store call
    #[arg(long, global = true)]
    latency_ms: Option<u64>,

    /// How many times failed loads are retried
    #[arg(long, global = true, default_value_t = 0)]
    retries: u32,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
}

impl Cli {
    pub async fn handle() -> Result<(), Error> {
        let cli = Self::parse();
        let config = cli.config().await?;
        let _guard = init_logging(config.log_format);

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        cli.run(config, &mut out).await
    }

    /// Defaults, then the config file, then the environment, then flags.
    pub async fn config(&self) -> Result<Config, Error> {
        let mut config = match &self.global.config {
            Some(path) => Config::from_file(path).await?,
            None => Config::default(),
        };
        config.apply_process_env()?;

        if let Some(seed) = self.global.seed {
            config.seed = Some(seed);
        }
        if let Some(rate) = self.global.failure_rate {
            config.failure_rate = rate;
        }
        if let Some(latency_ms) = self.global.latency_ms {
            config.latency_ms = latency_ms;
        }
        config.validate()?;
        Ok(config)
    }

    pub async fn run(self, config: Config, out: &mut dyn Write) -> Result<(), Error> {
        let json = self.global.json;

        match self.command {
            Commands::Sections { role } => sections(role, json, out),
            Commands::Store(command) => {
                let ctx = AppContext::from_config(&config);
                ctx.retry_load(self.global.retries).await?;
                info!(command = command.name(), "Stores loaded");
                command.run(&ctx, json, out).await
            }
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Menu sections visible to a role
    Sections {
        #[arg(long)]
        role: Role,
    },

    #[command(flatten)]
    Store(StoreCommands),
}

/// Commands that read or write the loaded stores.
#[derive(Debug, Subcommand)]
enum StoreCommands {
    /// Headline numbers: active projects, open quotations, revenue
    Dashboard,

    /// List customers
    Customers(CustomerArgs),

    /// List projects with their customer
    Projects(ProjectArgs),

    /// List the quotation of every project
    Quotations(QuotationArgs),

    /// List payments with per-status totals
    Payments(PaymentArgs),

    /// List service visits with per-status counts
    Services(ServiceArgs),

    /// List packages
    Packages {
        #[arg(long = "type", default_value = "All")]
        kind: EnumFilter<ProjectType>,
    },

    /// List components
    Components {
        #[arg(long = "type", default_value = "All")]
        kind: EnumFilter<ComponentType>,
    },

    /// List staff accounts
    Users(UserArgs),

    /// Create a customer
    AddCustomer(AddCustomerArgs),

    /// Record a payment as paid today
    MarkPaid {
        /// Payment id
        id: String,

        #[arg(long)]
        receipt: String,
    },
}

impl StoreCommands {
    fn name(&self) -> &'static str {
        match self {
            StoreCommands::Dashboard => "dashboard",
            StoreCommands::Customers(_) => "customers",
            StoreCommands::Projects(_) => "projects",
            StoreCommands::Quotations(_) => "quotations",
            StoreCommands::Payments(_) => "payments",
            StoreCommands::Services(_) => "services",
            StoreCommands::Packages { .. } => "packages",
            StoreCommands::Components { .. } => "components",
            StoreCommands::Users(_) => "users",
            StoreCommands::AddCustomer(_) => "add-customer",
            StoreCommands::MarkPaid { .. } => "mark-paid",
        }
    }

    async fn run(self, ctx: &AppContext, json: bool, out: &mut dyn Write) -> Result<(), Error> {
        match self {
            StoreCommands::Dashboard => dashboard(ctx, json, out),
            StoreCommands::Customers(args) => customers(ctx, args, json, out),
            StoreCommands::Projects(args) => projects(ctx, args, json, out),
            StoreCommands::Quotations(args) => quotations(ctx, args, json, out),
            StoreCommands::Payments(args) => payments(ctx, args, json, out),
            StoreCommands::Services(args) => services(ctx, args, json, out),
            StoreCommands::Packages { kind } => packages(ctx, kind, json, out),
            StoreCommands::Components { kind } => components(ctx, kind, json, out),
            StoreCommands::Users(args) => users(ctx, args, json, out),
            StoreCommands::AddCustomer(args) => add_customer(ctx, args, json, out).await,
            StoreCommands::MarkPaid { id, receipt } => mark_paid(ctx, id, receipt, json, out).await,
        }
    }
}

#[derive(Debug, Args)]
struct CustomerArgs {
    /// Case-insensitive match on the name
    #[arg(long, default_value = "")]
    search: String,

    #[arg(long, default_value = "All")]
    status: EnumFilter<CustomerStatus>,
}

#[derive(Debug, Args)]
struct ProjectArgs {
    /// Case-insensitive match on project or customer name
    #[arg(long, default_value = "")]
    search: String,

    #[arg(long, default_value = "All")]
    status: EnumFilter<ProjectStatus>,

    #[arg(long = "type", default_value = "All")]
    kind: EnumFilter<ProjectType>,
}

#[derive(Debug, Args)]
struct QuotationArgs {
    #[arg(long, default_value = "")]
    search: String,

    #[arg(long, default_value = "All")]
    status: EnumFilter<QuotationStatus>,
}

#[derive(Debug, Args)]
struct PaymentArgs {
    #[arg(long, default_value = "")]
    search: String,

    #[arg(long, default_value = "All")]
    status: EnumFilter<PaymentStatus>,

    #[arg(long, default_value = "All")]
    stage: EnumFilter<PaymentStage>,
}

#[derive(Debug, Args)]
struct ServiceArgs {
    /// Also matches the technician
    #[arg(long, default_value = "")]
    search: String,

    #[arg(long, default_value = "All")]
    status: EnumFilter<ServiceStatus>,

    #[arg(long = "type", default_value = "All")]
    kind: EnumFilter<ServiceType>,
}

#[derive(Debug, Args)]
struct UserArgs {
    /// Case-insensitive match on name or email
    #[arg(long, default_value = "")]
    search: String,

    #[arg(long, default_value = "All")]
    role: EnumFilter<Role>,
}

#[derive(Debug, Args)]
struct AddCustomerArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    address: String,

    #[arg(long, default_value = "Active")]
    status: CustomerStatus,
}

// ─── Command bodies ────────────────────────────────────────────────────────

fn dashboard(ctx: &AppContext, json: bool, out: &mut dyn Write) -> Result<(), Error> {
    let stats = ctx.dashboard_view().current()?;
    if json {
        return write_json(out, &stats);
    }

    let rows = vec![
        vec!["Active projects".into(), stats.active_projects.to_string()],
        vec!["Pending quotations".into(), stats.pending_quotations.to_string()],
        vec![
            "Completed installations".into(),
            stats.completed_installations.to_string(),
        ],
        vec!["Upcoming services".into(), stats.upcoming_services.to_string()],
        vec!["Total revenue".into(), money(stats.total_revenue)],
    ];
    write_table(out, &["Metric", "Value"], &rows)?;
    Ok(())
}

fn customers(
    ctx: &AppContext,
    args: CustomerArgs,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let rows = ctx
        .customer_view(CustomerFilter {
            search: args.search,
            status: args.status,
        })
        .current()?;
    if json {
        return write_json(out, &rows);
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                c.name.clone(),
                c.email.clone(),
                c.phone.clone(),
                c.status.to_string(),
                c.created_at.to_string(),
            ]
        })
        .collect();
    write_table(
        out,
        &["Id", "Name", "Email", "Phone", "Status", "Created"],
        &table,
    )?;
    Ok(())
}

fn projects(
    ctx: &AppContext,
    args: ProjectArgs,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let rows = ctx
        .project_view(ProjectFilter {
            search: args.search,
            status: args.status,
            kind: args.kind,
        })
        .current()?;
    if json {
        return write_json(out, &rows);
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.project.id.clone(),
                r.project.name.clone(),
                r.customer_name.clone(),
                r.project.kind.to_string(),
                r.project.status.to_string(),
                r.project.package.name.clone(),
            ]
        })
        .collect();
    write_table(
        out,
        &["Id", "Name", "Customer", "Type", "Status", "Package"],
        &table,
    )?;
    Ok(())
}

fn quotations(
    ctx: &AppContext,
    args: QuotationArgs,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let rows = ctx
        .quotation_view(QuotationFilter {
            search: args.search,
            status: args.status,
        })
        .current()?;
    if json {
        return write_json(out, &rows);
    }

    let today = ctx.options().clock.today();
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.quotation.id.clone(),
                r.project_name.clone(),
                r.customer_name.clone(),
                money(r.quotation.total_amount),
                r.quotation.status.to_string(),
                r.quotation.valid_until.to_string(),
                r.quotation.days_remaining(today).to_string(),
            ]
        })
        .collect();
    write_table(
        out,
        &[
            "Id",
            "Project",
            "Customer",
            "Amount",
            "Status",
            "Valid until",
            "Days left",
        ],
        &table,
    )?;
    Ok(())
}

fn payments(
    ctx: &AppContext,
    args: PaymentArgs,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let rows = ctx
        .payment_view(PaymentFilter {
            search: args.search,
            status: args.status,
            stage: args.stage,
        })
        .current()?;
    let totals = payment_totals(rows.iter().map(|r| &r.payment));
    if json {
        return write_json(out, &json!({ "payments": rows, "totals": totals }));
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.project_name.clone(),
                r.customer_name.clone(),
                r.payment.stage.to_string(),
                money(r.payment.amount),
                r.payment.status.to_string(),
                r.payment.due_date.to_string(),
                r.payment.receipt.clone().unwrap_or_default(),
            ]
        })
        .collect();
    write_table(
        out,
        &["Project", "Customer", "Stage", "Amount", "Status", "Due", "Receipt"],
        &table,
    )?;
    writeln!(
        out,
        "\nPaid {}  Pending {}  Overdue {}",
        money(totals.paid),
        money(totals.pending),
        money(totals.overdue)
    )?;
    Ok(())
}

fn services(
    ctx: &AppContext,
    args: ServiceArgs,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let rows = ctx
        .service_view(ServiceFilter {
            search: args.search,
            status: args.status,
            kind: args.kind,
        })
        .current()?;
    let counts = service_counts(rows.iter().map(|r| &r.service));
    if json {
        return write_json(out, &json!({ "services": rows, "counts": counts }));
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.project_name.clone(),
                r.customer_name.clone(),
                r.service.kind.to_string(),
                r.service.status.to_string(),
                r.service.scheduled_date.to_string(),
                r.service.technician.clone(),
            ]
        })
        .collect();
    write_table(
        out,
        &["Project", "Customer", "Type", "Status", "Scheduled", "Technician"],
        &table,
    )?;
    writeln!(
        out,
        "\nScheduled {}  In progress {}  Completed {}",
        counts.scheduled, counts.in_progress, counts.completed
    )?;
    Ok(())
}

fn packages(
    ctx: &AppContext,
    kind: EnumFilter<ProjectType>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let rows = ctx.package_view(PackageFilter { kind }).current()?;
    if json {
        return write_json(out, &rows);
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.name.clone(),
                p.kind.to_string(),
                p.capacity.clone(),
                p.components.len().to_string(),
                money(p.total_price),
            ]
        })
        .collect();
    write_table(
        out,
        &["Id", "Name", "Type", "Capacity", "Components", "Price"],
        &table,
    )?;
    Ok(())
}

fn components(
    ctx: &AppContext,
    kind: EnumFilter<ComponentType>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let rows = ctx.component_view(ComponentFilter { kind }).current()?;
    if json {
        return write_json(out, &rows);
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                c.kind.to_string(),
                c.brand.clone(),
                c.model.clone(),
                c.quantity.to_string(),
                money(c.price),
                c.warranty.clone(),
            ]
        })
        .collect();
    write_table(
        out,
        &["Id", "Type", "Brand", "Model", "Qty", "Unit price", "Warranty"],
        &table,
    )?;
    Ok(())
}

fn users(ctx: &AppContext, args: UserArgs, json: bool, out: &mut dyn Write) -> Result<(), Error> {
    let rows = ctx
        .user_view(UserFilter {
            search: args.search,
            role: args.role,
        })
        .current()?;
    if json {
        return write_json(out, &rows);
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|u| {
            vec![
                u.id.clone(),
                u.name.clone(),
                u.email.clone(),
                u.role.to_string(),
            ]
        })
        .collect();
    write_table(out, &["Id", "Name", "Email", "Role"], &table)?;
    Ok(())
}

fn sections(role: Role, json: bool, out: &mut dyn Write) -> Result<(), Error> {
    let sections = visible_sections(role);
    if json {
        return write_json(out, &sections);
    }
    for section in sections {
        writeln!(out, "{}", section.label())?;
    }
    Ok(())
}

async fn add_customer(
    ctx: &AppContext,
    args: AddCustomerArgs,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let draft = CustomerForm {
        name: args.name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        status: args.status,
    }
    .submit()?;

    let customer = ctx.customers.create(draft).await?;
    if json {
        return write_json(out, &customer);
    }
    writeln!(out, "Created customer {} ({})", customer.name, customer.id)?;
    Ok(())
}

async fn mark_paid(
    ctx: &AppContext,
    id: String,
    receipt: String,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let receipt = receipt.trim();
    if receipt.is_empty() {
        return Err(Error::InvalidArgument("receipt must not be blank".into()));
    }

    let today = ctx.options().clock.today();
    let payment = ctx
        .payments
        .update(&id, PaymentPatch::paid(today, receipt))
        .await?;
    if json {
        return write_json(out, &payment);
    }
    writeln!(
        out,
        "Payment {} marked paid on {} ({})",
        payment.id, today, receipt
    )?;
    Ok(())
}
