use clap::Parser;
use dern_support::app::knowledge_base::{self, Topic};
use dern_support::app::{
    spare_parts::CATALOG, AppointmentService, QuoteOverview, QuoteService, SparePartService,
    SupportRequestService,
};
use dern_support::config::cli::{
    AppointmentCommand, Command, PartCommand, QuoteCommand, RequestCommand,
};
use dern_support::core::access::{self, Capability};
use dern_support::domain::model::{
    Appointment, Identity, RegisterRequest, SessionState, SparePart, SupportRequest,
};
use dern_support::utils::error::ErrorSeverity;
use dern_support::utils::logger;
use dern_support::{ApiClient, CliConfig, FileTokenStore, SessionManager, SupportError};

type Client = ApiClient<FileTokenStore>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    let settings = config.settings();

    // 初始化日誌（設定檔有錯時仍使用預設格式）
    let (json_logs, level) = match &settings {
        Ok(settings) => (settings.json_logs, settings.log_level.clone()),
        Err(_) => (config.json_logs, None),
    };
    if json_logs {
        logger::init_json_logger(config.verbose, level.as_deref());
    } else {
        logger::init_cli_logger(config.verbose, level.as_deref());
    }

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };
    tracing::debug!("Settings: {:?}", settings);

    let session = match SessionManager::restore(FileTokenStore::new(&settings.token_path)) {
        Ok(session) => session,
        Err(e) => fail(&e),
    };
    let client = match ApiClient::new(&settings, session) {
        Ok(client) => client,
        Err(e) => fail(&e),
    };

    if let Err(e) = run(&client, config.command).await {
        fail(&e);
    }

    Ok(())
}

fn fail(e: &SupportError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

async fn run(client: &Client, command: Command) -> dern_support::Result<()> {
    match command {
        Command::Login { email, password } => {
            let identity = client.login(&email, &password).await?;
            println!("✅ Logged in");
            print_identity(&identity);
        }
        Command::Register(args) => {
            let request = RegisterRequest {
                full_name: args.full_name,
                email: args.email,
                password: args.password,
                confirm_password: args.confirm_password,
            };
            let identity = client.register(&request).await?;
            println!("✅ Registered and logged in");
            print_identity(&identity);
        }
        Command::Logout => {
            client.logout()?;
            println!("Logged out");
        }
        Command::Whoami => match client.session().state() {
            SessionState::Anonymous => println!("Not logged in"),
            SessionState::Authenticated(identity) => print_identity(&identity),
        },
        Command::Menu => {
            let identity = client.require_identity()?;
            println!("Dashboard");
            for section in access::sections_for(identity.role.as_ref()) {
                println!("  - {}", section);
            }
            println!("You can:");
            for capability in access::capabilities(&identity) {
                println!("  - {}", capability.action());
            }
        }
        Command::Kb { topic } => print_knowledge_base(topic),
        Command::Appointments(command) => run_appointments(client, command).await?,
        Command::Requests(command) => run_requests(client, command).await?,
        Command::Parts(command) => run_parts(client, command).await?,
        Command::Quotes(command) => run_quotes(client, command).await?,
    }
    Ok(())
}

async fn run_appointments(client: &Client, command: AppointmentCommand) -> dern_support::Result<()> {
    let service = AppointmentService::new(client);
    let rows = match command {
        AppointmentCommand::List => service.list().await?,
        AppointmentCommand::Create {
            date,
            location,
            phone,
        } => service.create(&date, &location, &phone).await?,
        AppointmentCommand::Delete { id } => service.delete(id).await?,
    };
    print_appointments(&client.require_identity()?, &rows);
    Ok(())
}

async fn run_requests(client: &Client, command: RequestCommand) -> dern_support::Result<()> {
    let service = SupportRequestService::new(client);
    let rows = match command {
        RequestCommand::List => service.list().await?,
        RequestCommand::Create {
            issue_type,
            description,
        } => service.create(&issue_type, &description).await?,
        RequestCommand::Update {
            id,
            issue_type,
            description,
        } => {
            let mut request = service
                .list()
                .await?
                .into_iter()
                .find(|row| row.support_request_id == id)
                .ok_or_else(|| {
                    SupportError::validation(format!("Support request {} not found", id))
                })?;
            if let Some(issue_type) = issue_type {
                request.issue_type = issue_type;
            }
            if let Some(description) = description {
                request.description = description;
            }
            service.update(&request).await?
        }
        RequestCommand::Delete { id } => service.delete(id).await?,
    };
    print_requests(&client.require_identity()?, &rows);
    Ok(())
}

async fn run_parts(client: &Client, command: PartCommand) -> dern_support::Result<()> {
    let service = SparePartService::new(client);
    let rows = match command {
        PartCommand::Catalog => {
            for name in CATALOG {
                println!("{}", name);
            }
            return Ok(());
        }
        PartCommand::List => service.list().await?,
        PartCommand::Create {
            name,
            stock_level,
            cost,
        } => service.create(&name, stock_level, cost).await?,
        PartCommand::Update {
            id,
            stock_level,
            cost,
        } => {
            let mut part = service
                .list()
                .await?
                .into_iter()
                .find(|row| row.spare_part_id == id)
                .ok_or_else(|| SupportError::validation(format!("Spare part {} not found", id)))?;
            if let Some(stock_level) = stock_level {
                part.stock_level = stock_level;
            }
            if let Some(cost) = cost {
                part.cost = cost;
            }
            service.update(&part).await?
        }
        PartCommand::Delete { id } => service.delete(id).await?,
    };
    print_parts(&rows);
    Ok(())
}

async fn run_quotes(client: &Client, command: QuoteCommand) -> dern_support::Result<()> {
    let service = QuoteService::new(client);
    let overview = match command {
        QuoteCommand::List => service.overview().await?,
        QuoteCommand::Create {
            request_id,
            parts,
            description,
        } => service.create(request_id, &parts, &description).await?,
        QuoteCommand::Update {
            id,
            request_id,
            parts,
            description,
        } => service.update(id, request_id, &parts, &description).await?,
        QuoteCommand::Delete { id } => service.delete(id).await?,
    };
    print_quotes(&overview);
    Ok(())
}

fn print_identity(identity: &Identity) {
    println!(
        "Role:    {}",
        identity
            .role
            .as_ref()
            .map_or("(none)".to_string(), |role| role.to_string())
    );
    println!("User id: {}", identity.subject_id.as_deref().unwrap_or("(none)"));
    if let Some(email) = &identity.email {
        println!("Email:   {}", email);
    }
    if let Some(expires_at) = identity.expires_at {
        println!("Expires: {}", expires_at.to_rfc3339());
    }
}

fn print_knowledge_base(topic: Option<Topic>) {
    println!("Knowledge Base");
    for article in knowledge_base::articles(topic) {
        println!("\n[{}] {}", article.topic, article.question);
        println!("  {}", article.answer);
    }
}

fn print_appointments(identity: &Identity, rows: &[Appointment]) {
    let show_user = access::can(identity, Capability::ManageAppointments);
    println!("Appointments ({})", rows.len());
    for row in rows {
        let mut line = format!(
            "  #{:<5} {:<20} {:<24} {}",
            row.appointment_id,
            row.appointment_date,
            row.location,
            row.user_phone.as_deref().unwrap_or("-")
        );
        if show_user {
            line.push_str(&format!("  [{}]", row.user_name.as_deref().unwrap_or(&row.user_id)));
        }
        println!("{}", line);
    }
}

fn print_requests(identity: &Identity, rows: &[SupportRequest]) {
    let show_user = access::can(identity, Capability::ManageSupportRequests);
    println!("Support Requests ({})", rows.len());
    for row in rows {
        let mut line = format!(
            "  #{:<5} {:<16} {:<28} {}",
            row.support_request_id, row.issue_type, row.request_date, row.description
        );
        if show_user {
            line.push_str(&format!("  [{}]", row.user_name.as_deref().unwrap_or(&row.user_id)));
        }
        println!("{}", line);
    }
}

fn print_parts(rows: &[SparePart]) {
    println!("Spare Parts ({})", rows.len());
    for row in rows {
        println!(
            "  #{:<5} {:<16} stock {:<5} ${:.2}",
            row.spare_part_id, row.name, row.stock_level, row.cost
        );
    }
}

fn print_quotes(overview: &QuoteOverview) {
    println!("Quotes ({})", overview.quotes.len());
    for quote in &overview.quotes {
        println!(
            "  #{:<5} request #{:<5} ${:>9.2}  {}",
            quote.quote_id, quote.support_request_id, quote.total_cost, quote.description
        );
    }
}
