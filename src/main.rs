use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Parser;
use harbor_dashboard::{
    config::{DashboardConfig, default_config_path, default_config_toml},
    local_store::LocalStore,
    models::Granularity,
    observability,
    pages::{
        ABOUT_PAGE, AboutView, DetailPage, DetailQuery, DetailView, Footer, HomeView, LANDING_PAGE, Notification,
        load_about, load_home, persist_granularity, stored_granularity,
    },
    render::{PageContent, QuotaFormatter, render_number},
    services::{ApiClient, sync_status},
};

/// CLI arguments for the Harbor dashboard
#[derive(Parser, Debug)]
#[command(version, about = "Harbor AI API platform dashboard", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (defaults to ~/.config/harbor-dashboard/config.toml if it exists)
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Show usage statistics and write chart configurations
    Detail {
        /// Window start, unix seconds (defaults depend on granularity)
        #[arg(long)]
        start: Option<i64>,
        /// Window end, unix seconds (defaults to one hour from now)
        #[arg(long)]
        end: Option<i64>,
        /// Bucket width: hour, day or week (remembered for next time)
        #[arg(short, long)]
        granularity: Option<Granularity>,
        /// Narrow to one user (admin only)
        #[arg(short, long)]
        username: Option<String>,
        /// Narrow cache statistics to one model
        #[arg(short, long)]
        model: Option<String>,
        /// Directory to write the three chart configurations to
        #[arg(long)]
        charts_dir: Option<PathBuf>,
        /// Print the full view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the site notice and home page
    Home,
    /// Show the about page
    About,
    /// Show the site footer
    Footer,
    /// Initialize a new configuration file
    Init {
        /// Path to create the config file (defaults to ~/.config/harbor-dashboard/config.toml)
        #[arg(short, long)]
        output: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match args.command {
        Command::Init { output, force } => run_init(output, force),
        command => run(command, args.config.as_deref()).await,
    }
}

/// Run a command that talks to the backend.
async fn run(command: Command, config_path: Option<&str>) {
    let config = match DashboardConfig::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = observability::init_tracing(&config.observability) {
        eprintln!("Failed to initialize tracing: {}", e);
    }

    let client = match ApiClient::new(&config.backend) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut store = open_store(&config);
    if let Err(e) = sync_status(&client, &mut store).await {
        tracing::warn!(error = %e, "Failed to sync site status, using cached values");
    }

    match command {
        Command::Detail {
            start,
            end,
            granularity,
            username,
            model,
            charts_dir,
            json,
        } => {
            let stored = stored_granularity(&store, config.display.default_granularity);
            let mut query = DetailQuery::with_defaults(granularity.unwrap_or(stored), Utc::now().timestamp());
            if let Some(start) = start {
                query.start_timestamp = start;
            }
            if let Some(end) = end {
                query.end_timestamp = end;
            }
            query.username = username.unwrap_or_default();
            query.model_name = model.unwrap_or_default();

            if let Some(granularity) = granularity {
                persist_granularity(&mut store, granularity);
            }

            let formatter = QuotaFormatter::from_config(&config.display).with_store_overrides(&store);
            let mut page = DetailPage::new(
                client,
                formatter,
                config.display.offset(),
                config.backend.admin,
                query,
            );
            run_detail(&mut page, charts_dir.as_deref(), json).await;
        }
        Command::Home => {
            let logged_in = config.backend.access_token.as_deref().is_some_and(|t| !t.is_empty());
            let view = load_home(&client, &mut store, logged_in).await;
            print_home(&view);
        }
        Command::About => {
            let view = load_about(&client, &mut store).await;
            print_about(&view);
        }
        Command::Footer => {
            println!("{}", Footer::from_store(&store).to_text());
        }
        Command::Init { output, force } => run_init(output, force),
    }
}

fn open_store(config: &DashboardConfig) -> LocalStore {
    match config.storage.resolved_path() {
        Some(path) => LocalStore::open(path),
        None => {
            tracing::warn!("Could not determine a data directory, local store will not persist");
            LocalStore::in_memory()
        }
    }
}

async fn run_detail(page: &mut DetailPage, charts_dir: Option<&Path>, json: bool) {
    page.refresh().await;
    let view = page.view();
    print_notifications(&view.notifications);

    if json {
        match serde_json::to_string_pretty(view) {
            Ok(out) => println!("{out}"),
            Err(e) => eprintln!("Failed to serialize view: {}", e),
        }
    } else {
        print_detail(view, page.formatter());
    }

    if let Some(dir) = charts_dir {
        let Some(charts) = page.charts() else {
            eprintln!("No usage data loaded, charts not written");
            return;
        };
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Failed to create directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        for (name, chart) in [
            ("call_count.json", &charts.call_count),
            ("consumption.json", &charts.consumption),
            ("token_cache.json", &charts.token_cache),
        ] {
            let path = dir.join(name);
            let written = serde_json::to_string_pretty(chart)
                .map_err(std::io::Error::other)
                .and_then(|contents| std::fs::write(&path, contents));
            if let Err(e) = written {
                eprintln!("Failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
        eprintln!("Charts written to {}", dir.display());
    }
}

fn print_detail(view: &DetailView, formatter: &QuotaFormatter) {
    if let Some(profile) = &view.profile {
        println!("User:        {}", profile.username);
        println!("Balance:     {}", formatter.render_quota(profile.quota, 2));
        println!("Used:        {}", formatter.render_quota(profile.used_quota, 2));
        println!("Requests:    {}", profile.request_count);
        println!();
    }

    let Some(dashboard) = &view.dashboard else {
        return;
    };
    let totals = dashboard.totals;
    println!("Consumption: {}", formatter.render_quota(totals.quota, 2));
    println!("Calls:       {}", render_number(totals.requests as f64));
    println!("Tokens:      {}", render_number(totals.tokens as f64));
    match view.rates {
        Some(rates) => {
            println!("Avg RPM:     {:.3}", rates.rpm);
            println!("Avg TPM:     {:.3}", rates.tpm);
        }
        None => {
            println!("Avg RPM:     -");
            println!("Avg TPM:     -");
        }
    }

    println!();
    println!("Calls by model ({}):", dashboard.granularity);
    for point in &dashboard.call_counts {
        println!("  {:<40} {:>10}", point.model, point.value);
    }
}

fn print_home(view: &HomeView) {
    print_notifications(&view.notifications);
    if let Some(notice) = &view.notice {
        println!("Notice:\n{notice}");
    }
    match &view.content {
        PageContent::Default => print!("{}", LANDING_PAGE.to_text(&view.call_to_action)),
        PageContent::Embed(url) => println!("Embedded page: {url}"),
        PageContent::Html(html) => println!("{html}"),
    }
}

fn print_about(view: &AboutView) {
    print_notifications(&view.notifications);
    match &view.content {
        PageContent::Default => print!("{}", ABOUT_PAGE.to_text()),
        PageContent::Embed(url) => println!("Embedded page: {url}"),
        PageContent::Html(html) => println!("{html}"),
    }
}

fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        eprintln!("[{}] {}", notification.operation, notification.message);
    }
}

/// Create a default configuration file.
fn run_init(output: Option<String>, force: bool) {
    let Some(output_path) = output.map(PathBuf::from).or_else(default_config_path) else {
        eprintln!("Could not determine default config path. Please specify one with --output.");
        std::process::exit(1);
    };

    if output_path.exists() && !force {
        eprintln!(
            "Config file already exists: {}\nUse --force to overwrite.",
            output_path.display()
        );
        std::process::exit(1);
    }

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        eprintln!("Failed to create directory {}: {}", parent.display(), e);
        std::process::exit(1);
    }

    if let Err(e) = std::fs::write(&output_path, default_config_toml()) {
        eprintln!("Failed to write config file: {}", e);
        std::process::exit(1);
    }

    println!("Created config file: {}", output_path.display());
    println!();
    println!("Set backend.base_url and backend.access_token, then run:");
    println!("  harbor-dashboard detail");
}
