//! HireFlow command-line client.
//!
//! A thin driver around the client library: sign in, browse and apply to
//! jobs, and view dashboards from the terminal. All state lives on the
//! backend; the only thing kept locally is the session token pair (in the
//! OS keychain) and the last used email.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hireflow::api::{ApiClient, ApiError};
use hireflow::auth::KeyringTokenStore;
use hireflow::config::{self, Config};
use hireflow::models::{JobQuery, NewApplication};

/// Initialize the tracing subscriber for logging.
/// Logs go to a rolling file under the cache directory so command output
/// stays clean; RUST_LOG controls the level.
fn init_tracing(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = config.cache_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let appender = tracing_appender::rolling::daily(log_dir, "hireflow.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let mut config = Config::load().context("Failed to load config")?;
    let _guard = init_tracing(&config)?;
    info!("hireflow starting");

    let store = Arc::new(KeyringTokenStore::new());
    let client = ApiClient::new(config::api_base_url(), store)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&client, &mut config, &args).await {
        if err
            .downcast_ref::<ApiError>()
            .is_some_and(ApiError::requires_login)
        {
            eprintln!("Your session has expired. Run `hireflow login <email>` to sign in again.");
        } else {
            eprintln!("Error: {}", err);
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(client: &ApiClient, config: &mut Config, args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("login") => login(client, config, args.get(1).cloned()).await,
        Some("logout") => {
            client.logout().await?;
            println!("Signed out.");
            Ok(())
        }
        Some("whoami") => whoami(client).await,
        Some("jobs") => jobs(client, &args[1..]).await,
        Some("job") => job_detail(client, args.get(1)).await,
        Some("apply") => apply(client, &args[1..]).await,
        Some("applications") => applications(client).await,
        Some("analytics") => analytics(client, args.get(1)).await,
        _ => {
            usage();
            Ok(())
        }
    }
}

fn usage() {
    println!("HireFlow command-line client");
    println!();
    println!("Usage: hireflow <command>");
    println!();
    println!("Commands:");
    println!("  login <email>          Sign in and store the session");
    println!("  logout                 Sign out and clear the session");
    println!("  whoami                 Show the signed-in user");
    println!("  jobs [search terms]    Search the job board");
    println!("  job <id>               Show one job in detail");
    println!("  apply <id> [letter]    Apply to a job, optional cover letter");
    println!("  applications           List your applications");
    println!("  analytics [company]    Company or platform dashboard numbers");
}

async fn login(client: &ApiClient, config: &mut Config, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| config.last_email.clone()) {
        Some(email) => email,
        None => bail!("Usage: hireflow login <email>"),
    };

    let password = rpassword::prompt_password(format!("Password for {}: ", email))
        .context("Failed to read password")?;

    let user = client.login(&email, &password).await?;

    config.last_email = Some(email);
    if let Err(err) = config.save() {
        tracing::warn!(error = %err, "failed to save config");
    }

    println!("Signed in as {} ({})", user.full_name, user.role);
    Ok(())
}

async fn whoami(client: &ApiClient) -> Result<()> {
    let user = client.me().await?;
    println!("{} <{}>", user.full_name, user.email);
    println!("Role: {}", user.role);
    if let Some(resume) = &user.resume_url {
        println!("Resume: {}", config::asset_url(resume));
    }
    Ok(())
}

async fn jobs(client: &ApiClient, terms: &[String]) -> Result<()> {
    let query = JobQuery {
        search: (!terms.is_empty()).then(|| terms.join(" ")),
        ..Default::default()
    };
    let page = client.search_jobs(&query).await?;

    if page.jobs.is_empty() {
        println!("No jobs found.");
        return Ok(());
    }
    for job in &page.jobs {
        println!(
            "{:<10} {:<32} {:<12} {:<24} {}",
            job.id,
            job.title,
            job.job_type.to_string(),
            job.company_name.as_deref().unwrap_or("-"),
            job.salary_display()
        );
    }
    println!();
    println!(
        "Page {} of {} ({} jobs total)",
        page.page, page.total_pages, page.total_count
    );
    Ok(())
}

async fn job_detail(client: &ApiClient, job_id: Option<&String>) -> Result<()> {
    let Some(job_id) = job_id else {
        bail!("Usage: hireflow job <job-id>");
    };
    let job = client.fetch_job(job_id).await?;

    println!("{}", job.title);
    if let Some(company) = &job.company_name {
        println!("Company:  {}", company);
    }
    println!("Type:     {}", job.job_type);
    if let Some(location) = &job.location {
        println!("Location: {}", location);
    }
    println!("Salary:   {}", job.salary_display());
    if !job.skills.is_empty() {
        println!("Skills:   {}", job.skills.join(", "));
    }
    println!();
    println!("{}", job.description);
    Ok(())
}

async fn apply(client: &ApiClient, args: &[String]) -> Result<()> {
    let Some(job_id) = args.first() else {
        bail!("Usage: hireflow apply <job-id> [cover letter]");
    };
    let cover_letter = (args.len() > 1).then(|| args[1..].join(" "));

    let application = client
        .apply(job_id, &NewApplication { cover_letter })
        .await?;
    println!(
        "Applied to {} ({})",
        application.job_title.as_deref().unwrap_or(job_id),
        application.status
    );
    Ok(())
}

async fn applications(client: &ApiClient) -> Result<()> {
    let applications = client.my_applications().await?;
    if applications.is_empty() {
        println!("No applications yet.");
        return Ok(());
    }
    for app in &applications {
        println!(
            "{:<10} {:<32} {}",
            app.job_id,
            app.job_title.as_deref().unwrap_or("-"),
            app.status
        );
    }
    Ok(())
}

async fn analytics(client: &ApiClient, company_id: Option<&String>) -> Result<()> {
    match company_id {
        Some(company_id) => {
            let stats = client.company_analytics(company_id).await?;
            println!("Jobs:         {} ({} open)", stats.total_jobs, stats.open_jobs);
            println!("Applications: {}", stats.total_applications);
            println!("Job views:    {}", stats.job_views);
            for (status, count) in &stats.applications_by_status {
                println!("  {:<12} {}", status, count);
            }
        }
        None => {
            let stats = client.platform_analytics().await?;
            println!("Users:        {}", stats.total_users);
            println!(
                "Companies:    {} ({} pending review)",
                stats.total_companies, stats.pending_companies
            );
            println!("Jobs:         {}", stats.total_jobs);
            println!("Applications: {}", stats.total_applications);
        }
    }
    Ok(())
}
