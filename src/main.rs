use std::env;

use chrono::Local;
use log::{error, info};

use pushkind_grilla::db::establish_connection_pool;
use pushkind_grilla::domain::catalog::Catalog;
use pushkind_grilla::domain::week::WeekWindow;
use pushkind_grilla::models::config::load_config;
use pushkind_grilla::repository::DieselRepository;
use pushkind_grilla::services::query::{GridQuery, archived_subset, visible_week_count, week_grid};
use pushkind_grilla::services::scheduler::ContentScheduler;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config_path = env::var("GRILLA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&config_path).inspect_err(|e| {
        error!("Failed to load configuration from {config_path}: {e}");
    })?;

    let pool = establish_connection_pool(&config.database_url).inspect_err(|e| {
        error!("Failed to open database {}: {e}", config.database_url);
    })?;
    let repo = DieselRepository::new(pool);

    let scheduler =
        ContentScheduler::load(repo, Catalog::default(), config.scheduler_options()).await?;
    let store = scheduler.store();

    let today = Local::now().date_naive();
    let window = WeekWindow::containing(today)
        .ok_or_else(|| format!("no complete week contains {today}"))?;
    info!(
        "Week {} of the month: {} to {}, {} items scheduled",
        window.week_of_month(),
        window.start(),
        window.end(),
        visible_week_count(store, window.start(), window.end())
    );

    for cell in week_grid(store, &window, &config.schedule, &GridQuery::default()) {
        info!(
            "{} {} | {} [{}] +{}",
            cell.address.date,
            cell.address.time,
            cell.content.product,
            cell.content.status,
            cell.overflow
        );
    }
    info!("{} archived items", archived_subset(store).len());

    Ok(())
}
