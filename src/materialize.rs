//! Materializes every active time slot over the configured horizon.
//!
//! Meant to run on a schedule; running it twice in a row writes nothing the
//! second time.

use chrono::Utc;
use classrota_api::config::parse_log_level;
use classrota_core::{engine::materializer::SessionMaterializer, models::time_slot::TimeSlotTemplate};
use classrota_db::{create_pool, repositories::time_slot, schema::initialize_database, store::PgStore};
use color_eyre::eyre::{Result, WrapErr, eyre};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let log_level = parse_log_level(&std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let database_url =
        std::env::var("DATABASE_URL").wrap_err("DATABASE_URL environment variable must be set")?;
    let weeks_ahead: u32 = std::env::var("WEEKS_AHEAD")
        .unwrap_or_else(|_| "4".to_string())
        .parse()
        .wrap_err("Invalid WEEKS_AHEAD value")?;
    if weeks_ahead == 0 {
        return Err(eyre!("WEEKS_AHEAD must be at least 1"));
    }

    let db_pool = create_pool(&database_url).await?;
    initialize_database(&db_pool).await?;

    let slots = time_slot::get_active_time_slots(&db_pool)
        .await?
        .into_iter()
        .map(TimeSlotTemplate::try_from)
        .collect::<Result<Vec<_>>>()?;
    info!("Materializing {} active slots {} weeks ahead", slots.len(), weeks_ahead);

    let store = PgStore::new(db_pool);
    let batch = SessionMaterializer::new(&store, &store, &store)
        .materialize_many(&slots, weeks_ahead, Utc::now())
        .await?;

    println!("{}", batch.summary());

    Ok(())
}
