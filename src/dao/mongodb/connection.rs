use std::time::Duration;

use mongodb::{Client, Database, bson::doc};
use tokio::time::sleep;
use tracing::{info, warn};

use super::{
    config::MongoConfig,
    error::{MongoDaoError, MongoResult},
};

struct RetryPolicy;

impl RetryPolicy {
    const MAX_ATTEMPTS: u32 = 10;
    const INITIAL_DELAY_MS: u64 = 250;

    fn initial_delay() -> Duration {
        Duration::from_millis(Self::INITIAL_DELAY_MS)
    }

    fn next_delay(current: Duration) -> Duration {
        (current * 2).min(Duration::from_secs(5))
    }
}

/// Build a client without contacting the server.
///
/// The driver connects lazily, so the returned database is usable once the
/// server becomes reachable.
pub fn open_lazy(config: &MongoConfig) -> MongoResult<Database> {
    let client = Client::with_options(config.options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    Ok(client.database(&config.database_name))
}

/// Connect and wait until the server answers a ping, retrying with backoff.
pub async fn establish_connection(config: &MongoConfig) -> MongoResult<Database> {
    let database = open_lazy(config)?;

    let mut attempts = 0;
    let mut delay = RetryPolicy::initial_delay();

    loop {
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => break,
            Err(err) => {
                attempts += 1;
                if attempts >= RetryPolicy::MAX_ATTEMPTS {
                    return Err(MongoDaoError::InitialPing {
                        attempts,
                        source: err,
                    });
                }
                warn!(attempts, delay_ms = delay.as_millis() as u64, error = %err, "MongoDB not reachable yet");
                sleep(delay).await;
                delay = RetryPolicy::next_delay(delay);
            }
        }
    }

    info!(database = %config.database_name, attempts = attempts + 1, "MongoDB connected");
    Ok(database)
}
