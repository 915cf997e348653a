use std::time::Duration;

use mongodb::{Client, Collection, Database, bson::doc};
use tokio::time::sleep;
use tracing::debug;

use super::{
    config::MongoConfig,
    error::{MongoDaoError, MongoResult},
    models::MongoBlobDocument,
};

/// Collection holding one document per blob key.
const BLOB_COLLECTION_NAME: &str = "blobs";
const PING_ATTEMPTS: u32 = 5;
const FIRST_PING_DELAY: Duration = Duration::from_millis(250);
const MAX_PING_DELAY: Duration = Duration::from_secs(5);

/// Live handles on the configured database.
#[derive(Clone)]
pub(super) struct MongoHandle {
    pub(super) database: Database,
    pub(super) blobs: Collection<MongoBlobDocument>,
}

impl MongoHandle {
    pub(super) async fn ping(&self) -> mongodb::error::Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// Build a client and wait until the server answers a ping, backing off between tries.
pub(super) async fn open(config: &MongoConfig) -> MongoResult<MongoHandle> {
    let client = Client::with_options(config.options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(&config.database_name);
    let handle = MongoHandle {
        blobs: database.collection(BLOB_COLLECTION_NAME),
        database,
    };

    let mut delay = FIRST_PING_DELAY;
    let mut attempt = 1;
    loop {
        match handle.ping().await {
            Ok(()) => return Ok(handle),
            Err(source) if attempt >= PING_ATTEMPTS => {
                return Err(MongoDaoError::InitialPing {
                    attempts: attempt,
                    source,
                });
            }
            Err(err) => {
                debug!(attempt, error = %err, "MongoDB ping failed; retrying");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_PING_DELAY);
                attempt += 1;
            }
        }
    }
}
