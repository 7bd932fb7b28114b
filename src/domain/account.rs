use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bank account as handed back by account creation.
///
/// The stored balance belongs to the persistence layer; this record carries
/// the credentials and metadata the holder needs to keep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub number: String,
    pub pin: String,
    pub holder_name: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        number: String,
        pin: String,
        holder_name: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            number,
            pin,
            holder_name,
            created_at,
        }
    }
}
