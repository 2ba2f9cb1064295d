use crate::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use skyseat_shared::BookingDocument;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

/// Where submitted bookings are read from.
#[async_trait]
pub trait BookingSource: Send + Sync {
    async fn fetch_bookings(&self) -> Result<Vec<BookingDocument>, StoreError>;
}

/// Bookings kept in a JSON file: either an array of documents or an object
/// keyed by document id.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BookingSource for JsonFileSource {
    async fn fetch_bookings(&self) -> Result<Vec<BookingDocument>, StoreError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let docs = match serde_json::from_str::<Value>(&raw)? {
            Value::Array(items) => items.into_iter().map(|v| (None, v)).collect(),
            Value::Object(map) => map.into_iter().map(|(id, v)| (Some(id), v)).collect(),
            _ => {
                return Err(StoreError::InvalidSource(format!(
                    "{} holds neither an array nor an object",
                    self.path.display()
                )))
            }
        };

        let bookings = decode_documents(docs);
        debug!("Read {} bookings from {}", bookings.len(), self.path.display());
        Ok(bookings)
    }
}

fn decode_documents(docs: Vec<(Option<String>, Value)>) -> Vec<BookingDocument> {
    docs.into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<BookingDocument>(value) {
            Ok(mut doc) => {
                if doc.id.is_none() {
                    doc.id = key;
                }
                Some(doc)
            }
            Err(e) => {
                warn!("Skipping unreadable booking {}: {}", key.as_deref().unwrap_or("?"), e);
                None
            }
        })
        .collect()
}

/// Process-local bookings, for tests and embedding.
#[derive(Default)]
pub struct InMemoryBookingSource {
    bookings: RwLock<Vec<BookingDocument>>,
}

impl InMemoryBookingSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a booking, giving it an id and submission time when it has none.
    /// Returns the id.
    pub async fn insert(&self, mut booking: BookingDocument) -> String {
        let id = booking
            .id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        booking.timestamp.get_or_insert_with(Utc::now);

        self.bookings.write().await.push(booking);
        id
    }

    pub async fn remove(&self, id: &str) -> Result<BookingDocument, StoreError> {
        let mut bookings = self.bookings.write().await;
        let pos = bookings
            .iter()
            .position(|b| b.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(bookings.remove(pos))
    }

    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }
}

#[async_trait]
impl BookingSource for InMemoryBookingSource {
    async fn fetch_bookings(&self) -> Result<Vec<BookingDocument>, StoreError> {
        Ok(self.bookings.read().await.clone())
    }
}
