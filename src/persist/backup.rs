use super::storage::KeyValueStorage;
use crate::error::StorageError;
use crate::store::{FlowStore, now_millis};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};

/// Storage key of the backup ring.
pub const BACKUP_KEY: &str = "flow-backups";
/// Default bound on retained backups; the oldest is dropped first.
pub const DEFAULT_MAX_BACKUPS: usize = 10;

/// One retained backup: the exported document plus display metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRecord {
    pub id: String,
    pub timestamp: u64,
    pub document: String,
    pub node_count: usize,
    pub edge_count: usize,
}

/// A bounded, newest-first ring of graph backups in durable storage,
/// bincode-encoded under [`BACKUP_KEY`].
#[derive(Debug, Clone)]
pub struct BackupManager {
    max_backups: usize,
}

impl Default for BackupManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BackupManager {
    pub fn new() -> Self {
        Self {
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }

    pub fn with_max_backups(max_backups: usize) -> Self {
        Self { max_backups }
    }

    /// Snapshots the store into the ring and returns the new backup's ID.
    pub fn create_backup(
        &self,
        store: &FlowStore,
        storage: &mut dyn KeyValueStorage,
    ) -> Result<String, StorageError> {
        let mut records = self.load_records(storage);
        let timestamp = now_millis();
        let id = format!("{}-{}", timestamp, records.len() + 1);
        records.insert(
            0,
            BackupRecord {
                id: id.clone(),
                timestamp,
                document: store.export_snapshot(),
                node_count: store.nodes().len(),
                edge_count: store.edges().len(),
            },
        );
        records.truncate(self.max_backups);
        let bytes = encode_to_vec(&records, standard())
            .map_err(|e| StorageError::Encode(e.to_string()))?;
        storage.write(BACKUP_KEY, &bytes)?;
        Ok(id)
    }

    /// Imports the named backup into the store; `false` when the ID is
    /// unknown or the stored document no longer validates.
    pub fn restore_backup(
        &self,
        store: &mut FlowStore,
        storage: &dyn KeyValueStorage,
        backup_id: &str,
    ) -> bool {
        self.load_records(storage)
            .iter()
            .find(|record| record.id == backup_id)
            .is_some_and(|record| store.import_snapshot(&record.document))
    }

    /// All retained backups, newest first. Corrupt or missing data yields an
    /// empty list rather than an error.
    pub fn backups(&self, storage: &dyn KeyValueStorage) -> Vec<BackupRecord> {
        self.load_records(storage)
    }

    pub fn clear_backups(&self, storage: &mut dyn KeyValueStorage) -> Result<(), StorageError> {
        storage.remove(BACKUP_KEY)
    }

    fn load_records(&self, storage: &dyn KeyValueStorage) -> Vec<BackupRecord> {
        let Ok(Some(bytes)) = storage.read(BACKUP_KEY) else {
            return Vec::new();
        };
        decode_from_slice(&bytes, standard())
            .map(|(records, _)| records)
            .unwrap_or_default()
    }
}
