//! Long-lived value cache.
//!
//! The interview stores what it learns about a lock (`recordsCount`,
//! `interviewComplete`) so later sessions can skip the query. [`ValueStore`]
//! is the contract; [`MemoryStore`] keeps values in memory and can snapshot
//! them to CBOR for persistence.

use std::{collections::BTreeMap, sync::RwLock};

use serde::{Deserialize, Serialize};

use crate::{
    endpoint::{Endpoint, NodeId},
    error::StorageError,
};

/// Property holding the number of audit record slots
pub const RECORDS_COUNT: &str = "recordsCount";

/// Property set once the interview has completed
pub const INTERVIEW_COMPLETE: &str = "interviewComplete";

/// Address of a stored value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValueId {
    /// Node the value belongs to
    pub node_id: NodeId,
    /// Endpoint index
    pub endpoint: u8,
    /// Property name
    pub property: String,
}

impl ValueId {
    /// Value id for `property` on `endpoint`
    pub fn new(endpoint: Endpoint, property: &str) -> Self {
        Self { node_id: endpoint.node_id, endpoint: endpoint.index, property: property.to_owned() }
    }
}

/// Stored value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Unsigned number
    Number(u64),
    /// Flag
    Bool(bool),
}

/// Value cache contract
pub trait ValueStore: Send + Sync {
    /// Store `value` under `id`, replacing any previous value
    fn set_value(&self, id: ValueId, value: Value) -> Result<(), StorageError>;

    /// Read the value stored under `id`
    fn get_value(&self, id: &ValueId) -> Result<Option<Value>, StorageError>;
}

/// In-memory value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<ValueId, Value>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values.read().map_or(0, |values| values.len())
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize all values to CBOR
    pub fn snapshot(&self) -> Result<Vec<u8>, StorageError> {
        let values = self.values.read().map_err(|_| StorageError::Poisoned)?;
        let entries: Vec<(&ValueId, &Value)> = values.iter().collect();

        let mut buf = Vec::new();
        ciborium::ser::into_writer(&entries, &mut buf)
            .map_err(|e| StorageError::Encode(e.to_string()))?;
        Ok(buf)
    }

    /// Rebuild a store from a CBOR snapshot
    pub fn restore(bytes: &[u8]) -> Result<Self, StorageError> {
        let entries: Vec<(ValueId, Value)> =
            ciborium::de::from_reader(bytes).map_err(|e| StorageError::Decode(e.to_string()))?;
        Ok(Self { values: RwLock::new(entries.into_iter().collect()) })
    }
}

impl ValueStore for MemoryStore {
    fn set_value(&self, id: ValueId, value: Value) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_| StorageError::Poisoned)?;
        values.insert(id, value);
        Ok(())
    }

    fn get_value(&self, id: &ValueId) -> Result<Option<Value>, StorageError> {
        let values = self.values.read().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let store = MemoryStore::new();
        let id = ValueId::new(Endpoint::new(5), RECORDS_COUNT);

        assert_eq!(store.get_value(&id).unwrap(), None);
        store.set_value(id.clone(), Value::Number(20)).unwrap();
        assert_eq!(store.get_value(&id).unwrap(), Some(Value::Number(20)));

        store.set_value(id.clone(), Value::Number(30)).unwrap();
        assert_eq!(store.get_value(&id).unwrap(), Some(Value::Number(30)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn endpoints_are_separate() {
        let store = MemoryStore::new();
        let root = ValueId::new(Endpoint::new(5), RECORDS_COUNT);
        let ep1 = ValueId::new(Endpoint::new(5).with_index(1), RECORDS_COUNT);

        store.set_value(root.clone(), Value::Number(1)).unwrap();
        assert_eq!(store.get_value(&ep1).unwrap(), None);
    }

    #[test]
    fn snapshot_restores_values() {
        let store = MemoryStore::new();
        let count = ValueId::new(Endpoint::new(5), RECORDS_COUNT);
        let done = ValueId::new(Endpoint::new(5), INTERVIEW_COMPLETE);
        store.set_value(count.clone(), Value::Number(20)).unwrap();
        store.set_value(done.clone(), Value::Bool(true)).unwrap();

        let restored = MemoryStore::restore(&store.snapshot().unwrap()).unwrap();
        assert_eq!(restored.get_value(&count).unwrap(), Some(Value::Number(20)));
        assert_eq!(restored.get_value(&done).unwrap(), Some(Value::Bool(true)));
    }

    #[test]
    fn restore_rejects_garbage() {
        assert!(matches!(MemoryStore::restore(&[0xFF, 0x00]), Err(StorageError::Decode(_))));
    }
}
