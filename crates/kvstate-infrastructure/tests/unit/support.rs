//! Shared test fixtures

use async_trait::async_trait;
use kvstate_domain::error::{Error, Result};
use kvstate_domain::ports::{KeyValueBackend, SnapshotValidator, StateGateway};
use kvstate_domain::value_objects::{Item, Record, StateMessage};
use kvstate_infrastructure::codec::{RecordCodec, TypeRegistry};
use kvstate_infrastructure::persister::SnapshotPersister;
use kvstate_providers::TableGateway;
use kvstate_providers::backend::InMemoryBackend;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

pub const TABLE: &str = "states_store";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub owner: String,
    pub balance: i64,
}

impl StateMessage for Account {
    const TYPE_TAG: &'static str = "bank.Account";
}

pub fn account(balance: i64) -> Account {
    Account {
        owner: "alice".to_string(),
        balance,
    }
}

/// State whose tuple keys JSON cannot encode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub entries: HashMap<(u8, u8), u8>,
}

impl StateMessage for Ledger {
    const TYPE_TAG: &'static str = "bank.Ledger";
}

pub fn unencodable_ledger() -> Ledger {
    Ledger {
        entries: HashMap::from([((1, 2), 3)]),
    }
}

pub fn registry() -> TypeRegistry {
    TypeRegistry::new().with::<Account>().with::<Ledger>()
}

/// In-memory backend that counts puts per key and fails on demand
#[derive(Debug, Default)]
pub struct FlakyBackend {
    inner: InMemoryBackend,
    puts: Mutex<HashMap<String, usize>>,
    failures: Mutex<HashMap<String, usize>>,
    always_fail: Mutex<bool>,
}

impl FlakyBackend {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail the next `count` puts for `key`
    pub fn fail_next_puts(&self, key: &str, count: usize) {
        self.failures
            .lock()
            .unwrap()
            .insert(key.to_string(), count);
    }

    pub fn set_always_fail(&self, fail: bool) {
        *self.always_fail.lock().unwrap() = fail;
    }

    /// Successful puts for `key`
    pub fn puts_for(&self, key: &str) -> usize {
        self.puts.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn total_puts(&self) -> usize {
        self.puts.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl KeyValueBackend for FlakyBackend {
    async fn put_item(&self, table: &str, key: &str, item: Item) -> Result<()> {
        let injected = {
            let mut failures = self.failures.lock().unwrap();
            match failures.get_mut(key) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    true
                }
                _ => false,
            }
        };
        if injected || *self.always_fail.lock().unwrap() {
            return Err(Error::backend_unavailable("put_item", key, "injected failure"));
        }

        self.inner.put_item(table, key, item).await?;
        *self.puts.lock().unwrap().entry(key.to_string()).or_default() += 1;
        Ok(())
    }

    async fn get_item(&self, table: &str, key: &str) -> Result<Option<Item>> {
        self.inner.get_item(table, key).await
    }

    fn provider_name(&self) -> &str {
        "flaky"
    }
}

pub fn gateway(backend: Arc<FlakyBackend>) -> Arc<dyn StateGateway> {
    Arc::new(TableGateway::new(TABLE, backend))
}

pub fn persister(backend: Arc<FlakyBackend>) -> Arc<SnapshotPersister> {
    let codec = RecordCodec::new(Arc::new(registry()));
    Arc::new(SnapshotPersister::new(codec, gateway(backend)))
}

pub fn validating_persister(
    backend: Arc<FlakyBackend>,
    validator: Arc<dyn SnapshotValidator>,
) -> Arc<SnapshotPersister> {
    let codec = RecordCodec::new(Arc::new(registry()));
    Arc::new(SnapshotPersister::new(codec, gateway(backend)).with_validator(validator))
}

/// In-memory backend whose puts wait until released
#[derive(Debug)]
pub struct StallingBackend {
    inner: InMemoryBackend,
    gate: Semaphore,
    started: AtomicUsize,
}

impl StallingBackend {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryBackend::new(),
            gate: Semaphore::new(0),
            started: AtomicUsize::new(0),
        })
    }

    /// Let every current and future put through
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    /// Puts that have started, finished or not
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn put_count(&self) -> u64 {
        self.inner.put_count()
    }
}

#[async_trait]
impl KeyValueBackend for StallingBackend {
    async fn put_item(&self, table: &str, key: &str, item: Item) -> Result<()> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| Error::backend_with_source("put_item", key, e))?;
        self.inner.put_item(table, key, item).await
    }

    async fn get_item(&self, table: &str, key: &str) -> Result<Option<Item>> {
        self.inner.get_item(table, key).await
    }

    fn provider_name(&self) -> &str {
        "stalling"
    }
}

pub fn stalling_persister(backend: Arc<StallingBackend>) -> Arc<SnapshotPersister> {
    let codec = RecordCodec::new(Arc::new(registry()));
    let gateway: Arc<dyn StateGateway> = Arc::new(TableGateway::new(TABLE, backend));
    Arc::new(SnapshotPersister::new(codec, gateway))
}

/// Record currently stored for `persistence_id`
pub async fn stored(backend: &Arc<FlakyBackend>, persistence_id: &str) -> Option<Record> {
    gateway(Arc::clone(backend))
        .get(persistence_id)
        .await
        .unwrap()
}
