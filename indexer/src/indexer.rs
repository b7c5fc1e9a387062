//! Address-keyed index of unconfirmed spends and outputs.
//!
//! The index is owned by a single spawned task; `index`, `deindex` and
//! `query` send a message to that task and await its reply. Messages execute
//! strictly in arrival order and never overlap, so the maps need no lock and
//! a query can never observe a partially applied operation.

use crate::error::{EntryKind, IndexError};
use crate::extract::AddressExtractor;
use corvid_types::{InputPoint, OutputPoint, PaymentAddress, Transaction, TxPoint};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};

/// An unconfirmed input spending a specific previous output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendInfo {
    /// Location of the spending input.
    pub point: InputPoint,
    /// The output it consumes.
    pub previous_output: OutputPoint,
}

/// An unconfirmed output and its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputInfo {
    /// Location of the output.
    pub point: OutputPoint,
    pub value: u64,
}

/// Everything currently indexed for one address.
///
/// Order within each list is unspecified. Both lists are empty for an
/// address with no unconfirmed activity; that is not an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressActivity {
    pub outputs: Vec<OutputInfo>,
    pub spends: Vec<SpendInfo>,
}

enum Command {
    Index {
        tx: Transaction,
        reply: oneshot::Sender<Result<(), IndexError>>,
    },
    Deindex {
        tx: Transaction,
        reply: oneshot::Sender<Result<(), IndexError>>,
    },
    Query {
        address: PaymentAddress,
        reply: oneshot::Sender<AddressActivity>,
    },
}

/// Handle to the indexer task. Cheap to clone; all clones feed the same
/// ordered command queue.
#[derive(Clone)]
pub struct TransactionIndexer {
    commands: mpsc::UnboundedSender<Command>,
}

impl TransactionIndexer {
    /// Spawn the indexer task. The extractor decides which inputs and
    /// outputs are relevant and is owned by the task.
    pub fn spawn<E>(extractor: E) -> Self
    where
        E: AddressExtractor + Send + 'static,
    {
        let (commands, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx, IndexerState::new(extractor)));
        Self { commands }
    }

    /// Index every input and output of `tx` that pays a known address.
    ///
    /// Indexing the same transaction twice is an invariant violation and
    /// yields [`IndexError::DuplicateEntry`].
    pub async fn index(&self, tx: &Transaction) -> Result<(), IndexError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Index {
                tx: tx.clone(),
                reply,
            })
            .map_err(|_| IndexError::Shutdown)?;
        rx.await.map_err(|_| IndexError::Shutdown)?
    }

    /// Remove every entry that indexing `tx` created.
    ///
    /// Deindexing a transaction that was never indexed is an invariant
    /// violation and yields [`IndexError::MissingEntry`].
    pub async fn deindex(&self, tx: &Transaction) -> Result<(), IndexError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Deindex {
                tx: tx.clone(),
                reply,
            })
            .map_err(|_| IndexError::Shutdown)?;
        rx.await.map_err(|_| IndexError::Shutdown)?
    }

    /// All unconfirmed activity currently indexed for `address`.
    pub async fn query(&self, address: &PaymentAddress) -> Result<AddressActivity, IndexError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Query {
                address: *address,
                reply,
            })
            .map_err(|_| IndexError::Shutdown)?;
        rx.await.map_err(|_| IndexError::Shutdown)
    }
}

async fn run<E: AddressExtractor>(mut rx: mpsc::UnboundedReceiver<Command>, mut state: IndexerState<E>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Index { tx, reply } => {
                let _ = reply.send(state.index(&tx));
            }
            Command::Deindex { tx, reply } => {
                let _ = reply.send(state.deindex(&tx));
            }
            Command::Query { address, reply } => {
                let _ = reply.send(state.query(&address));
            }
        }
    }
    tracing::debug!("indexer command channel closed, task exiting");
}

/// The two index maps plus the extractor. Only the indexer task touches this.
struct IndexerState<E> {
    extractor: E,
    spends: HashMap<PaymentAddress, Vec<SpendInfo>>,
    outputs: HashMap<PaymentAddress, Vec<OutputInfo>>,
}

impl<E: AddressExtractor> IndexerState<E> {
    fn new(extractor: E) -> Self {
        Self {
            extractor,
            spends: HashMap::new(),
            outputs: HashMap::new(),
        }
    }

    fn index(&mut self, tx: &Transaction) -> Result<(), IndexError> {
        let tx_hash = tx.hash();
        tracing::debug!(%tx_hash, "index transaction");
        for (i, input) in tx.inputs.iter().enumerate() {
            let Some(address) = self.extractor.extract(&input.script) else {
                continue;
            };
            let point = TxPoint::new(tx_hash, i as u32);
            let entries = self.spends.entry(address).or_default();
            if entries.iter().any(|entry| entry.point == point) {
                tracing::error!(%address, %point, "transaction indexed twice");
                return Err(IndexError::DuplicateEntry {
                    kind: EntryKind::Spend,
                    address,
                    point,
                });
            }
            entries.push(SpendInfo {
                point,
                previous_output: input.previous_output,
            });
        }
        for (i, output) in tx.outputs.iter().enumerate() {
            let Some(address) = self.extractor.extract(&output.script) else {
                continue;
            };
            let point = TxPoint::new(tx_hash, i as u32);
            let entries = self.outputs.entry(address).or_default();
            if entries.iter().any(|entry| entry.point == point) {
                tracing::error!(%address, %point, "transaction indexed twice");
                return Err(IndexError::DuplicateEntry {
                    kind: EntryKind::Output,
                    address,
                    point,
                });
            }
            entries.push(OutputInfo {
                point,
                value: output.value,
            });
        }
        Ok(())
    }

    fn deindex(&mut self, tx: &Transaction) -> Result<(), IndexError> {
        let tx_hash = tx.hash();
        tracing::debug!(%tx_hash, "deindex transaction");
        for (i, input) in tx.inputs.iter().enumerate() {
            let Some(address) = self.extractor.extract(&input.script) else {
                continue;
            };
            let point = TxPoint::new(tx_hash, i as u32);
            remove_entry(&mut self.spends, &address, point, EntryKind::Spend, |entry| {
                entry.point
            })?;
        }
        for (i, output) in tx.outputs.iter().enumerate() {
            let Some(address) = self.extractor.extract(&output.script) else {
                continue;
            };
            let point = TxPoint::new(tx_hash, i as u32);
            remove_entry(&mut self.outputs, &address, point, EntryKind::Output, |entry| {
                entry.point
            })?;
        }
        Ok(())
    }

    fn query(&self, address: &PaymentAddress) -> AddressActivity {
        tracing::debug!(%address, "query address activity");
        AddressActivity {
            outputs: self.outputs.get(address).cloned().unwrap_or_default(),
            spends: self.spends.get(address).cloned().unwrap_or_default(),
        }
    }
}

/// Remove the entry for `point` from `address`'s list, verifying it exists
/// and occurs exactly once. Drops the list when it becomes empty so that
/// index + deindex restores the map to its prior state.
fn remove_entry<T>(
    map: &mut HashMap<PaymentAddress, Vec<T>>,
    address: &PaymentAddress,
    point: TxPoint,
    kind: EntryKind,
    entry_point: impl Fn(&T) -> TxPoint,
) -> Result<(), IndexError> {
    let entries = map.get_mut(address).ok_or_else(|| {
        tracing::error!(%address, %point, "deindex of never-indexed transaction");
        IndexError::MissingEntry {
            kind,
            address: *address,
            point,
        }
    })?;
    let position = entries
        .iter()
        .position(|entry| entry_point(entry) == point)
        .ok_or_else(|| {
            tracing::error!(%address, %point, "deindex of never-indexed transaction");
            IndexError::MissingEntry {
                kind,
                address: *address,
                point,
            }
        })?;
    entries.remove(position);
    if entries.iter().any(|entry| entry_point(entry) == point) {
        tracing::error!(%address, %point, "duplicate entry remains after deindex");
        return Err(IndexError::DuplicateEntry {
            kind,
            address: *address,
            point,
        });
    }
    if entries.is_empty() {
        map.remove(address);
    }
    Ok(())
}
