//! In-memory operation ledger: an append-only log plus an index by
//! operation id, with a bounded ring for eviction.
//!
//! `DashMap` gives lock-free concurrent access to the index; the
//! insertion-order ring is a small, briefly-held `std::sync::Mutex` since
//! it is only touched once per operation creation, never across an await
//! point.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use dashmap::DashMap;
use tokenop_types::{GatewayError, Operation, OperationKind, OperationPayload, OperationStatus, Result};

/// Default number of operations retained before the oldest terminal entry
/// starts getting evicted.
pub const DEFAULT_CAPACITY: usize = 10_000;

pub struct OperationLedger {
    entries: DashMap<String, Operation>,
    insertion_order: Mutex<VecDeque<String>>,
    capacity: usize,
    counter: AtomicU64,
}

impl OperationLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            insertion_order: Mutex::new(VecDeque::new()),
            capacity,
            counter: AtomicU64::new(0),
        }
    }

    /// Deploy operations are keyed by the token id itself; every other verb
    /// gets a synthesised `<verb>-<tokenId>-<monotonic>` id.
    pub fn deploy_operation_id(token_id: u64) -> String {
        token_id.to_string()
    }

    pub fn next_operation_id(&self, kind: OperationKind, token_id: u64) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{token_id}-{seq}", verb_tag(kind))
    }

    /// Record a freshly created operation and evict if the ring is over
    /// capacity.
    pub fn insert(&self, operation: Operation) {
        let id = operation.operation_id.clone();
        self.entries.insert(id.clone(), operation);
        {
            let mut order = self.insertion_order.lock().expect("ledger lock poisoned");
            order.push_back(id);
        }
        self.evict_if_needed();
    }

    pub fn get(&self, operation_id: &str) -> Option<Operation> {
        self.entries.get(operation_id).map(|entry| entry.clone())
    }

    pub fn mark_submitted(&self, operation_id: &str, tx_hash: String) -> Result<()> {
        self.mutate(operation_id, |op| op.mark_submitted(tx_hash))
    }

    pub fn mark_confirmed(&self, operation_id: &str, block_number: u64) -> Result<()> {
        self.mutate(operation_id, |op| op.mark_confirmed(block_number))
    }

    pub fn mark_failed(&self, operation_id: &str) -> Result<()> {
        self.mutate(operation_id, |op| op.mark_failed())
    }

    /// Overwrite an operation's payload in place, e.g. once a deploy's real
    /// token id and address become known after broadcast.
    pub fn set_payload(&self, operation_id: &str, payload: OperationPayload) -> Result<()> {
        self.mutate(operation_id, |op| {
            op.payload = payload;
            Ok(())
        })
    }

    /// Move an entry to a new key, e.g. once a deploy's provisional id is
    /// replaced by the real token id. No-op if `from` is absent or equal to
    /// `to`.
    pub fn rekey(&self, from: &str, to: &str) {
        if from == to {
            return;
        }
        let Some((_, mut operation)) = self.entries.remove(from) else {
            return;
        };
        operation.operation_id = to.to_string();
        self.entries.insert(to.to_string(), operation);
        let mut order = self.insertion_order.lock().expect("ledger lock poisoned");
        if let Some(slot) = order.iter_mut().find(|id| id.as_str() == from) {
            *slot = to.to_string();
        }
    }

    fn mutate(&self, operation_id: &str, f: impl FnOnce(&mut Operation) -> Result<()>) -> Result<()> {
        let mut entry = self
            .entries
            .get_mut(operation_id)
            .ok_or_else(|| GatewayError::not_found(format!("operation {operation_id}")))?;
        f(entry.value_mut())
    }

    /// Evict the oldest terminal entry, repeatedly, until the ring is back
    /// under capacity or no terminal entry remains among the excess —
    /// non-terminal entries are never dropped, so the ring may briefly
    /// exceed capacity while a burst of operations is still in flight.
    fn evict_if_needed(&self) {
        let mut order = self.insertion_order.lock().expect("ledger lock poisoned");
        while order.len() > self.capacity {
            let evictable = order.iter().position(|id| {
                self.entries
                    .get(id)
                    .map(|entry| entry.status.is_terminal())
                    .unwrap_or(true)
            });
            match evictable {
                Some(index) => {
                    if let Some(id) = order.remove(index) {
                        self.entries.remove(&id);
                    }
                }
                None => break,
            }
        }
    }
}

fn verb_tag(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Deploy => "deploy",
        OperationKind::Mint => "mint",
        OperationKind::Burn => "burn",
        OperationKind::Transfer => "transfer",
        OperationKind::Pause => "pause",
        OperationKind::Unpause => "unpause",
        OperationKind::UpdateMetadata => "update-metadata",
        OperationKind::ListOnDex => "list-on-dex",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenop_types::OperationPayload;

    fn op(id: &str, kind: OperationKind) -> Operation {
        Operation::new(id.to_string(), kind, OperationPayload::Empty {}, None)
    }

    #[test]
    fn operation_ids_are_unique_and_monotonic() {
        let ledger = OperationLedger::new(10);
        let a = ledger.next_operation_id(OperationKind::Mint, 1);
        let b = ledger.next_operation_id(OperationKind::Mint, 1);
        assert_ne!(a, b);
        assert_eq!(a, "mint-1-0");
        assert_eq!(b, "mint-1-1");
    }

    #[test]
    fn deploy_operation_id_is_the_token_id() {
        assert_eq!(OperationLedger::deploy_operation_id(7), "7");
    }

    #[test]
    fn insert_and_get_round_trip() {
        let ledger = OperationLedger::new(10);
        ledger.insert(op("deploy-1", OperationKind::Deploy));
        let fetched = ledger.get("deploy-1").unwrap();
        assert_eq!(fetched.status, OperationStatus::Pending);
    }

    #[test]
    fn transitions_go_through_the_ledger() {
        let ledger = OperationLedger::new(10);
        ledger.insert(op("mint-1-0", OperationKind::Mint));
        ledger.mark_submitted("mint-1-0", "0xabc".to_string()).unwrap();
        ledger.mark_confirmed("mint-1-0", 42).unwrap();
        let fetched = ledger.get("mint-1-0").unwrap();
        assert_eq!(fetched.status, OperationStatus::Confirmed);
        assert_eq!(fetched.block_number, Some(42));
    }

    #[test]
    fn unknown_operation_id_is_not_found() {
        let ledger = OperationLedger::new(10);
        assert!(ledger.mark_submitted("nope", "0x1".to_string()).is_err());
    }

    #[test]
    fn eviction_never_drops_non_terminal_entries() {
        let ledger = OperationLedger::new(2);
        ledger.insert(op("a", OperationKind::Mint)); // stays Pending (non-terminal)
        ledger.insert(op("b", OperationKind::Mint));
        ledger.mark_failed("b").unwrap();
        ledger.insert(op("c", OperationKind::Mint));
        // "b" was terminal and oldest-evictable, so it should be gone while
        // "a" (still Pending) and "c" (just inserted) survive.
        assert!(ledger.get("a").is_some());
        assert!(ledger.get("b").is_none());
        assert!(ledger.get("c").is_some());
    }

    #[test]
    fn ring_exceeds_capacity_rather_than_evict_non_terminal() {
        let ledger = OperationLedger::new(1);
        ledger.insert(op("a", OperationKind::Mint));
        ledger.insert(op("b", OperationKind::Mint));
        // Neither is terminal, so both are retained even over capacity.
        assert!(ledger.get("a").is_some());
        assert!(ledger.get("b").is_some());
    }

    #[test]
    fn rekey_moves_an_entry_to_its_final_id() {
        let ledger = OperationLedger::new(10);
        ledger.insert(op("deploy-0-0", OperationKind::Deploy));
        ledger.rekey("deploy-0-0", "7");
        assert!(ledger.get("deploy-0-0").is_none());
        assert_eq!(ledger.get("7").unwrap().operation_id, "7");
    }

    #[test]
    fn rekey_is_a_no_op_when_the_source_is_missing() {
        let ledger = OperationLedger::new(10);
        ledger.rekey("nope", "7");
        assert!(ledger.get("7").is_none());
    }

    #[test]
    fn set_payload_overwrites_in_place() {
        let ledger = OperationLedger::new(10);
        ledger.insert(op("7", OperationKind::Deploy));
        ledger
            .set_payload(
                "7",
                OperationPayload::Deploy {
                    token_id: Some(7),
                    token_address: Some("0xabc".to_string()),
                },
            )
            .unwrap();
        match ledger.get("7").unwrap().payload {
            OperationPayload::Deploy { token_id, .. } => assert_eq!(token_id, Some(7)),
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
