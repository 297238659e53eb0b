use crate::{assets, defaults};
use async_trait::async_trait;
use payer_indexer::decoder::{encode, event_topic};
use payer_indexer_lib::manifest::Manifest;
use payer_indexer_plugin::{Entity, EntityResult, EntityStore};
use payer_indexer_types::prelude::*;
use std::{
    collections::HashMap,
    io,
    str::FromStr,
    sync::{Arc, Mutex},
};
use tracing::subscriber::DefaultGuard;

pub fn payer_contract() -> Address {
    Address::from_str(defaults::PAYER_CONTRACT).unwrap()
}

/// Address whose last byte is `n`, e.g. `account(1)` is `0x00..01`.
pub fn account(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    Address::new(bytes)
}

pub fn tx_hash(n: u8) -> Bytes32 {
    Bytes32::new([n; 32])
}

/// `whole` tokens expressed in base units.
pub fn tokens(whole: u64) -> BigUint {
    BigUint::from(whole) * BigUint::from(defaults::TOKEN_UNIT)
}

pub fn manifest() -> Manifest {
    Manifest::try_from(assets::PAYER_MANIFEST).unwrap()
}

fn event<P>(params: P, tx: Bytes32, log_index: LogIndex) -> Event<P> {
    Event {
        address: payer_contract(),
        log_index,
        block: BlockData {
            number: defaults::START_BLOCK,
            hash: None,
            timestamp: defaults::BLOCK_TIMESTAMP,
        },
        transaction: TransactionData {
            hash: tx,
            from: None,
        },
        params,
    }
}

pub fn registered_debt(
    account: Address,
    amount: BigUint,
    tx: Bytes32,
    log_index: LogIndex,
) -> Event<RegisteredDebt> {
    event(RegisteredDebt { account, amount }, tx, log_index)
}

pub fn paid_back_debt(
    account: Address,
    amount: BigUint,
    remaining_debt: BigUint,
    tx: Bytes32,
    log_index: LogIndex,
) -> Event<PaidBackDebt> {
    event(
        PaidBackDebt {
            account,
            amount,
            remaining_debt,
        },
        tx,
        log_index,
    )
}

fn raw_log(
    signature: &str,
    words: Vec<Bytes32>,
    tx: Bytes32,
    log_index: LogIndex,
) -> RawLog {
    let data: Vec<u8> = words.iter().flat_map(|w| w.as_bytes().to_vec()).collect();
    RawLog {
        address: payer_contract(),
        topics: vec![event_topic(signature)],
        data: HexBytes::new(data),
        block_number: defaults::START_BLOCK,
        block_timestamp: defaults::BLOCK_TIMESTAMP,
        transaction_hash: tx,
        log_index,
    }
}

/// ABI-encoded `RegisteredDebt` log emitted by the Payer contract.
pub fn registered_debt_log(
    account: Address,
    amount: BigUint,
    tx: Bytes32,
    log_index: LogIndex,
) -> RawLog {
    raw_log(
        RegisteredDebt::SIGNATURE,
        vec![
            encode::address_word(&account),
            encode::uint_word(&amount).unwrap(),
        ],
        tx,
        log_index,
    )
}

/// ABI-encoded `PaidBackDebt` log emitted by the Payer contract.
pub fn paid_back_debt_log(
    account: Address,
    amount: BigUint,
    remaining_debt: BigUint,
    tx: Bytes32,
    log_index: LogIndex,
) -> RawLog {
    raw_log(
        PaidBackDebt::SIGNATURE,
        vec![
            encode::address_word(&account),
            encode::uint_word(&amount).unwrap(),
            encode::uint_word(&remaining_debt).unwrap(),
        ],
        tx,
        log_index,
    )
}

/// Entity store over a plain map, without transactions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: HashMap<(i64, String), Vec<u8>>,
    pub writes: usize,
}

impl MemoryStore {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count<T: Entity>(&self) -> usize {
        self.rows
            .keys()
            .filter(|(type_id, _)| *type_id == T::type_id())
            .count()
    }

    pub async fn get<T: Entity>(&mut self, id: &str) -> Option<T> {
        T::load(self, id).await.unwrap()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get_object(
        &mut self,
        type_id: i64,
        object_id: &str,
    ) -> EntityResult<Option<Vec<u8>>> {
        Ok(self.rows.get(&(type_id, object_id.to_string())).cloned())
    }

    async fn put_object(
        &mut self,
        type_id: i64,
        object_id: &str,
        bytes: Vec<u8>,
    ) -> EntityResult<()> {
        self.writes += 1;
        self.rows.insert((type_id, object_id.to_string()), bytes);
        Ok(())
    }
}

#[derive(Clone)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Collects the formatted log lines emitted on the current thread.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Install a subscriber writing into this capture until the guard drops.
    pub fn set_default(&self) -> DefaultGuard {
        let buf = self.0.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || CaptureWriter(buf.clone()))
            .finish();

        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Captured lines logged at `level`, e.g. `"ERROR"`.
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.split_whitespace().nth(1) == Some(level))
            .map(str::to_string)
            .collect()
    }
}
