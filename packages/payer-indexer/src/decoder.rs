//! Decoding of raw EVM logs into typed Payer events.
//!
//! Every parameter of a Payer event is a single 32-byte word. Indexed
//! parameters are carried in `topics[1..]`, the rest in `data`; indexed
//! parameters are expected to be a prefix of the declared parameter list
//! (i.e. only `account` may be indexed).

use payer_indexer_plugin::types::{
    Address, BigUint, Bytes32, Event, PaidBackDebt, PayerEvent, RawLog, RegisteredDebt,
};
use sha3::{Digest, Keccak256};
use thiserror::Error;

const WORD_SIZE: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Log has no topics.")]
    MissingTopic,
    #[error("Unknown event topic {0}.")]
    UnknownEvent(Bytes32),
    #[error("Invalid {event} log: expected {expected} parameter words, found {found}.")]
    InvalidLength {
        event: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Invalid address word {0}.")]
    InvalidAddress(Bytes32),
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Topic under which an event with the given signature is logged.
pub fn event_topic(signature: &str) -> Bytes32 {
    let mut topic = [0u8; WORD_SIZE];
    topic.copy_from_slice(&Keccak256::digest(signature.as_bytes()));
    Bytes32::new(topic)
}

/// Decode a log emitted by the Payer contract.
pub fn decode_log(log: &RawLog) -> DecodeResult<PayerEvent> {
    let topic = log.topics.first().ok_or(DecodeError::MissingTopic)?;

    if *topic == event_topic(RegisteredDebt::SIGNATURE) {
        let words = param_words(log, RegisteredDebt::NAME, 2)?;
        let params = RegisteredDebt {
            account: word_to_address(&words[0])?,
            amount: word_to_uint(&words[1]),
        };
        Ok(PayerEvent::RegisteredDebt(with_metadata(log, params)))
    } else if *topic == event_topic(PaidBackDebt::SIGNATURE) {
        let words = param_words(log, PaidBackDebt::NAME, 3)?;
        let params = PaidBackDebt {
            account: word_to_address(&words[0])?,
            amount: word_to_uint(&words[1]),
            remaining_debt: word_to_uint(&words[2]),
        };
        Ok(PayerEvent::PaidBackDebt(with_metadata(log, params)))
    } else {
        Err(DecodeError::UnknownEvent(*topic))
    }
}

fn with_metadata<P>(log: &RawLog, params: P) -> Event<P> {
    Event {
        address: log.address,
        log_index: log.log_index,
        block: log.block(),
        transaction: log.transaction(),
        params,
    }
}

/// Collect the `arity` parameter words of a log, indexed ones first.
fn param_words(
    log: &RawLog,
    event: &'static str,
    arity: usize,
) -> DecodeResult<Vec<Bytes32>> {
    let data = log.data.as_ref();
    let indexed = &log.topics[1..];

    let found = indexed.len() + data.len() / WORD_SIZE;
    if indexed.len() > arity || data.len() % WORD_SIZE != 0 || found != arity {
        return Err(DecodeError::InvalidLength {
            event,
            expected: arity,
            found,
        });
    }

    let mut words = indexed.to_vec();
    for chunk in data.chunks_exact(WORD_SIZE) {
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(chunk);
        words.push(Bytes32::new(word));
    }

    Ok(words)
}

fn word_to_address(word: &Bytes32) -> DecodeResult<Address> {
    let bytes = word.as_bytes();
    let offset = WORD_SIZE - Address::LEN;

    if bytes[..offset].iter().any(|b| *b != 0) {
        return Err(DecodeError::InvalidAddress(*word));
    }

    Address::try_from(&bytes[offset..]).map_err(|_| DecodeError::InvalidAddress(*word))
}

fn word_to_uint(word: &Bytes32) -> BigUint {
    BigUint::from_bytes_be(word.as_bytes())
}

/// Encoding helpers, the inverse of [`decode_log`]. Used to build logs in
/// tests and fixtures.
pub mod encode {
    use super::*;

    pub fn address_word(address: &Address) -> Bytes32 {
        let mut word = [0u8; WORD_SIZE];
        word[WORD_SIZE - Address::LEN..].copy_from_slice(address.as_bytes());
        Bytes32::new(word)
    }

    /// Big-endian word of `value`; `None` if it does not fit in 256 bits.
    pub fn uint_word(value: &BigUint) -> Option<Bytes32> {
        let bytes = value.to_bytes_be();
        if bytes.len() > WORD_SIZE {
            return None;
        }
        let mut word = [0u8; WORD_SIZE];
        word[WORD_SIZE - bytes.len()..].copy_from_slice(&bytes);
        Some(Bytes32::new(word))
    }
}
