//! Transaction structure and hashing.

use crate::{OutputPoint, Script, TxHash};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};

type Blake2b256 = Blake2b<U32>;

/// One transaction input: the output it consumes plus its unlocking script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    pub previous_output: OutputPoint,
    pub script: Script,
}

/// One transaction output: the amount created plus its locking script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub value: u64,
    pub script: Script,
}

/// A transaction: ordered inputs and outputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

impl Transaction {
    /// Compute this transaction's hash: Blake2b-256 over the bincode encoding.
    pub fn hash(&self) -> TxHash {
        let bytes = bincode::serialize(self).expect("transaction serialization cannot fail");
        let mut hasher = Blake2b256::new();
        hasher.update(&bytes);
        let result = hasher.finalize();
        let mut output = [0u8; 32];
        output.copy_from_slice(&result);
        TxHash::new(output)
    }
}
