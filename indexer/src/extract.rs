//! Address extraction from locking scripts.

use corvid_types::{PaymentAddress, Script};

/// Derives the payment address, if any, that a locking script pays to.
///
/// Implementations must be deterministic and side-effect-free. `None` is a
/// normal, frequent outcome (non-standard scripts), not an error.
pub trait AddressExtractor {
    fn extract(&self, script: &Script) -> Option<PaymentAddress>;
}

const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;
/// Push of exactly the 20-byte address payload.
const PUSH_PAYLOAD: u8 = 20;

/// Recognizes the canonical pay-to-pubkey-hash template:
/// `OP_DUP OP_HASH160 <20-byte payload> OP_EQUALVERIFY OP_CHECKSIG`.
///
/// Anything else yields no address.
pub struct StandardScripts;

impl StandardScripts {
    /// Build a pay-to-pubkey-hash locking script for `address`.
    pub fn pay_to_address(address: &PaymentAddress) -> Script {
        let mut bytes = Vec::with_capacity(25);
        bytes.push(OP_DUP);
        bytes.push(OP_HASH160);
        bytes.push(PUSH_PAYLOAD);
        bytes.extend_from_slice(address.as_bytes());
        bytes.push(OP_EQUALVERIFY);
        bytes.push(OP_CHECKSIG);
        Script::new(bytes)
    }
}

impl AddressExtractor for StandardScripts {
    fn extract(&self, script: &Script) -> Option<PaymentAddress> {
        let bytes = script.as_bytes();
        if bytes.len() != 25 {
            return None;
        }
        if bytes[0] != OP_DUP
            || bytes[1] != OP_HASH160
            || bytes[2] != PUSH_PAYLOAD
            || bytes[23] != OP_EQUALVERIFY
            || bytes[24] != OP_CHECKSIG
        {
            return None;
        }
        let mut payload = [0u8; 20];
        payload.copy_from_slice(&bytes[3..23]);
        Some(PaymentAddress::new(payload))
    }
}
