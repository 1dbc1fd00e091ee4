use crate::types::L2ToL1Message;
use alloy_primitives::{keccak256, B256, U256};
use alloy_sol_types::SolValue;

/// Item hash of an L2→L1 message, matching `Outbox.calculateItemHash`:
/// `keccak256(abi.encodePacked(l2Sender, to, l2Block, l1Block, l2Timestamp, value, data))`
/// with the numeric fields as `uint256`.
pub fn calculate_item_hash(message: &L2ToL1Message) -> B256 {
    let packed = (
        message.l2_sender,
        message.to,
        U256::from(message.l2_block),
        U256::from(message.l1_block),
        U256::from(message.l2_timestamp),
        message.value,
        message.data.clone(),
    )
        .abi_encode_packed();

    keccak256(packed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::withdrawal;
    use alloy_primitives::{b256, bytes, Address};

    #[test]
    fn test_item_hash_known_value() {
        assert_eq!(
            calculate_item_hash(&withdrawal()),
            b256!("1326e3d83ff385e5500c9000ce2fddf6607ef5a27ab74e08e6ab4a176a656866")
        );
    }

    #[test]
    fn test_packed_layout() {
        let message = withdrawal();
        let mut manual = Vec::new();
        manual.extend_from_slice(Address::repeat_byte(0x33).as_slice());
        manual.extend_from_slice(Address::repeat_byte(0x44).as_slice());
        for word in [U256::from(1000), U256::from(19_000_000), U256::from(1_700_000_100), message.value] {
            manual.extend_from_slice(&word.to_be_bytes::<32>());
        }
        manual.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

        assert_eq!(manual.len(), 20 + 20 + 4 * 32 + 4);
        assert_eq!(calculate_item_hash(&message), keccak256(manual));
    }

    #[test]
    fn test_every_field_counts() {
        let base = calculate_item_hash(&withdrawal());
        let variants = [
            L2ToL1Message { l2_sender: Address::repeat_byte(0x34), ..withdrawal() },
            L2ToL1Message { l2_block: 1001, ..withdrawal() },
            L2ToL1Message { value: U256::ZERO, ..withdrawal() },
            L2ToL1Message { data: bytes!("deadbeee"), ..withdrawal() },
        ];
        for variant in variants {
            assert_ne!(calculate_item_hash(&variant), base);
        }
    }
}
