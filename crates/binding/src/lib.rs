//! Contract bindings for the rollup bridge contracts.
//!
//! This crate consolidates every Solidity surface the client talks to:
//! - Bridge and SequencerInbox (accumulator chains, batches, force inclusion)
//! - Inbox and IDelayedMessageProvider (deposits, retryables, L2 messages)
//! - Outbox (L2→L1 message execution)
//! - IOwnable and the Messages tester
//!
//! Typed bindings are generated using alloy's `sol!` macro. Compiled ABI and
//! bytecode are loaded separately through [`artifact::ContractArtifact`].

pub mod artifact;
pub mod bridge;
pub mod inbox;
pub mod messages;
pub mod outbox;
pub mod ownable;

pub use artifact::{ArtifactError, ContractArtifact};

#[cfg(test)]
mod tests {
    use crate::{
        bridge::{
            BatchDataLocation, IBridge, ISequencerInbox, ISequencerInboxLegacy, MaxTimeVariation,
            TimeBounds,
        },
        inbox::{IDelayedMessageProvider, IInbox},
        messages::IMessageTester,
        outbox::IOutbox,
        ownable::IOwnable,
    };
    use alloy_primitives::{
        address, b256, bytes, hex, keccak256, Address, LogData, B256, U256,
    };
    use alloy_sol_types::{SolCall, SolError, SolEvent, SolInterface};

    fn word(bytes: &[u8]) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(bytes);
        out
    }

    #[test]
    fn test_function_selectors() {
        assert_eq!(IBridge::enqueueDelayedMessageCall::SELECTOR, hex!("8db5993b"));
        assert_eq!(IBridge::delayedMessageCountCall::SELECTOR, hex!("eca067ad"));
        assert_eq!(IBridge::delayedInboxAccsCall::SELECTOR, hex!("d5719dc2"));
        assert_eq!(ISequencerInbox::batchCountCall::SELECTOR, hex!("06f13056"));
        assert_eq!(ISequencerInbox::inboxAccsCall::SELECTOR, hex!("d9dd67ab"));
        assert_eq!(
            ISequencerInbox::addSequencerL2BatchFromOriginCall::SELECTOR,
            hex!("8f111f3c")
        );
        assert_eq!(IInbox::sendL2MessageFromOriginCall::SELECTOR, hex!("b680a2f8"));
        assert_eq!(IInbox::depositEthCall::SELECTOR, hex!("439370b1"));
        assert_eq!(IInbox::createRetryableTicketCall::SELECTOR, hex!("679b6ded"));
        assert_eq!(IOutbox::executeTransactionCall::SELECTOR, hex!("08635a95"));
        assert_eq!(ISequencerInboxLegacy::addSequencerL2BatchFromOriginCall::SELECTOR, hex!("6f12b0c9"));
        assert_eq!(
            ISequencerInbox::addSequencerL2BatchFromOriginDelayProofCall::SELECTOR,
            hex!("69cacded")
        );
    }

    #[test]
    fn test_selectors_match_signatures() {
        fn check<C: SolCall>(expected: &str) {
            assert_eq!(C::SIGNATURE, expected);
            assert_eq!(C::SELECTOR[..], keccak256(expected)[..4]);
        }

        check::<ISequencerInbox::forceInclusionCall>(
            "forceInclusion(uint256,uint8,uint64[2],uint256,address,bytes32)",
        );
        check::<ISequencerInbox::setMaxTimeVariationCall>(
            "setMaxTimeVariation((uint256,uint256,uint256,uint256))",
        );
        check::<IOutbox::executeTransactionCall>(
            "executeTransaction(bytes32[],uint256,address,address,uint256,uint256,uint256,uint256,bytes)",
        );
        check::<IOutbox::calculateMerkleRootCall>("calculateMerkleRoot(bytes32[],uint256,bytes32)");
        check::<IBridge::sequencerInboxAccsCall>("sequencerInboxAccs(uint256)");
        check::<IBridge::executeCallCall>("executeCall(address,uint256,bytes)");
        check::<IOwnable::ownerCall>("owner()");
        check::<ISequencerInboxLegacy::addSequencerL2BatchFromOriginCall>(
            "addSequencerL2BatchFromOrigin(uint256,bytes,uint256,address)",
        );
        check::<ISequencerInbox::addSequencerL2BatchFromOriginDelayProofCall>(
            "addSequencerL2BatchFromOriginDelayProof(uint256,bytes,uint256,address,uint256,uint256,(bytes32,(uint8,address,uint64,uint64,uint256,uint256,bytes32)))",
        );
        check::<IMessageTester::messageHashCall>(
            "messageHash(uint8,address,uint64,uint64,uint256,uint256,bytes32)",
        );
        check::<IMessageTester::accumulateInboxMessageCall>("accumulateInboxMessage(bytes32,bytes32)");
    }

    #[test]
    fn test_event_topics() {
        assert_eq!(
            IBridge::MessageDelivered::SIGNATURE,
            "MessageDelivered(uint256,bytes32,address,uint8,address,bytes32,uint256,uint64)"
        );
        assert_eq!(
            IBridge::MessageDelivered::SIGNATURE_HASH,
            b256!("5e3c1311ea442664e8b1611bfabef659120ea7a0a2cfc0667700bebc69cbffe1")
        );
        assert_eq!(
            ISequencerInbox::SequencerBatchDelivered::SIGNATURE,
            "SequencerBatchDelivered(uint256,bytes32,bytes32,bytes32,uint256,(uint64,uint64,uint64,uint64),uint8)"
        );
        assert_eq!(
            ISequencerInbox::SequencerBatchDelivered::SIGNATURE_HASH,
            b256!("7394f4a19a13c7b92b5bb71033245305946ef78452f7b4986ac1390b5df4ebd7")
        );
        assert_eq!(
            IDelayedMessageProvider::InboxMessageDelivered::SIGNATURE_HASH,
            keccak256("InboxMessageDelivered(uint256,bytes)")
        );
        assert_eq!(
            IOutbox::OutBoxTransactionExecuted::SIGNATURE_HASH,
            keccak256("OutBoxTransactionExecuted(address,address,uint256,uint256)")
        );
    }

    #[test]
    fn test_call_round_trip() {
        let call = ISequencerInbox::forceInclusionCall {
            _totalDelayedMessagesRead: U256::from(42),
            kind: 3,
            l1BlockAndTime: [19_000_000, 1_700_000_000],
            baseFeeL1: U256::from(30_000_000_000u64),
            sender: address!("1111111111111111111111111111111111111111"),
            messageDataHash: B256::repeat_byte(0xab),
        };
        let encoded = call.abi_encode();
        assert_eq!(encoded.len(), 4 + 7 * 32);
        assert_eq!(ISequencerInbox::forceInclusionCall::abi_decode(&encoded).unwrap(), call);

        let call = ISequencerInbox::setMaxTimeVariationCall {
            maxTimeVariation_: MaxTimeVariation {
                delayBlocks: U256::from(5760),
                futureBlocks: U256::from(64),
                delaySeconds: U256::from(86_400),
                futureSeconds: U256::from(768),
            },
        };
        let encoded = call.abi_encode();
        assert_eq!(encoded.len(), 4 + 4 * 32);
        assert_eq!(ISequencerInbox::setMaxTimeVariationCall::abi_decode(&encoded).unwrap(), call);

        let call = IInbox::sendL2MessageCall { messageData: bytes!("deadbeef") };
        let encoded = call.abi_encode();
        // selector, offset, length, one padded word of data
        assert_eq!(encoded.len(), 4 + 3 * 32);
        assert_eq!(IInbox::sendL2MessageCall::abi_decode(&encoded).unwrap(), call);
    }

    #[test]
    fn test_decode_returns() {
        let data = word(&[1]);
        let acc = IBridge::sequencerInboxAccsCall::abi_decode_returns(&data).unwrap();
        assert_eq!(U256::from_be_bytes(acc.0), U256::from(1));

        let mut data = Vec::new();
        data.extend_from_slice(&word(&[0x16, 0x80]));
        data.extend_from_slice(&word(&[64]));
        data.extend_from_slice(&word(&[0x01, 0x51, 0x80]));
        data.extend_from_slice(&word(&[0x03, 0x00]));
        let mtv = ISequencerInbox::maxTimeVariationCall::abi_decode_returns(&data).unwrap();
        assert_eq!(mtv.delayBlocks, U256::from(5760));
        assert_eq!(mtv.futureBlocks, U256::from(64));
        assert_eq!(mtv.delaySeconds, U256::from(86_400));
        assert_eq!(mtv.futureSeconds, U256::from(768));

        // a single word cannot hold four return values
        assert!(ISequencerInbox::maxTimeVariationCall::abi_decode_returns(&word(&[1])).is_err());
    }

    #[test]
    fn test_decode_message_delivered_log() {
        let inbox = address!("4dbd4fc535ac27206064b68ffcf827b0a60bab3f");
        let sender = address!("2222222222222222222222222222222222222222");
        let before_acc = B256::repeat_byte(0x11);
        let data_hash = B256::repeat_byte(0x22);

        let mut data = Vec::new();
        data.extend_from_slice(&word(inbox.as_slice()));
        data.extend_from_slice(&word(&[12]));
        data.extend_from_slice(&word(sender.as_slice()));
        data.extend_from_slice(data_hash.as_slice());
        data.extend_from_slice(&word(&[0x3b, 0x9a, 0xca, 0x00]));
        data.extend_from_slice(&word(&[0x65, 0x53, 0xf1, 0x00]));

        let log = LogData::new_unchecked(
            vec![
                IBridge::MessageDelivered::SIGNATURE_HASH,
                B256::from(U256::from(7)),
                before_acc,
            ],
            data.into(),
        );

        let event = IBridge::MessageDelivered::decode_log_data(&log).unwrap();
        assert_eq!(event.messageIndex, U256::from(7));
        assert_eq!(event.beforeInboxAcc, before_acc);
        assert_eq!(event.inbox, inbox);
        assert_eq!(event.kind, 12);
        assert_eq!(event.sender, sender);
        assert_eq!(event.messageDataHash, data_hash);
        assert_eq!(event.baseFeeL1, U256::from(1_000_000_000u64));
        assert_eq!(event.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_decode_sequencer_batch_delivered_log() {
        let event = ISequencerInbox::SequencerBatchDelivered {
            batchSequenceNumber: U256::from(3),
            beforeAcc: B256::repeat_byte(1),
            afterAcc: B256::repeat_byte(2),
            delayedAcc: B256::repeat_byte(3),
            afterDelayedMessagesRead: U256::from(10),
            timeBounds: TimeBounds {
                minTimestamp: 100,
                maxTimestamp: 200,
                minBlockNumber: 10,
                maxBlockNumber: 20,
            },
            dataLocation: BatchDataLocation::SeparateBatchEvent,
        };

        let log = event.encode_log_data();
        assert_eq!(log.topics().len(), 4);
        // delayedAcc, afterDelayedMessagesRead, four bounds, location
        assert_eq!(log.data.len(), 7 * 32);
        assert_eq!(log.data[7 * 32 - 1], 1);

        let decoded = ISequencerInbox::SequencerBatchDelivered::decode_log_data(&log).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_decode_log_wrong_topic() {
        let log = LogData::new_unchecked(
            vec![IBridge::InboxToggle::SIGNATURE_HASH, B256::ZERO, B256::ZERO],
            Default::default(),
        );
        assert!(IBridge::MessageDelivered::decode_log_data(&log).is_err());
    }

    #[test]
    fn test_decode_custom_errors() {
        let revert = IOutbox::UnknownRoot { root: B256::repeat_byte(0xcd) }.abi_encode();
        let decoded = IOutbox::IOutboxErrors::abi_decode(&revert).unwrap();
        assert!(matches!(decoded, IOutbox::IOutboxErrors::UnknownRoot(e) if e.root == B256::repeat_byte(0xcd)));

        let revert = ISequencerInbox::BadSequencerNumber {
            stored: U256::from(5),
            received: U256::from(6),
        }
        .abi_encode();
        let decoded = ISequencerInbox::ISequencerInboxErrors::abi_decode(&revert).unwrap();
        assert!(matches!(
            decoded,
            ISequencerInbox::ISequencerInboxErrors::BadSequencerNumber(e)
                if e.stored == U256::from(5) && e.received == U256::from(6)
        ));

        let revert = IBridge::NotDelayedInbox { sender: Address::ZERO }.abi_encode();
        assert!(IOutbox::IOutboxErrors::abi_decode(&revert).is_err());
    }
}
