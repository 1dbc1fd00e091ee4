//! Error model of the contract-call adapter.
//!
//! Transport failures, ABI defects and decode failures are kept apart so
//! callers can retry the first, abort on the second and report the third.
//! Reverts carry the raw revert data; the contract's custom-error ABI is
//! applied on demand with [`BindingError::decode_revert`].

use alloy_primitives::Bytes;
use alloy_sol_types::SolInterface;
use alloy_transport::{TransportError, TransportErrorKind};
use binding::ArtifactError;
use std::fmt;
use thiserror::Error;

/// Category of a [`BindingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Abi,
    Decode,
    Revert,
    Signer,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transport => "transport",
            Self::Abi => "abi",
            Self::Decode => "decode",
            Self::Revert => "revert",
            Self::Signer => "signer",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum BindingError {
    /// RPC endpoint unreachable or the request failed
    #[error("Transport error: {0}")]
    Transport(TransportError),

    /// Malformed ABI or artifact
    #[error("ABI error: {0}")]
    Abi(#[from] ArtifactError),

    /// Return data or log does not match the typed shape
    #[error("Decode error: {0}")]
    Decode(#[from] alloy_sol_types::Error),

    /// Execution reverted; `data` is the raw revert payload
    #[error("Execution reverted: {data}")]
    Revert { data: Bytes },

    /// The signer function could not produce a signed transaction
    #[error("Signing failed: {0}")]
    Signer(String),
}

impl BindingError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Abi(_) => ErrorKind::Abi,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Revert { .. } => ErrorKind::Revert,
            Self::Signer(_) => ErrorKind::Signer,
        }
    }

    /// Whether repeating the same request may succeed.
    ///
    /// Every transport failure qualifies, including JSON-RPC error replies
    /// such as rate limits or a lagging node. Reverts are split out on
    /// conversion and never retried.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub const fn revert_data(&self) -> Option<&Bytes> {
        match self {
            Self::Revert { data } => Some(data),
            _ => None,
        }
    }

    /// Decode the revert data with a contract's custom-error ABI.
    ///
    /// Returns `None` when this is not a revert or the selector is unknown to `I`.
    pub fn decode_revert<I: SolInterface>(&self) -> Option<I> {
        self.revert_data().and_then(|data| I::abi_decode(data).ok())
    }

    /// Reason string of a `require`/`revert("...")` style revert.
    pub fn revert_reason(&self) -> Option<String> {
        self.revert_data().and_then(|data| alloy_sol_types::decode_revert_reason(data))
    }

    pub(crate) fn transport_msg(msg: &str) -> Self {
        Self::Transport(TransportErrorKind::custom_str(msg))
    }
}

impl From<TransportError> for BindingError {
    fn from(err: TransportError) -> Self {
        match err.as_error_resp().and_then(|payload| payload.as_revert_data()) {
            Some(data) => Self::Revert { data },
            None => Self::Transport(err),
        }
    }
}

impl From<eyre::Report> for BindingError {
    /// Signer functions report through `eyre`; recover the transport error
    /// (and any revert data from gas estimation) when one is inside.
    fn from(report: eyre::Report) -> Self {
        match report.downcast::<TransportError>() {
            Ok(err) => err.into(),
            Err(report) => Self::Signer(report.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_json_rpc::{ErrorPayload, RpcError};
    use alloy_primitives::{hex, U256};
    use alloy_sol_types::{sol, SolError};

    sol! {
        #[sol(all_derives)]
        interface ITestErrors {
            error AlreadySpent(uint256 index);
            error UnknownRoot(bytes32 root);
        }
    }

    fn revert_payload(data: &str) -> TransportError {
        RpcError::ErrorResp(ErrorPayload {
            code: 3,
            message: "execution reverted".into(),
            data: Some(serde_json::value::to_raw_value(data).unwrap()),
        })
    }

    #[test]
    fn test_revert_is_extracted() {
        let data = hex::encode_prefixed(ITestErrors::AlreadySpent { index: U256::from(9) }.abi_encode());
        let err = BindingError::from(revert_payload(&data));

        assert_eq!(err.kind(), ErrorKind::Revert);
        assert!(!err.is_retryable());

        let decoded = err.decode_revert::<ITestErrors::ITestErrorsErrors>().unwrap();
        assert_eq!(
            decoded,
            ITestErrors::ITestErrorsErrors::AlreadySpent(ITestErrors::AlreadySpent {
                index: U256::from(9)
            })
        );
    }

    #[test]
    fn test_unknown_revert_selector() {
        let err = BindingError::from(revert_payload("0xdeadbeef"));
        assert_eq!(err.revert_data().unwrap().as_ref(), &hex!("deadbeef"));
        assert!(err.decode_revert::<ITestErrors::ITestErrorsErrors>().is_none());
    }

    #[test]
    fn test_revert_reason_string() {
        // Error("nope")
        let data = "0x08c379a0\
            0000000000000000000000000000000000000000000000000000000000000020\
            0000000000000000000000000000000000000000000000000000000000000004\
            6e6f706500000000000000000000000000000000000000000000000000000000";
        let err = BindingError::from(revert_payload(data));
        assert_eq!(err.revert_reason().as_deref(), Some("nope"));
    }

    #[test]
    fn test_transport_categories() {
        let err = BindingError::transport_msg("connection refused");
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.is_retryable());

        for (code, message) in [(-32000, "header not found"), (-32005, "limit exceeded"), (429, "Too Many Requests")] {
            let resp: TransportError = RpcError::ErrorResp(ErrorPayload {
                code,
                message: message.into(),
                data: None,
            });
            let err = BindingError::from(resp);
            assert_eq!(err.kind(), ErrorKind::Transport);
            assert!(err.is_retryable(), "{message} should be retried");
        }
    }

    #[test]
    fn test_eyre_report_keeps_revert() {
        let report = eyre::Report::new(revert_payload("0xdeadbeef"));
        assert_eq!(BindingError::from(report).kind(), ErrorKind::Revert);

        let report = eyre::eyre!("key locked");
        let err = BindingError::from(report);
        assert_eq!(err.kind(), ErrorKind::Signer);
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Signing failed: key locked");
    }

    #[test]
    fn test_decode_category() {
        let err: BindingError = alloy_sol_types::Error::Overrun.into();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.kind().to_string(), "decode");
    }
}
