//! Compiled contract artifacts.
//!
//! The typed surfaces in this crate come from `sol!`; ABI JSON and deployment
//! bytecode are treated as external data loaded from Hardhat or Foundry
//! build output. Bytecode is opaque: it is only concatenated with encoded
//! constructor arguments.

use alloy_json_abi::{Event, Function, JsonAbi};
use alloy_primitives::{hex, Bytes};
use alloy_sol_types::{SolCall, SolEvent};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Errors raised while loading or checking an artifact.
///
/// All of these are build-time defects: retrying will not fix them.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed bytecode: {0}")]
    Bytecode(#[from] hex::FromHexError),

    #[error("Artifact {0} has no deployment bytecode")]
    MissingBytecode(String),

    #[error("ABI of {contract} has no function `{signature}`")]
    MissingFunction { contract: String, signature: String },

    #[error("ABI of {contract} has no event `{signature}`")]
    MissingEvent { contract: String, signature: String },
}

/// Bytecode is a bare hex string (Hardhat) or an object with an `object` field (Foundry).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    #[serde(default)]
    contract_name: Option<String>,
    abi: JsonAbi,
    #[serde(default)]
    bytecode: Option<RawBytecode>,
}

/// ABI and creation bytecode of one compiled contract.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub name: String,
    pub abi: JsonAbi,
    /// Empty for interfaces and abstract contracts
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Parse an artifact from its JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = serde_json::from_str(json)?;

        let bytecode = match raw.bytecode {
            Some(RawBytecode::Hex(code)) | Some(RawBytecode::Object { object: code }) => {
                Bytes::from(hex::decode(code.trim())?)
            }
            None => Bytes::new(),
        };

        Ok(Self {
            name: raw.contract_name.unwrap_or_else(|| "<unnamed>".to_string()),
            abi: raw.abi,
            bytecode,
        })
    }

    /// Read and parse an artifact file.
    ///
    /// When the JSON carries no `contractName`, the file stem is used.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| ArtifactError::Io { path: path.to_path_buf(), source })?;

        let mut artifact = Self::from_json_str(&json)?;
        if artifact.name == "<unnamed>" {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                artifact.name = stem.to_string();
            }
        }
        Ok(artifact)
    }

    /// First function with the given name (overloads are ordered as in the ABI).
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.abi.function(name).and_then(|overloads| overloads.first())
    }

    /// First event with the given name.
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.abi.event(name).and_then(|overloads| overloads.first())
    }

    /// Check the artifact ABI exposes the selector of a typed call.
    pub fn ensure_call<C: SolCall>(&self) -> Result<&Function, ArtifactError> {
        self.abi.functions().find(|f| f.selector().0 == C::SELECTOR).ok_or_else(|| {
            ArtifactError::MissingFunction {
                contract: self.name.clone(),
                signature: C::SIGNATURE.to_string(),
            }
        })
    }

    /// Check the artifact ABI exposes the topic of a typed event.
    pub fn ensure_event<E: SolEvent>(&self) -> Result<&Event, ArtifactError> {
        self.abi
            .events()
            .find(|e| !e.anonymous && e.selector() == E::SIGNATURE_HASH)
            .ok_or_else(|| ArtifactError::MissingEvent {
                contract: self.name.clone(),
                signature: E::SIGNATURE.to_string(),
            })
    }

    /// Creation code followed by the ABI-encoded constructor arguments.
    pub fn deploy_code(&self, constructor_args: &[u8]) -> Result<Bytes, ArtifactError> {
        if self.bytecode.is_empty() {
            return Err(ArtifactError::MissingBytecode(self.name.clone()));
        }

        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        Ok(code.into())
    }
}
