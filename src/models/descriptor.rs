//! Program interface descriptors
//!
//! A descriptor is the list of instruction names a program exposes. It is
//! only used to reject unknown instruction names before anything is
//! encoded; layouts come from the program modules, not from here.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{GeneratorError, GeneratorResult};

/// Machine readable program interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInterface {
    /// Program name
    pub name: String,
    /// Canonical instruction names
    pub instructions: Vec<String>,
}

/// Anchor IDL file, either the pre-0.30 layout (`name` at the top) or the
/// current one (`metadata.name`). Everything except instruction names is
/// ignored.
#[derive(Debug, Deserialize)]
struct AnchorIdlFile {
    name: Option<String>,
    metadata: Option<AnchorIdlMetadata>,
    instructions: Vec<AnchorIdlInstruction>,
}

#[derive(Debug, Deserialize)]
struct AnchorIdlMetadata {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AnchorIdlInstruction {
    name: String,
}

impl ProgramInterface {
    pub fn new(name: &str, instructions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            instructions: instructions.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse an Anchor IDL JSON document
    pub fn from_idl_json(json: &str) -> GeneratorResult<Self> {
        let idl: AnchorIdlFile = serde_json::from_str(json)?;
        let name = idl
            .metadata
            .map(|m| m.name)
            .or(idl.name)
            .unwrap_or_else(|| "unknown".to_string());
        Ok(Self {
            name,
            instructions: idl.instructions.into_iter().map(|i| i.name).collect(),
        })
    }

    /// Load an Anchor IDL from disk
    pub fn load(path: &Path) -> GeneratorResult<Self> {
        let json = fs::read_to_string(path)?;
        let interface = Self::from_idl_json(&json)?;
        debug!(
            "Loaded interface '{}' with {} instructions from {}",
            interface.name,
            interface.instructions.len(),
            path.display()
        );
        Ok(interface)
    }

    /// Whether `name` is declared.
    ///
    /// IDLs generated by different Anchor versions spell the same
    /// instruction in camelCase or snake_case, so both are accepted.
    pub fn contains(&self, name: &str) -> bool {
        let wanted = normalize(name);
        self.instructions.iter().any(|i| i == name || normalize(i) == wanted)
    }

    /// Fail fast on instruction names the program does not declare
    pub fn ensure_instruction(&self, name: &str) -> GeneratorResult<()> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(GeneratorError::UnknownInstruction {
                program: self.name.clone(),
                instruction: name.to_string(),
                known: self.instructions.join(", "),
            })
        }
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_instruction() {
        let iface = ProgramInterface::new("router", &["accept_ownership", "set_pool"]);
        assert!(iface.ensure_instruction("set_pool").is_ok());
        assert!(iface.ensure_instruction("setPool").is_ok());

        let err = iface.ensure_instruction("ccip_send").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ccip_send"));
        assert!(msg.contains("router"));
    }

    #[test]
    fn test_from_legacy_idl() {
        let json = r#"{
            "version": "0.1.0",
            "name": "burnmint_token_pool",
            "instructions": [
                {"name": "initialize", "accounts": [], "args": []},
                {"name": "acceptOwnership", "accounts": [], "args": []}
            ]
        }"#;
        let iface = ProgramInterface::from_idl_json(json).unwrap();
        assert_eq!(iface.name, "burnmint_token_pool");
        assert_eq!(iface.instructions, vec!["initialize", "acceptOwnership"]);
    }

    #[test]
    fn test_from_current_idl() {
        let json = r#"{
            "address": "41FGToCmdaWa1dgZLKFAjvmx6e6AjVTX7SVRibvsMGVB",
            "metadata": {"name": "lockrelease_token_pool", "version": "0.1.0"},
            "instructions": [
                {"name": "provide_liquidity", "discriminator": [1,2,3,4,5,6,7,8], "accounts": [], "args": []}
            ]
        }"#;
        let iface = ProgramInterface::from_idl_json(json).unwrap();
        assert_eq!(iface.name, "lockrelease_token_pool");
        assert!(iface.contains("provideLiquidity"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("router.json");
        fs::write(&path, r#"{"name": "ccip_router", "instructions": [{"name": "set_pool"}]}"#).unwrap();

        let iface = ProgramInterface::load(&path).unwrap();
        assert_eq!(iface.name, "ccip_router");

        assert!(ProgramInterface::load(&dir.path().join("missing.json")).is_err());
    }
}
