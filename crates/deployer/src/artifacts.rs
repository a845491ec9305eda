//! Loading of the pre-compiled contract artifacts. The contracts are
//! opaque inputs to this tool; only the creation bytecode (and the
//! name, as a sanity check) is read from the Truffle-format JSON.

use {
    alloy::primitives::Bytes,
    anyhow::{Context, Result, ensure},
    serde::Deserialize,
    std::path::PathBuf,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub bytecode: Bytes,
}

/// Directory of compiled artifacts, one `<Name>.json` per contract.
#[derive(Clone, Debug)]
pub struct Artifacts {
    dir: PathBuf,
}

impl Artifacts {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn load(&self, name: &str) -> Result<Artifact> {
        let path = self.dir.join(format!("{name}.json"));
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading artifact {path:?}"))?;
        let artifact: Artifact =
            serde_json::from_str(&raw).with_context(|| format!("parsing artifact {path:?}"))?;
        ensure!(
            artifact.contract_name == name,
            "artifact {path:?} is for contract {:?}, expected {name:?}",
            artifact.contract_name,
        );
        ensure!(
            !artifact.bytecode.is_empty(),
            "artifact {path:?} has no creation bytecode; is {name} abstract?",
        );
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifacts_with(name: &str, content: &str) -> (tempfile::TempDir, Artifacts) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(format!("{name}.json")), content).unwrap();
        let artifacts = Artifacts::new(dir.path().to_owned());
        (dir, artifacts)
    }

    #[test]
    fn loads_name_and_bytecode() {
        let (_dir, artifacts) = artifacts_with(
            "JoyToken",
            r#"{"contractName": "JoyToken", "abi": [], "bytecode": "0x6080604052"}"#,
        );
        let artifact = artifacts.load("JoyToken").unwrap();
        assert_eq!(artifact.contract_name, "JoyToken");
        assert_eq!(artifact.bytecode[..], hex_literal::hex!("6080604052")[..]);
    }

    #[test]
    fn rejects_mismatched_artifact() {
        let (_dir, artifacts) = artifacts_with(
            "JoyToken",
            r#"{"contractName": "PlatformDeposit", "bytecode": "0x60"}"#,
        );
        assert!(artifacts.load("JoyToken").is_err());
    }

    #[test]
    fn rejects_empty_bytecode() {
        let (_dir, artifacts) = artifacts_with(
            "JoyToken",
            r#"{"contractName": "JoyToken", "bytecode": "0x"}"#,
        );
        assert!(artifacts.load("JoyToken").is_err());
    }

    #[test]
    fn missing_artifact_is_an_error() {
        let (_dir, artifacts) = artifacts_with("JoyToken", "{}");
        assert!(artifacts.load("PlatformDeposit").is_err());
    }
}
