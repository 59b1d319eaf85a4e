use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

mod search;
mod tile;

const ENTITIES: &str = r#"[
  {
    "identifier": "weight",
    "canonical_uri": "/predicates/weight",
    "slug": "weight",
    "label": "Weight",
    "item_type": "predicate",
    "data_type": "numeric"
  },
  {
    "identifier": "italy",
    "canonical_uri": "/subjects/italy",
    "slug": "italy",
    "label": "Italy",
    "item_type": "subject",
    "parent_refs": ["root"]
  }
]"#;

pub(crate) fn strata_command() -> Result<assert_cmd::Command> {
    let mut cmd = assert_cmd::Command::cargo_bin("strata")?;
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

/// Temp directory holding the fixture entity file.
pub(crate) struct Workspace {
    pub dir: TempDir,
    pub entities: PathBuf,
}

impl Workspace {
    pub(crate) fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let entities = dir.path().join("entities.json");
        fs::write(&entities, ENTITIES)?;
        Ok(Self { dir, entities })
    }

    pub(crate) fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}
