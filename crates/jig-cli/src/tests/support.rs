//! A scratch extension directory driven through [`crate::run`].

use std::ffi::OsString;
use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use tempfile::TempDir;

pub(crate) const MANIFEST: &str = r#"{
  "name": "jig-extension",
  "contributes": {
    "languages": [
      { "id": "jig", "aliases": ["Jig"], "extensions": [".jig"] }
    ],
    "grammars": []
  }
}
"#;

/// Output of one invocation.
pub(crate) struct Invocation {
    pub(crate) exit: ExitCode,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

pub(crate) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(crate) fn new() -> Result<Self> {
        Self::with_manifest(MANIFEST)
    }

    pub(crate) fn with_manifest(manifest: &str) -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow::anyhow!("non-UTF-8 temp dir {}", path.display()))?;
        fs::write(root.join("package.json"), manifest).context("write manifest")?;
        Ok(Self { _dir: dir, root })
    }

    pub(crate) fn manifest(&self) -> Utf8PathBuf {
        self.root.join("package.json")
    }

    pub(crate) fn output_dir(&self) -> Utf8PathBuf {
        self.root.join("syntaxes/generated")
    }

    pub(crate) fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }

    pub(crate) fn read(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        fs::read_to_string(&path).with_context(|| format!("read {path}"))
    }

    /// Runs a subcommand with this workspace's manifest and output directory.
    pub(crate) fn run(&self, args: &[&str]) -> Invocation {
        let manifest = self.manifest();
        let output_dir = self.output_dir();
        let mut argv: Vec<OsString> = vec![
            OsString::from("jig-grammars"),
            OsString::from("--manifest"),
            OsString::from(manifest.as_str()),
            OsString::from("--output-dir"),
            OsString::from(output_dir.as_str()),
        ];
        argv.extend(args.iter().map(OsString::from));
        invoke(argv)
    }
}

pub(crate) fn invoke(argv: Vec<OsString>) -> Invocation {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit = crate::run(argv, &mut stdout, &mut stderr);
    Invocation {
        exit,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    }
}
