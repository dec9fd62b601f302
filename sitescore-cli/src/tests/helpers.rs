//! Test helpers for driving CLI commands against temporary databases.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use sitescore_core::NewSite;
use sitescore_core::test_support::sample_site;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write file");
}

/// Three sites with clearly separated totals under the default weights.
pub(super) fn ranked_sites() -> Vec<NewSite> {
    let mut flat = sample_site("flat plain");
    flat.metrics.solar_irradiance = 6.0;
    flat.metrics.area = 80_000;
    flat.metrics.slope = 1.0;
    let hillside = sample_site("hillside");
    let mut valley = sample_site("shaded valley");
    valley.metrics.solar_irradiance = 2.0;
    valley.metrics.area = 3_000;
    valley.metrics.slope = 25.0;
    vec![flat, hillside, valley]
}

/// Temporary directory holding a site database and import files.
pub(super) struct Workspace {
    _tmp: TempDir,
    pub(super) root: Utf8PathBuf,
    pub(super) database: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        let database = root.join("sites.db");
        Self {
            _tmp: tmp,
            root,
            database,
        }
    }

    /// Run the CLI with `args` after the binary name, capturing stdout.
    pub(super) fn run(&self, args: &[&str]) -> (Result<(), CliError>, String) {
        let mut argv = vec!["sitescore"];
        argv.extend_from_slice(args);
        let mut stdout = Vec::new();
        let result = run_with(argv, &mut stdout);
        (result, String::from_utf8(stdout).expect("utf-8 output"))
    }

    /// Run the CLI, asserting success and decoding stdout as JSON.
    pub(super) fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let (result, stdout) = self.run(args);
        if let Err(err) = result {
            panic!("command {args:?} should succeed, got {err}");
        }
        serde_json::from_str(&stdout).expect("stdout should be JSON")
    }

    /// Run the CLI, asserting failure.
    pub(super) fn run_err(&self, args: &[&str]) -> CliError {
        let (result, _) = self.run(args);
        match result {
            Ok(()) => panic!("command {args:?} should fail"),
            Err(err) => err,
        }
    }

    pub(super) fn db(&self) -> &str {
        self.database.as_str()
    }

    /// Write `sites` to an import file and return its path.
    pub(super) fn write_import(&self, sites: &[NewSite]) -> Utf8PathBuf {
        let path = self.root.join("sites.json");
        let payload = serde_json::to_vec_pretty(sites).expect("serialise sites");
        write_utf8(&path, &payload);
        path
    }

    /// Import [`ranked_sites`] into a fresh database.
    pub(super) fn import_ranked_sites(&self) {
        let path = self.write_import(&ranked_sites());
        self.run_json(&["import", path.as_str(), "--database", self.db()]);
    }
}
