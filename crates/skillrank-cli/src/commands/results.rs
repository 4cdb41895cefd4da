//! The `skillrank results` command.

use std::path::PathBuf;

use anyhow::Result;

use skillrank_core::results::ResultSummary;
use skillrank_core::storage::JsonFileStore;

use super::rank::print_summary;

pub fn execute(scores_path: PathBuf, format: String) -> Result<()> {
    anyhow::ensure!(
        scores_path.exists(),
        "score file not found: {}",
        scores_path.display()
    );
    let store = JsonFileStore::open(&scores_path)?;
    let summary = ResultSummary::from_store(&store);
    print_summary(&summary, &format)
}
