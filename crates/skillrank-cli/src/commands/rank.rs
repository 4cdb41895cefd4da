//! The `skillrank rank` command.

use anyhow::Result;

use skillrank_core::results::ResultSummary;

pub fn execute(game1: i32, game2: i32, game3: i32, format: String) -> Result<()> {
    let summary = ResultSummary::compute(game1, game2, game3);
    print_summary(&summary, &format)
}

/// Print a summary as text or JSON.
pub fn print_summary(summary: &ResultSummary, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        "text" => {
            let [g1, g2, g3] = summary.scores;
            let [d1, d2, d3] = summary.display;
            println!("Scores:     {g1} / {g2} / {g3}");
            println!("Display:    {d1} / {d2} / {d3}");
            println!("Rank score: {}", summary.rank_score);
            println!("Total:      {}", summary.total);
            println!("Rank:       {}", summary.rank);
        }
        other => anyhow::bail!("unknown format '{other}' (expected text or json)"),
    }
    Ok(())
}
