//! Tally command - count members in a saved drawing.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use ashiba::Tally;

use super::document::DrawingDocument;

#[derive(Debug, Clone, Args)]
pub struct TallyArgs {
    /// Drawing document (JSON)
    pub document: PathBuf,

    /// Print the tally as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct TallyReport<'a> {
    groups: usize,
    parts: usize,
    counted_pillars: usize,
    #[serde(flatten)]
    tally: &'a Tally,
}

/// Execute the tally command.
pub fn cmd_tally(args: &TallyArgs) -> Result<()> {
    let document = DrawingDocument::load(&args.document)?;
    let tally = Tally::from_groups(&document.groups);
    let parts = document.groups.iter().map(|g| g.parts.len()).sum();

    if args.json {
        let report = TallyReport {
            groups: document.groups.len(),
            parts,
            counted_pillars: tally.counted_pillars(),
            tally: &tally,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_tally(&tally, document.groups.len(), parts));
    }
    Ok(())
}

/// Plain-text tally table.
pub fn format_tally(tally: &Tally, groups: usize, parts: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} groups, {} parts\n\n", groups, parts));

    out.push_str(&format!(
        "{:<20} {:>6}   (normal {}, special {}, auxiliary {} not counted)\n",
        "Pillars",
        tally.counted_pillars(),
        tally.pillars_normal,
        tally.pillars_special,
        tally.pillars_auxiliary
    ));

    for (length, n) in &tally.ledgers {
        out.push_str(&format!("{:<20} {:>6}\n", format!("Ledger {} mm", length), n));
    }
    for (size, n) in &tally.brackets {
        out.push_str(&format!(
            "{:<20} {:>6}\n",
            format!("Bracket {} ({} mm)", size.name(), size.width_mm()),
            n
        ));
    }
    if tally.anti_boards > 0 {
        out.push_str(&format!(
            "{:<20} {:>6}   (W {}, S {})\n",
            "Anti boards", tally.anti_boards, tally.anti_w, tally.anti_s
        ));
    }
    if tally.stairs > 0 {
        out.push_str(&format!("{:<20} {:>6}\n", "Stairs", tally.stairs));
    }
    if tally.frames > 0 {
        out.push_str(&format!("{:<20} {:>6}\n", "Beam frames", tally.frames));
    }
    out
}
