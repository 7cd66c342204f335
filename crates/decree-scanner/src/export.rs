//! JSON and CSV export of harvested decrees.

use crate::error::Result;
use decree_core::Decree;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// CSV column headers, in row order.
pub const CSV_HEADER: [&str; 11] = [
    "number",
    "publish_date",
    "program",
    "type",
    "framing",
    "origin_decree",
    "cnpj",
    "company",
    "link",
    "id",
    "summary",
];

/// Byte order mark so spreadsheet tools detect UTF-8.
const UTF8_BOM: &str = "\u{feff}";

/// Write decrees as a pretty-printed JSON array.
pub fn write_json(path: &Path, decrees: &[Decree]) -> Result<()> {
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, decrees)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    tracing::info!("Wrote {} decrees to {}", decrees.len(), path.display());
    Ok(())
}

/// Write decrees as CSV with a header row.
pub fn write_csv(path: &Path, decrees: &[Decree]) -> Result<()> {
    let mut writer = create(path)?;
    writer.write_all(UTF8_BOM.as_bytes())?;
    write_row(&mut writer, &CSV_HEADER.map(String::from))?;
    for decree in decrees {
        write_row(&mut writer, &csv_row(decree))?;
    }
    writer.flush()?;
    tracing::info!("Wrote {} decrees to {}", decrees.len(), path.display());
    Ok(())
}

/// Cells of one decree, matching `CSV_HEADER`.
pub fn csv_row(decree: &Decree) -> [String; 11] {
    [
        decree.number.to_string(),
        decree.publish_date.clone(),
        decree.program.map(|p| p.to_string()).unwrap_or_default(),
        decree.decree_type.map(|t| t.to_string()).unwrap_or_default(),
        decree.framing.map(|f| f.to_string()).unwrap_or_default(),
        decree.origin_text().unwrap_or_default(),
        decree.cnpj.clone().unwrap_or_default(),
        decree.company.clone().unwrap_or_default(),
        decree.link.clone(),
        decree.id.map(|id| id.to_string()).unwrap_or_default(),
        decree.summary.clone(),
    ]
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, row: &[String]) -> std::io::Result<()> {
    let cells: Vec<String> = row
        .iter()
        .map(|cell| {
            if needs_quotes(cell) {
                format!("\"{}\"", cell.replace('"', "\"\""))
            } else {
                cell.clone()
            }
        })
        .collect();
    writeln!(w, "{}", cells.join(","))
}
