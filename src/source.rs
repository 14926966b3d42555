use std::{
    fs::File,
    io::{BufRead, BufReader, Cursor, Read},
    path::Path,
};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{CatalogError, Result};

/// Header and data lines of a tab-separated source, before shape checks.
#[derive(Debug)]
pub struct RawTable {
    /// Column names, from the first line of the source.
    pub headers: Vec<String>,
    /// Each data line split on tabs, with its 1-based line number in the source.
    pub rows: Vec<(u64, Vec<String>)>,
}

/// Split a tab-separated source into header + rows.
///
/// Fields are split on every tab. Quotes are ordinary characters and nothing
/// is unescaped, so a field can never contain a tab or a newline. Blank lines
/// are skipped but still counted, so row line numbers match the source.
/// Fails with `MalformedInput` when there is no non-blank line at all.
pub fn read_tsv<R: Read>(reader: R) -> Result<RawTable> {
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        // `lines()` strips `\n` and `\r\n`; a UTF-8 BOM may precede the header.
        let line = if idx == 0 {
            line.trim_start_matches('\u{feff}')
        } else {
            line.as_str()
        };
        if line.is_empty() {
            continue;
        }

        let fields: Vec<String> = line.split('\t').map(str::to_string).collect();
        if headers.is_none() {
            headers = Some(fields);
        } else {
            rows.push((idx as u64 + 1, fields));
        }
    }

    let headers =
        headers.ok_or_else(|| CatalogError::malformed("source contains no header line"))?;
    debug!(columns = headers.len(), rows = rows.len(), "read tsv");

    Ok(RawTable { headers, rows })
}

/// Read a catalog from disk. `.zip` archives (the form the catalog is
/// downloaded in) are opened and their first `.tsv`/`.txt` entry is read.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_path<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let is_zip = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);

    let raw = if is_zip {
        read_zip(path)?
    } else {
        read_tsv(File::open(path)?)?
    };

    info!(rows = raw.rows.len(), "loaded catalog");
    Ok(raw)
}

fn read_zip(path: &Path) -> Result<RawTable> {
    let buf = {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)?;

        let mut found: Option<(String, Vec<u8>)> = None;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();
            let lower = name.to_lowercase();

            if entry.is_file() && (lower.ends_with(".tsv") || lower.ends_with(".txt")) {
                let mut buf = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut buf)?;
                found = Some((name, buf));
                break;
            }
        }

        let (name, buf) = found.ok_or_else(|| {
            CatalogError::malformed(format!("no .tsv entry in archive {}", path.display()))
        })?;
        debug!(entry = %name, bytes = buf.len(), "extracted archive entry");
        buf
    };

    read_tsv(Cursor::new(buf))
}
