use std::path::Path;

use anyhow::{bail, Context, Result};
use rusqlite::{Connection, OpenFlags};

use crate::parser::variable::VariableRecord;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

/// Open a database an earlier `extract` run wrote. Never creates one.
pub fn open_existing(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        bail!("No variable table at {}. Run 'extract' first.", path.display());
    }
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)
        .with_context(|| format!("Failed to open {}", path.display()))
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS variables (
            position       INTEGER PRIMARY KEY,
            var_title      TEXT NOT NULL,
            short_sas_name TEXT NOT NULL,
            long_sas_name  TEXT NOT NULL,
            in_files       TEXT NOT NULL,
            main_text      TEXT NOT NULL,
            derivation     TEXT NOT NULL,
            limitation     TEXT NOT NULL,
            values_text    TEXT NOT NULL,
            resdac_url     TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_variables_short ON variables(short_sas_name);
        ",
    )?;
    Ok(())
}

/// Replace the stored variable table. `position` keeps the caller's order.
pub fn save_variables(conn: &Connection, rows: &[VariableRecord]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM variables", [])?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO variables
             (position, var_title, short_sas_name, long_sas_name, in_files,
              main_text, derivation, limitation, values_text, resdac_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        for (i, r) in rows.iter().enumerate() {
            let in_files = serde_json::to_string(&r.in_files)?;
            count += stmt.execute(rusqlite::params![
                i as i64, r.var_title, r.short_sas_name, r.long_sas_name, in_files,
                r.main_text, r.derivation, r.limitation, r.values_text, r.resdac_url,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn fetch_variables(conn: &Connection) -> Result<Vec<VariableRecord>> {
    let mut stmt = conn.prepare(
        "SELECT var_title, short_sas_name, long_sas_name, in_files, main_text,
                derivation, limitation, values_text, resdac_url
         FROM variables
         ORDER BY position",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let in_files: String = row.get(3)?;
            Ok((
                VariableRecord {
                    var_title: row.get(0)?,
                    short_sas_name: row.get(1)?,
                    long_sas_name: row.get(2)?,
                    in_files: Vec::new(),
                    main_text: row.get(4)?,
                    derivation: row.get(5)?,
                    limitation: row.get(6)?,
                    values_text: row.get(7)?,
                    resdac_url: row.get(8)?,
                },
                in_files,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(mut record, in_files)| {
            record.in_files = serde_json::from_str(&in_files).with_context(|| {
                format!("Bad in_files for {}: {}", record.var_title, in_files)
            })?;
            Ok(record)
        })
        .collect()
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub with_long_name: usize,
    pub with_derivation: usize,
    pub with_limitation: usize,
    pub with_values: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let count = |condition: &str| -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM variables WHERE {}", condition);
        Ok(conn.query_row(&sql, [], |r| r.get(0))?)
    };
    Ok(Stats {
        total: count("1")?,
        with_long_name: count("long_sas_name != ''")?,
        with_derivation: count("derivation != ''")?,
        with_limitation: count("limitation != ''")?,
        with_values: count("values_text != ''")?,
    })
}
