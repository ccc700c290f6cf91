//! Plain-text tables and JSON for command output.

use std::io::Write;

use serde::Serialize;

pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Left-aligned columns separated by two spaces, each as wide as its widest
/// cell.
pub fn write_table(
    out: &mut dyn Write,
    headers: &[&str],
    rows: &[Vec<String>],
) -> std::io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(out, &widths, &header)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &widths, &rule)?;
    for row in rows {
        write_row(out, &widths, row)?;
    }

    if rows.is_empty() {
        writeln!(out, "(no matching records)")?;
    }
    Ok(())
}

fn write_row(out: &mut dyn Write, widths: &[usize], cells: &[String]) -> std::io::Result<()> {
    let line: Vec<String> = widths
        .iter()
        .zip(cells)
        .map(|(width, cell)| format!("{:<width$}", cell, width = width))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())
}

pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<(), crate::Error> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let mut out = Vec::new();
        let rows = vec![
            vec!["Robert Johnson".to_string(), "Active".to_string()],
            vec!["Al".to_string(), "Inactive".to_string()],
        ];
        write_table(&mut out, &["Name", "Status"], &rows).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name            Status");
        assert_eq!(lines[1], "--------------  --------");
        assert_eq!(lines[3], "Al              Inactive");
    }

    #[test]
    fn empty_table_says_so() {
        let mut out = Vec::new();
        write_table(&mut out, &["Name"], &[]).unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with("(no matching records)\n"));
    }

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(money(2310.0), "$2310.00");
    }
}
