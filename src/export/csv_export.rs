//! CSV Export
//!
//! Writes history entries as `address,balance,timestamp` rows.

use std::io::Write;

use anyhow::Result;

use crate::domain::HistoryEntry;

pub fn write_history<W: Write>(out: W, entries: &[HistoryEntry]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["address", "balance", "timestamp"])?;
    for entry in entries {
        wtr.write_record([
            entry.address.clone(),
            entry.balance_decimal.to_string(),
            entry.queried_at.to_rfc3339(),
        ])?;
    }

    wtr.flush()?;
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_write_history_csv() {
        let entries = vec![HistoryEntry {
            address: "0xabc".into(),
            balance_decimal: 1.5,
            queried_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }];
        let mut buf = Vec::new();

        assert_eq!(write_history(&mut buf, &entries).unwrap(), 1);
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "address,balance,timestamp\n0xabc,1.5,2024-01-01T00:00:00+00:00\n"
        );
    }
}
