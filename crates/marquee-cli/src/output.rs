//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use marquee_api_models::{Band, Identity, Show, Venue};
use marquee_session::CapabilitySet;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// A record that renders as one table row.
pub(crate) trait TableRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl TableRow for Show {
    const HEADERS: &'static [&'static str] = &["ID", "DATE", "TIME", "LOCATION", "PRICE", "BANDS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.showdate.to_string(),
            self.showtime.format("%H:%M").to_string(),
            self.location.clone(),
            dash(&self.ticketprice),
            self.bandsplaying.join(", "),
        ]
    }
}

impl TableRow for Band {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "HOMETOWN", "GENRE", "SINCE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.bandname.clone(),
            dash(self.hometown.as_deref().unwrap_or_default()),
            dash(self.genre.as_deref().unwrap_or_default()),
            self.yearstarted.map_or_else(|| "-".to_string(), |year| year.to_string()),
        ]
    }
}

impl TableRow for Venue {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "CAPACITY", "LOCATION", "MANAGER"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.venuename.clone(),
            self.capacity.map_or_else(|| "-".to_string(), |capacity| capacity.to_string()),
            dash(self.location.as_deref().unwrap_or_default()),
            dash(self.venuemanager.as_deref().unwrap_or_default()),
        ]
    }
}

impl TableRow for Identity {
    const HEADERS: &'static [&'static str] = &["ID", "USERNAME", "ROLE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.role.to_string(),
        ]
    }
}

fn dash(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "-".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Left-aligned columns sized to the widest cell; the last column is not padded.
pub(crate) fn format_table<T: TableRow>(rows: &[T]) -> String {
    let body: Vec<Vec<String>> = rows.iter().map(TableRow::cells).collect();
    let mut widths: Vec<usize> = T::HEADERS.iter().map(|header| header.chars().count()).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let headers: Vec<String> = T::HEADERS.iter().map(ToString::to_string).collect();
    let mut out = String::new();
    for row in std::iter::once(&headers).chain(&body) {
        let last = row.len().saturating_sub(1);
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                if index == last {
                    cell.clone()
                } else {
                    format!("{cell:<width$}", width = widths[index])
                }
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

pub(crate) fn render_list<T: TableRow + Serialize>(rows: &[T], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(rows)?),
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("(none)");
            } else {
                print!("{}", format_table(rows));
            }
        }
    }
    Ok(())
}

pub(crate) fn render_record<T: TableRow + Serialize>(record: &T, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(record)?),
        OutputFormat::Table => {
            for (header, cell) in T::HEADERS.iter().zip(record.cells()) {
                println!("{}: {cell}", header.to_ascii_lowercase());
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct WhoAmI<'a> {
    #[serde(flatten)]
    identity: &'a Identity,
    capabilities: Vec<String>,
}

pub(crate) fn render_identity(
    identity: &Identity,
    capabilities: CapabilitySet,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let view = WhoAmI {
                identity,
                capabilities: capabilities.labels(),
            };
            println!("{}", to_json(&view)?);
        }
        OutputFormat::Table => {
            println!("user: {} (#{})", identity.username, identity.id);
            println!("role: {}", identity.role);
            println!("capabilities: {capabilities}");
        }
    }
    Ok(())
}

pub(crate) fn render_message(message: &str, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(&serde_json::json!({ "message": message }))?),
        OutputFormat::Table => println!("{message}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_api_models::Role;
    use serde_json::json;

    fn venue(id: i64, name: &str, capacity: Option<i64>) -> Venue {
        serde_json::from_value(json!({
            "id": id,
            "venuename": name,
            "capacity": capacity,
            "location": "Downtown"
        }))
        .expect("venue")
    }

    #[test]
    fn table_columns_align_to_widest_cell() {
        let table = format_table(&[venue(1, "Loft", Some(80)), venue(12, "The Big Room", None)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID  NAME          CAPACITY  LOCATION  MANAGER");
        assert_eq!(lines[1], "1   Loft          80        Downtown  -");
        assert_eq!(lines[2], "12  The Big Room  -         Downtown  -");
    }

    #[test]
    fn show_rows_use_short_time_and_joined_bands() {
        let show: Show = serde_json::from_value(json!({
            "id": 3,
            "showdate": "2024-05-01",
            "showtime": "21:00:00",
            "showdescription": "Spring kickoff",
            "location": "Loft",
            "bandsplaying": ["A", "B"],
            "ticketprice": ""
        }))
        .expect("show");
        assert_eq!(show.cells(), vec!["3", "2024-05-01", "21:00", "Loft", "-", "A, B"]);
        assert_eq!(show.cells().len(), Show::HEADERS.len());
    }

    #[test]
    fn identities_render_role_names() {
        let identity = Identity {
            id: 7,
            username: "ada".into(),
            role: Role::Staff,
        };
        assert_eq!(identity.cells(), vec!["7", "ada", "staff"]);
    }

    #[test]
    fn renderers_accept_both_formats() {
        let rows = vec![venue(1, "Loft", None)];
        render_list(&rows, OutputFormat::Json).expect("json");
        render_list(&rows, OutputFormat::Table).expect("table");
        render_list::<Venue>(&[], OutputFormat::Table).expect("empty");
        render_record(&rows[0], OutputFormat::Table).expect("record");
        render_message("Venue deleted", OutputFormat::Json).expect("message");
    }
}
