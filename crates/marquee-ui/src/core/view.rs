//! Table layouts for the three collections.

use marquee_api_models::{Band, Bands, ResourceKind, Show, Shows, Venue, Venues};
use marquee_session::GatedResource;

/// How a collection renders as a table.
pub trait Listing: GatedResource {
    /// Page heading.
    const TITLE: &'static str;
    /// Column headers, in order.
    const COLUMNS: &'static [&'static str];

    /// Record id, for keys and delete calls.
    fn id(record: &Self::Record) -> i64;
    /// One cell per column.
    fn cells(record: &Self::Record) -> Vec<String>;
}

impl Listing for Shows {
    const TITLE: &'static str = "Shows";
    const COLUMNS: &'static [&'static str] = &["Date", "Time", "Description", "Location", "Bands", "Price"];

    fn id(record: &Show) -> i64 {
        record.id
    }

    fn cells(record: &Show) -> Vec<String> {
        vec![
            record.showdate.format("%a %b %-d, %Y").to_string(),
            record.showtime.format("%-I:%M %p").to_string(),
            record.showdescription.clone(),
            record.location.clone(),
            join_or_dash(&record.bandsplaying),
            price_label(&record.ticketprice),
        ]
    }
}

impl Listing for Bands {
    const TITLE: &'static str = "Bands";
    const COLUMNS: &'static [&'static str] = &["Name", "Hometown", "Genre", "Since", "Members"];

    fn id(record: &Band) -> i64 {
        record.id
    }

    fn cells(record: &Band) -> Vec<String> {
        vec![
            record.bandname.clone(),
            or_dash(record.hometown.as_deref()),
            or_dash(record.genre.as_deref()),
            record
                .yearstarted
                .map_or_else(|| "-".to_string(), |year| year.to_string()),
            join_or_dash(&record.membernames),
        ]
    }
}

impl Listing for Venues {
    const TITLE: &'static str = "Venues";
    const COLUMNS: &'static [&'static str] = &["Name", "Location", "Capacity", "Manager"];

    fn id(record: &Venue) -> i64 {
        record.id
    }

    fn cells(record: &Venue) -> Vec<String> {
        vec![
            record.venuename.clone(),
            or_dash(record.location.as_deref()),
            record
                .capacity
                .map_or_else(|| "-".to_string(), |capacity| capacity.to_string()),
            or_dash(record.venuemanager.as_deref()),
        ]
    }
}

/// Confirmation text for a delete button.
#[must_use]
pub fn delete_prompt<R: ResourceKind>(id: i64) -> String {
    format!("Delete {} #{id}?", R::SINGULAR)
}

/// Ticket price with a currency sign unless it is free or already signed.
#[must_use]
pub fn price_label(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "-".to_string();
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.abs() < f64::EPSILON => "Free".to_string(),
        Ok(value) => format!("${value:.2}"),
        Err(_) => trimmed.to_string(),
    }
}

/// Dashboard entries for the shows list, earliest first, keyed by id.
#[must_use]
pub fn upcoming_lines(mut shows: Vec<Show>) -> Vec<(i64, String)> {
    shows.sort_by_key(|show| (show.showdate, show.showtime));
    shows
        .into_iter()
        .map(|show| {
            let line = format!("{} - {}", show.showdescription, show.showdate.format("%b %-d, %Y"));
            (show.id, line)
        })
        .collect()
}

fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => "-".to_string(),
    }
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn show_cells_follow_columns() {
        let show: Show = serde_json::from_value(json!({
            "id": 4,
            "showdate": "2024-11-02",
            "showtime": "20:30:00",
            "showdescription": "Late set",
            "location": "The Basement",
            "bandsplaying": ["Night Owls", "Static Bloom"],
            "ticketprice": "15"
        }))
        .expect("show");
        let cells = Shows::cells(&show);
        assert_eq!(cells.len(), Shows::COLUMNS.len());
        assert_eq!(cells[0], "Sat Nov 2, 2024");
        assert_eq!(cells[1], "8:30 PM");
        assert_eq!(cells[4], "Night Owls, Static Bloom");
        assert_eq!(cells[5], "$15.00");
        assert_eq!(Shows::id(&show), 4);
    }

    #[test]
    fn sparse_rows_render_dashes() {
        let venue: Venue =
            serde_json::from_value(json!({"id": 2, "venuename": "Loft"})).expect("venue");
        assert_eq!(Venues::cells(&venue), vec!["Loft", "-", "-", "-"]);
        let band: Band = serde_json::from_value(json!({"id": 3, "bandname": "Echo", "genre": " "}))
            .expect("band");
        assert_eq!(Bands::cells(&band), vec!["Echo", "-", "-", "-", "-"]);
    }

    #[test]
    fn prices_are_labelled() {
        assert_eq!(price_label("0"), "Free");
        assert_eq!(price_label("12.5"), "$12.50");
        assert_eq!(price_label("$20 at door"), "$20 at door");
        assert_eq!(price_label(""), "-");
    }

    #[test]
    fn upcoming_shows_are_listed_by_date() {
        let shows: Vec<Show> = serde_json::from_value(json!([
            {"id": 7, "showdate": "2024-12-31", "showtime": "21:00:00", "showdescription": "NYE",
             "location": "Loft", "ticketprice": 30},
            {"id": 4, "showdate": "2024-11-02", "showtime": "20:30:00", "showdescription": "Late set",
             "location": "The Basement", "ticketprice": "15"}
        ]))
        .expect("shows");
        assert_eq!(
            upcoming_lines(shows),
            vec![
                (4, "Late set - Nov 2, 2024".to_string()),
                (7, "NYE - Dec 31, 2024".to_string())
            ]
        );
        assert!(upcoming_lines(Vec::new()).is_empty());
    }

    #[test]
    fn delete_prompt_names_the_record() {
        assert_eq!(delete_prompt::<Venues>(9), "Delete venue #9?");
    }
}
