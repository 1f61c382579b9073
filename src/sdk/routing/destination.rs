use super::coord::Coord;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, path::Path};

/// A coordinate cell as stored in the route table: either a number or the
/// text the user typed into the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    Number(f64),
    Text(String),
}

impl CoordinateValue {
    /// Decimal degrees, if the cell holds a finite number.
    pub fn degrees(&self) -> Option<f64> {
        let value = match self {
            CoordinateValue::Number(n) => *n,
            CoordinateValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for CoordinateValue {
    fn from(value: f64) -> Self {
        CoordinateValue::Number(value)
    }
}

impl From<&str> for CoordinateValue {
    fn from(value: &str) -> Self {
        CoordinateValue::Text(value.to_string())
    }
}

/// One route-table row being queried for distance and toll.
///
/// Missing or unparsable coordinates are a valid state; a query for such a
/// row falls back to a zero result without contacting the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub latitude: Option<CoordinateValue>,
    #[serde(default)]
    pub longitude: Option<CoordinateValue>,
}

impl Destination {
    pub fn new(id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
            latitude: None,
            longitude: None,
        }
    }

    /// Sets numeric coordinates.
    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude.into());
        self.longitude = Some(longitude.into());
        self
    }

    /// Sets coordinates from raw table cells.
    pub fn with_raw_coordinates(mut self, latitude: Option<&str>, longitude: Option<&str>) -> Self {
        self.latitude = latitude.map(CoordinateValue::from);
        self.longitude = longitude.map(CoordinateValue::from);
        self
    }

    /// The usable position of this row, or `None` when either axis is
    /// absent or not a finite number.
    pub fn coordinates(&self) -> Option<Coord> {
        let latitude = self.latitude.as_ref()?.degrees()?;
        let longitude = self.longitude.as_ref()?.degrees()?;
        Some(Coord::new(latitude, longitude))
    }
}

#[derive(Deserialize)]
struct CsvRow {
    id: String,
    #[serde(default)]
    location: String,
    latitude: Option<String>,
    longitude: Option<String>,
}

impl From<CsvRow> for Destination {
    fn from(row: CsvRow) -> Self {
        let cell = |value: Option<String>| {
            value
                .filter(|s| !s.trim().is_empty())
                .map(CoordinateValue::Text)
        };
        Destination {
            id: row.id.trim().to_string(),
            location: row.location.trim().to_string(),
            latitude: cell(row.latitude),
            longitude: cell(row.longitude),
        }
    }
}

/// Reads destinations from a CSV export of the route table with the header
/// `id,location,latitude,longitude`. Empty coordinate cells are kept as
/// absent rather than rejected.
pub fn read_destinations<R: Read>(reader: R) -> Result<Vec<Destination>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    rdr.deserialize::<CsvRow>()
        .map(|row| row.map(Destination::from))
        .collect()
}

pub fn load_destinations<P: AsRef<Path>>(path: P) -> Result<Vec<Destination>, csv::Error> {
    let file = File::open(path)?;
    read_destinations(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coordinates() {
        let dest = Destination::new("r1", "Klang").at(3.0449, 101.4456);
        assert_eq!(dest.coordinates(), Some(Coord::new(3.0449, 101.4456)));
    }

    #[test]
    fn text_coordinates_are_parsed() {
        let dest = Destination::new("r1", "Klang").with_raw_coordinates(Some(" 3.5 "), Some("101.25"));
        assert_eq!(dest.coordinates(), Some(Coord::new(3.5, 101.25)));
    }

    #[test]
    fn missing_or_garbage_coordinates_are_unusable() {
        assert_eq!(Destination::new("a", "").coordinates(), None);
        assert_eq!(
            Destination::new("b", "")
                .with_raw_coordinates(Some("3.1"), None)
                .coordinates(),
            None
        );
        assert_eq!(
            Destination::new("c", "")
                .with_raw_coordinates(Some("north"), Some("101.0"))
                .coordinates(),
            None
        );
        assert_eq!(
            Destination::new("d", "")
                .with_raw_coordinates(Some("NaN"), Some("101.0"))
                .coordinates(),
            None
        );
    }

    #[test]
    fn zero_is_a_usable_coordinate() {
        let dest = Destination::new("r0", "Null Island").at(0.0, 0.0);
        assert_eq!(dest.coordinates(), Some(Coord::new(0.0, 0.0)));
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let json = r#"[
            {"id": "1", "location": "A", "latitude": 3.1, "longitude": "101.6"},
            {"id": "2", "location": "B", "latitude": null},
            {"id": "3"}
        ]"#;
        let rows: Vec<Destination> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].coordinates(), Some(Coord::new(3.1, 101.6)));
        assert_eq!(rows[1].coordinates(), None);
        assert_eq!(rows[2].location, "");
    }

    #[test]
    fn reads_csv_with_empty_cells() {
        let data = "id,location,latitude,longitude\n\
                    r1,Shah Alam,3.0733,101.5185\n\
                    r2,Unknown yard,,\n";
        let rows = read_destinations(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "r1");
        assert_eq!(rows[0].coordinates(), Some(Coord::new(3.0733, 101.5185)));
        assert_eq!(rows[1].latitude, None);
        assert_eq!(rows[1].coordinates(), None);
    }
}
