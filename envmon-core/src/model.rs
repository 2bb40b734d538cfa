use serde::{Deserialize, Serialize};

/// One point-in-time reading from the weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub weather_code: i32,
    /// Provider-supplied instant, e.g. `2025-01-12T14:30`.
    pub timestamp: String,
}

/// Measurements of a snapshot paired with the local time they were ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl HistoryEntry {
    pub fn from_snapshot(snapshot: &Snapshot, timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            temperature: snapshot.temperature,
            humidity: snapshot.humidity,
            pressure: snapshot.pressure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

/// Hourly forecast columns as returned by the provider.
///
/// Not part of the server envelope; only the `show` command prints it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub pressure: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyPoint<'a> {
    pub time: &'a str,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl HourlySeries {
    /// Rows zipped across columns; a short column truncates the series.
    pub fn points(&self) -> impl Iterator<Item = HourlyPoint<'_>> {
        self.time
            .iter()
            .zip(&self.temperature)
            .zip(&self.humidity)
            .zip(&self.pressure)
            .map(|(((time, &temperature), &humidity), &pressure)| HourlyPoint {
                time,
                temperature,
                humidity,
                pressure,
            })
    }
}

/// Everything one upstream fetch yields.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub latitude: f64,
    pub longitude: f64,
    pub current: Snapshot,
    pub hourly: HourlySeries,
}

/// Success body of `GET /weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherEnvelope {
    pub current: Snapshot,
    pub history: Vec<HistoryEntry>,
    pub location: LocationInfo,
}

/// Failure body of `GET /weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot {
            temperature: 18.4,
            humidity: 71.0,
            pressure: 1013.2,
            weather_code: 61,
            timestamp: "2025-01-12T14:30".into(),
        }
    }

    #[test]
    fn snapshot_serializes_with_camel_case_code() {
        let json = serde_json::to_value(snapshot()).unwrap();
        assert_eq!(json["weatherCode"], 61);
        assert_eq!(json["timestamp"], "2025-01-12T14:30");
        assert!(json.get("weather_code").is_none());
    }

    #[test]
    fn history_entry_uses_capture_time_not_upstream_time() {
        let entry = HistoryEntry::from_snapshot(&snapshot(), "02:30:05 PM");
        assert_eq!(entry.timestamp, "02:30:05 PM");
        assert_eq!(entry.temperature, 18.4);
        assert_eq!(entry.pressure, 1013.2);
    }

    #[test]
    fn hourly_points_stop_at_shortest_column() {
        let series = HourlySeries {
            time: vec!["t0".into(), "t1".into(), "t2".into()],
            temperature: vec![1.0, 2.0, 3.0],
            humidity: vec![50.0, 51.0],
            pressure: vec![1000.0, 1001.0, 1002.0],
        };
        let points: Vec<_> = series.points().collect();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].time, "t1");
        assert_eq!(points[1].humidity, 51.0);
    }

    #[test]
    fn error_envelope_shape() {
        let body = serde_json::to_string(&ErrorEnvelope {
            error: "Failed to fetch weather data".into(),
        })
        .unwrap();
        assert_eq!(body, r#"{"error":"Failed to fetch weather data"}"#);
    }
}
