//! WMO weather interpretation codes as reported by Open-Meteo.
//! See: https://open-meteo.com/en/docs#weathervariables

const DESCRIPTIONS: [(i32, &str); 24] = [
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Foggy"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (71, "Slight snow"),
    (73, "Moderate snow"),
    (75, "Heavy snow"),
    (77, "Snow grains"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm with slight hail"),
    (99, "Thunderstorm with heavy hail"),
];

pub const UNKNOWN: &str = "Unknown";

/// Human-readable label for a weather code, `"Unknown"` when unmapped.
pub fn describe(code: i32) -> &'static str {
    DESCRIPTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slight_rain() {
        assert_eq!(describe(61), "Slight rain");
    }

    #[test]
    fn unmapped_code_is_unknown() {
        assert_eq!(describe(12), "Unknown");
        assert_eq!(describe(-1), "Unknown");
        assert_eq!(describe(1000), "Unknown");
    }

    #[test]
    fn table_bounds() {
        assert_eq!(describe(0), "Clear sky");
        assert_eq!(describe(99), "Thunderstorm with heavy hail");
        assert_eq!(describe(48), "Depositing rime fog");
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<i32> = DESCRIPTIONS.iter().map(|(c, _)| *c).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), DESCRIPTIONS.len());
    }
}
