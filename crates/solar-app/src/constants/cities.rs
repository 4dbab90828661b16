//! Supported cities with coordinates and peak sun hours

use solar_types::{Error, Result};

/// One supported city
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityInfo {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// Average daily hours of full-intensity sun
    pub peak_sun_hours: f64,
}

pub const DEFAULT_CITY: &str = "New Delhi";

/// Used for a city that is not in the table
pub const DEFAULT_PEAK_SUN_HOURS: f64 = 5.2;

pub const CITIES: [CityInfo; 10] = [
    CityInfo { name: "Gurugram", latitude: 28.4595, longitude: 77.0266, peak_sun_hours: 5.3 },
    CityInfo { name: "New Delhi", latitude: 28.6139, longitude: 77.2090, peak_sun_hours: 5.2 },
    CityInfo { name: "Mumbai", latitude: 19.0760, longitude: 72.8777, peak_sun_hours: 5.0 },
    CityInfo { name: "Bengaluru", latitude: 12.9716, longitude: 77.5946, peak_sun_hours: 5.1 },
    CityInfo { name: "Chennai", latitude: 13.0827, longitude: 80.2707, peak_sun_hours: 5.4 },
    CityInfo { name: "Hyderabad", latitude: 17.3850, longitude: 78.4867, peak_sun_hours: 5.2 },
    CityInfo { name: "Ahmedabad", latitude: 23.0225, longitude: 72.5714, peak_sun_hours: 5.3 },
    CityInfo { name: "Jaipur", latitude: 26.9124, longitude: 75.7873, peak_sun_hours: 5.5 },
    CityInfo { name: "Kolkata", latitude: 22.5726, longitude: 88.3639, peak_sun_hours: 4.9 },
    CityInfo { name: "Pune", latitude: 18.5204, longitude: 73.8567, peak_sun_hours: 5.1 },
];

/// Case-insensitive lookup of a trimmed city name
pub fn get_city(name: &str) -> Option<&'static CityInfo> {
    let needle = name.trim();
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(needle))
}

pub fn city_names() -> Vec<&'static str> {
    CITIES.iter().map(|c| c.name).collect()
}

/// Table entry for a supported city; its `name` is the canonical spelling
pub fn resolve_city(city: &str) -> Result<&'static CityInfo> {
    get_city(city).ok_or_else(|| {
        Error::InvalidInput(format!(
            "Location error: Invalid city '{}'. Choose from {}",
            city.trim(),
            city_names().join(", ")
        ))
    })
}

/// Coordinates of a supported city
pub fn parse_location(city: &str) -> Result<(f64, f64)> {
    resolve_city(city).map(|c| (c.latitude, c.longitude))
}

pub fn peak_sun_hours(city: &str) -> f64 {
    get_city(city)
        .map(|c| c.peak_sun_hours)
        .unwrap_or(DEFAULT_PEAK_SUN_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert_eq!(parse_location("Mumbai").unwrap(), (19.0760, 72.8777));
        assert_eq!(parse_location("  new delhi ").unwrap(), (28.6139, 77.2090));
    }

    #[test]
    fn test_resolve_city_canonical_name() {
        assert_eq!(resolve_city("KOLKATA").unwrap().name, "Kolkata");
        assert_eq!(resolve_city(" new delhi").unwrap().name, "New Delhi");
        assert!(resolve_city("Delhi").is_err());
    }

    #[test]
    fn test_unknown_city_lists_choices() {
        let err = parse_location("Atlantis").unwrap_err().to_string();
        assert!(err.contains("Invalid city"));
        assert!(err.contains("Gurugram"));
        assert!(err.contains("Pune"));
    }

    #[test]
    fn test_peak_sun_hours_fallback() {
        assert_eq!(peak_sun_hours("Kolkata"), 4.9);
        assert_eq!(peak_sun_hours("Atlantis"), DEFAULT_PEAK_SUN_HOURS);
    }

    #[test]
    fn test_default_city_is_listed() {
        assert!(get_city(DEFAULT_CITY).is_some());
        assert_eq!(city_names().len(), 10);
    }
}
