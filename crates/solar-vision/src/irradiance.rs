//! Clear-sky irradiance estimate
//!
//! The sun is placed at local solar noon for the requested date. GHI uses
//! the Haurwitz model, DNI the Meinel attenuation with Kasten-Young air
//! mass, and DHI is the remainder of GHI after the direct horizontal part.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use moka::sync::Cache;
use solar_types::Irradiance;
use std::time::Duration as StdDuration;
use tracing::{info, warn};

const SOLAR_CONSTANT: f64 = 1353.0;

/// Solar angles in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

impl SunPosition {
    pub fn at(latitude: f64, longitude: f64, datetime: &DateTime<Utc>) -> Self {
        let julian_day = julian_day(datetime);
        let solar_time = datetime.hour() as f64
            + datetime.minute() as f64 / 60.0
            + equation_of_time(julian_day) / 60.0
            + longitude / 15.0;
        let hour_angle = 15.0 * (solar_time - 12.0);

        let lat_rad = latitude.to_radians();
        let dec_rad = solar_declination(julian_day).to_radians();
        let hour_rad = hour_angle.to_radians();

        let elevation =
            (lat_rad.sin() * dec_rad.sin() + lat_rad.cos() * dec_rad.cos() * hour_rad.cos()).asin();

        let cos_azimuth = (dec_rad.sin() * lat_rad.cos()
            - dec_rad.cos() * lat_rad.sin() * hour_rad.cos())
            / elevation.cos();
        let azimuth = cos_azimuth.clamp(-1.0, 1.0).acos().to_degrees();

        Self {
            azimuth_deg: if hour_angle > 0.0 { 360.0 - azimuth } else { azimuth },
            elevation_deg: elevation.to_degrees(),
        }
    }

    /// Position at local solar noon of `date`
    pub fn solar_noon(latitude: f64, longitude: f64, date: NaiveDate) -> Self {
        let Some(midnight) = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()) else {
            return Self {
                azimuth_deg: f64::NAN,
                elevation_deg: f64::NAN,
            };
        };
        let eot_minutes = equation_of_time(julian_day(&midnight));
        let noon_utc_hours = 12.0 - longitude / 15.0 - eot_minutes / 60.0;
        let noon = midnight + Duration::seconds((noon_utc_hours * 3600.0).round() as i64);
        Self::at(latitude, longitude, &noon)
    }
}

fn julian_day(datetime: &DateTime<Utc>) -> f64 {
    let a = (14 - datetime.month() as i32) / 12;
    let y = datetime.year() + 4800 - a;
    let m = datetime.month() as i32 + 12 * a - 3;

    datetime.day() as f64 + (153 * m + 2) as f64 / 5.0 + 365.0 * y as f64 + (y / 4) as f64
        - (y / 100) as f64
        + (y / 400) as f64
        - 32045.0
}

/// Sun's mean and apparent ecliptic longitude in degrees
fn ecliptic_longitudes(julian_day: f64) -> (f64, f64) {
    let n = julian_day - 2451545.0;
    let l = (280.460 + 0.9856474 * n) % 360.0;
    let g = ((357.528 + 0.9856003 * n) % 360.0).to_radians();
    (l, l + 1.915 * g.sin() + 0.020 * (2.0 * g).sin())
}

/// Minutes
fn equation_of_time(julian_day: f64) -> f64 {
    let (l, lambda) = ecliptic_longitudes(julian_day);
    4.0 * (l - 0.0057183 - lambda)
}

/// Degrees
fn solar_declination(julian_day: f64) -> f64 {
    let n = julian_day - 2451545.0;
    let (_, lambda) = ecliptic_longitudes(julian_day);
    let obliquity = (23.439 - 0.0000004 * n).to_radians();
    (obliquity.sin() * lambda.to_radians().sin()).asin().to_degrees()
}

/// Clear-sky components for a sun elevation. None when the sun is down.
pub fn clear_sky_irradiance(elevation_deg: f64) -> Option<Irradiance> {
    if !elevation_deg.is_finite() || elevation_deg <= 0.0 {
        return None;
    }
    let zenith_deg = 90.0 - elevation_deg;
    let cos_zenith = elevation_deg.to_radians().sin();

    let ghi = 1098.0 * cos_zenith * (-0.059 / cos_zenith).exp();
    let air_mass = 1.0 / (cos_zenith + 0.50572 * (96.07995 - zenith_deg).powf(-1.6364));
    let dni = SOLAR_CONSTANT * 0.7_f64.powf(air_mass.powf(0.678));
    let dhi = (ghi - dni * cos_zenith).max(0.0);

    let irradiance = Irradiance { ghi, dni, dhi };
    [ghi, dni, dhi]
        .iter()
        .all(|v| v.is_finite())
        .then_some(irradiance)
}

type IrradianceKey = (i64, i64, NaiveDate);

/// Clear-sky irradiance lookups memoised for a day
pub struct IrradianceService {
    cache: Cache<IrradianceKey, Irradiance>,
}

impl Default for IrradianceService {
    fn default() -> Self {
        Self::new(100, StdDuration::from_secs(86400))
    }
}

impl IrradianceService {
    pub fn new(max_entries: u64, ttl: StdDuration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    fn key(latitude: f64, longitude: f64, date: NaiveDate) -> IrradianceKey {
        (
            (latitude * 10_000.0).round() as i64,
            (longitude * 10_000.0).round() as i64,
            date,
        )
    }

    /// Irradiance at solar noon, falling back to `Irradiance::FALLBACK`
    pub fn fetch(&self, latitude: f64, longitude: f64, date: NaiveDate) -> Irradiance {
        let key = Self::key(latitude, longitude, date);
        if let Some(cached) = self.cache.get(&key) {
            info!(latitude, longitude, %date, "Using cached irradiance");
            return cached;
        }

        info!(latitude, longitude, %date, "Estimating irradiance");
        let sun = SunPosition::solar_noon(latitude, longitude, date);
        let irradiance = match clear_sky_irradiance(sun.elevation_deg) {
            Some(value) => {
                info!(ghi = value.ghi, dni = value.dni, dhi = value.dhi, "Irradiance estimated");
                value
            }
            None => {
                warn!(
                    elevation_deg = sun.elevation_deg,
                    "Irradiance estimate failed, using defaults"
                );
                Irradiance::FALLBACK
            }
        };

        self.cache.insert(key, irradiance);
        irradiance
    }

    pub fn cached_entries(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noon_elevation_new_delhi_equinox() {
        // Near the March equinox the noon elevation is ~90 - latitude
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let sun = SunPosition::solar_noon(28.6139, 77.2090, date);
        assert!((sun.elevation_deg - (90.0 - 28.6139)).abs() < 1.5);
        // Sun is due south at noon in the northern hemisphere
        assert!((sun.azimuth_deg - 180.0).abs() < 5.0);
    }

    #[test]
    fn test_summer_sun_higher_than_winter() {
        let summer = SunPosition::solar_noon(28.6, 77.2, NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
        let winter = SunPosition::solar_noon(28.6, 77.2, NaiveDate::from_ymd_opt(2024, 12, 21).unwrap());
        assert!(summer.elevation_deg > winter.elevation_deg + 40.0);
    }

    #[test]
    fn test_clear_sky_components() {
        let irr = clear_sky_irradiance(60.0).unwrap();
        assert!(irr.ghi > 800.0 && irr.ghi < 1000.0);
        assert!(irr.dni > irr.dhi);
        assert!(irr.dhi >= 0.0);
    }

    #[test]
    fn test_sun_below_horizon() {
        assert!(clear_sky_irradiance(-5.0).is_none());
        assert!(clear_sky_irradiance(0.0).is_none());
        assert!(clear_sky_irradiance(f64::NAN).is_none());
    }

    #[test]
    fn test_service_caches_per_location_and_day() {
        let service = IrradianceService::default();
        let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();

        let first = service.fetch(19.0760, 72.8777, date);
        let second = service.fetch(19.0760, 72.8777, date);
        assert_eq!(first, second);
        assert_eq!(service.cached_entries(), 1);

        service.fetch(12.9716, 77.5946, date);
        assert_eq!(service.cached_entries(), 2);
    }

    #[test]
    fn test_polar_night_falls_back() {
        let service = IrradianceService::default();
        let date = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();
        assert_eq!(service.fetch(85.0, 0.0, date), Irradiance::FALLBACK);
    }
}
