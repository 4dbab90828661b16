//! Static lookup tables for solar potential estimation

pub mod cities;
pub mod panels;

pub use cities::{
    city_names, get_city, parse_location, peak_sun_hours, resolve_city, CityInfo, CITIES,
    DEFAULT_CITY, DEFAULT_PEAK_SUN_HOURS,
};
pub use panels::{get_panel_spec, get_panel_spec_by_name, PanelCatalog};
