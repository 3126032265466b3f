use std::{borrow::Cow, fmt, str::FromStr, sync::{Arc, LazyLock}};

use proj4rs::proj::Proj as Proj4;
use regex::Regex;

use crate::error::TimeSeriesError;

/// `EPSG:3857`, `epsg:3857` or a bare `3857`.
static EPSG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:epsg\s*:\s*)?(\d{4,5})\s*$").expect("valid regex"));

/// A coordinate reference system, named by EPSG code or given as a PROJ.4 string.
///
/// Only EPSG codes with a known PROJ.4 definition and PROJ.4 strings that
/// proj4rs accepts can be constructed, so every `Crs` can be reprojected to
/// and from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Crs(Repr);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    Epsg(u32),
    Proj4(Arc<str>),
}

impl Crs {
    /// WGS84 lon/lat.
    pub const WGS84: Crs = Crs(Repr::Epsg(4326));
    /// NAD83 lon/lat, the CRS TIGER/Line boundaries ship in.
    pub const NAD83: Crs = Crs(Repr::Epsg(4269));
    /// Spherical web mercator.
    pub const WEB_MERCATOR: Crs = Crs(Repr::Epsg(3857));
    /// CONUS Albers equal area.
    pub const CONUS_ALBERS: Crs = Crs(Repr::Epsg(5070));

    pub fn from_epsg(epsg: u32) -> Result<Self, TimeSeriesError> {
        match epsg_proj4(epsg) {
            Some(_) => Ok(Crs(Repr::Epsg(epsg))),
            None => Err(TimeSeriesError::UnsupportedCrs(format!("EPSG:{epsg}"))),
        }
    }

    /// A CRS from a raw definition such as `+proj=utm +zone=10 +datum=NAD83 +units=m`.
    pub fn from_proj4(definition: &str) -> Result<Self, TimeSeriesError> {
        let definition = definition.trim();
        Proj4::from_proj_string(definition)
            .map_err(|_| TimeSeriesError::UnsupportedCrs(definition.to_string()))?;
        Ok(Crs(Repr::Proj4(definition.into())))
    }

    /// The EPSG code, or None for a CRS given by its PROJ.4 definition.
    #[inline]
    pub fn epsg(&self) -> Option<u32> {
        match self.0 {
            Repr::Epsg(epsg) => Some(epsg),
            Repr::Proj4(_) => None,
        }
    }

    /// True for lon/lat systems, whose coordinates are degrees rather than meters.
    pub fn is_geographic(&self) -> bool {
        match &self.0 {
            Repr::Epsg(epsg) => matches!(*epsg, 4326 | 4269 | 4937),
            Repr::Proj4(definition) => definition.split_whitespace()
                .any(|param| matches!(param, "+proj=longlat" | "+proj=latlong" | "+proj=lonlat" | "+proj=latlon")),
        }
    }

    /// PROJ.4 definition.
    pub fn proj4(&self) -> Cow<'_, str> {
        match &self.0 {
            // Construction guarantees a definition exists.
            Repr::Epsg(epsg) => Cow::Owned(epsg_proj4(*epsg).unwrap_or_default()),
            Repr::Proj4(definition) => Cow::Borrowed(definition.as_ref()),
        }
    }
}

/// PROJ.4 definition of a supported EPSG code.
/// - WGS84 UTM: 326zz (north) / 327zz (south)
/// - NAD83 UTM: 269zz (north only, zones 1-23)
fn epsg_proj4(epsg: u32) -> Option<String> {
    let utm = |zone: u32, south: bool, datum: &str| {
        let south = if south { " +south" } else { "" };
        format!("+proj=utm +zone={zone}{south} +datum={datum} +units=m +no_defs +type=crs")
    };

    match epsg {
        4326 => Some("+proj=longlat +datum=WGS84 +no_defs +type=crs".into()),
        4269 | 4937 => Some("+proj=longlat +datum=NAD83 +no_defs +type=crs".into()),
        3857 => Some("+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs +type=crs".into()),
        5070 => Some("+proj=aea +lat_0=23 +lon_0=-96 +lat_1=29.5 +lat_2=45.5 +x_0=0 +y_0=0 +datum=NAD83 +units=m +no_defs +type=crs".into()),
        code @ 32601..=32660 => Some(utm(code - 32600, false, "WGS84")),
        code @ 32701..=32760 => Some(utm(code - 32700, true, "WGS84")),
        code @ 26901..=26923 => Some(utm(code - 26900, false, "NAD83")),
        _ => None,
    }
}

impl Default for Crs {
    fn default() -> Self { Crs::WEB_MERCATOR }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Epsg(epsg) => write!(f, "EPSG:{epsg}"),
            Repr::Proj4(definition) => f.write_str(definition),
        }
    }
}

impl FromStr for Crs {
    type Err = TimeSeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim_start().starts_with("+proj=") {
            return Crs::from_proj4(s);
        }

        let epsg = EPSG_RE.captures(s)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .ok_or_else(|| TimeSeriesError::UnsupportedCrs(s.to_string()))?;
        Crs::from_epsg(epsg).map_err(|_| TimeSeriesError::UnsupportedCrs(s.to_string()))
    }
}
