mod algorithm;
mod bbox;
mod crs;
mod geom;

pub use crs::Crs;
pub use geom::Geometries;
