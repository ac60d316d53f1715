use crate::error::ExtentParseError;
use serde::Serialize;
use std::{fmt, str::FromStr};

/// Rectangular extent in lon/lat degrees: x is longitude, y is latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryExtent {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl From<(f64, f64, f64, f64)> for GeometryExtent {
    fn from(extent: (f64, f64, f64, f64)) -> Self {
        GeometryExtent {
            minx: extent.0, // minx
            miny: extent.1, // miny
            maxx: extent.2, // maxx
            maxy: extent.3, // maxy
        }
    }
}

impl GeometryExtent {
    /// Grow the extent on every side by `ratio` times its own width/height.
    pub fn pad(&self, ratio: f64) -> Self {
        let width_buffer = (self.maxx - self.minx).abs() * ratio;
        let height_buffer = (self.maxy - self.miny).abs() * ratio;
        GeometryExtent {
            minx: self.minx - width_buffer,
            miny: self.miny - height_buffer,
            maxx: self.maxx + width_buffer,
            maxy: self.maxy + height_buffer,
        }
    }

    /// `minX,minY,maxX,maxY`, the query form most bbox APIs expect.
    pub fn to_bbox_string(&self) -> String {
        format!("{},{},{},{}", self.minx, self.miny, self.maxx, self.maxy)
    }

    /// Inclusive on every edge, so touching extents intersect.
    pub fn intersects(&self, other: &GeometryExtent) -> bool {
        self.minx <= other.maxx
            && self.maxx >= other.minx
            && self.miny <= other.maxy
            && self.maxy >= other.miny
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.minx && x <= self.maxx && y >= self.miny && y <= self.maxy
    }

    /// Smallest extent covering both.
    pub fn union(&self, other: &GeometryExtent) -> Self {
        GeometryExtent {
            minx: self.minx.min(other.minx),
            miny: self.miny.min(other.miny),
            maxx: self.maxx.max(other.maxx),
            maxy: self.maxy.max(other.maxy),
        }
    }

    /// Extent covering a set of positions, `None` when there are none.
    pub fn from_positions<'a, I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        positions
            .into_iter()
            .filter(|p| p.len() >= 2)
            .map(|p| GeometryExtent::from((p[0], p[1], p[0], p[1])))
            .reduce(|acc, e| acc.union(&e))
    }
}

impl fmt::Display for GeometryExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bbox_string())
    }
}

impl FromStr for GeometryExtent {
    type Err = ExtentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ExtentParseError::WrongArity(parts.len()));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite())
                .ok_or_else(|| ExtentParseError::InvalidNumber(part.to_string()))?;
        }

        let extent = GeometryExtent::from((values[0], values[1], values[2], values[3]));
        if extent.minx > extent.maxx || extent.miny > extent.maxy {
            return Err(ExtentParseError::Inverted(s.to_string()));
        }
        Ok(extent)
    }
}
