use std::fmt;

/// Map notifications a data layer subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEvent {
    /// The viewport finished panning (and, on most hosts, zooming).
    MoveEnd,
    /// The zoom level finished changing.
    ZoomEnd,
    /// Someone asked every data layer to reload.
    Refresh,
}

impl MapEvent {
    pub const ALL: [MapEvent; 3] = [MapEvent::MoveEnd, MapEvent::ZoomEnd, MapEvent::Refresh];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapEvent::MoveEnd => "moveend",
            MapEvent::ZoomEnd => "zoomend",
            MapEvent::Refresh => "refresh",
        }
    }
}

impl fmt::Display for MapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
