use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::graph::Coordinate;

/// Axis-aligned query box given by its top-left and bottom-right corners.
///
/// Bounds only gate query admissibility; the graph itself is never clipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top_left: Coordinate,
    pub bottom_right: Coordinate,
}

impl Bounds {
    pub fn new(top_left: Coordinate, bottom_right: Coordinate) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Whether `(x, y)` lies inside the box, edges included.
    ///
    /// Corner orientation does not matter: a box given with the y axis
    /// pointing up (latitude) or down (screen space) covers the same area.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (min_x, max_x) = ordered(self.top_left.x, self.bottom_right.x);
        let (min_y, max_y) = ordered(self.top_left.y, self.bottom_right.y);
        (min_x..=max_x).contains(&x) && (min_y..=max_y).contains(&y)
    }

    pub fn contains_coordinate(&self, point: Coordinate) -> bool {
        self.contains(point.x, point.y)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.top_left.x, self.top_left.y, self.bottom_right.x, self.bottom_right.y
        )
    }
}

/// Parses `x0,y0,x1,y1` (top-left then bottom-right).
impl FromStr for Bounds {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| Error::Configuration {
                message: format!("invalid bounds '{s}': {err}"),
            })?;

        match values.as_slice() {
            [x0, y0, x1, y1] if values.iter().all(|v| v.is_finite()) => Ok(Bounds::new(
                Coordinate::new(*x0, *y0),
                Coordinate::new(*x1, *y1),
            )),
            _ => Err(Error::Configuration {
                message: format!("invalid bounds '{s}': expected four finite numbers x0,y0,x1,y1"),
            }),
        }
    }
}
