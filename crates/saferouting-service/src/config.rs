//! Environment-driven service configuration, read once at start-up.

use std::path::PathBuf;

use saferouting_lib::{BootstrapOptions, Bounds, Error as LibError};
use tracing::warn;

/// Default location of the persisted router state.
pub const DEFAULT_STATE_PATH: &str = ".serialized_routes";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Service settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub state_path: PathBuf,
    pub graph_path: Option<PathBuf>,
    pub bounds: Option<Bounds>,
    pub port: u16,
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    ///
    /// - `SAFEROUTING_STATE_PATH`: state file (default `.serialized_routes`)
    /// - `SAFEROUTING_GRAPH_PATH`: graph input for the first start (optional)
    /// - `SAFEROUTING_BOUNDS`: `x0,y0,x1,y1` (optional)
    /// - `SERVICE_PORT`: HTTP port (default 8080)
    pub fn from_env() -> Result<Self, LibError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LibError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let state_path = non_empty("SAFEROUTING_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH));
        let graph_path = non_empty("SAFEROUTING_GRAPH_PATH").map(PathBuf::from);
        let bounds = non_empty("SAFEROUTING_BOUNDS")
            .map(|value| value.parse::<Bounds>())
            .transpose()?;

        let port = match non_empty("SERVICE_PORT") {
            Some(value) => value.trim().parse().unwrap_or_else(|_| {
                warn!(
                    value = %value,
                    default = DEFAULT_PORT,
                    "invalid SERVICE_PORT; using default"
                );
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Ok(Self {
            state_path,
            graph_path,
            bounds,
            port,
        })
    }

    /// Bootstrap options for the library.
    pub fn bootstrap_options(&self) -> BootstrapOptions {
        BootstrapOptions {
            state_path: self.state_path.clone(),
            graph_path: self.graph_path.clone(),
            bounds: self.bounds,
        }
    }
}
