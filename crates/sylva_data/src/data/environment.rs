use serde::{Deserialize, Serialize};
use std::fmt;

/// The four seasons, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    #[must_use]
    pub fn index(&self) -> u8 {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Autumn => 2,
            Season::Winter => 3,
        }
    }

    /// Maps any counter onto the cycle (`index mod 4`).
    #[must_use]
    pub fn from_index(index: u8) -> Season {
        Self::ALL[(index % 4) as usize]
    }

    #[must_use]
    pub fn next(&self) -> Season {
        Self::from_index(self.index() + 1)
    }

    #[must_use]
    pub fn temperature(&self) -> f64 {
        match self {
            Season::Spring => 15.0,
            Season::Summer => 25.0,
            Season::Autumn => 10.0,
            Season::Winter => 0.0,
        }
    }

    #[must_use]
    pub fn rainfall(&self) -> f64 {
        match self {
            Season::Spring => 10.0,
            Season::Summer => 5.0,
            Season::Autumn => 15.0,
            Season::Winter => 20.0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

/// Random weather event applied to a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherEvent {
    Storm,
    Drought,
    Heatwave,
}

impl WeatherEvent {
    pub const ALL: [WeatherEvent; 3] = [
        WeatherEvent::Storm,
        WeatherEvent::Drought,
        WeatherEvent::Heatwave,
    ];

    /// `(rainfall, sunlight_exposure, temperature)` deltas.
    #[must_use]
    pub fn deltas(&self) -> (f64, f64, f64) {
        match self {
            WeatherEvent::Storm => (20.0, -10.0, 0.0),
            WeatherEvent::Drought => (-20.0, 0.0, 5.0),
            WeatherEvent::Heatwave => (0.0, 5.0, 10.0),
        }
    }
}

impl fmt::Display for WeatherEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeatherEvent::Storm => "storm",
            WeatherEvent::Drought => "drought",
            WeatherEvent::Heatwave => "heatwave",
        };
        f.write_str(name)
    }
}

/// Rectangular patch of the world with scalar environmental state.
///
/// Only the world and environment layers write these scalars; cells read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Sector {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub sunlight_exposure: f64,
    pub organic_matter: f64,
    pub temperature: f64,
    pub rainfall: f64,
}

impl Sector {
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Self::default()
        }
    }
}
