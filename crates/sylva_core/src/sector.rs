//! Sector state transitions and the mapping from positions to sectors.

use crate::config::EnvironmentConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use sylva_data::{Position, Sector, Season, WeatherEvent};

/// Sunlight available on a clear day; rainfall subtracts from it.
pub const FULL_SUNLIGHT: f64 = 100.0;

pub trait SectorLogic {
    fn update_sunlight(&mut self);
    /// Slow accumulation below the toxicity threshold, the toxic ramp above it.
    fn update_organic_matter(&mut self, config: &EnvironmentConfig);
    fn update_season(&mut self, season: Season);
    fn random_event<R: Rng>(&mut self, rng: &mut R) -> WeatherEvent;
    fn apply_weather(&mut self, event: WeatherEvent);
    fn deposit_organic_matter(&mut self, amount: f64);
    /// Sunlight exposure normalised to `[0, 1]`.
    fn sunlight_intensity(&self) -> f64;
    /// Organic matter relative to the toxicity threshold, in `[0, 1]`.
    fn organic_concentration(&self, toxicity_threshold: f64) -> f64;
    fn contains(&self, position: Position) -> bool;
}

impl SectorLogic for Sector {
    fn update_sunlight(&mut self) {
        self.sunlight_exposure = (FULL_SUNLIGHT - self.rainfall).max(0.0);
    }

    fn update_organic_matter(&mut self, config: &EnvironmentConfig) {
        if self.organic_matter > config.toxicity_threshold {
            self.organic_matter += config.toxic_accumulation;
        } else {
            self.organic_matter += config.organic_accumulation;
        }
    }

    fn update_season(&mut self, season: Season) {
        self.temperature = season.temperature();
        self.rainfall = season.rainfall();
    }

    fn random_event<R: Rng>(&mut self, rng: &mut R) -> WeatherEvent {
        let event = *WeatherEvent::ALL
            .choose(rng)
            .unwrap_or(&WeatherEvent::Storm);
        self.apply_weather(event);
        event
    }

    fn apply_weather(&mut self, event: WeatherEvent) {
        let (rainfall, sunlight, temperature) = event.deltas();
        self.rainfall += rainfall;
        self.sunlight_exposure += sunlight;
        self.temperature += temperature;
    }

    fn deposit_organic_matter(&mut self, amount: f64) {
        self.organic_matter += amount.max(0.0);
    }

    fn sunlight_intensity(&self) -> f64 {
        (self.sunlight_exposure / FULL_SUNLIGHT).clamp(0.0, 1.0)
    }

    fn organic_concentration(&self, toxicity_threshold: f64) -> f64 {
        if toxicity_threshold <= 0.0 {
            return 0.0;
        }
        (self.organic_matter / toxicity_threshold).clamp(0.0, 1.0)
    }

    fn contains(&self, position: Position) -> bool {
        let (x, y) = (i64::from(position.x), i64::from(position.y));
        x >= i64::from(self.x)
            && y >= i64::from(self.y)
            && x < i64::from(self.x) + i64::from(self.width)
            && y < i64::from(self.y) + i64::from(self.height)
    }
}

/// Regular `n × n` partition of the world rectangle.
///
/// Sectors are stored column-major: index `i * n + j` is column `i`, row `j`.
/// Leftover pixels from the integer division belong to the last column/row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorLayout {
    pub width: u32,
    pub height: u32,
    pub per_axis: u32,
    pub sector_width: u32,
    pub sector_height: u32,
}

impl SectorLayout {
    pub fn new(width: u32, height: u32, per_axis: u32) -> anyhow::Result<Self> {
        anyhow::ensure!(per_axis > 0, "Sectors per axis must be positive");
        anyhow::ensure!(
            per_axis <= width && per_axis <= height,
            "Cannot split a {width}x{height} world into {per_axis} sectors per axis"
        );
        Ok(Self {
            width,
            height,
            per_axis,
            sector_width: width / per_axis,
            sector_height: height / per_axis,
        })
    }

    #[must_use]
    pub fn sector_count(&self) -> usize {
        (self.per_axis * self.per_axis) as usize
    }

    #[must_use]
    pub fn build_sectors(&self) -> Vec<Sector> {
        let mut sectors = Vec::with_capacity(self.sector_count());
        let last = self.per_axis - 1;
        for i in 0..self.per_axis {
            let x = i * self.sector_width;
            let width = if i == last { self.width - x } else { self.sector_width };
            for j in 0..self.per_axis {
                let y = j * self.sector_height;
                let height = if j == last { self.height - y } else { self.sector_height };
                sectors.push(Sector::new(x, y, width, height));
            }
        }
        sectors
    }

    #[must_use]
    pub fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    #[must_use]
    pub fn index_of(&self, position: Position) -> Option<usize> {
        if !self.in_bounds(position) {
            return None;
        }
        let i = (position.x as u32 / self.sector_width).min(self.per_axis - 1);
        let j = (position.y as u32 / self.sector_height).min(self.per_axis - 1);
        Some((i * self.per_axis + j) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_storm_deltas() {
        let mut sector = Sector {
            rainfall: 10.0,
            sunlight_exposure: 50.0,
            ..Default::default()
        };
        sector.apply_weather(WeatherEvent::Storm);
        assert_eq!(sector.rainfall, 30.0);
        assert_eq!(sector.sunlight_exposure, 40.0);
        assert_eq!(sector.temperature, 0.0);
    }

    #[test]
    fn test_drought_and_heatwave_deltas() {
        let mut sector = Sector {
            rainfall: 25.0,
            sunlight_exposure: 50.0,
            temperature: 10.0,
            ..Default::default()
        };
        sector.apply_weather(WeatherEvent::Drought);
        assert_eq!(sector.rainfall, 5.0);
        assert_eq!(sector.temperature, 15.0);
        sector.apply_weather(WeatherEvent::Heatwave);
        assert_eq!(sector.sunlight_exposure, 55.0);
        assert_eq!(sector.temperature, 25.0);
        assert_eq!(sector.rainfall, 5.0);
    }

    #[test]
    fn test_summer_drought_leaves_rainfall_negative() {
        let mut sector = Sector {
            rainfall: 5.0,
            sunlight_exposure: 50.0,
            ..Default::default()
        };
        sector.apply_weather(WeatherEvent::Drought);
        assert_eq!(sector.rainfall, -15.0);
        sector.update_sunlight();
        assert_eq!(sector.sunlight_exposure, 115.0);
    }

    #[test]
    fn test_sunlight_follows_rainfall() {
        let mut sector = Sector {
            rainfall: 20.0,
            ..Default::default()
        };
        sector.update_sunlight();
        assert_eq!(sector.sunlight_exposure, 80.0);
        sector.rainfall = 150.0;
        sector.update_sunlight();
        assert_eq!(sector.sunlight_exposure, 0.0);
    }

    #[test]
    fn test_toxicity_ramp_from_99() {
        let config = EnvironmentConfig::default();
        let mut sector = Sector {
            organic_matter: 99.0,
            ..Default::default()
        };
        let mut guard = 0;
        while sector.organic_matter <= config.toxicity_threshold {
            let before = sector.organic_matter;
            sector.update_organic_matter(&config);
            assert!((sector.organic_matter - before - 0.1).abs() < 1e-9);
            guard += 1;
            assert!(guard < 100, "never crossed the threshold");
        }
        for _ in 0..5 {
            let before = sector.organic_matter;
            sector.update_organic_matter(&config);
            assert!((sector.organic_matter - before - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_season_table_applied() {
        let mut sector = Sector::default();
        sector.update_season(Season::Winter);
        assert_eq!((sector.temperature, sector.rainfall), (0.0, 20.0));
        sector.update_season(Season::Summer);
        assert_eq!((sector.temperature, sector.rainfall), (25.0, 5.0));
    }

    #[test]
    fn test_random_event_applies_what_it_reports() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..20 {
            let mut sector = Sector {
                rainfall: 50.0,
                sunlight_exposure: 50.0,
                temperature: 10.0,
                ..Default::default()
            };
            let event = sector.random_event(&mut rng);
            let mut expected = Sector {
                rainfall: 50.0,
                sunlight_exposure: 50.0,
                temperature: 10.0,
                ..Default::default()
            };
            expected.apply_weather(event);
            assert_eq!(sector, expected);
        }
    }

    #[test]
    fn test_layout_indexes_column_major() {
        let layout = SectorLayout::new(1800, 1400, 8).unwrap();
        let sectors = layout.build_sectors();
        assert_eq!(sectors.len(), 64);
        assert_eq!(layout.sector_width, 225);
        assert_eq!(layout.sector_height, 175);

        let pos = Position::new(230, 10);
        let idx = layout.index_of(pos).unwrap();
        assert_eq!(idx, 8);
        assert!(sectors[idx].contains(pos));
        assert_eq!(layout.index_of(Position::new(1799, 1399)), Some(63));
        assert_eq!(layout.index_of(Position::new(-1, 0)), None);
        assert_eq!(layout.index_of(Position::new(0, 1400)), None);
    }

    #[test]
    fn test_layout_remainder_goes_to_last_sector() {
        let layout = SectorLayout::new(10, 10, 3).unwrap();
        assert_eq!(layout.index_of(Position::new(9, 9)), Some(8));
        let sectors = layout.build_sectors();
        assert_eq!(sectors[8].width, 4);
        assert!(sectors[8].contains(Position::new(9, 9)));
        assert!(SectorLayout::new(2, 10, 3).is_err());
    }
}
