use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::region::CHUNK_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse worldgen config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub skybridge_region: SkyBridgeRegionConfig,
    #[serde(default)]
    pub skybridge: SkyBridgeConfig,
    #[serde(default)]
    pub quarry_region: QuarryRegionConfig,
    #[serde(default)]
    pub quarry: QuarryConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub terrain: TerrainConfig,
}

impl WorldGenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: WorldGenConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the ranges every generator relies on to stay in bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.skybridge_region;
        check_region_size("skybridge_region.region_size", r.region_size)?;
        check_prob("skybridge_region.chance_of_region", r.chance_of_region)?;
        check_prob("skybridge_region.range_for_center", r.range_for_center)?;
        check_prob("skybridge_region.straight_walk_chance", r.straight_walk_chance)?;
        check_prob("skybridge_region.tower_chance", r.tower_chance)?;
        check_prob("skybridge_region.building_chance", r.building_chance)?;
        if r.tower_chance + r.building_chance > 1.0 {
            return Err(invalid(
                "skybridge_region.tower_chance",
                "tower and building chances sum above 1",
            ));
        }
        check_range(
            "skybridge_region.min_path_length",
            r.min_path_length,
            r.max_path_length,
        )?;
        check_range("skybridge_region.min_width", r.min_width, r.max_width)?;
        if r.min_width < 3 || r.max_width > CHUNK_SIZE / 4 {
            return Err(invalid(
                "skybridge_region.min_width",
                format!("tower width must stay within 3..={}", CHUNK_SIZE / 4),
            ));
        }
        if !(0.0..=1.0).contains(&r.min_height_prop)
            || !(0.0..=1.0).contains(&r.max_height_prop)
            || r.min_height_prop > r.max_height_prop
        {
            return Err(invalid(
                "skybridge_region.min_height_prop",
                "height proportions must be ordered and within [0, 1]",
            ));
        }

        let s = &self.skybridge;
        check_prob("skybridge.barracks_bed_chance", s.barracks_bed_chance)?;
        check_prob("skybridge.barracks_chest_chance", s.barracks_chest_chance)?;
        check_prob("skybridge.center_chest_chance", s.center_chest_chance)?;
        check_range("skybridge.residual_length_min", s.residual_length_min, s.residual_length_max)?;
        check_range("skybridge.min_rubble_piles", s.min_rubble_piles, s.max_rubble_piles)?;
        check_range(
            "skybridge.min_bridge_rubble_pile_size",
            s.min_bridge_rubble_pile_size,
            s.max_bridge_rubble_pile_size,
        )?;
        check_range("skybridge.min_rubble_height", s.min_rubble_height, s.max_rubble_height)?;
        check_range("skybridge.min_tower_stub_size", s.min_tower_stub_size, s.max_tower_stub_size)?;
        check_range(
            "skybridge.store_room_height_min",
            s.store_room_height_min,
            s.store_room_height_max,
        )?;
        check_range(
            "skybridge.barracks_height_min",
            s.barracks_height_min,
            s.barracks_height_max,
        )?;
        check_range("skybridge.barracks_min_crates", s.barracks_min_crates, s.barracks_max_crates)?;
        let widest = r.max_width / 2 + s.barracks_platform_extra_width.max(s.center_platform_extra_width);
        if widest >= CHUNK_SIZE / 2 {
            return Err(invalid(
                "skybridge.barracks_platform_extra_width",
                "platform would leave its chunk",
            ));
        }
        if s.residual_length_min < 1 {
            return Err(invalid("skybridge.residual_length_min", "must be at least 1"));
        }
        for (field, loot) in [
            ("skybridge.tower_loot", &s.tower_loot),
            ("skybridge.barracks_loot", &s.barracks_loot),
            ("skybridge.center_loot", &s.center_loot),
        ] {
            check_range(field, loot.min_items, loot.max_items)?;
        }

        let q = &self.quarry_region;
        check_region_size("quarry_region.region_size", q.region_size)?;
        check_prob("quarry_region.chance_of_quarry", q.chance_of_quarry)?;
        check_prob("quarry_region.chance_of_flooding", q.chance_of_flooding)?;
        check_range("quarry_region.min_width_x", q.min_width_x, q.max_width_x)?;
        check_range("quarry_region.min_width_z", q.min_width_z, q.max_width_z)?;
        check_range("quarry_region.min_depth", q.min_depth, q.max_depth)?;
        check_range("quarry_region.min_step_depth", q.min_step_depth, q.max_step_depth)?;
        check_range(
            "quarry_region.min_path_stub_length",
            q.min_path_stub_length,
            q.max_path_stub_length,
        )?;
        check_range("quarry_region.min_path_stubs", q.min_path_stubs, q.max_path_stubs)?;
        check_range(
            "quarry_region.min_path_stub_width",
            q.min_path_stub_width,
            q.max_path_stub_width,
        )?;
        check_range(
            "quarry_region.min_flooding_depth",
            q.min_flooding_depth,
            q.max_flooding_depth,
        )?;
        if q.min_step_depth < 1 || q.min_width_x < 1 || q.min_width_z < 1 {
            return Err(invalid(
                "quarry_region.min_step_depth",
                "step depth and widths must be at least 1",
            ));
        }
        let span = 2 * (q.max_path_stub_length + q.max_width_x.max(q.max_width_z))
            + q.max_path_stub_width;
        if span > q.region_size {
            return Err(invalid(
                "quarry_region.region_size",
                format!("quarry layout needs {span} blocks but the region has {}", q.region_size),
            ));
        }

        let g = &self.quarry;
        check_prob("quarry.chance_of_metal_parts_in_chunk", g.chance_of_metal_parts_in_chunk)?;
        check_prob("quarry.chance_of_gears_in_chunk", g.chance_of_gears_in_chunk)?;
        check_prob("quarry.chance_of_small_gear", g.chance_of_small_gear)?;
        check_prob("quarry.chance_of_small_parts", g.chance_of_small_parts)?;
        check_range("quarry.min_metal_parts", g.min_metal_parts, g.max_metal_parts)?;
        check_range("quarry.min_gears", g.min_gears, g.max_gears)?;
        if g.local_noise_amp.len() != g.local_noise_freq.len() {
            return Err(invalid(
                "quarry.local_noise_amp",
                "amplitude and frequency arrays differ in length",
            ));
        }
        if g.erosion_map_noise_amp.len() != g.erosion_map_noise_freq.len() {
            return Err(invalid(
                "quarry.erosion_map_noise_amp",
                "amplitude and frequency arrays differ in length",
            ));
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<WorldGenConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    WorldGenConfig::from_toml_str(&s)
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_prob(field: &'static str, p: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(invalid(field, format!("probability {p} outside [0, 1]")))
    }
}

fn check_range(field: &'static str, min: i32, max: i32) -> Result<(), ConfigError> {
    if min < 0 || min > max {
        Err(invalid(field, format!("range {min}..{max} is not ordered and non-negative")))
    } else {
        Ok(())
    }
}

fn check_region_size(field: &'static str, size: i32) -> Result<(), ConfigError> {
    if size < CHUNK_SIZE * 2 || size % CHUNK_SIZE != 0 {
        Err(invalid(
            field,
            format!("{size} is not a multiple of {CHUNK_SIZE} spanning at least two chunks"),
        ))
    } else {
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SkyBridgeRegionConfig {
    #[serde(default = "default_region_size")]
    pub region_size: i32,
    #[serde(default = "default_chance_of_region")]
    pub chance_of_region: f32,
    #[serde(default = "default_range_for_center")]
    pub range_for_center: f32,
    #[serde(default = "default_min_path_length")]
    pub min_path_length: i32,
    #[serde(default = "default_max_path_length")]
    pub max_path_length: i32,
    #[serde(default = "default_straight_walk_chance")]
    pub straight_walk_chance: f32,
    #[serde(default = "default_feature_chance")]
    pub tower_chance: f32,
    #[serde(default = "default_feature_chance")]
    pub building_chance: f32,
    #[serde(default = "default_broken_bridge_min")]
    pub broken_bridge_min: f32,
    #[serde(default = "default_broken_bridge_max")]
    pub broken_bridge_max: f32,
    #[serde(default = "default_min_height_prop")]
    pub min_height_prop: f32,
    #[serde(default = "default_max_height_prop")]
    pub max_height_prop: f32,
    #[serde(default = "default_min_width")]
    pub min_width: i32,
    #[serde(default = "default_max_width")]
    pub max_width: i32,
    #[serde(default = "default_branch_path_decrement")]
    pub branch_path_decrement: i32,
    // Send the two 4-way branch heads to opposite sides instead of the same one.
    #[serde(default)]
    pub mirror_four_way_branches: bool,
}
fn default_region_size() -> i32 {
    1024
}
fn default_chance_of_region() -> f32 {
    1.0
}
fn default_range_for_center() -> f32 {
    0.5
}
fn default_min_path_length() -> i32 {
    6
}
fn default_max_path_length() -> i32 {
    14
}
fn default_straight_walk_chance() -> f32 {
    0.8
}
fn default_feature_chance() -> f32 {
    0.05
}
fn default_broken_bridge_min() -> f32 {
    0.4
}
fn default_broken_bridge_max() -> f32 {
    0.9
}
fn default_min_height_prop() -> f32 {
    0.6
}
fn default_max_height_prop() -> f32 {
    0.8
}
fn default_min_width() -> i32 {
    4
}
fn default_max_width() -> i32 {
    6
}
fn default_branch_path_decrement() -> i32 {
    2
}
impl Default for SkyBridgeRegionConfig {
    fn default() -> Self {
        Self {
            region_size: default_region_size(),
            chance_of_region: default_chance_of_region(),
            range_for_center: default_range_for_center(),
            min_path_length: default_min_path_length(),
            max_path_length: default_max_path_length(),
            straight_walk_chance: default_straight_walk_chance(),
            tower_chance: default_feature_chance(),
            building_chance: default_feature_chance(),
            broken_bridge_min: default_broken_bridge_min(),
            broken_bridge_max: default_broken_bridge_max(),
            min_height_prop: default_min_height_prop(),
            max_height_prop: default_max_height_prop(),
            min_width: default_min_width(),
            max_width: default_max_width(),
            branch_path_decrement: default_branch_path_decrement(),
            mirror_four_way_branches: false,
        }
    }
}

/// Parallel item/weight arrays plus the item count range for one container kind.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LootTableConfig {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub weights: Vec<u32>,
    #[serde(default)]
    pub min_items: i32,
    #[serde(default)]
    pub max_items: i32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SkyBridgeConfig {
    pub residual_length_min: i32,
    pub residual_length_max: i32,
    pub min_rubble_piles: i32,
    pub max_rubble_piles: i32,
    pub min_bridge_rubble_pile_size: i32,
    pub max_bridge_rubble_pile_size: i32,
    pub min_rubble_height: i32,
    pub max_rubble_height: i32,
    pub min_tower_stub_size: i32,
    pub max_tower_stub_size: i32,
    pub store_room_height_min: i32,
    pub store_room_height_max: i32,
    pub barracks_height_min: i32,
    pub barracks_height_max: i32,
    pub barracks_min_crates: i32,
    pub barracks_max_crates: i32,
    pub barracks_bed_chance: f32,
    pub barracks_chest_chance: f32,
    pub center_chest_chance: f32,
    pub store_room_platform_extra_width: i32,
    pub barracks_platform_extra_width: i32,
    pub center_platform_extra_width: i32,
    pub end_platform_extra_width: i32,
    pub rubble_base_chance: f32,
    pub tower_loot: LootTableConfig,
    pub barracks_loot: LootTableConfig,
    pub center_loot: LootTableConfig,
}

impl Default for SkyBridgeConfig {
    fn default() -> Self {
        Self {
            residual_length_min: 3,
            residual_length_max: 7,
            min_rubble_piles: 1,
            max_rubble_piles: 2,
            min_bridge_rubble_pile_size: 3,
            max_bridge_rubble_pile_size: 6,
            min_rubble_height: 1,
            max_rubble_height: 3,
            min_tower_stub_size: 4,
            max_tower_stub_size: 8,
            store_room_height_min: 4,
            store_room_height_max: 6,
            barracks_height_min: 4,
            barracks_height_max: 5,
            barracks_min_crates: 3,
            barracks_max_crates: 8,
            barracks_bed_chance: 0.75,
            barracks_chest_chance: 0.25,
            center_chest_chance: 0.5,
            store_room_platform_extra_width: 2,
            barracks_platform_extra_width: 5,
            center_platform_extra_width: 4,
            end_platform_extra_width: 1,
            rubble_base_chance: 0.75,
            tower_loot: LootTableConfig::default(),
            barracks_loot: LootTableConfig::default(),
            center_loot: LootTableConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct QuarryRegionConfig {
    pub region_size: i32,
    pub chance_of_quarry: f32,
    pub min_width_x: i32,
    pub max_width_x: i32,
    pub min_width_z: i32,
    pub max_width_z: i32,
    pub min_depth: i32,
    pub max_depth: i32,
    pub min_step_depth: i32,
    pub max_step_depth: i32,
    pub min_path_stub_length: i32,
    pub max_path_stub_length: i32,
    pub min_path_stubs: i32,
    pub max_path_stubs: i32,
    pub min_path_stub_width: i32,
    pub max_path_stub_width: i32,
    pub chance_of_flooding: f32,
    pub min_flooding_depth: i32,
    pub max_flooding_depth: i32,
}

impl Default for QuarryRegionConfig {
    fn default() -> Self {
        Self {
            region_size: 512,
            chance_of_quarry: 0.3,
            min_width_x: 24,
            max_width_x: 64,
            min_width_z: 24,
            max_width_z: 64,
            min_depth: 16,
            max_depth: 32,
            min_step_depth: 3,
            max_step_depth: 6,
            min_path_stub_length: 12,
            max_path_stub_length: 40,
            min_path_stubs: 1,
            max_path_stubs: 4,
            min_path_stub_width: 2,
            max_path_stub_width: 4,
            chance_of_flooding: 0.35,
            min_flooding_depth: 3,
            max_flooding_depth: 10,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct QuarryConfig {
    pub chance_of_metal_parts_in_chunk: f32,
    pub min_metal_parts: i32,
    pub max_metal_parts: i32,
    pub chance_of_gears_in_chunk: f32,
    pub min_gears: i32,
    pub max_gears: i32,
    pub chance_of_small_gear: f32,
    pub chance_of_small_parts: f32,
    pub path_fade_length: f32,
    pub local_noise_amp: Vec<f64>,
    pub local_noise_freq: Vec<f64>,
    pub erosion_map_noise_amp: Vec<f64>,
    pub erosion_map_noise_freq: Vec<f64>,
    pub erosion_strength: f32,
    pub erosion_negative_mod: f32,
}

impl Default for QuarryConfig {
    fn default() -> Self {
        Self {
            chance_of_metal_parts_in_chunk: 0.3,
            min_metal_parts: 1,
            max_metal_parts: 4,
            chance_of_gears_in_chunk: 0.2,
            min_gears: 1,
            max_gears: 3,
            chance_of_small_gear: 0.7,
            chance_of_small_parts: 0.6,
            path_fade_length: 8.0,
            local_noise_amp: vec![6.0, 3.0, 1.5],
            local_noise_freq: vec![0.02, 0.05, 0.1],
            erosion_map_noise_amp: vec![0.8, 0.2],
            erosion_map_noise_freq: vec![0.004, 0.012],
            erosion_strength: 0.5,
            erosion_negative_mod: 2.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CacheConfig {
    // Regions kept per pass; 0 recomputes every region on each chunk.
    #[serde(default = "default_region_capacity")]
    pub region_capacity: usize,
}
fn default_region_capacity() -> usize {
    64
}
impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            region_capacity: default_region_capacity(),
        }
    }
}

/// Base terrain used by the command-line host when no real world is attached.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub frequency: f32,
    pub min_y_ratio: f32,
    pub max_y_ratio: f32,
    pub water_level_ratio: f32,
    pub topsoil_thickness: i32,
    pub stone: String,
    pub soil: String,
    pub top: String,
    pub water: String,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            frequency: 0.006,
            min_y_ratio: 0.35,
            max_y_ratio: 0.62,
            water_level_ratio: 0.42,
            topsoil_thickness: 3,
            stone: "rock-granite".into(),
            soil: "soil-medium".into(),
            top: "soil-medium-grass".into(),
            water: "water-still-7".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = WorldGenConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.skybridge_region.region_size, 1024);
        assert_eq!(cfg.skybridge_region.branch_path_decrement, 2);
        assert!(!cfg.skybridge_region.mirror_four_way_branches);
        assert_eq!(cfg.skybridge.end_platform_extra_width, 1);
        assert_eq!(cfg.cache.region_capacity, 64);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = WorldGenConfig::from_toml_str(
            r#"
            [skybridge_region]
            straight_walk_chance = 1.0

            [skybridge.tower_loot]
            items = ["gear-rusty", "flaxfibers"]
            weights = [3, 1]
            min_items = 2
            max_items = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.skybridge_region.straight_walk_chance, 1.0);
        assert_eq!(cfg.skybridge_region.max_path_length, 14);
        assert_eq!(cfg.skybridge.tower_loot.weights, vec![3, 1]);
        assert_eq!(cfg.skybridge.residual_length_max, 7);
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let err = WorldGenConfig::from_toml_str(
            r#"
            [quarry]
            chance_of_small_gear = 1.5
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "quarry.chance_of_small_gear",
                ..
            }
        ));
    }

    #[test]
    fn rejects_quarry_that_cannot_fit() {
        let err = WorldGenConfig::from_toml_str(
            r#"
            [quarry_region]
            region_size = 128
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "quarry_region.region_size", .. }));
    }

    #[test]
    fn rejects_region_size_off_chunk_grid() {
        let err = WorldGenConfig::from_toml_str(
            r#"
            [skybridge_region]
            region_size = 1000
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn parse_errors_surface() {
        let err = WorldGenConfig::from_toml_str("[skybridge_region]\nregion_size = \"big\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
