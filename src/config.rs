use serde::Deserialize;
use std::path::Path;

use crate::error::EngineError;

/// `Application.*` (§6).
#[derive(Debug, Deserialize)]
pub struct ApplicationInfo {
    pub frames_in_flight: usize,
}

/// `Camera.*` (§6).
#[derive(Debug, Deserialize)]
pub struct CameraInfo {
    pub init_position: [f32; 3],
    pub init_yaw: f32,
    pub init_pitch: f32,
    pub v_fov: f32,
    pub movement_speed: f32,
    pub movement_speed_boost: f32,
    pub mouse_sensitivity: f32,
}

/// `SvoBuilder.*` (§6).
#[derive(Debug, Deserialize)]
pub struct SvoBuilderInfo {
    pub chunk_voxel_dim: u32,
    pub chunk_dim: [u32; 3],
    pub octree_buffer_size: u64,
}

/// `SvoTracer.*` (§6).
#[derive(Debug, Deserialize)]
pub struct SvoTracerInfo {
    pub a_trous_size_max: u32,
    pub beam_resolution: u32,
    pub taa_sampling_offset_size: u32,
    pub shadow_map_resolution: u32,
    pub upscale_ratio: f32,
}

/// Atmosphere coefficients driving `EnvironmentInfo`, supplemented per SPEC_FULL §6 (not given
/// a home in spec.md's table but required by §4.5.1).
#[derive(Debug, Deserialize)]
pub struct AtmosInfo {
    pub sun_altitude: f32,
    pub sun_azimuth: f32,
    pub rayleigh_scattering_base: [f32; 3],
    pub mie_scattering_base: f32,
    pub ozone_absorption_base: [f32; 3],
    pub sun_luminance: f32,
    pub sun_size: f32,
}

/// Post-processing/denoising tunables, supplemented per SPEC_FULL §6.
#[derive(Debug, Deserialize)]
pub struct PostProcessingInfo {
    pub temporal_alpha: f32,
    pub temporal_position_phi: f32,
    pub a_trous_iteration_count: u32,
    pub phi_c: f32,
    pub phi_n: f32,
    pub phi_p: f32,
    pub min_phi_z: f32,
    pub max_phi_z: f32,
    pub phi_z_stable_sample_count: u32,
    pub changing_luminance_phi: f32,
    pub taa: bool,
    pub gamma: f32,
    pub exposure: f32,
    pub white_point: f32,
}

/// `SvoTracerTweakingData.*` (§6): the debug/feature toggles forwarded into `TweakableParameters`.
#[derive(Debug, Deserialize)]
pub struct SvoTracerTweakingInfo {
    pub visualize_octree: bool,
    pub visualize_chunks: bool,
    pub beam_optimization: bool,
    pub trace_indirect_ray: bool,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub application: ApplicationInfo,
    pub camera: CameraInfo,
    pub svo_builder: SvoBuilderInfo,
    pub svo_tracer: SvoTracerInfo,
    pub atmos: AtmosInfo,
    pub post_processing: PostProcessingInfo,
    pub svo_tracer_tweaking: SvoTracerTweakingInfo,
}

impl Config {
    /// Parses `default_path`, then overlays `custom_path` key-by-key if it exists, matching
    /// the original `TomlConfigReader`'s default-then-user-override lookup (§6). A key absent
    /// from both is `ConfigMissing`.
    pub fn load(default_path: &Path, custom_path: &Path) -> Result<Self, EngineError> {
        let default_text = std::fs::read_to_string(default_path).map_err(|_| {
            EngineError::ConfigMissing(format!(
                "could not read default config at {}",
                default_path.display()
            ))
        })?;
        let mut merged: toml::Value = toml::from_str(&default_text).map_err(|e| {
            EngineError::ConfigMissing(format!("default config is not valid TOML: {e}"))
        })?;

        if let Ok(custom_text) = std::fs::read_to_string(custom_path) {
            let overlay: toml::Value = toml::from_str(&custom_text).map_err(|e| {
                EngineError::ConfigMissing(format!("custom config is not valid TOML: {e}"))
            })?;
            merge_toml(&mut merged, &overlay);
        }

        merged
            .try_into()
            .map_err(|e| EngineError::ConfigMissing(format!("missing or malformed key: {e}")))
    }
}

/// Overlays `overlay` onto `base` in place: tables merge key-by-key (overlay wins on conflict),
/// everything else is a wholesale replacement.
fn merge_toml(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_value) in overlay_table {
                match base_table.get_mut(key) {
                    Some(base_value) => merge_toml(base_value, overlay_value),
                    None => {
                        base_table.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_key_replaces_base_key_leaving_siblings_untouched() {
        let mut base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\nx = 9\n").unwrap();
        merge_toml(&mut base, &overlay);
        assert_eq!(base["a"]["x"].as_integer(), Some(9));
        assert_eq!(base["a"]["y"].as_integer(), Some(2));
    }

    #[test]
    fn missing_default_file_is_config_missing() {
        let err = Config::load(Path::new("/nonexistent/Default.toml"), Path::new("/nonexistent/Custom.toml"));
        assert!(matches!(err, Err(EngineError::ConfigMissing(_))));
    }
}
