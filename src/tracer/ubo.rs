use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use crate::config::{AtmosInfo, PostProcessingInfo, SvoTracerTweakingInfo};

/// Camera, projection, and jitter state refreshed every frame (§4.5.1 `RenderInfo`).
/// Previous-frame matrices are carried forward by the caller between invocations.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct RenderInfo {
    pub cam_pos: Vec4,
    pub shadow_cam_pos: Vec4,
    pub subpixel_jitter: Vec4,

    pub v: Mat4,
    pub v_inv: Mat4,
    pub v_prev: Mat4,
    pub v_prev_inv: Mat4,

    pub p: Mat4,
    pub p_inv: Mat4,
    pub p_prev: Mat4,
    pub p_prev_inv: Mat4,

    pub vp: Mat4,
    pub vp_inv: Mat4,
    pub vp_prev: Mat4,
    pub vp_prev_inv: Mat4,

    pub vp_shadow: Mat4,
    pub vp_shadow_inv: Mat4,

    pub low_res: Vec4,
    pub inv_low_res: Vec4,
    pub high_res: Vec4,
    pub inv_high_res: Vec4,

    pub v_fov: f32,
    pub current_sample: u32,
    pub time: f32,
    pub _pad: f32,
}

impl Default for RenderInfo {
    fn default() -> Self {
        Self {
            cam_pos: Vec4::ZERO,
            shadow_cam_pos: Vec4::ZERO,
            subpixel_jitter: Vec4::ZERO,
            v: Mat4::IDENTITY,
            v_inv: Mat4::IDENTITY,
            v_prev: Mat4::IDENTITY,
            v_prev_inv: Mat4::IDENTITY,
            p: Mat4::IDENTITY,
            p_inv: Mat4::IDENTITY,
            p_prev: Mat4::IDENTITY,
            p_prev_inv: Mat4::IDENTITY,
            vp: Mat4::IDENTITY,
            vp_inv: Mat4::IDENTITY,
            vp_prev: Mat4::IDENTITY,
            vp_prev_inv: Mat4::IDENTITY,
            vp_shadow: Mat4::IDENTITY,
            vp_shadow_inv: Mat4::IDENTITY,
            low_res: Vec4::ZERO,
            inv_low_res: Vec4::ZERO,
            high_res: Vec4::ZERO,
            inv_high_res: Vec4::ZERO,
            v_fov: 0.0,
            current_sample: 0,
            time: 0.0,
            _pad: 0.0,
        }
    }
}

/// Sun direction and atmosphere coefficients driving the LUT passes (§4.5.1 `EnvironmentInfo`).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct EnvironmentInfo {
    pub sun_dir: Vec4,
    pub rayleigh_coeff: Vec4,
    pub mie_coeff: Vec4,
    pub ozone_coeff: Vec4,
    pub sun_luminance: f32,
    pub sun_angular_size: f32,
    pub mie_asymmetry: f32,
    pub _pad: f32,
}

impl EnvironmentInfo {
    pub fn from_altitude_azimuth(altitude_rad: f32, azimuth_rad: f32) -> Vec3 {
        let x = altitude_rad.cos() * azimuth_rad.cos();
        let y = altitude_rad.sin();
        let z = altitude_rad.cos() * azimuth_rad.sin();
        Vec3::new(x, y, z)
    }

    pub fn from_config(atmos: &AtmosInfo) -> Self {
        let sun_dir =
            Self::from_altitude_azimuth(atmos.sun_altitude.to_radians(), atmos.sun_azimuth.to_radians());
        Self {
            sun_dir: sun_dir.extend(0.0),
            rayleigh_coeff: Vec3::from(atmos.rayleigh_scattering_base).extend(0.0),
            mie_coeff: Vec3::splat(atmos.mie_scattering_base).extend(0.0),
            ozone_coeff: Vec3::from(atmos.ozone_absorption_base).extend(0.0),
            sun_luminance: atmos.sun_luminance,
            sun_angular_size: atmos.sun_size,
            ..Default::default()
        }
    }
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        Self {
            sun_dir: Vec4::new(0.0, 1.0, 0.0, 0.0),
            rayleigh_coeff: Vec4::new(5.802e-6, 13.558e-6, 33.1e-6, 0.0),
            mie_coeff: Vec4::new(3.996e-6, 3.996e-6, 3.996e-6, 0.0),
            ozone_coeff: Vec4::new(0.650e-6, 1.881e-6, 0.085e-6, 0.0),
            sun_luminance: 1.0,
            sun_angular_size: 0.00935,
            mie_asymmetry: 0.8,
            _pad: 0.0,
        }
    }
}

/// Debug/feature toggles (§4.5.1 `TweakableParameters`), supplemented with the
/// post-processing tunables from `original_source`'s `PostProcessingInfo` (§4.5's
/// "Supplemental: post-processing parameters").
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct TweakableParameters {
    pub visualize_octree: u32,
    pub visualize_chunks: u32,
    pub beam_optimization: u32,
    pub trace_indirect_ray: u32,

    pub taa: u32,
    pub gamma: f32,
    pub exposure: f32,
    pub white_point: f32,
}

impl Default for TweakableParameters {
    fn default() -> Self {
        Self {
            visualize_octree: 0,
            visualize_chunks: 0,
            beam_optimization: 1,
            trace_indirect_ray: 1,
            taa: 1,
            gamma: 2.2,
            exposure: 1.0,
            white_point: 1.0,
        }
    }
}

impl TweakableParameters {
    pub fn from_config(tweaking: &SvoTracerTweakingInfo, post: &PostProcessingInfo) -> Self {
        Self {
            visualize_octree: tweaking.visualize_octree as u32,
            visualize_chunks: tweaking.visualize_chunks as u32,
            beam_optimization: tweaking.beam_optimization as u32,
            trace_indirect_ray: tweaking.trace_indirect_ray as u32,
            taa: post.taa as u32,
            gamma: post.gamma,
            exposure: post.exposure,
            white_point: post.white_point,
        }
    }
}

/// §4.5.1 `TemporalFilterInfo`.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct TemporalFilterInfo {
    pub alpha: f32,
    pub position_phi: f32,
    pub _pad: [f32; 2],
}

impl Default for TemporalFilterInfo {
    fn default() -> Self {
        Self {
            alpha: 0.2,
            position_phi: 0.5,
            _pad: [0.0; 2],
        }
    }
}

impl TemporalFilterInfo {
    pub fn from_config(post: &PostProcessingInfo) -> Self {
        Self {
            alpha: post.temporal_alpha,
            position_phi: post.temporal_position_phi,
            _pad: [0.0; 2],
        }
    }
}

/// §4.5.1 `SpatialFilterInfo`, consumed by the à-trous loop.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct SpatialFilterInfo {
    pub iteration_count: u32,
    pub phi_c: f32,
    pub phi_n: f32,
    pub phi_p: f32,
    pub phi_z_min: f32,
    pub phi_z_max: f32,
    pub phi_z_stable_sample_count: u32,
    pub changing_luminance_phi: f32,
}

impl Default for SpatialFilterInfo {
    fn default() -> Self {
        Self {
            iteration_count: 4,
            phi_c: 4.0,
            phi_n: 128.0,
            phi_p: 1.0,
            phi_z_min: 0.1,
            phi_z_max: 1.0,
            phi_z_stable_sample_count: 8,
            changing_luminance_phi: 0.5,
        }
    }
}

impl SpatialFilterInfo {
    pub fn from_config(post: &PostProcessingInfo) -> Self {
        Self {
            iteration_count: post.a_trous_iteration_count,
            phi_c: post.phi_c,
            phi_n: post.phi_n,
            phi_p: post.phi_p,
            phi_z_min: post.min_phi_z,
            phi_z_max: post.max_phi_z,
            phi_z_stable_sample_count: post.phi_z_stable_sample_count,
            changing_luminance_phi: post.changing_luminance_phi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_direction_points_up_at_zero_azimuth_and_quarter_turn_altitude() {
        let dir = EnvironmentInfo::from_altitude_azimuth(std::f32::consts::FRAC_PI_2, 0.0);
        assert!((dir - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn sun_direction_is_normalized_for_any_angle() {
        let dir = EnvironmentInfo::from_altitude_azimuth(0.4, 1.2);
        assert!((dir.length() - 1.0).abs() < 1e-4);
    }
}
