use glam::{Mat4, Vec3};

/// The sun's direction, used to position and orient the shadow-map camera.
pub struct LightType {
    pub direction: Vec3,
}

/// Positioned at `sunDir * 1000` looking along `-sunDir`, with an orthographic projection
/// covering `half_extent` on every axis. Rebuilt once per frame from the configured sun direction.
pub struct ShadowCamera {
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Default for ShadowCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ShadowCamera {
    pub fn new() -> Self {
        Self {
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        }
    }

    pub fn update(&mut self, light: &LightType, half_extent: f32) {
        const SUN_DISTANCE: f32 = 1000.0;

        let sun_dir = light.direction.normalize();
        let eye = sun_dir * SUN_DISTANCE;
        let up = if sun_dir.abs_diff_eq(Vec3::Y, 1e-4) || sun_dir.abs_diff_eq(-Vec3::Y, 1e-4) {
            Vec3::X
        } else {
            Vec3::Y
        };

        self.view_matrix = Mat4::look_at_rh(eye, Vec3::ZERO, up);
        self.projection_matrix = Mat4::orthographic_rh(
            -half_extent,
            half_extent,
            -half_extent,
            half_extent,
            0.1,
            2.0 * SUN_DISTANCE,
        );
    }

    pub fn get_view_mat(&self) -> Mat4 {
        self.view_matrix
    }

    pub fn get_proj_mat(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn get_view_proj_mat(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_positions_eye_along_sun_direction() {
        let mut cam = ShadowCamera::new();
        cam.update(
            &LightType {
                direction: Vec3::new(0.0, 1.0, 0.0),
            },
            512.0,
        );
        // looking from +Y down at the origin: the view matrix maps the origin to some
        // negative-Z point in view space (in front of the camera)
        let view_origin = cam.get_view_mat().transform_point3(Vec3::ZERO);
        assert!(view_origin.z < 0.0);
    }
}
