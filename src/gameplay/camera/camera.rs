use glam::{Mat4, Vec2, Vec3, Vec4};
use winit::event::KeyEvent;

use crate::vkn::Extent2D;

use super::{CameraDesc, CameraVectors, MovementState};

pub struct Camera {
    position: Vec3,

    /// The initial yaw of the camera in radians.
    yaw: f32,

    /// The initial pitch of the camera in radians.
    pitch: f32,

    vectors: CameraVectors,
    movement_state: MovementState,
    desc: CameraDesc,
}

impl Camera {
    pub fn new(
        initial_position: Vec3,
        initial_yaw: f32,
        initial_pitch: f32,
        desc: CameraDesc,
    ) -> Self {
        let mut camera = Self {
            position: initial_position,
            vectors: CameraVectors::new(),
            yaw: initial_yaw.to_radians(),
            pitch: initial_pitch.to_radians(),
            movement_state: MovementState::new(
                desc.movement.normal_speed,
                desc.movement.boosted_speed_mul,
            ),
            desc,
        };

        camera.vectors.update(camera.yaw, camera.pitch);
        camera
    }

    pub fn on_resize(&mut self, screen_extent: Extent2D) {
        self.desc.aspect_ratio = screen_extent.width as f32 / screen_extent.height as f32;
    }

    #[allow(dead_code)]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Returns the camera's position as a Vec4 with the w component set to 1.0.
    #[allow(dead_code)]
    pub fn position_vec4(&self) -> Vec4 {
        Vec4::new(self.position.x, self.position.y, self.position.z, 1.0)
    }

    pub fn get_view_mat(&self) -> Mat4 {
        Mat4::look_at_rh(
            self.position,
            self.position + self.vectors.front,
            self.vectors.up,
        )
    }

    pub fn calculate_proj_mat(v_fov: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(v_fov.to_radians(), aspect_ratio, z_near, z_far);
        let flip_y = Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0));
        flip_y * proj
    }

    pub fn get_proj_mat(&self) -> Mat4 {
        Self::calculate_proj_mat(
            self.desc.projection.v_fov,
            self.desc.aspect_ratio,
            self.desc.projection.z_near,
            self.desc.projection.z_far,
        )
    }

    pub fn get_far_plane(&self) -> f32 {
        self.desc.projection.z_far
    }

    /// Only controls the camera's movement state based on the key event.
    pub fn handle_keyboard(&mut self, key_event: &KeyEvent) {
        self.movement_state.handle_keyboard(key_event);
    }

    /// Limits the yaw to prevent the camera from spinning indefinitely.
    /// The yaw is clamped to the range (-π, π).
    fn limit_yaw(&mut self) {
        if self.yaw > std::f32::consts::PI {
            self.yaw -= 2.0 * std::f32::consts::PI;
        }
        if self.yaw < -std::f32::consts::PI {
            self.yaw += 2.0 * std::f32::consts::PI;
        }
    }

    /// Clamps the pitch to prevent the camera from flipping.
    fn clamp_pitch(&mut self) {
        const CAMERA_LIM_RAD: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
        if self.pitch > CAMERA_LIM_RAD {
            self.pitch = CAMERA_LIM_RAD;
        }
        if self.pitch < -CAMERA_LIM_RAD {
            self.pitch = -CAMERA_LIM_RAD;
        }
    }

    pub fn handle_mouse(&mut self, delta: Vec2) {
        const SENSITIVITY_MULTIPLIER: f32 = 0.001;
        // the delta is positive when moving the mouse to the right / down
        // so we need to invert the pitch delta so that when mouse is going up, pitch increases
        self.yaw += delta.x * self.desc.movement.mouse_sensitivity * SENSITIVITY_MULTIPLIER;
        self.pitch -= delta.y * self.desc.movement.mouse_sensitivity * SENSITIVITY_MULTIPLIER;

        self.limit_yaw();
        self.clamp_pitch();

        self.vectors.update(self.yaw, self.pitch);
    }

    pub fn update_transform(&mut self, frame_delta_time: f32) {
        self.position += self.movement_state.get_velocity(
            self.vectors.front,
            self.vectors.right,
            self.vectors.up,
        ) * frame_delta_time;
    }

    #[allow(dead_code)]
    pub fn get_frustum_corners(&self) -> [Vec3; 8] {
        let view_proj_inv = (Self::calculate_proj_mat(
            self.desc.projection.v_fov,
            self.desc.aspect_ratio,
            self.desc.projection.z_near,
            1.0,
        ) * self.get_view_mat())
        .inverse();

        let mut corners = [Vec3::ZERO; 8];
        let mut i = 0;
        for z in &[0.0, 1.0] {
            // Near, Far
            for y in &[-1.0, 1.0] {
                // Bottom, Top
                for x in &[-1.0, 1.0] {
                    // Left, Right
                    // From normalized device coordinates (NDC) to world space
                    let p = view_proj_inv * Vec4::new(*x, *y, *z, 1.0);
                    corners[i] = p.truncate() / p.w;
                    i += 1;
                }
            }
        }
        corners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_desc() -> CameraDesc {
        CameraDesc {
            aspect_ratio: 16.0 / 9.0,
            ..Default::default()
        }
    }

    #[test]
    fn resize_updates_aspect_ratio() {
        let mut camera = Camera::new(Vec3::ZERO, 0.0, 0.0, test_desc());
        camera.on_resize(Extent2D {
            width: 1920,
            height: 1080,
        });
        assert!((camera.desc.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn far_plane_matches_projection_desc() {
        let camera = Camera::new(Vec3::ZERO, 0.0, 0.0, test_desc());
        assert_eq!(camera.get_far_plane(), camera.desc.projection.z_far);
    }

    #[test]
    fn mouse_look_clamps_pitch_near_poles() {
        let mut camera = Camera::new(Vec3::ZERO, 0.0, 0.0, test_desc());
        for _ in 0..10_000 {
            camera.handle_mouse(Vec2::new(0.0, -10_000.0));
        }
        assert!(camera.pitch.abs() <= std::f32::consts::FRAC_PI_2);
    }
}
