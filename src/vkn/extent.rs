use glam::{UVec2, UVec3};

/// Dispatch/image extent in texels or workgroup-invocations, matching `vk::Extent3D`'s shape
/// but usable as a plain value type across the crate without an `ash` import at every call site.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Extent3D {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl From<[u32; 3]> for Extent3D {
    fn from(a: [u32; 3]) -> Self {
        Self {
            width: a[0],
            height: a[1],
            depth: a[2],
        }
    }
}

impl From<UVec3> for Extent3D {
    fn from(v: UVec3) -> Self {
        Self {
            width: v.x,
            height: v.y,
            depth: v.z,
        }
    }
}

impl Extent3D {
    pub fn to_array(self) -> [u32; 3] {
        [self.width, self.height, self.depth]
    }
}

/// 2D counterpart, used for window/swapchain/screen-space extents.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl From<[u32; 2]> for Extent2D {
    fn from(a: [u32; 2]) -> Self {
        Self {
            width: a[0],
            height: a[1],
        }
    }
}

impl From<UVec2> for Extent2D {
    fn from(v: UVec2) -> Self {
        Self {
            width: v.x,
            height: v.y,
        }
    }
}

impl Extent2D {
    pub fn to_array(self) -> [u32; 2] {
        [self.width, self.height]
    }

    pub fn aspect_ratio(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
