use crate::Vec3;

/// Orthonormal basis with `w` along a chosen principal axis.
///
/// Sampling routines generate directions in a local frame where +Z is the
/// axis of interest; `transform` carries them into world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Onb {
    /// Build a frame whose `w` axis is `n` normalized. `n` must be non-zero.
    pub fn new(n: Vec3) -> Self {
        let w = n.normalize();
        // Pick a helper axis that is not nearly parallel to w
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);

        Self { u, v, w }
    }

    #[inline]
    pub fn u(&self) -> Vec3 {
        self.u
    }

    #[inline]
    pub fn v(&self) -> Vec3 {
        self.v
    }

    #[inline]
    pub fn w(&self) -> Vec3 {
        self.w
    }

    /// Map a local-frame vector into world coordinates.
    #[inline]
    pub fn transform(&self, local: Vec3) -> Vec3 {
        local.x * self.u + local.y * self.v + local.z * self.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(onb: &Onb) {
        assert!((onb.u().length() - 1.0).abs() < 1e-12);
        assert!((onb.v().length() - 1.0).abs() < 1e-12);
        assert!((onb.w().length() - 1.0).abs() < 1e-12);
        assert!(onb.u().dot(onb.v()).abs() < 1e-12);
        assert!(onb.v().dot(onb.w()).abs() < 1e-12);
        assert!(onb.w().dot(onb.u()).abs() < 1e-12);
    }

    #[test]
    fn test_onb_is_orthonormal() {
        for n in [
            Vec3::X,
            Vec3::Y,
            Vec3::NEG_Z,
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-0.95, 0.1, 0.0),
        ] {
            let onb = Onb::new(n);
            assert_orthonormal(&onb);
            assert!((onb.w() - n.normalize()).length() < 1e-12);
        }
    }

    #[test]
    fn test_onb_transform_z_maps_to_w() {
        let n = Vec3::new(0.3, -0.4, 0.5);
        let onb = Onb::new(n);
        let mapped = onb.transform(Vec3::Z);
        assert!((mapped - n.normalize()).length() < 1e-12);
    }
}
