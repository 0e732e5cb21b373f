use glam::Vec3;

/// Convert spherical coordinates to a cartesian point.
///
/// `phi` is the polar angle measured from +Y, `theta` the azimuth around +Y
/// measured from +Z toward +X.
pub fn spherical_to_cartesian(radius: f32, phi: f32, theta: f32) -> Vec3 {
    let sin_phi_radius = phi.sin() * radius;
    Vec3::new(
        sin_phi_radius * theta.sin(),
        phi.cos() * radius,
        sin_phi_radius * theta.cos(),
    )
}

/// Sun position on the unit sphere from an elevation above the horizon and an
/// azimuth, both in degrees
pub fn sun_position(elevation_deg: f32, azimuth_deg: f32) -> Vec3 {
    let phi = (90.0 - elevation_deg).to_radians();
    let theta = azimuth_deg.to_radians();
    spherical_to_cartesian(1.0, phi, theta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zenith() {
        let p = spherical_to_cartesian(1.0, 0.0, 1.234);
        assert!((p - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_horizon_along_z() {
        let p = spherical_to_cartesian(2.0, std::f32::consts::FRAC_PI_2, 0.0);
        assert!((p - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_default_sun_sits_low_behind_camera_axis() {
        // elevation 2, azimuth 180: just above the horizon, toward -Z
        let sun = sun_position(2.0, 180.0);
        assert!((sun.length() - 1.0).abs() < 1e-5);
        assert!(sun.y > 0.0 && sun.y < 0.05);
        assert!(sun.z < -0.99);
        assert!(sun.x.abs() < 1e-5);
    }
}
