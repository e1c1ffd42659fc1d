// Orientation input and the motion scalars derived from it.
//
// The engine consumes one immutable `OrientationSample` per call: raw
// accelerometer (g), gyroscope (deg/s) and magnetometer (uT) vectors plus
// the attitude angles the sampler derived from them, stamped with a
// monotonic millisecond clock. The timestamp is the engine's only notion of
// time, which keeps the core free of wall-clock reads and makes every
// session replayable from a recorded stream.
//
// `MotionReadings` reduces a sample to the three scalars the modulator
// reacts to:
// - tilt:      angle between the measured gravity vector and the device's
//              z axis, folded into [0, 90] so face-up and face-down read alike
// - heading:   magnetic heading from the horizontal field components, [0, 360)
// - intensity: magnitude of the angular-rate vector
//
// None of these special-case bad input. NaN or infinite components flow
// through the trigonometry; every threshold comparison against NaN is false,
// so a garbage sample simply triggers no sensor rule.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn norm(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// One consistent snapshot from the orientation sampler.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationSample {
    /// Monotonic capture time in milliseconds.
    pub timestamp_ms: u64,
    pub accel: Vec3,
    pub gyro: Vec3,
    pub mag: Vec3,
    /// Attitude in degrees.
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

impl OrientationSample {
    /// Build a sample from raw sensor vectors, deriving attitude the way the
    /// wrist unit's firmware does: roll and pitch from gravity, yaw from the
    /// magnetometer compensated for that roll and pitch, in [0, 360).
    pub fn from_raw(timestamp_ms: u64, accel: Vec3, gyro: Vec3, mag: Vec3) -> Self {
        let roll = accel.y.atan2(accel.z).to_degrees();
        let pitch = (-accel.x)
            .atan2((accel.y * accel.y + accel.z * accel.z).sqrt())
            .to_degrees();

        let (p, r) = (pitch.to_radians(), roll.to_radians());
        let mag_x = mag.x * p.cos() + mag.z * p.sin();
        let mag_y = mag.x * r.sin() * p.sin() + mag.y * r.cos() - mag.z * r.sin() * p.cos();
        let mut yaw = mag_y.atan2(mag_x).to_degrees();
        if yaw < 0.0 {
            yaw += 360.0;
        }

        Self {
            timestamp_ms,
            accel,
            gyro,
            mag,
            pitch,
            roll,
            yaw,
        }
    }
}

/// Scalars the modulator thresholds against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionReadings {
    /// Degrees in [0, 90].
    pub tilt_deg: f32,
    /// Degrees in [0, 360).
    pub heading_deg: f32,
    /// Angular-rate magnitude, deg/s.
    pub intensity_dps: f32,
}

impl MotionReadings {
    pub fn from_sample(sample: &OrientationSample) -> Self {
        let a = sample.accel;
        let mut tilt_deg = (a.x * a.x + a.y * a.y).sqrt().atan2(a.z).to_degrees();
        if tilt_deg > 90.0 {
            tilt_deg = 180.0 - tilt_deg;
        }

        let mut heading_deg = sample.mag.y.atan2(sample.mag.x).to_degrees();
        if heading_deg < 0.0 {
            heading_deg += 360.0;
        }

        Self {
            tilt_deg,
            heading_deg,
            intensity_dps: sample.gyro.norm(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn tilted(deg: f32) -> OrientationSample {
        let r = deg.to_radians();
        OrientationSample {
            accel: Vec3::new(r.sin(), 0.0, r.cos()),
            ..Default::default()
        }
    }

    #[test]
    fn flat_device_has_zero_tilt() {
        let readings = MotionReadings::from_sample(&tilted(0.0));
        assert!(approx(readings.tilt_deg, 0.0));
    }

    #[test]
    fn tilt_tracks_gravity_angle() {
        for deg in [10.0, 45.0, 80.0] {
            let readings = MotionReadings::from_sample(&tilted(deg));
            assert!(
                approx(readings.tilt_deg, deg),
                "{deg} -> {}",
                readings.tilt_deg
            );
        }
    }

    #[test]
    fn upside_down_folds_into_quadrant() {
        let sample = OrientationSample {
            accel: Vec3::new(0.0, 0.0, -1.0),
            ..Default::default()
        };
        assert!(approx(MotionReadings::from_sample(&sample).tilt_deg, 0.0));

        let readings = MotionReadings::from_sample(&tilted(120.0));
        assert!(approx(readings.tilt_deg, 60.0));
    }

    #[test]
    fn heading_is_normalized() {
        let sample = OrientationSample {
            mag: Vec3::new(0.0, -20.0, 0.0),
            ..Default::default()
        };
        let heading = MotionReadings::from_sample(&sample).heading_deg;
        assert!(approx(heading, 270.0));

        let sample = OrientationSample {
            mag: Vec3::new(20.0, 20.0, 0.0),
            ..Default::default()
        };
        let heading = MotionReadings::from_sample(&sample).heading_deg;
        assert!(approx(heading, 45.0));
    }

    #[test]
    fn intensity_is_gyro_magnitude() {
        let sample = OrientationSample {
            gyro: Vec3::new(150.0, 200.0, 0.0),
            ..Default::default()
        };
        let intensity = MotionReadings::from_sample(&sample).intensity_dps;
        assert!(approx(intensity, 250.0));
    }

    #[test]
    fn nan_input_propagates_without_panicking() {
        let sample = OrientationSample {
            accel: Vec3::new(f32::NAN, 0.0, 1.0),
            gyro: Vec3::new(f32::NAN, 0.0, 0.0),
            ..Default::default()
        };
        let readings = MotionReadings::from_sample(&sample);
        assert!(readings.tilt_deg.is_nan());
        assert!(readings.intensity_dps.is_nan());
    }

    #[test]
    fn from_raw_level_device_facing_north() {
        let sample = OrientationSample::from_raw(
            10,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::default(),
            Vec3::new(30.0, 0.0, -40.0),
        );
        assert!(approx(sample.roll, 0.0));
        assert!(approx(sample.pitch, 0.0));
        assert!(approx(sample.yaw, 0.0));
        assert_eq!(sample.timestamp_ms, 10);
    }

    #[test]
    fn from_raw_yaw_in_range() {
        let sample = OrientationSample::from_raw(
            0,
            Vec3::new(0.2, -0.3, 0.9),
            Vec3::default(),
            Vec3::new(-12.0, -25.0, 8.0),
        );
        assert!((0.0..360.0).contains(&sample.yaw), "yaw {}", sample.yaw);
    }
}
