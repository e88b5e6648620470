//! A constant-velocity Kalman filter over a 4-D state `(lat, lon, v_lat,
//! v_lon)` with a 2-D position-only observation.

use nalgebra::{Matrix2, Matrix2x4, Matrix4, Matrix4x2, Vector2, Vector4};

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    state: Vector4<f64>,
    covariance: Matrix4<f64>,
    transition: Matrix4<f64>,
    observation: Matrix2x4<f64>,
    process_noise: Matrix4<f64>,
    measurement_noise: Matrix2<f64>,
}

impl KalmanFilter {
    /// Initial state sets velocity to zero and position to the first
    /// observation.
    pub fn new(initial_lat: f64, initial_lon: f64, process_noise_scale: f64, measurement_noise_scale: f64) -> Self {
        #[rustfmt::skip]
        let transition = Matrix4::new(
            1.0, 0.0, 1.0, 0.0,
            0.0, 1.0, 0.0, 1.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        #[rustfmt::skip]
        let observation = Matrix2x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
        );

        Self {
            state: Vector4::new(initial_lat, initial_lon, 0.0, 0.0),
            covariance: Matrix4::identity(),
            transition,
            observation,
            process_noise: Matrix4::identity() * process_noise_scale,
            measurement_noise: Matrix2::identity() * measurement_noise_scale,
        }
    }

    /// Advances the state estimate one step with no measurement.
    pub fn predict(&mut self) {
        self.state = self.transition * self.state;
        self.covariance = self.transition * self.covariance * self.transition.transpose() + self.process_noise;
    }

    /// Corrects the state estimate with an observed `(lat, lon)`.
    pub fn update(&mut self, observation: (f64, f64)) {
        let z = Vector2::new(observation.0, observation.1);
        let innovation = z - self.observation * self.state;
        let innovation_covariance = self.observation * self.covariance * self.observation.transpose() + self.measurement_noise;

        let gain: Matrix4x2<f64> = self.covariance
            * self.observation.transpose()
            * innovation_covariance
                .try_inverse()
                .unwrap_or_else(Matrix2::identity);

        self.state += gain * innovation;
        self.covariance = (Matrix4::identity() - gain * self.observation) * self.covariance;
    }

    pub fn position(&self) -> (f64, f64) {
        (self.state[0], self.state[1])
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.state[2], self.state[3])
    }

    /// Advances a throwaway copy of the state `steps` times, without
    /// touching `self` or its covariance. Used for prediction.
    pub fn extrapolate(&self, steps: u32) -> Vec<(f64, f64, f64, f64)> {
        let mut state = self.state;
        let mut out = Vec::with_capacity(steps as usize);
        for _ in 0..steps {
            state = self.transition * state;
            out.push((state[0], state[1], state[2], state[3]));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_advances_position_by_velocity() {
        let mut kf = KalmanFilter::new(15.0, 80.0, 0.03, 1.0);
        kf.update((15.1, 80.1));
        kf.predict();
        let (lat, lon) = kf.position();
        assert!(lat > 15.0);
        assert!(lon > 80.0);
    }

    #[test]
    fn update_pulls_state_toward_observation() {
        let mut kf = KalmanFilter::new(15.0, 80.0, 0.03, 1.0);
        kf.update((15.1, 80.1));
        let (lat, lon) = kf.position();
        assert!((lat - 15.1).abs() < 0.2);
        assert!((lon - 80.1).abs() < 0.2);
    }

    #[test]
    fn extrapolate_does_not_mutate_state() {
        let mut kf = KalmanFilter::new(15.0, 80.0, 0.03, 1.0);
        kf.update((15.1, 80.1));
        kf.predict();
        let before = kf.position();
        let _ = kf.extrapolate(3);
        assert_eq!(kf.position(), before);
    }
}
