use crate::domain::model::{Thresholds, TrafficLight};

/// Map a misleading score onto a traffic light.
///
/// `0..=green_max` is green, `green_max+1..=yellow_max` is yellow, anything above is red.
/// The caller guarantees `green_max < yellow_max`; configuration validation enforces it
/// before any article reaches this point.
pub fn classify(score: u8, green_max: u8, yellow_max: u8) -> TrafficLight {
    if score <= green_max {
        TrafficLight::Green
    } else if score <= yellow_max {
        TrafficLight::Yellow
    } else {
        TrafficLight::Red
    }
}

impl Thresholds {
    pub fn classify(&self, score: u8) -> TrafficLight {
        classify(score, self.green_max, self.yellow_max)
    }
}
