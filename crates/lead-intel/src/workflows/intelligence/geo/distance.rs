use super::super::domain::{Availability, Coordinates};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_TRAFFIC_FACTOR: f64 = 1.2;
const BASE_SPEED_KMH: f64 = 50.0;

const AVAILABLE_WITHIN_KM: f64 = 30.0;
const LIMITED_WITHIN_KM: f64 = 60.0;

/// Great-circle distance in kilometres (Haversine).
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Drive time in whole minutes at a 50 km/h base speed slowed by `traffic_factor`.
pub fn travel_time_minutes(distance_km: f64, traffic_factor: f64) -> u32 {
    let adjusted_speed = BASE_SPEED_KMH / traffic_factor;
    (distance_km / adjusted_speed * 60.0).round().max(0.0) as u32
}

pub fn availability_for(distance_km: f64) -> Availability {
    if distance_km < AVAILABLE_WITHIN_KM {
        Availability::Available
    } else if distance_km < LIMITED_WITHIN_KM {
        Availability::Limited
    } else {
        Availability::Unavailable
    }
}

/// Coverage decays two points per kilometre and floors at zero.
pub fn coverage_score(distance_km: f64) -> f64 {
    (100.0 - distance_km * 2.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OSLO: Coordinates = Coordinates::new(59.9139, 10.7522);
    const BERGEN: Coordinates = Coordinates::new(60.3913, 5.3221);

    #[test]
    fn oslo_to_bergen_is_roughly_three_hundred_km() {
        let distance = distance_km(OSLO, BERGEN);
        assert!(
            (290.0..=320.0).contains(&distance),
            "unexpected distance {distance}"
        );
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_same_point() {
        assert_eq!(distance_km(OSLO, OSLO), 0.0);
        assert_eq!(distance_km(OSLO, BERGEN), distance_km(BERGEN, OSLO));
    }

    #[test]
    fn availability_boundaries() {
        assert_eq!(availability_for(29.9), Availability::Available);
        assert_eq!(availability_for(30.0), Availability::Limited);
        assert_eq!(availability_for(30.1), Availability::Limited);
        assert_eq!(availability_for(60.0), Availability::Unavailable);
        assert_eq!(availability_for(60.1), Availability::Unavailable);
    }

    #[test]
    fn travel_time_uses_traffic_adjusted_speed() {
        // 50 km/h / 1.2 => 41.67 km/h, 25 km => 36 minutes
        assert_eq!(travel_time_minutes(25.0, DEFAULT_TRAFFIC_FACTOR), 36);
        assert_eq!(travel_time_minutes(50.0, 1.0), 60);
        assert_eq!(travel_time_minutes(0.0, DEFAULT_TRAFFIC_FACTOR), 0);
    }

    #[test]
    fn coverage_score_floors_at_zero() {
        assert_eq!(coverage_score(0.0), 100.0);
        assert_eq!(coverage_score(10.0), 80.0);
        assert_eq!(coverage_score(55.0), 0.0);
    }
}
