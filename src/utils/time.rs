use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Whole seconds between two instants, floored. Negative spans clamp to 0.
pub fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> i32 {
    (to - from).num_seconds().max(0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn elapsed_floors_to_whole_seconds() {
        let start = Utc::now();
        let end = start + Duration::milliseconds(4999);
        assert_eq!(elapsed_seconds(start, end), 4);
    }

    #[test]
    fn elapsed_clamps_negative_spans() {
        let start = Utc::now();
        let end = start - Duration::seconds(10);
        assert_eq!(elapsed_seconds(start, end), 0);
    }
}
