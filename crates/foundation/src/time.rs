/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn from_millis(ms: f64) -> Self {
        Time(ms / 1000.0)
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn millis_round_trip() {
        assert_eq!(Time::from_millis(1500.0), Time(1.5));
        assert_eq!(Time(0.25).as_millis(), 250.0);
    }
}
