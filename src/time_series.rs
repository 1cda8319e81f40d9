/// A point on the live speed chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WpmSample {
    /// Seconds since the session started.
    pub t: f64,
    pub wpm: f64,
    pub raw_wpm: f64,
}

impl WpmSample {
    pub fn new(t: f64, wpm: f64, raw_wpm: f64) -> Self {
        Self { t, wpm, raw_wpm }
    }

    pub fn wpm_point(&self) -> (f64, f64) {
        (self.t, self.wpm)
    }

    pub fn raw_point(&self) -> (f64, f64) {
        (self.t, self.raw_wpm)
    }
}

impl From<(f64, f64, f64)> for WpmSample {
    fn from(v: (f64, f64, f64)) -> Self {
        WpmSample::new(v.0, v.1, v.2)
    }
}
