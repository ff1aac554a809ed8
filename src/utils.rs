//! Utility types and functions.

/// Tracks the value associated with the smallest key seen so far.
///
/// On equal keys, the value offered first is kept. Feeding candidates in input
/// order therefore makes input order the last tie-break.
///
/// ```
/// use sched_sim::utils::ArgMinTracker;
///
/// let mut t = ArgMinTracker::new();
/// assert_eq!(t.get(), None);
///
/// t.update(3, 'a');
/// t.update(1, 'b');
/// t.update(1, 'c');
///
/// assert_eq!(t.get(), Some(&'b'));
/// ```
pub struct ArgMinTracker<K, V> {
    best: Option<(K, V)>,
}

impl<K: Ord, V> ArgMinTracker<K, V> {
    pub fn new() -> Self {
        Self { best: None }
    }

    pub fn update(&mut self, key: K, value: V) {
        match &self.best {
            Some((best_key, _)) if best_key <= &key => {}
            _ => self.best = Some((key, value)),
        }
    }

    pub fn get(&self) -> Option<&V> {
        self.best.as_ref().map(|(_, v)| v)
    }

    pub fn into_inner(self) -> Option<V> {
        self.best.map(|(_, v)| v)
    }
}

impl<K: Ord, V> Default for ArgMinTracker<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for ArgMinTracker<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tracker = Self::new();

        for (k, v) in iter {
            tracker.update(k, v);
        }

        tracker
    }
}

/// Running arithmetic mean.
#[derive(Default)]
pub struct Mean {
    total: f64,
    count: usize,
}

impl Mean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    /// Returns `None` until at least one value has been recorded.
    pub fn get(&self) -> Option<f64> {
        match self.count {
            0 => None,
            n => Some(self.total / n as f64),
        }
    }
}

impl FromIterator<f64> for Mean {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut mean = Self::new();

        for v in iter {
            mean.update(v);
        }

        mean
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Formats `value` in general notation with `precision` significant digits.
///
/// Trailing zeros are dropped, and scientific notation is used when the
/// decimal exponent is lower than -4 or at least `precision`, as `printf`'s
/// `%.{precision}g` does.
///
/// ```
/// use sched_sim::utils::format_general;
///
/// assert_eq!(format_general(2.0 / 11.0, 15), "0.181818181818182");
/// assert_eq!(format_general(7.5, 15), "7.5");
/// assert_eq!(format_general(3.0, 15), "3");
/// assert_eq!(format_general(1.5e-7, 15), "1.5e-07");
/// ```
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }

    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    if value == 0.0 {
        return "0".to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);

    // Rust always emits an exponent, so the split cannot fail.
    let (mantissa, exp) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };

        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp) as usize;

        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}
