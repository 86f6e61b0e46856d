/// Checks that a numerical value is in the provided interval `[a,b]` and returns
/// early with [`Error::InvalidParameter`](crate::error::Error::InvalidParameter) if not
///
/// ### Example
/// ```ignore
/// let alpha = 2.0;
/// ensure_interval!(alpha, 0.0, 1.0);
/// ```
/// This returns an error displayed as "Invalid value for \`alpha\`: 2. Must be in the interval \[0, 1\]."
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::Error::InvalidParameter {
                name: stringify!($var),
                value: f64::from($var),
                min: f64::from($a),
                max: f64::from($b),
            });
        }
    };
}

pub(crate) use ensure_interval;
