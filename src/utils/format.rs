// src/utils/format.rs

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Render a number the way the dashboard's JSON clients print it:
/// integral values carry no trailing `.0`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub fn format_storage(gigabytes: f64) -> String {
    if gigabytes >= 1000.0 {
        format!("{:.2} TB", gigabytes / 1000.0)
    } else {
        format!("{:.1} GB", gigabytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(99.98765, 2), 99.99);
        assert_eq!(round_to(12.04, 1), 12.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(50000.0), "50000");
        assert_eq!(format_number(125.5), "125.5");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn test_format_storage() {
        assert_eq!(format_storage(800.0), "800.0 GB");
        assert_eq!(format_storage(2500.0), "2.50 TB");
    }
}
