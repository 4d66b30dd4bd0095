// Math utilities and helper functions

/// Check whether `value` has moved strictly more than `threshold` away from `origin`
pub fn drifted(value: f32, origin: f32, threshold: f32) -> bool {
    (value - origin).abs() > threshold
}

/// Scale nominal grid dimensions into display dimensions.
///
/// When `rotated` is set the width and height are swapped before scaling.
pub fn oriented_dims(width: f32, height: f32, rotated: bool, scale: f32) -> (f32, f32) {
    if rotated {
        (height * scale, width * scale)
    } else {
        (width * scale, height * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drifted() {
        assert!(!drifted(10.0, 0.0, 10.0));
        assert!(drifted(10.5, 0.0, 10.0));
        assert!(drifted(-10.5, 0.0, 10.0));
        assert!(!drifted(5.0, 5.0, 0.0));
    }

    #[test]
    fn test_oriented_dims() {
        assert_eq!(oriented_dims(2.0, 1.0, false, 25.0), (50.0, 25.0));
        assert_eq!(oriented_dims(2.0, 1.0, true, 25.0), (25.0, 50.0));
    }
}
