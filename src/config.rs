//! Analysis descriptor versioning and `Radii` presets (§6 "Analysis
//! descriptors", "Version mismatch is a hard error").

use crate::distance::Radii;
use crate::error::{Error, ErrorKind};

/// Current descriptor version every kernel call must be built against.
/// Bumped whenever a breaking change is made to a descriptor's field
/// layout or semantics.
pub const ANALYSIS_SPEC_VERSION: u32 = 1;

pub fn check_version(version: u32) -> Result<(), Error> {
    if version != ANALYSIS_SPEC_VERSION {
        return Err(Error::new(
            ErrorKind::VersionMismatch,
            format!("descriptor version {version} does not match core version {ANALYSIS_SPEC_VERSION}"),
        ));
    }
    Ok(())
}

pub fn check_output_len(actual: usize, expected: usize) -> Result<(), Error> {
    if actual != expected {
        return Err(Error::new(
            ErrorKind::SizeMismatch,
            format!("output array has length {actual}, expected {expected}"),
        ));
    }
    Ok(())
}

impl Radii {
    /// No radius caps active (the default produced by `Default`/`unbounded`,
    /// named here to mirror `GraphSpecs::directed()`-style preset
    /// constructors).
    pub fn preset_unbounded() -> Radii {
        Radii::unbounded()
    }

    /// Only the straight-line cap active, as used by the reach/
    /// attraction-distance brute-force fast paths.
    pub fn preset_straight(radius: f64) -> Radii {
        Radii::straight(radius)
    }

    /// Walking-distance cap only, the common "metric radius" analysis mode.
    pub fn preset_walking(radius: f64) -> Radii {
        Radii {
            walking: Some(radius),
            ..Radii::default()
        }
    }

    /// Turn-count cap only, the common "topological radius" analysis mode.
    pub fn preset_steps(max_turns: u32) -> Radii {
        Radii {
            steps: Some(max_turns),
            ..Radii::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_mismatch_is_an_error() {
        assert!(check_version(ANALYSIS_SPEC_VERSION).is_ok());
        let err = check_version(ANALYSIS_SPEC_VERSION + 1).unwrap_err();
        assert_eq!(err.kind, ErrorKind::VersionMismatch);
    }

    #[test]
    fn output_len_mismatch_is_an_error() {
        assert!(check_output_len(3, 3).is_ok());
        let err = check_output_len(2, 3).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SizeMismatch);
    }

    #[test]
    fn presets_set_expected_fields() {
        assert_eq!(Radii::preset_straight(10.0).straight, Some(10.0));
        assert_eq!(Radii::preset_walking(5.0).walking, Some(5.0));
        assert_eq!(Radii::preset_steps(3).steps, Some(3));
    }
}
