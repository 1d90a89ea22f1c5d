use ripple_core::{RippleError, RippleErrorCode};
use rstest::rstest;

#[rstest]
#[case(
    RippleError::InvalidNodeCount { got: 0 },
    RippleErrorCode::InvalidNodeCount,
    "RIPPLE_INVALID_NODE_COUNT",
    true,
)]
#[case(
    RippleError::InvalidMaxDegree { got: 0 },
    RippleErrorCode::InvalidMaxDegree,
    "RIPPLE_INVALID_MAX_DEGREE",
    true,
)]
#[case(
    RippleError::InvalidSpeed { got: 0 },
    RippleErrorCode::InvalidSpeed,
    "RIPPLE_INVALID_SPEED",
    true,
)]
#[case(
    RippleError::InvalidGravity { got: f64::INFINITY },
    RippleErrorCode::InvalidGravity,
    "RIPPLE_INVALID_GRAVITY",
    true,
)]
#[case(
    RippleError::InvalidLink { source_id: 2, target_id: 2, nodes: 3 },
    RippleErrorCode::InvalidLink,
    "RIPPLE_INVALID_LINK",
    false,
)]
#[case(
    RippleError::DuplicateLink { source_id: 0, target_id: 1 },
    RippleErrorCode::DuplicateLink,
    "RIPPLE_DUPLICATE_LINK",
    false,
)]
fn returns_expected_code(
    #[case] error: RippleError,
    #[case] expected: RippleErrorCode,
    #[case] code: &str,
    #[case] configuration: bool,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), code);
    assert_eq!(error.is_configuration(), configuration);
}

#[rstest]
#[case(RippleError::InvalidNodeCount { got: 0 }, "node count must be at least 1 (got 0)")]
#[case(RippleError::InvalidSpeed { got: 0 }, "speed must be at least 1 step per second (got 0)")]
#[case(
    RippleError::InvalidLink { source_id: 0, target_id: 9, nodes: 4 },
    "link (0, 9) is invalid for a graph of 4 nodes",
)]
fn messages_name_the_offending_value(#[case] error: RippleError, #[case] message: &str) {
    assert_eq!(error.to_string(), message);
}
