//! Error types for the Ripple core library.
//!
//! Every failure the core can report is a configuration or construction
//! problem caught before a run starts. Generator degeneracy (isolated or
//! unreachable nodes) is a documented structural outcome, not an error.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced when configuring a simulation or building a graph.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RippleError {
    /// A graph must contain at least one node.
    #[error("node count must be at least 1 (got {got})")]
    InvalidNodeCount {
        /// The invalid node count supplied by the caller.
        got: usize,
    },
    /// Nodes must be allowed at least one neighbour.
    #[error("max_degree must be at least 1 (got {got})")]
    InvalidMaxDegree {
        /// The invalid degree cap supplied by the caller.
        got: usize,
    },
    /// Playback speed must be a positive number of steps per second.
    #[error("speed must be at least 1 step per second (got {got})")]
    InvalidSpeed {
        /// The invalid speed supplied by the caller.
        got: u32,
    },
    /// Layout gravity must be a finite number.
    #[error("gravity must be finite (got {got})")]
    InvalidGravity {
        /// The invalid gravity supplied by the caller.
        got: f64,
    },
    /// A hand-built link referenced a node outside the graph or joined a node
    /// to itself.
    #[error("link ({source_id}, {target_id}) is invalid for a graph of {nodes} nodes")]
    InvalidLink {
        /// Source endpoint as supplied.
        source_id: usize,
        /// Target endpoint as supplied.
        target_id: usize,
        /// Number of nodes in the graph under construction.
        nodes: usize,
    },
    /// A hand-built link joined a pair of nodes that were already linked.
    #[error("link ({source_id}, {target_id}) was supplied more than once")]
    DuplicateLink {
        /// Source endpoint as supplied.
        source_id: usize,
        /// Target endpoint as supplied.
        target_id: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`RippleError`] variants.
    enum RippleErrorCode for RippleError {
        /// A graph must contain at least one node.
        InvalidNodeCount => InvalidNodeCount { .. } => "RIPPLE_INVALID_NODE_COUNT",
        /// Nodes must be allowed at least one neighbour.
        InvalidMaxDegree => InvalidMaxDegree { .. } => "RIPPLE_INVALID_MAX_DEGREE",
        /// Playback speed must be positive.
        InvalidSpeed => InvalidSpeed { .. } => "RIPPLE_INVALID_SPEED",
        /// Layout gravity must be finite.
        InvalidGravity => InvalidGravity { .. } => "RIPPLE_INVALID_GRAVITY",
        /// A hand-built link was out of range or a self-loop.
        InvalidLink => InvalidLink { .. } => "RIPPLE_INVALID_LINK",
        /// A hand-built link was supplied twice.
        DuplicateLink => DuplicateLink { .. } => "RIPPLE_DUPLICATE_LINK",
    }
}

impl RippleError {
    /// Returns `true` when the error describes rejected run configuration
    /// rather than a malformed hand-built graph.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidNodeCount { .. }
                | Self::InvalidMaxDegree { .. }
                | Self::InvalidSpeed { .. }
                | Self::InvalidGravity { .. }
        )
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, RippleError>;
