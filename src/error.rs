use thiserror::Error;

/// Top-level error type for the targeting engine.
#[derive(Debug, Error)]
pub enum CrosshairError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The fit points are collinear or coincident, so the least-variance
    /// direction is not unique.
    #[error(
        "degenerate plane fit: smallest singular values {smallest} and {second_smallest} are indistinguishable"
    )]
    DegeneratePlaneFit {
        smallest: f64,
        second_smallest: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised by the plane registry and point bookkeeping.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no plane named {0:?}")]
    PlaneNotFound(String),

    #[error("unknown vertex role {0:?}")]
    UnknownVertexRole(String),

    #[error("no vertex selected")]
    NoVertexSelected,

    /// A block vertex was placed off the block plane.
    #[error("vertex lies {distance} from the block plane (threshold {threshold})")]
    VertexConstraintViolation { distance: f64, threshold: f64 },
}

/// Errors related to engine operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation not permitted: {0}")]
    NotPermitted(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`CrosshairError`].
pub type Result<T, E = CrosshairError> = std::result::Result<T, E>;
