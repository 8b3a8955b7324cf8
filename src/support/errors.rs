use thiserror::Error;

/// Coarse classification of a [`DomainError`], used at the HTTP boundary
/// and as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StorageUnavailable,
    QueryFailed,
    Validation,
    NotFound,
    Conflict,
    DataInconsistency,
    InconsistencyWarning,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StorageUnavailable => "storage_unavailable",
            Self::QueryFailed => "query_failed",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::DataInconsistency => "data_inconsistency",
            Self::InconsistencyWarning => "inconsistency_warning",
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Bike {0} is not available for rent")]
    BikeNotAvailable(i32),

    #[error("User {0} already holds a reservation")]
    UserAlreadyReserved(String),

    #[error("Bike {0} is not rented, nothing to delete")]
    BikeNotRented(i32),

    #[error("Data inconsistency: {0}")]
    DataInconsistency(String),

    /// The compensating delete after a failed bike update did not go through.
    /// Storage now violates the bike/reservation invariant for `bike_id`.
    #[error(
        "WARNING! Inconsistency for bike {bike_id}: could not remove the reservation \
         created for it ({cause}). Delete it manually"
    )]
    InconsistencyWarning { bike_id: i32, cause: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Query failed on {table} ({operation}): {message}")]
    QueryFailed {
        table: &'static str,
        operation: &'static str,
        message: String,
    },
}

impl DomainError {
    pub fn unknown_user(username: &str) -> Self {
        Self::NotFound {
            entity: "User",
            field: "username",
            value: username.to_string(),
        }
    }

    pub fn unknown_bike(bike_id: i32) -> Self {
        Self::NotFound {
            entity: "Bike",
            field: "bikeid",
            value: bike_id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::BikeNotAvailable(_) | Self::UserAlreadyReserved(_) | Self::BikeNotRented(_) => {
                ErrorKind::Conflict
            }
            Self::DataInconsistency(_) => ErrorKind::DataInconsistency,
            Self::InconsistencyWarning { .. } => ErrorKind::InconsistencyWarning,
            Self::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
            Self::QueryFailed { .. } => ErrorKind::QueryFailed,
        }
    }
}
