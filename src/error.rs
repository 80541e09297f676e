use mongodb::error::Error as DbError;
use rocket::{
    http::{Status, StatusClass},
    response::Responder,
};
use thiserror::Error;

use crate::model::common::{status::InvalidStatus, ChoiceId, ImageId, QuestionId, UserId};

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while handling a request.
///
/// `NotFound`-style variants and the two `Invalid*` variants are caller
/// errors; `Db` means the storage layer failed and the enclosing
/// transaction (if any) was rolled back.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("Bad request: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    InvalidEnum(#[from] InvalidStatus),
    #[error("No user with ID {0}")]
    UserNotFound(UserId),
    #[error("No image with ID {0}")]
    ImageNotFound(ImageId),
    #[error("No question with ID {0}")]
    QuestionNotFound(QuestionId),
    #[error("No choice with ID {0}")]
    ChoiceNotFound(ChoiceId),
    #[error("No main image configured")]
    MainImageNotFound,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The HTTP status this error translates to.
    pub fn status(&self) -> Status {
        match self {
            Self::Db(_) | Self::Internal(_) => Status::InternalServerError,
            Self::InvalidInput(_) | Self::InvalidEnum(_) => Status::BadRequest,
            Self::UserNotFound(_)
            | Self::ImageNotFound(_)
            | Self::QuestionNotFound(_)
            | Self::ChoiceNotFound(_)
            | Self::MainImageNotFound => Status::NotFound,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        if status.class() == StatusClass::ServerError {
            error!("{self}");
        } else {
            warn!("{self}");
        }
        Err(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_map_to_client_statuses() {
        assert_eq!(
            Error::InvalidInput("nope".to_string()).status(),
            Status::BadRequest
        );
        assert_eq!(Error::UserNotFound(42).status(), Status::NotFound);
        assert_eq!(Error::ChoiceNotFound(7).status(), Status::NotFound);
        assert_eq!(Error::QuestionNotFound(7).status(), Status::NotFound);
        assert_eq!(Error::ImageNotFound(7).status(), Status::NotFound);
    }

    #[test]
    fn storage_errors_are_server_errors() {
        assert_eq!(
            Error::Internal("counter missing".to_string()).status(),
            Status::InternalServerError
        );
    }
}
