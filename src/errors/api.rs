use poem_openapi::{payload::Json, ApiResponse, Object};

use crate::errors::InternalError;

/// Error body sharing the shape of the success envelope, so clients can
/// branch solely on `succes`.
#[derive(Object, Debug)]
pub struct CorpsErreur {
    pub succes: bool,
    pub message: String,
    pub erreurs: Option<Vec<String>>,
}

impl CorpsErreur {
    fn nouveau(message: impl Into<String>, erreurs: Option<Vec<String>>) -> Json<Self> {
        Json(Self {
            succes: false,
            message: message.into(),
            erreurs,
        })
    }
}

/// API error responses, one variant per HTTP status in the taxonomy.
///
/// Duplicate-key conflicts are reported as 400 with a specific message,
/// matching the existing client contract.
#[derive(ApiResponse, Debug)]
pub enum ErreurApi {
    /// Bad input or failed validation
    #[oai(status = 400)]
    Validation(Json<CorpsErreur>),

    /// Missing or invalid credentials, token or session
    #[oai(status = 401)]
    NonAuthentifie(Json<CorpsErreur>),

    /// Valid identity, insufficient permission
    #[oai(status = 403)]
    AccesRefuse(Json<CorpsErreur>),

    #[oai(status = 404)]
    Introuvable(Json<CorpsErreur>),

    /// Unexpected failure; detail is logged server-side only
    #[oai(status = 500)]
    Interne(Json<CorpsErreur>),
}

impl ErreurApi {
    pub fn validation(message: impl Into<String>) -> Self {
        ErreurApi::Validation(CorpsErreur::nouveau(message, None))
    }

    pub fn validation_detaillee(message: impl Into<String>, erreurs: Vec<String>) -> Self {
        ErreurApi::Validation(CorpsErreur::nouveau(message, Some(erreurs)))
    }

    pub fn non_authentifie(message: impl Into<String>) -> Self {
        ErreurApi::NonAuthentifie(CorpsErreur::nouveau(message, None))
    }

    pub fn acces_refuse(message: impl Into<String>) -> Self {
        ErreurApi::AccesRefuse(CorpsErreur::nouveau(message, None))
    }

    pub fn introuvable(message: impl Into<String>) -> Self {
        ErreurApi::Introuvable(CorpsErreur::nouveau(message, None))
    }

    pub fn interne(message: impl Into<String>) -> Self {
        ErreurApi::Interne(CorpsErreur::nouveau(message, None))
    }
}

impl From<InternalError> for ErreurApi {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::TokenExpire => ErreurApi::non_authentifie("Token expiré"),
            InternalError::TokenInvalide => ErreurApi::non_authentifie("Token invalide"),
            InternalError::Introuvable(message) => ErreurApi::introuvable(message),
            InternalError::Conflit(message) => ErreurApi::validation(message),
            autre => {
                tracing::error!(erreur = %autre, "erreur interne");
                ErreurApi::interne("Erreur interne du serveur")
            }
        }
    }
}
