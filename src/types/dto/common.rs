use poem_openapi::payload::Json;
use poem_openapi::types::{ParseFromJSON, ToJSON};
use poem_openapi::Object;

/// Uniform response envelope. Clients branch solely on `succes`.
#[derive(Object, Debug)]
pub struct Enveloppe<T: ParseFromJSON + ToJSON> {
    pub succes: bool,
    pub message: String,
    pub data: Option<T>,
    pub erreurs: Option<Vec<String>>,
}

impl<T: ParseFromJSON + ToJSON> Enveloppe<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            succes: true,
            message: message.into(),
            data: Some(data),
            erreurs: None,
        })
    }
}

/// Envelope for operations that return no payload.
#[derive(Object, Debug)]
pub struct EnveloppeVide {
    pub succes: bool,
    pub message: String,
}

impl EnveloppeVide {
    pub fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            succes: true,
            message: message.into(),
        })
    }
}

#[derive(Object, Debug, Clone)]
pub struct PaginationDto {
    pub page: u64,
    pub limite: u64,
    pub total: u64,
    #[oai(rename = "totalPages")]
    pub total_pages: u64,
}
