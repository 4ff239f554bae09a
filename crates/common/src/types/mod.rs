use serde::Serialize;

/// Liveness payload returned by `/health`.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// `{"message": ...}` body shared by every failed API call and by plain
/// confirmations such as a delete.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
