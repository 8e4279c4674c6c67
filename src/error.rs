use thiserror::Error;

/// Failure taxonomy for user-triggered flows. Transport-level failures on the
/// background channels never reach the UI; they are logged and retried on the
/// normal schedule.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Player has no nickname on record — show onboarding, not an error toast.
    #[error("требуется авторизация")]
    AuthRequired,

    /// Fetch/push failure — keep last-good state, rely on the next tick.
    #[error("сетевая ошибка: {0}")]
    Transient(anyhow::Error),

    /// Client-side validation, no request was sent.
    #[error("{0}")]
    Validation(String),

    /// Server answered `success: false`.
    #[error("{0}")]
    Rejected(String),
}

impl ClientError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
