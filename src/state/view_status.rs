// ============================================================================
// VIEW STATUS - Estado explícito de cada operación asíncrona de una vista
// ============================================================================

/// Idle → Loading → Ready | Error
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

impl ViewStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}
