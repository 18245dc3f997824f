//! Network link trait

/// Station-mode network link
///
/// Joining is started by the board at boot and retried by its own link
/// task. The core only samples whether the link is currently joined.
pub trait NetworkLink {
    /// Check if the station is joined to the configured network
    fn is_joined(&self) -> bool;
}

impl NetworkLink for bool {
    fn is_joined(&self) -> bool {
        *self
    }
}
