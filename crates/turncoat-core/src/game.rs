/// Descriptive metadata for one phase mini-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiniGameMetadata {
    pub name: &'static str,
    pub min_players: u8,
    pub max_players: u8,
}

/// Common surface the session controller uses to sequence phase
/// mini-games. Each phase is driven by its own concrete API; this trait
/// only covers what the orchestration layer needs: identification and
/// completion.
pub trait MiniGame {
    fn metadata(&self) -> MiniGameMetadata;

    /// Whether the phase has run to its natural end and the session may
    /// advance.
    fn is_complete(&self) -> bool;
}
