use mnk_core::state::GameState;

/// Observer notified after every state transition of a game.
pub trait View {
    fn update(&mut self, state: &GameState);
}
