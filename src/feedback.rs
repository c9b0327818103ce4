/// Fire-and-forget notifications for keystroke outcomes, e.g. sounds.
/// Implementations must not fail; anything that can go wrong is swallowed
/// (and logged) on their side.
pub trait Feedback {
    fn correct(&mut self);
    fn incorrect(&mut self);
    fn complete(&mut self);
}

/// Feedback that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn correct(&mut self) {}
    fn incorrect(&mut self) {}
    fn complete(&mut self) {}
}
