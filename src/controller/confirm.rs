/// Synchronous yes/no question asked before destructive actions.
///
/// Returning `false` must leave everything untouched.
pub trait Confirmation {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// An answer decided ahead of time, e.g. by a dialog that already closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer(pub bool);

impl Confirmation for Answer {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}
