use crate::models::Actor;

/// Decides whether an actor may create, edit or delete help content.
///
/// Pages only use this to decide whether to show the edit affordance; the
/// editor endpoints use it to reject writes.
pub trait EditorPolicy: Send + Sync {
    fn may_edit(&self, actor: &Actor) -> bool;
}

impl<F> EditorPolicy for F
where
    F: Fn(&Actor) -> bool + Send + Sync,
{
    fn may_edit(&self, actor: &Actor) -> bool {
        self(actor)
    }
}
