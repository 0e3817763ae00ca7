use crate::graph::{node::Effect, through::Chain};

/// Fluent composition for any effect.
pub trait EffectExt: Effect + Sized {
    /// Run `next` on this effect's output.
    fn chain<E: Effect>(self, next: E) -> Chain<Self, E> {
        Chain::new(self, next)
    }

    /// Box behind the object-safe host interface.
    fn boxed(self) -> Box<dyn crate::graph::node::HostEffect>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: Effect> EffectExt for T {}
