//! Class and singleton factories bound to a context.
//!
//! Both kinds are obtained from a [`FactoryRegistry`](crate::FactoryRegistry)
//! in two steps: first for a base [`Constructor`](crate::Constructor), then
//! bound to a [`Context`](crate::Context).

mod class;
mod singleton;

pub use class::{ClassFactory, UnboundClassFactory};
pub use singleton::{SingletonFactory, UnboundSingletonFactory};
