use std::any::Any;

pub mod world;

pub trait Event: Any + Send + Sync {
    fn get_name_static() -> &'static str
    where
        Self: Sized;
    fn get_name(&self) -> &'static str;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn as_any(&self) -> &dyn Any;
}

pub trait Cancellable: Event {
    fn cancelled(&self) -> bool;
    fn set_cancelled(&mut self, cancelled: bool);
}

// Lowest priority handlers run first
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Debug)]
pub enum EventPriority {
    Lowest,
    Low,
    Normal,
    High,
    Highest,
}
