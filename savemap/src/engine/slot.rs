//! The single "current save" held by the engine.

use parking_lot::Mutex;

use super::traits::ParsingEngine;

/// Holds the handle of the most recently parsed save.
///
/// Installing a new handle releases the previous one so at most one parsed
/// save stays resident in the engine.
pub struct SaveSlot<H> {
    current: Mutex<Option<H>>,
}

impl<H: Clone> SaveSlot<H> {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// Replace the current handle, releasing the previous one through `engine`.
    pub async fn install<E>(&self, engine: &E, handle: H)
    where
        E: ParsingEngine<Handle = H>,
    {
        let previous = self.current.lock().replace(handle);
        if let Some(previous) = previous {
            engine.release(previous).await;
        }
    }

    /// Clone of the current handle, if any.
    pub fn current(&self) -> Option<H> {
        self.current.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.current.lock().is_none()
    }
}

impl<H: Clone> Default for SaveSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}
