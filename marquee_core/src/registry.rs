// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry of live player handles.
//!
//! Each card owns at most one player handle. Every write path disposes the
//! previous handle for the key before storing the new one, and every stored
//! handle is stamped with an [`AttemptId`] whose generation is unique per
//! card for the lifetime of the registry. Callbacks carry the attempt they
//! were created for, so a signal from a disposed player is recognised as
//! stale by comparing attempts rather than by probing the DOM.
//!
//! A slot may also own a timer (the readiness check). Timers cancel on drop,
//! so releasing a slot cancels its pending check.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use serde::Serialize;

use crate::card::CardKey;
use crate::strategy::Readiness;

/// A live player owned by the registry.
pub trait PlayerHandle {
    /// Releases the decoder and media resources behind this handle.
    ///
    /// Called exactly once, before the handle is dropped.
    fn dispose(&mut self);

    /// Probes the player for the readiness check.
    fn readiness(&self) -> Readiness;
}

/// Identifies one playback attempt on one card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct AttemptId {
    /// Card the attempt belongs to.
    pub key: CardKey,
    /// Per-card attempt counter.
    pub generation: u32,
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.key, self.generation)
    }
}

#[derive(Debug)]
struct Slot<P, T> {
    attempt: AttemptId,
    handle: P,
    timer: Option<T>,
}

impl<P: PlayerHandle, T> Slot<P, T> {
    fn dispose(mut self) -> AttemptId {
        self.timer = None;
        self.handle.dispose();
        self.attempt
    }
}

/// Per-card owned player handles.
///
/// `P` is the backend's player handle, `T` its timer type.
#[derive(Debug)]
pub struct PlayerRegistry<P, T> {
    slots: BTreeMap<CardKey, Slot<P, T>>,
    generations: BTreeMap<CardKey, u32>,
}

impl<P: PlayerHandle, T> PlayerRegistry<P, T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
            generations: BTreeMap::new(),
        }
    }

    /// Allocates the attempt id for the next player on `key`.
    ///
    /// Generations are never reused, even after the card is released.
    pub fn next_attempt(&mut self, key: &CardKey) -> AttemptId {
        let counter = self.generations.entry(key.clone()).or_insert(0);
        *counter = counter.wrapping_add(1);
        AttemptId {
            key: key.clone(),
            generation: *counter,
        }
    }

    /// Disposes the handle stored for `attempt.key`, if any, then stores
    /// `handle` under `attempt`.
    ///
    /// Returns the attempt of the disposed handle.
    pub fn replace(&mut self, attempt: AttemptId, handle: P) -> Option<AttemptId> {
        let previous = self.release(&attempt.key);
        self.slots.insert(
            attempt.key.clone(),
            Slot {
                attempt,
                handle,
                timer: None,
            },
        );
        previous
    }

    /// Attaches `timer` to the live slot for `attempt`, cancelling any timer
    /// it already had.
    ///
    /// Returns `false` and drops (cancels) `timer` if `attempt` is not live.
    pub fn attach_timer(&mut self, attempt: &AttemptId, timer: T) -> bool {
        match self.slots.get_mut(&attempt.key) {
            Some(slot) if slot.attempt == *attempt => {
                slot.timer = Some(timer);
                true
            }
            _ => false,
        }
    }

    /// Drops the timer of the live slot for `attempt`.
    pub fn clear_timer(&mut self, attempt: &AttemptId) {
        if let Some(slot) = self.slots.get_mut(&attempt.key)
            && slot.attempt == *attempt
        {
            slot.timer = None;
        }
    }

    /// Disposes and removes the handle for `key`.
    pub fn release(&mut self, key: &CardKey) -> Option<AttemptId> {
        self.slots.remove(key).map(Slot::dispose)
    }

    /// Disposes and removes every handle, returning their attempts in key
    /// order.
    pub fn release_all(&mut self) -> Vec<AttemptId> {
        core::mem::take(&mut self.slots)
            .into_values()
            .map(Slot::dispose)
            .collect()
    }

    /// Returns `true` if `attempt` is the live attempt for its card.
    #[must_use]
    pub fn is_current(&self, attempt: &AttemptId) -> bool {
        self.slots
            .get(&attempt.key)
            .is_some_and(|slot| slot.attempt == *attempt)
    }

    /// Returns the handle of the live attempt, if `attempt` is live.
    #[must_use]
    pub fn get(&self, attempt: &AttemptId) -> Option<&P> {
        self.slots
            .get(&attempt.key)
            .filter(|slot| slot.attempt == *attempt)
            .map(|slot| &slot.handle)
    }

    /// Returns the live attempt for `key`.
    #[must_use]
    pub fn current(&self, key: &CardKey) -> Option<&AttemptId> {
        self.slots.get(key).map(|slot| &slot.attempt)
    }

    /// Number of live handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no handle is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<P: PlayerHandle, T> Default for PlayerRegistry<P, T> {
    fn default() -> Self {
        Self::new()
    }
}
