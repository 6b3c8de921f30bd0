//! Fixed-capacity slot pool; the slot index is the logical controller id

use wand_core::ControllerId;
use wand_hid::DeviceDescriptor;

use crate::handle::ControllerHandle;

/// Upper bound on simultaneously managed controllers
pub const MAX_CONTROLLERS: usize = 4;

/// Fixed array of controller slots.
///
/// A slot is `None` only transiently, while a reconciliation pass shuffles
/// handles between slots; between passes every slot holds a handle whose
/// logical id equals the slot index.
#[derive(Debug)]
pub struct SlotPool<D> {
    slots: Vec<Option<ControllerHandle<D>>>,
}

impl<D> SlotPool<D> {
    /// Pool with every slot holding a fresh closed handle
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|index| Some(ControllerHandle::new(ControllerId(index as u8))))
            .collect();
        Self { slots }
    }

    /// Pool of empty slots, the destination of a reconciliation pass
    pub(crate) fn vacant(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn handle(&self, index: usize) -> Option<&ControllerHandle<D>> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn handle_mut(&mut self, index: usize) -> Option<&mut ControllerHandle<D>> {
        self.slots.get_mut(index).and_then(|slot| slot.as_mut())
    }

    /// Slot index of the open handle bound to this descriptor's path
    pub fn find_open(&self, descriptor: &DeviceDescriptor) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|h| h.matches(descriptor)))
    }

    /// First slot holding a closed handle; closed handles are fungible,
    /// any one may host a newly seen device
    pub fn first_closed(&self) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|h| !h.is_open()))
    }

    /// Take the handle out of a slot, leaving the slot empty
    pub(crate) fn take(&mut self, index: usize) -> Option<ControllerHandle<D>> {
        self.slots.get_mut(index).and_then(|slot| slot.take())
    }

    /// Put a handle into a slot, rewriting its logical id to the slot
    /// index in the same operation
    pub(crate) fn place(&mut self, index: usize, mut handle: ControllerHandle<D>) {
        handle.set_id(ControllerId(index as u8));
        self.slots[index] = Some(handle);
    }

    pub fn open_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.as_ref().is_some_and(|h| h.is_open()))
            .count()
    }
}
