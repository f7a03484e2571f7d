//! Kernel stack slots
//!
//! Each process slot owns one mapped page at [`kstack`] and is bounded by
//! pages that must never be mapped. The slots tile downwards from the
//! trampoline, so the upper guard of slot `p + 1` is the lower guard of
//! slot `p`.

use core::ops::Range;

use log::trace;

use crate::consts::memlayout::{kstack, TRAPFRAME};
use crate::consts::{NPROC, PAGE_SIZE};
use crate::error::{LayoutError, LayoutResult};
use crate::memory::address::VirtAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelStackSlot {
    index: usize,
}

impl KernelStackSlot {
    /// Slot `index` without validation. The returned addresses are garbage
    /// for `index >= NPROC`.
    pub const fn new(index: usize) -> Self {
        Self { index }
    }

    /// What a process allocator calls before handing out the slot
    pub fn checked(index: usize) -> LayoutResult<Self> {
        if index >= NPROC {
            trace!("kernel stack slot {} rejected", index);
            return Err(LayoutError::ProcessIndexOutOfRange {
                index,
                limit: NPROC,
            });
        }
        Ok(Self::new(index))
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn base(&self) -> VirtAddr {
        VirtAddr::new(kstack(self.index))
    }

    /// Initial stack pointer, the stack grows down from here
    pub const fn top(&self) -> VirtAddr {
        VirtAddr::new(kstack(self.index) + PAGE_SIZE)
    }

    /// The one page to map
    pub const fn stack(&self) -> Range<VirtAddr> {
        self.base()..self.top()
    }

    pub const fn guard_below(&self) -> Range<VirtAddr> {
        let base = kstack(self.index);
        VirtAddr::new(base - PAGE_SIZE)..VirtAddr::new(base)
    }

    /// For slot 0 this is the TRAPFRAME address, which is not mapped in the
    /// kernel page table.
    pub const fn guard_above(&self) -> Range<VirtAddr> {
        let top = kstack(self.index) + PAGE_SIZE;
        VirtAddr::new(top)..VirtAddr::new(top + PAGE_SIZE)
    }

    pub fn contains(&self, va: VirtAddr) -> bool {
        self.stack().contains(&va)
    }

    /// Whether a faulting address lies in one of this slot's guard pages
    pub fn is_guard_hit(&self, va: VirtAddr) -> bool {
        self.guard_below().contains(&va) || self.guard_above().contains(&va)
    }
}

/// Every slot, highest first, for mapping all kernel stacks at boot
pub fn kstack_slots() -> impl Iterator<Item = KernelStackSlot> {
    (0..NPROC).map(KernelStackSlot::new)
}

/// Which slot's usable page holds `va`, if any
pub fn slot_of(va: VirtAddr) -> Option<KernelStackSlot> {
    let va = va.bits();
    let lowest = kstack(NPROC - 1);
    if va < lowest || va >= TRAPFRAME {
        return None;
    }
    let from_top = TRAPFRAME - 1 - va;
    let slot = KernelStackSlot::new(from_top / (2 * PAGE_SIZE));
    if slot.contains(VirtAddr::new(va)) {
        Some(slot)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::memlayout::trapframe_va;

    #[test]
    fn checked_rejects_out_of_range() {
        assert!(KernelStackSlot::checked(0).is_ok());
        assert!(KernelStackSlot::checked(NPROC - 1).is_ok());
        assert_eq!(
            KernelStackSlot::checked(NPROC),
            Err(LayoutError::ProcessIndexOutOfRange {
                index: NPROC,
                limit: NPROC
            })
        );
    }

    #[test]
    fn slot_zero_sits_under_trapframe() {
        let slot = KernelStackSlot::new(0);
        assert_eq!(slot.top(), trapframe_va());
        assert_eq!(slot.guard_above().start, trapframe_va());
        assert_eq!(slot.stack().end - slot.stack().start, PAGE_SIZE);
    }

    #[test]
    fn neighbours_share_guards() {
        for p in 0..NPROC - 1 {
            let upper = KernelStackSlot::new(p);
            let lower = KernelStackSlot::new(p + 1);
            assert_eq!(lower.guard_above(), upper.guard_below());
            assert!(lower.stack().end <= upper.guard_below().start);
        }
    }

    #[test]
    fn stacks_are_disjoint() {
        let slots: Vec<_> = kstack_slots().collect();
        assert_eq!(slots.len(), NPROC);
        for a in &slots {
            for b in &slots {
                if a != b {
                    let (ra, rb) = (a.stack(), b.stack());
                    assert!(ra.end <= rb.start || rb.end <= ra.start);
                }
            }
        }
    }

    #[test]
    fn fault_lookup() {
        let slot = KernelStackSlot::new(5);
        assert_eq!(slot_of(slot.base()), Some(slot));
        assert_eq!(slot_of(slot.top() - 1), Some(slot));
        assert_eq!(slot_of(slot.guard_below().start), None);
        assert!(slot.is_guard_hit(slot.guard_below().start));
        assert!(slot.is_guard_hit(slot.top()));
        assert!(!slot.is_guard_hit(slot.base()));
        assert_eq!(slot_of(trapframe_va()), None);
    }
}
