//! Memory layout for the system.
//!
//! Physical memory, as QEMU `virt` hands it to the kernel:
//!
//! ```text
//! 80000000 -- KERNBASE, kernel text and data, then pages for allocation
//! 88000000 -- PHYSTOP, end of RAM used by the kernel
//! ```
//!
//! Top of every virtual address space, highest first:
//!
//! ```text
//! MAXVA
//! TRAMPOLINE           same physical page in the kernel and every process
//! TRAPFRAME            per process, only in user page tables
//! KSTACK(0)            kernel page table only, below an unmapped page
//! guard
//! KSTACK(1)
//! guard
//! ...
//! ```

use humansize::{SizeFormatter, BINARY};
use log::info;

use super::const_register::{register_const, register_fn};
use super::{NPROC, PAGE_SIZE, PAGE_SIZE_BITS, PAGE_TABLE_LEVELS, PTE_INDEX_BITS};
use crate::memory::address::{PhysAddr, VirtAddr};

register_const!(
    /// One past the highest usable virtual address.
    ///
    /// One bit less than Sv39 can address, so the root level index stays
    /// below 256 and no address ever needs its upper bits sign-extended.
    MAXVA,
    usize,
    1usize << (PAGE_TABLE_LEVELS * PTE_INDEX_BITS + PAGE_SIZE_BITS - 1)
);

// the kernel expects there to be RAM
// for use by the kernel and user pages
// from physical address 0x80000000 to PHYSTOP.
register_const!(KERNBASE, usize, 0x8000_0000);
register_const!(PHYSTOP, usize, KERNBASE + 128 * 1024 * 1024);

register_const!(
    /// Highest page, mapped at the same address in the kernel and in every
    /// user page table so the trap entry code stays addressable across the
    /// satp switch.
    TRAMPOLINE,
    usize,
    MAXVA - PAGE_SIZE
);
register_const!(
    /// Saved user registers, right below the trampoline.
    ///
    /// Same virtual address in every process, backed by a different frame.
    /// The kernel page table leaves this page unmapped.
    TRAPFRAME,
    usize,
    TRAMPOLINE - PAGE_SIZE
);

register_fn!(
    /// Kernel stack of process slot `p`, one page each, two pages apart.
    ///
    /// The page above every stack is never mapped, so an overflow of slot
    /// `p + 1` faults instead of running into slot `p`. Above slot 0 sits
    /// the TRAPFRAME address, which the kernel table does not map either.
    ///
    /// No bounds check: callers must keep `p < NPROC`, see
    /// [`KernelStackSlot::checked`](crate::memory::kstack::KernelStackSlot::checked).
    kstack(p: usize),
    usize,
    TRAMPOLINE - (p + 1) * 2 * PAGE_SIZE
);

register_fn!(trampoline_va(), VirtAddr, VirtAddr::new(TRAMPOLINE));
register_fn!(trapframe_va(), VirtAddr, VirtAddr::new(TRAPFRAME));
register_fn!(kstack_va(p: usize), VirtAddr, VirtAddr::new(kstack(p)));
register_fn!(kernbase_pa(), PhysAddr, PhysAddr::new(KERNBASE));
register_fn!(phystop_pa(), PhysAddr, PhysAddr::new(PHYSTOP));

const _: () = assert!(MAXVA.is_power_of_two() && MAXVA % PAGE_SIZE == 0);
const _: () = assert!(PHYSTOP > KERNBASE);
const _: () = assert!(KERNBASE % PAGE_SIZE == 0 && PHYSTOP % PAGE_SIZE == 0);
// the lowest stack and the guard below it stay clear of the RAM window
const _: () = assert!(kstack(NPROC - 1) - PAGE_SIZE >= PHYSTOP);

pub fn print_memlayout() {
    let ram_size = SizeFormatter::new(PHYSTOP - KERNBASE, BINARY);
    let kstack_area = SizeFormatter::new(TRAPFRAME - (kstack(NPROC - 1) - PAGE_SIZE), BINARY);

    info!("Physical memory layout:");
    info!("");
    info!("{:20} 0x{:x}", "kernbase:", KERNBASE);
    info!("{:20} 0x{:x}", "phystop:", PHYSTOP);
    info!("{:20} {}", "Total RAM:", ram_size);
    info!("");
    info!("Virtual memory layout:");
    info!("");
    info!("{:20} 0x{:x}", "maxva:", MAXVA);
    info!("{:20} 0x{:x}", "trampoline:", TRAMPOLINE);
    info!("{:20} 0x{:x}", "trapframe:", TRAPFRAME);
    info!("{:20} 0x{:x}", "kstack(0):", kstack(0));
    info!("{:20} 0x{:x}", "kstack(nproc-1):", kstack(NPROC - 1));
    info!("{:20} {} for {} stacks", "Kernel stack area:", kstack_area, NPROC);
    info!("");
}
