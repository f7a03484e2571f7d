//! Architectural constants for the Sv39 layout.
//!
//! Everything here is fixed at build time. Changing any value is a rebuild,
//! and the assertions at the bottom of each module reject a layout that no
//! longer holds together.

mod const_register;

pub mod memlayout;
pub mod mstatus;

use const_register::register_const;

register_const!(
    /// log2 of the page size
    PAGE_SIZE_BITS,
    usize,
    12
);
register_const!(
    /// bytes per page
    PAGE_SIZE,
    usize,
    1usize << PAGE_SIZE_BITS
);
register_const!(PAGE_MASK, usize, PAGE_SIZE - 1);

register_const!(
    /// Sv39 walks three levels of page tables
    PAGE_TABLE_LEVELS,
    usize,
    3
);
register_const!(
    /// Each level is indexed by 9 bits, 512 PTEs per table page
    PTE_INDEX_BITS,
    usize,
    9
);
register_const!(PTE_PER_PAGE, usize, 1usize << PTE_INDEX_BITS);
register_const!(
    /// Full reach of the translation scheme, in bits
    VA_WIDTH_SV39,
    usize,
    PAGE_TABLE_LEVELS * PTE_INDEX_BITS + PAGE_SIZE_BITS
);

register_const!(
    /// Hardware CPU contexts (harts)
    NCPU,
    usize,
    4
);
register_const!(
    /// Maximum number of resident processes, one kernel stack slot each
    NPROC,
    usize,
    64
);

const _: () = assert!(PAGE_SIZE.is_power_of_two());
const _: () = assert!(PTE_PER_PAGE * 8 == PAGE_SIZE);
const _: () = assert!(NCPU > 0 && NPROC > 0);
