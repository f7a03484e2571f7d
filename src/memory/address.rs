//! Address type infrastructure
//!

use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};

use crate::consts;

macro_rules! impl_arithmetic_with_usize {
    ($t:ty) => {
        // + offset, - offset, += offset, -= offset
        // T - T for offset
        impl Add<usize> for $t {
            type Output = Self;
            #[inline]
            fn add(self, rhs: usize) -> Self {
                Self(self.0 + rhs)
            }
        }
        impl AddAssign<usize> for $t {
            #[inline]
            fn add_assign(&mut self, rhs: usize) {
                *self = *self + rhs;
            }
        }
        impl Sub<usize> for $t {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: usize) -> Self {
                Self(self.0 - rhs)
            }
        }
        impl SubAssign<usize> for $t {
            #[inline]
            fn sub_assign(&mut self, rhs: usize) {
                *self = *self - rhs;
            }
        }
        impl Sub<$t> for $t {
            type Output = usize;
            #[inline]
            fn sub(self, rhs: $t) -> usize {
                self.0 - rhs.0
            }
        }
    };
}

macro_rules! impl_fmt {
    ($t:ty, $prefix:expr) => {
        impl fmt::Debug for $t {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_fmt(format_args!("{}:{:#x}", $prefix, self.0))
            }
        }
        impl fmt::LowerHex for $t {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_fmt(format_args!("{}:{:#x}", $prefix, self.0))
            }
        }
    };
}

macro_rules! impl_usize_convert {
    ($t:ty) => {
        impl From<usize> for $t {
            fn from(bits: usize) -> Self {
                Self(bits)
            }
        }
        impl From<$t> for usize {
            fn from(v: $t) -> Self {
                v.0
            }
        }
    };
}

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct VirtAddr(usize);

impl VirtAddr {
    pub const fn new(bits: usize) -> Self {
        Self(bits)
    }
    pub const fn bits(self) -> usize {
        self.0
    }

    pub const fn page_num_down(self) -> VirtPageNum {
        VirtPageNum(self.0 / consts::PAGE_SIZE)
    }
    pub const fn page_num_up(self) -> VirtPageNum {
        VirtPageNum((self.0 + consts::PAGE_MASK) / consts::PAGE_SIZE)
    }
    pub const fn round_down(self) -> VirtAddr {
        VirtAddr(self.0 & !consts::PAGE_MASK)
    }
    pub const fn round_up(self) -> VirtAddr {
        VirtAddr((self.0 + consts::PAGE_MASK) & !consts::PAGE_MASK)
    }
    pub const fn page_offset(self) -> usize {
        self.0 & consts::PAGE_MASK
    }
    pub const fn is_aligned(self) -> bool {
        self.page_offset() == 0
    }

    /// Usable Sv39 addresses stop at `MAXVA`; anything at or above it would
    /// need the upper bits sign-extended.
    pub const fn is_below_maxva(self) -> bool {
        self.0 < consts::memlayout::MAXVA
    }
}

impl_arithmetic_with_usize!(VirtAddr);
impl_fmt!(VirtAddr, "VA");
impl_usize_convert!(VirtAddr);

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct VirtPageNum(usize);

impl VirtPageNum {
    pub const fn new(bits: usize) -> Self {
        Self(bits)
    }
    pub const fn bits(self) -> usize {
        self.0
    }
    pub const fn addr(self) -> VirtAddr {
        VirtAddr(self.0 << consts::PAGE_SIZE_BITS)
    }

    /// Page table indexes, from the root (level 2) down to the leaf (level 0)
    pub const fn indexes(self) -> [usize; consts::PAGE_TABLE_LEVELS] {
        let mask = consts::PTE_PER_PAGE - 1;
        let mut idx = [0usize; consts::PAGE_TABLE_LEVELS];
        let mut vpn = self.0;
        let mut i = consts::PAGE_TABLE_LEVELS;
        while i > 0 {
            i -= 1;
            idx[i] = vpn & mask;
            vpn >>= consts::PTE_INDEX_BITS;
        }
        idx
    }
}

impl_arithmetic_with_usize!(VirtPageNum);
impl_fmt!(VirtPageNum, "VPN");
impl_usize_convert!(VirtPageNum);

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct PhysAddr(usize);

impl PhysAddr {
    pub const fn new(bits: usize) -> Self {
        Self(bits)
    }
    pub const fn bits(self) -> usize {
        self.0
    }

    pub const fn page_num_down(self) -> PhysPageNum {
        PhysPageNum(self.0 / consts::PAGE_SIZE)
    }
    pub const fn page_num_up(self) -> PhysPageNum {
        PhysPageNum((self.0 + consts::PAGE_MASK) / consts::PAGE_SIZE)
    }
    pub const fn round_down(self) -> PhysAddr {
        PhysAddr(self.0 & !consts::PAGE_MASK)
    }
    pub const fn round_up(self) -> PhysAddr {
        PhysAddr((self.0 + consts::PAGE_MASK) & !consts::PAGE_MASK)
    }
    pub const fn page_offset(self) -> usize {
        self.0 & consts::PAGE_MASK
    }
    pub const fn is_aligned(self) -> bool {
        self.page_offset() == 0
    }
}

impl_arithmetic_with_usize!(PhysAddr);
impl_fmt!(PhysAddr, "PA");
impl_usize_convert!(PhysAddr);

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct PhysPageNum(usize);

impl PhysPageNum {
    pub const fn new(bits: usize) -> Self {
        Self(bits)
    }
    pub const fn bits(self) -> usize {
        self.0
    }
    pub const fn addr(self) -> PhysAddr {
        PhysAddr(self.0 << consts::PAGE_SIZE_BITS)
    }
}

impl_arithmetic_with_usize!(PhysPageNum);
impl_fmt!(PhysPageNum, "PPN");
impl_usize_convert!(PhysPageNum);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        let va = VirtAddr::new(0x1234);
        assert_eq!(va.round_down(), VirtAddr::new(0x1000));
        assert_eq!(va.round_up(), VirtAddr::new(0x2000));
        assert_eq!(va.page_offset(), 0x234);
        assert_eq!(va.page_num_down(), VirtPageNum::new(1));
        assert_eq!(va.page_num_up(), VirtPageNum::new(2));

        let aligned = PhysAddr::new(0x8000_0000);
        assert!(aligned.is_aligned());
        assert_eq!(aligned.round_up(), aligned);
        assert_eq!(aligned.page_num_down().addr(), aligned);
    }

    #[test]
    fn sv39_indexes() {
        // level 2 = 1, level 1 = 2, level 0 = 3
        let vpn = VirtPageNum::new((1 << 18) | (2 << 9) | 3);
        assert_eq!(vpn.indexes(), [1, 2, 3]);
    }

    #[test]
    fn arithmetic_and_fmt() {
        let mut va = VirtAddr::new(0x1000);
        va += consts::PAGE_SIZE;
        assert_eq!(va - VirtAddr::new(0x1000), consts::PAGE_SIZE);
        assert_eq!(va - consts::PAGE_SIZE, VirtAddr::new(0x1000));
        assert_eq!(format!("{:?}", va), "VA:0x2000");
        assert_eq!(format!("{:x}", PhysPageNum::new(0x80000)), "PPN:0x80000");
    }
}
