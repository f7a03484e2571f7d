//! Machine Status Register, mstatus
//!
//! Only the two fields the trap path touches are described here: the
//! previous privilege mode (MPP, bits 12:11) restored by `mret`, and the
//! machine-mode interrupt enable (MIE, bit 3).

use bitflags::bitflags;

use super::const_register::register_const;
use crate::error::{LayoutError, LayoutResult};

register_const!(MSTATUS_MPP_SHIFT, usize, 11);
register_const!(MSTATUS_MIE_SHIFT, usize, 3);

/// Privilege level encoded in a two-bit mode field
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivilegeMode {
    User = 0b00,
    Supervisor = 0b01,
    Machine = 0b11,
}

impl PrivilegeMode {
    pub const ALL: [PrivilegeMode; 3] = [Self::User, Self::Supervisor, Self::Machine];

    pub const fn bits(self) -> usize {
        self as usize
    }

    /// Raw value shifted into the MPP position
    pub const fn mpp_bits(self) -> usize {
        self.bits() << MSTATUS_MPP_SHIFT
    }

    pub const fn from_bits(raw: usize) -> LayoutResult<Self> {
        match raw {
            0b00 => Ok(Self::User),
            0b01 => Ok(Self::Supervisor),
            0b11 => Ok(Self::Machine),
            _ => Err(LayoutError::ReservedPrivilegeMode(raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MStatusField {
    /// previous mode
    Mpp,
    /// machine-mode interrupt enable
    Mie,
}

impl MStatusField {
    pub const ALL: [MStatusField; 2] = [Self::Mpp, Self::Mie];
}

/// Bits covered by `field`
pub const fn mask_of(field: MStatusField) -> usize {
    match field {
        MStatusField::Mpp => 0b11 << MSTATUS_MPP_SHIFT,
        MStatusField::Mie => 0b1 << MSTATUS_MIE_SHIFT,
    }
}

register_const!(MSTATUS_MPP_MASK, usize, mask_of(MStatusField::Mpp));
register_const!(MSTATUS_MPP_M, usize, PrivilegeMode::Machine.mpp_bits());
register_const!(MSTATUS_MPP_S, usize, PrivilegeMode::Supervisor.mpp_bits());
register_const!(MSTATUS_MPP_U, usize, PrivilegeMode::User.mpp_bits());
register_const!(MSTATUS_MIE, usize, mask_of(MStatusField::Mie));

const _: () = assert!(MSTATUS_MPP_MASK & MSTATUS_MIE == 0);

bitflags! {
    /// An mstatus word, seen through the fields above.
    ///
    /// Unknown bits are kept as they are, so a word read from the CSR can be
    /// edited and written back.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MStatus: usize {
        const MIE = MSTATUS_MIE;
        const MPP = MSTATUS_MPP_MASK;
    }
}

impl MStatus {
    pub const fn from_raw(bits: usize) -> Self {
        Self::from_bits_retain(bits)
    }

    pub const fn mpp(self) -> LayoutResult<PrivilegeMode> {
        PrivilegeMode::from_bits((self.bits() & MSTATUS_MPP_MASK) >> MSTATUS_MPP_SHIFT)
    }
    pub const fn with_mpp(self, mode: PrivilegeMode) -> Self {
        Self::from_bits_retain((self.bits() & !MSTATUS_MPP_MASK) | mode.mpp_bits())
    }

    pub const fn mie(self) -> bool {
        self.bits() & MSTATUS_MIE != 0
    }
    pub const fn with_mie(self, enable: bool) -> Self {
        if enable {
            Self::from_bits_retain(self.bits() | MSTATUS_MIE)
        } else {
            Self::from_bits_retain(self.bits() & !MSTATUS_MIE)
        }
    }
}

/// Set mstatus.MPP so that the next `mret` drops into `mode`.
///
/// # Safety
///
/// Machine mode only. The caller owns the rest of the mret sequence (mepc,
/// delegation, pmp).
#[cfg(target_arch = "riscv64")]
pub unsafe fn prepare_mret(mode: PrivilegeMode) {
    use riscv::register::mstatus;

    let mpp = match mode {
        PrivilegeMode::User => mstatus::MPP::User,
        PrivilegeMode::Supervisor => mstatus::MPP::Supervisor,
        PrivilegeMode::Machine => mstatus::MPP::Machine,
    };
    log::debug!("mstatus.MPP <- {:?}", mode);
    mstatus::set_mpp(mpp);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_masks() {
        assert_eq!(MSTATUS_MPP_MASK, 3 << 11);
        assert_eq!(MSTATUS_MPP_M, 3 << 11);
        assert_eq!(MSTATUS_MPP_S, 1 << 11);
        assert_eq!(MSTATUS_MPP_U, 0);
        assert_eq!(MSTATUS_MIE, 1 << 3);
        assert_eq!(mstatus_mie(), MSTATUS_MIE);
    }

    #[test]
    fn fields_do_not_overlap() {
        for a in MStatusField::ALL {
            for b in MStatusField::ALL {
                if a != b {
                    assert_eq!(mask_of(a) & mask_of(b), 0, "{:?} / {:?}", a, b);
                }
            }
        }
        assert_eq!(MStatus::all().bits(), MSTATUS_MPP_MASK | MSTATUS_MIE);
    }

    #[test]
    fn mode_values_fit_the_field() {
        for mode in PrivilegeMode::ALL {
            assert_eq!(mode.mpp_bits() & !MSTATUS_MPP_MASK, 0);
            assert_eq!(PrivilegeMode::from_bits(mode.bits()), Ok(mode));
        }
        assert_eq!(
            PrivilegeMode::from_bits(0b10),
            Err(LayoutError::ReservedPrivilegeMode(0b10))
        );
    }

    #[test]
    fn edit_keeps_foreign_bits() {
        // SIE (bit 1) and FS (bits 14:13) are not ours
        let foreign = (1 << 1) | (0b11 << 13);
        let word = MStatus::from_raw(foreign | MSTATUS_MPP_M);

        let word = word.with_mpp(PrivilegeMode::Supervisor).with_mie(true);
        assert_eq!(word.mpp(), Ok(PrivilegeMode::Supervisor));
        assert!(word.mie());
        assert_eq!(word.bits(), foreign | MSTATUS_MPP_S | MSTATUS_MIE);

        let word = word.with_mpp(PrivilegeMode::User).with_mie(false);
        assert_eq!(word.bits(), foreign);
    }

    #[test]
    fn every_mode_round_trips() {
        let foreign = (1 << 1) | (0b11 << 13) | (1 << 17);
        for enable in [false, true] {
            for from in PrivilegeMode::ALL {
                let word = MStatus::from_raw(foreign | from.mpp_bits()).with_mie(enable);
                for to in PrivilegeMode::ALL {
                    let edited = word.with_mpp(to);
                    assert_eq!(edited.mpp(), Ok(to));
                    assert_eq!(edited.mie(), enable);
                    assert_eq!(edited.bits() & !MStatus::all().bits(), foreign);
                }
            }
        }
    }

    #[test]
    fn reserved_mpp_in_a_raw_word() {
        let word = MStatus::from_raw(0b10 << MSTATUS_MPP_SHIFT);
        assert!(word.mpp().is_err());
    }
}
