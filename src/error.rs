use core::fmt;

/// Misuse of the layout by a caller.
///
/// The derivations in [`consts::memlayout`](crate::consts::memlayout) never
/// fail; these are raised by the checked helpers that allocators and trap
/// code call before trusting a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// Process slot outside `[0, limit)`.
    ProcessIndexOutOfRange { index: usize, limit: usize },
    /// `0b10` in the MPP field, reserved by the privileged architecture.
    ReservedPrivilegeMode(usize),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LayoutError::ProcessIndexOutOfRange { index, limit } => {
                write!(f, "process index {} out of range (limit {})", index, limit)
            }
            LayoutError::ReservedPrivilegeMode(raw) => {
                write!(f, "reserved privilege mode {:#b}", raw)
            }
        }
    }
}

pub type LayoutResult<T = ()> = Result<T, LayoutError>;
