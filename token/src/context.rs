//! Call context supplied by the hosting environment

use shroud_fhe::Address;

/// Who is calling and at what time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Immediate caller of the operation
    pub caller: Address,
    /// Block timestamp in seconds
    pub timestamp: u64,
}

impl CallContext {
    pub fn new(caller: Address, timestamp: u64) -> Self {
        Self { caller, timestamp }
    }

    /// Same moment, different immediate caller (a contract calling onward)
    pub fn as_caller(&self, caller: Address) -> Self {
        Self {
            caller,
            timestamp: self.timestamp,
        }
    }
}
