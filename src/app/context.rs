use crate::ports::AddressLookup;

/// Application context holding dependencies for command execution.
pub struct AppContext<L: AddressLookup> {
    lookup: L,
}

impl<L: AddressLookup> AppContext<L> {
    /// Create a new application context.
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Get a reference to the address-lookup collaborator.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }
}
