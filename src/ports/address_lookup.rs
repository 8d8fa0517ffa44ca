/// Port for discovering the machine's public address.
///
/// The production implementation queries a sequence of HTTP providers;
/// tests substitute a fixed value so resolution stays deterministic.
pub trait AddressLookup {
    /// Return the public IPv4 address, or `None` when it cannot be determined.
    fn public_address(&self) -> Option<String>;
}

/// Lookup double returning a pre-set address (or nothing).
#[derive(Debug, Clone)]
pub struct FixedAddress(pub Option<String>);

impl FixedAddress {
    pub fn new<S: Into<String>>(address: S) -> Self {
        Self(Some(address.into()))
    }

    pub fn unavailable() -> Self {
        Self(None)
    }
}

impl AddressLookup for FixedAddress {
    fn public_address(&self) -> Option<String> {
        self.0.clone()
    }
}
