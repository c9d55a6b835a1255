//! Address discovery seam

/// Resolves the address the bridge is reachable at, for display only
pub trait Discovery: Send + Sync {
    fn local_address(&self) -> Option<String>;
}

/// Discovery with a fixed answer, e.g. a configured advertised host
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery(pub Option<String>);

impl StaticDiscovery {
    pub fn new(address: impl Into<String>) -> Self {
        Self(Some(address.into()))
    }
}

impl Discovery for StaticDiscovery {
    fn local_address(&self) -> Option<String> {
        self.0.clone()
    }
}
