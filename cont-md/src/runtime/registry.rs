//! Registry resolving platform names to kernel factories

use std::collections::HashMap;

use slotmap::{DefaultKey, SlotMap};

use crate::error::{Error, Result};

pub type PlatformID = DefaultKey;

/// Name of the built-in single-threaded CPU platform
pub const REFERENCE_PLATFORM: &str = "reference";

/// Kernel factory selector for a registered platform
// TODO: Further platform kinds once a vectorized backend lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Reference,
}

/// Registration record for a single platform
#[derive(Debug)]
pub struct PlatformEntry {
    name: String,
    kind: PlatformKind,
}

impl PlatformEntry {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_kind(&self) -> PlatformKind {
        self.kind
    }
}

/// Central storage for all platforms available to context construction.
///
/// A registry is an explicit value constructed at startup and passed by
/// reference to [`Context::new`](crate::runtime::Context::new); there is no
/// process-wide registry singleton.
pub struct PlatformRegistry {
    /// Internal registry for registered platforms
    platforms: SlotMap<PlatformID, PlatformEntry>,
    /// Fast lookup table for platform names
    name_table: HashMap<String, PlatformID>,
}

impl PlatformRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            platforms: SlotMap::with_key(),
            name_table: HashMap::new(),
        }
    }

    /// Create a registry with the reference platform already registered
    pub fn with_reference() -> Self {
        let mut registry = Self::new();
        registry
            .register_platform(REFERENCE_PLATFORM, PlatformKind::Reference)
            .expect("empty registry cannot contain the reference platform yet");
        registry
    }

    /// Register a platform under a unique name
    pub fn register_platform<S: Into<String>>(
        &mut self,
        name: S,
        kind: PlatformKind,
    ) -> Result<PlatformID> {
        let name = name.into();
        if self.name_table.contains_key(&name) {
            return Err(Error::PlatformRedefined(name));
        }
        log::debug!("registering platform {:?} ({:?})", name, kind);
        let id = self.platforms.insert(PlatformEntry {
            name: name.clone(),
            kind,
        });
        self.name_table.insert(name, id);
        Ok(id)
    }

    pub fn get_platform(&self, id: PlatformID) -> Option<&PlatformEntry> {
        self.platforms.get(id)
    }

    pub fn get_platform_by_name(&self, name: &str) -> Option<(PlatformID, &PlatformEntry)> {
        let id = *self.name_table.get(name)?;
        Some((id, self.platforms.get(id).unwrap()))
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::new()
    }
}
