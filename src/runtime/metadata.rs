//! Method metadata accessor.
//!
//! The host runtime owns method metadata; the engine only asks for the
//! three strings needed to build a label.

use super::types::MethodId;
use crate::utils::error::MetadataError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolved textual identity of one method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    /// Declaring type signature, e.g. `Ljava/lang/String;`
    #[serde(alias = "class")]
    pub type_signature: String,

    /// Method name, e.g. `hashCode`
    pub name: String,

    /// Method descriptor, e.g. `()I`
    #[serde(default, alias = "signature")]
    pub descriptor: String,
}

impl MethodSignature {
    pub fn new(
        type_signature: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            type_signature: type_signature.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

/// Metadata accessor provided by the host runtime
///
/// Implementations must be callable from any thread the host dispatches
/// compilation events on.
pub trait MethodResolver {
    fn resolve(&self, method: MethodId) -> Result<MethodSignature, MetadataError>;
}

/// In-memory method table, used for recorded event logs and tests
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    methods: HashMap<MethodId, MethodSignature>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method, returning the previous signature for this id
    pub fn insert(&mut self, id: MethodId, signature: MethodSignature) -> Option<MethodSignature> {
        self.methods.insert(id, signature)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl MethodResolver for MethodTable {
    fn resolve(&self, method: MethodId) -> Result<MethodSignature, MetadataError> {
        self.methods
            .get(&method)
            .cloned()
            .ok_or(MetadataError::Unavailable(method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_table_resolve() {
        let mut table = MethodTable::new();
        table.insert(MethodId(1), MethodSignature::new("LFoo;", "bar", "()V"));

        let sig = table.resolve(MethodId(1)).unwrap();
        assert_eq!(sig.name, "bar");
        assert_eq!(
            table.resolve(MethodId(2)),
            Err(MetadataError::Unavailable(MethodId(2)))
        );
    }

    #[test]
    fn test_method_signature_aliases() {
        let json = r#"{"class": "LFoo;", "name": "bar", "signature": "(I)V"}"#;
        let sig: MethodSignature = serde_json::from_str(json).unwrap();
        assert_eq!(sig, MethodSignature::new("LFoo;", "bar", "(I)V"));
    }
}
