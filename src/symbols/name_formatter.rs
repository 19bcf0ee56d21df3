//! Canonical method labels.
//!
//! Format: `<declaring type signature>.<method name>[<descriptor>]`
//!
//! Example: "Ljava/lang/String;.hashCode()I"
//! Labels are owned, growable strings and are never truncated.

use crate::runtime::MethodSignature;
use crate::utils::config::{COMPILED_FRAME_SUFFIX, INLINED_FRAME_SUFFIX};

/// Position of a frame within a rendered inline chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAnnotation {
    /// Frame inlined into a caller
    Inlined,

    /// Outermost frame, the method the compiler actually compiled
    Compiled,
}

impl FrameAnnotation {
    pub fn suffix(self) -> &'static str {
        match self {
            FrameAnnotation::Inlined => INLINED_FRAME_SUFFIX,
            FrameAnnotation::Compiled => COMPILED_FRAME_SUFFIX,
        }
    }
}

/// Format a method label from its parts
///
/// **Public** - main entry point for name formatting
///
/// # Arguments
/// * `type_signature` - Declaring type signature as reported by the runtime
/// * `name` - Method name
/// * `descriptor` - Optional descriptor appended verbatim after the name
///
/// # Returns
/// `type_signature + "." + name (+ descriptor)`; no escaping is applied
pub fn format_method_name(type_signature: &str, name: &str, descriptor: Option<&str>) -> String {
    let descriptor = descriptor.unwrap_or("");
    let mut label =
        String::with_capacity(type_signature.len() + 1 + name.len() + descriptor.len());
    label.push_str(type_signature);
    label.push('.');
    label.push_str(name);
    label.push_str(descriptor);
    label
}

/// Format a resolved signature, optionally including its descriptor
pub fn format_signature(signature: &MethodSignature, include_descriptor: bool) -> String {
    let descriptor = include_descriptor.then_some(signature.descriptor.as_str());
    format_method_name(&signature.type_signature, &signature.name, descriptor)
}

/// Append a frame annotation to a formatted label
pub fn annotate(mut label: String, annotation: FrameAnnotation) -> String {
    label.push_str(annotation.suffix());
    label
}
