//! Process-wide engine configuration and the agent option string.
//!
//! Options are a comma separated list of `key=<0|1>` tokens, e.g.
//! `unfold=1,flush=1`. Unknown tokens are ignored.

use crate::utils::config::{
    OPTION_FLUSH, OPTION_INLINE, OPTION_METHOD_SIGNATURES, OPTION_SEPARATOR, OPTION_UNFOLD,
};
use log::{debug, warn};

/// How inline detail is reflected in labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    /// One range per innermost-method change, labeled by that method alone
    #[default]
    Folded,

    /// One range per innermost-method change, labeled by the full inline chain
    Unfolded,

    /// One range per compiled unit, inline metadata ignored
    Flat,
}

/// Engine configuration, fixed before the first notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub label_mode: LabelMode,

    /// Flush the map after every written line
    pub flush: bool,

    /// Append method descriptors to labels
    pub method_signatures: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label_mode(mut self, label_mode: LabelMode) -> Self {
        self.label_mode = label_mode;
        self
    }

    pub fn with_flush(mut self, flush: bool) -> Self {
        self.flush = flush;
        self
    }

    pub fn with_method_signatures(mut self, method_signatures: bool) -> Self {
        self.method_signatures = method_signatures;
        self
    }
}

/// Parse the agent option string
///
/// **Public** - called once at agent load
///
/// # Arguments
/// * `options` - Raw option string, `None` when the agent got no options
///
/// # Returns
/// The resulting configuration. Parsing never fails: unknown keys and
/// invalid values are logged and ignored.
pub fn parse_options(options: Option<&str>) -> EngineConfig {
    let mut flush = false;
    let mut unfold = false;
    let mut inline = true;
    let mut method_signatures = false;

    for token in options
        .unwrap_or("")
        .split(OPTION_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        let Some((key, value)) = token.split_once('=') else {
            debug!("Ignoring option token without value: {}", token);
            continue;
        };

        let slot = match key.trim() {
            OPTION_FLUSH => &mut flush,
            OPTION_UNFOLD => &mut unfold,
            OPTION_INLINE => &mut inline,
            OPTION_METHOD_SIGNATURES => &mut method_signatures,
            other => {
                debug!("Ignoring unrecognized option: {}", other);
                continue;
            }
        };

        match parse_flag(value.trim()) {
            Some(flag) => *slot = flag,
            None => warn!("Ignoring invalid value for option {}: {:?}", key.trim(), value),
        }
    }

    let label_mode = match (inline, unfold) {
        (false, _) => LabelMode::Flat,
        (true, true) => LabelMode::Unfolded,
        (true, false) => LabelMode::Folded,
    };

    EngineConfig {
        label_mode,
        flush,
        method_signatures,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_options() {
        let config = parse_options(None);
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.label_mode, LabelMode::Folded);
        assert!(!config.flush);
    }

    #[test]
    fn test_unfold_and_flush() {
        let config = parse_options(Some("unfold=1,flush=1"));
        assert_eq!(config.label_mode, LabelMode::Unfolded);
        assert!(config.flush);
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let config = parse_options(Some("sourcepos=1,,verbose,flush=1"));
        assert!(config.flush);
        assert_eq!(config.label_mode, LabelMode::Folded);
    }

    #[test]
    fn test_invalid_value_keeps_default() {
        let config = parse_options(Some("flush=yes,unfold=2"));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_inline_off_selects_flat() {
        let config = parse_options(Some("unfold=1,inline=0"));
        assert_eq!(config.label_mode, LabelMode::Flat);
    }

    #[test]
    fn test_last_token_wins() {
        let config = parse_options(Some("unfold=1, unfold=0 ,msig=1"));
        assert_eq!(config.label_mode, LabelMode::Folded);
        assert!(config.method_signatures);
    }
}
