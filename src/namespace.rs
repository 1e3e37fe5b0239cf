//! Approved plugin namespace rules.
//!
//! Every plugin name and search query must start with one of the approved
//! prefixes. The remainder of a name is lowercase alphanumerics and hyphens.

pub const APPROVED_PREFIXES: [&str; 2] = ["plugin-", "ext-"];

/// The host's always-present base package. Hidden from prefix-mode search
/// results since installing it standalone would only ever conflict.
pub const CORE_PACKAGE: &str = "plugin-core";

pub fn approved_prefix(name: &str) -> Option<&'static str> {
    APPROVED_PREFIXES
        .iter()
        .copied()
        .find(|prefix| name.starts_with(prefix))
}

pub fn is_approved(name: &str) -> bool {
    approved_prefix(name).is_some()
}

/// Validates a full plugin name: an approved prefix followed by a non-empty
/// lowercase alphanumeric/hyphen remainder. Returns the rejection reason.
pub fn validate(name: &str) -> Result<(), String> {
    let Some(prefix) = approved_prefix(name) else {
        return Err(format!(
            "must start with one of: {}",
            APPROVED_PREFIXES.join(", ")
        ));
    };

    let rest = &name[prefix.len()..];
    if rest.is_empty() {
        return Err(format!("nothing follows the '{prefix}' prefix"));
    }
    if !rest
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("only lowercase alphanumerics and '-' are allowed".to_string());
    }

    Ok(())
}
