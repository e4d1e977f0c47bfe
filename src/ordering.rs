//! Display order for a map's scripts: the "init" script first, the rest by name.

use crate::model::Script;
use crate::statics;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptOrderError {
    #[error("script at position {index} has no name and cannot be ordered")]
    Unnamed { index: usize },
}

pub fn is_init_script(name: &str) -> bool {
    name.eq_ignore_ascii_case(statics::INIT_SCRIPT_NAME)
}

/// Compare two script names. Two init scripts compare equal so a stable sort
/// keeps their relative order.
pub fn compare_script_names(a: &str, b: &str) -> Ordering {
    match (is_init_script(a), is_init_script(b)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

/// Compare two scripts, or `None` when either is unnamed.
pub fn compare_scripts(a: &Script, b: &Script) -> Option<Ordering> {
    Some(compare_script_names(a.name.as_deref()?, b.name.as_deref()?))
}

/// Stable sort in display order. Nothing is reordered when a script is unnamed.
pub fn sort_scripts(scripts: &mut [Script]) -> Result<(), ScriptOrderError> {
    if let Some(index) = scripts.iter().position(|s| s.name.is_none()) {
        return Err(ScriptOrderError::Unnamed { index });
    }
    scripts.sort_by(|a, b| compare_scripts(a, b).unwrap_or(Ordering::Equal));
    Ok(())
}
