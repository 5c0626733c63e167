//! Address and method validation
//!
//! OSC addresses are `/`-separated paths:
//! ```text
//! /light/1/level
//! /cue/audio/3/gain
//! ```
//!
//! An address arriving on the wire may be a *pattern* carrying the OSC
//! matching metacharacters (`*`, `?`, `[]`, `{}`); a *method* is a concrete
//! endpoint and may not. This module checks syntax only; actually matching
//! patterns against methods is the routing layer's job, and it consumes
//! addresses validated here.

use crate::RESERVED_CHARS;

/// Characters illegal anywhere in an address, pattern or not
const ILLEGAL_IN_ADDRESS: &[char] = &[' ', '#', ','];

/// Check a single exact path component.
///
/// Legal if non-empty and free of every reserved character, including the
/// pattern metacharacters, since a component addresses one thing by name.
pub fn legal_address_component(component: &str) -> bool {
    !component.is_empty() && !component.contains(RESERVED_CHARS)
}

/// Check a full address pattern.
///
/// Legal if non-empty, beginning with `/`, with no empty segment except the
/// bare root `/`. Segments may carry pattern metacharacters for the matcher,
/// but never a space, `#`, or `,`.
pub fn legal_address(address: &str) -> bool {
    let Some(rest) = address.strip_prefix('/') else {
        return false;
    };
    if rest.is_empty() {
        // the root
        return true;
    }
    rest.split('/')
        .all(|segment| !segment.is_empty() && !segment.contains(ILLEGAL_IN_ADDRESS))
}

/// Check a concrete method name.
///
/// A method is a non-pattern, addressable endpoint: every segment must pass
/// [`legal_address_component`], so `*`, `?`, `[]`, and `{}` are forbidden
/// even though [`legal_address`] admits them. The bare root is not a method.
pub fn legal_method(method: &str) -> bool {
    let Some(rest) = method.strip_prefix('/') else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }
    rest.split('/').all(legal_address_component)
}
