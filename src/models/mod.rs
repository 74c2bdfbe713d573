//! Domain models for rulekit.
//!
//! # Core Concepts
//!
//! - [`Manifest`]: How projects relate to groups, techs, and languages, and how
//!   techs depend on each other. Loaded fresh for every request.
//! - [`RuleFile`]: A markdown rule document tagged, via its frontmatter, with
//!   the scope keys it applies to.
//! - [`RuleRequest`]: A caller's scope category and key.
//! - [`ResolvedScopes`]: Every key that applies to a request once memberships
//!   and tech dependencies have been followed.

mod manifest;
mod rule;
mod scope;

pub use manifest::*;
pub use rule::*;
pub use scope::*;
