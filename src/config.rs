//! Hook name table.
//!
//! Embeddings that dispatch hooks by name (a scripting bridge, a templating
//! layer) look operations up through a [`HookConfig`]. The table can expose
//! only a subset of the hooks and rename them, e.g. with a prefix.

use crate::error::{HookError, Result};
use smallvec::SmallVec;
use std::fmt;

/// The hook operations a [`HookSet`](crate::HookSet) provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookKind {
    State,
    Ref,
    Reducer,
    Effect,
    Memo,
    Context,
}

impl HookKind {
    pub const ALL: [HookKind; 6] = [
        HookKind::State,
        HookKind::Ref,
        HookKind::Reducer,
        HookKind::Effect,
        HookKind::Memo,
        HookKind::Context,
    ];

    /// Name of the matching `HookSet` method.
    pub const fn canonical_name(self) -> &'static str {
        match self {
            HookKind::State => "use_state",
            HookKind::Ref => "use_ref",
            HookKind::Reducer => "use_reducer",
            HookKind::Effect => "use_effect",
            HookKind::Memo => "use_memo",
            HookKind::Context => "use_context",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Maps exposed hook names to hook operations.
///
/// ```
/// use hookbox::{HookConfig, HookKind};
///
/// let config = HookConfig::default()
///     .only([HookKind::Memo, HookKind::State])
///     .with_prefixer(|name| format!("h_{name}"));
///
/// assert_eq!(config.resolve("h_use_memo").unwrap(), HookKind::Memo);
/// assert!(config.resolve("use_memo").is_err());
/// assert!(!config.exposes(HookKind::Effect));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookConfig {
    exposed: SmallVec<[(HookKind, String); 6]>,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            exposed: HookKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.canonical_name().to_owned()))
                .collect(),
        }
    }
}

impl HookConfig {
    /// Keep only the listed hooks.
    pub fn only(mut self, kinds: impl IntoIterator<Item = HookKind>) -> Self {
        let kinds: SmallVec<[HookKind; 6]> = kinds.into_iter().collect();
        self.exposed.retain(|(kind, _)| kinds.contains(kind));
        self
    }

    /// Rename every exposed hook to `prefixer(canonical_name)`.
    pub fn with_prefixer(mut self, prefixer: impl Fn(&str) -> String) -> Self {
        for (kind, name) in &mut self.exposed {
            *name = prefixer(kind.canonical_name());
        }
        self
    }

    /// Expose `kind` under `name`. Adds the hook back if `only` removed it.
    pub fn rename(mut self, kind: HookKind, name: impl Into<String>) -> Self {
        let name = name.into();
        match self.exposed.iter_mut().find(|(exposed, _)| *exposed == kind) {
            Some((_, existing)) => *existing = name,
            None => {
                self.exposed.push((kind, name));
                self.exposed.sort_by_key(|(kind, _)| *kind);
            }
        }
        self
    }

    /// Look up the hook exposed as `name`.
    pub fn resolve(&self, name: &str) -> Result<HookKind> {
        self.exposed
            .iter()
            .find(|(_, exposed)| exposed == name)
            .map(|(kind, _)| *kind)
            .ok_or_else(|| HookError::UnknownHook(name.to_owned()))
    }

    /// The name `kind` is exposed under, if it is exposed.
    pub fn name_of(&self, kind: HookKind) -> Option<&str> {
        self.exposed
            .iter()
            .find(|(exposed, _)| *exposed == kind)
            .map(|(_, name)| name.as_str())
    }

    pub fn exposes(&self, kind: HookKind) -> bool {
        self.name_of(kind).is_some()
    }

    /// Exposed hooks and their names, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (HookKind, &str)> + '_ {
        self.exposed.iter().map(|(kind, name)| (*kind, name.as_str()))
    }
}
