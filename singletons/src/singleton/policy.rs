/// How an awakening object competes for its type's instance slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// Every awakening object takes the slot, replacing whatever was there.
    Overwrite,
    /// The first live claimant keeps the slot. Later objects are treated as duplicates and skip
    /// the rest of initialization.
    FirstWins,
    /// The object runs its full initialization and takes the slot only if it is vacant
    /// afterwards.
    IfVacant,
}

/// What happens to an object that loses a [`Claim::FirstWins`] contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duplicates {
    /// Leave the duplicate alive. It is simply not reachable through the slot.
    Ignore,
    /// Destroy the duplicate's owning object.
    Destroy,
}

/// The lifecycle policy of a singleton type.
///
/// One initialization algorithm serves every singleton; the policy decides which of its steps
/// run. The three stock policies cover the usual patterns:
///
/// | Policy | Claim | Detach | Survives loads | Evicts older | Hidden when auto-created |
/// |--------|-------|--------|----------------|--------------|--------------------------|
/// | [`SINGLETON`](Self::SINGLETON) | overwrite | no | no | no | no |
/// | [`PERSISTENT`](Self::PERSISTENT) | first wins | yes | yes | no | no |
/// | [`REGULATOR`](Self::REGULATOR) | if vacant | no | yes | yes | yes |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// How the awakening object competes for the instance slot.
    pub claim: Claim,
    /// Detach the object from its parent before claiming, if the component asks for it.
    pub detach_on_claim: bool,
    /// Mark the object to survive scene transitions.
    pub survive_transitions: bool,
    /// Destroy every peer created strictly earlier than the awakening object.
    pub evict_older: bool,
    /// Exclude auto-created objects from scene saving.
    pub hide_auto_created: bool,
    /// Treatment of objects losing a first-wins claim.
    pub duplicates: Duplicates,
}

impl Policy {
    /// A plain singleton, scoped to the current scene. The most recently awakened object owns
    /// the slot.
    pub const SINGLETON: Self = Self {
        claim: Claim::Overwrite,
        detach_on_claim: false,
        survive_transitions: false,
        evict_older: false,
        hide_auto_created: false,
        duplicates: Duplicates::Ignore,
    };

    /// A singleton that survives scene transitions. The first object to claim the slot keeps it;
    /// late duplicates are left alive but unreferenced.
    pub const PERSISTENT: Self = Self {
        claim: Claim::FirstWins,
        detach_on_claim: true,
        survive_transitions: true,
        evict_older: false,
        hide_auto_created: false,
        duplicates: Duplicates::Ignore,
    };

    /// A singleton that regulates itself: each awakening object destroys every older peer, so
    /// the newest object is the only one left standing.
    pub const REGULATOR: Self = Self {
        claim: Claim::IfVacant,
        detach_on_claim: false,
        survive_transitions: true,
        evict_older: true,
        hide_auto_created: true,
        duplicates: Duplicates::Ignore,
    };

    #[inline]
    pub const fn with_duplicates(mut self, duplicates: Duplicates) -> Self {
        self.duplicates = duplicates;
        self
    }

    #[inline]
    pub const fn with_detach_on_claim(mut self, detach: bool) -> Self {
        self.detach_on_claim = detach;
        self
    }

    #[inline]
    pub const fn with_survive_transitions(mut self, survive: bool) -> Self {
        self.survive_transitions = survive;
        self
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::SINGLETON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_single_fields() {
        const STRICT: Policy = Policy::PERSISTENT.with_duplicates(Duplicates::Destroy);

        assert_eq!(STRICT.duplicates, Duplicates::Destroy);
        assert_eq!(STRICT.claim, Claim::FirstWins);
        assert!(STRICT.survive_transitions);

        let pinned = Policy::PERSISTENT.with_detach_on_claim(false);
        assert!(!pinned.detach_on_claim);

        let scoped = Policy::REGULATOR.with_survive_transitions(false);
        assert!(!scoped.survive_transitions);
        assert!(scoped.evict_older);
    }

    #[test]
    fn default_is_plain_singleton() {
        assert_eq!(Policy::default(), Policy::SINGLETON);
    }
}
