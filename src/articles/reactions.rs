// ABOUTME: Tallies an article's reactions by kind and flags the requester's own reaction
// ABOUTME: Pure function over expanded reaction records; no backend access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pressroom_core::models::{ReactionCount, ReactionRecord, ReactionTally};
use std::collections::BTreeMap;

/// Count reactions per kind, ordered by kind
///
/// Reactions without a kind are ignored. When the requester owns several
/// reactions (storage does not enforce uniqueness) the first one wins.
#[must_use]
pub fn tally_reactions(reactions: &[ReactionRecord], requester: Option<&str>) -> ReactionTally {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut current_user_reaction = None;

    for reaction in reactions.iter().filter(|r| !r.kind.is_empty()) {
        *counts.entry(reaction.kind.as_str()).or_default() += 1;

        let owned_by_requester = requester.is_some() && reaction.user.as_deref() == requester;
        if owned_by_requester && current_user_reaction.is_none() {
            current_user_reaction = Some(reaction.kind.clone());
        }
    }

    ReactionTally {
        total: counts.values().sum(),
        has_reacted: current_user_reaction.is_some(),
        counts: counts
            .into_iter()
            .map(|(kind, count)| ReactionCount {
                kind: kind.to_owned(),
                count,
                is_current_user_reaction: current_user_reaction.as_deref() == Some(kind),
            })
            .collect(),
        current_user_reaction,
    }
}
