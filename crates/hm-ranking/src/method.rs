//! The `RankingMethod` trait and the pass driver [`StandRanker`].

use std::fmt;

use hm_core::StandId;

use crate::{RankingContext, Requirement};

/// A stand and its rank for the current pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandRanking {
    pub stand: StandId,
    pub rank:  f64,
}

/// Pluggable stand scoring.  Higher ranks are harvested first; a rank of `0`
/// or less means "do not harvest".
///
/// # Required methods
///
/// Only [`compute_rank`][Self::compute_rank] and [`name`][Self::name] are
/// required.  The hooks have defaults that suit graded scores.
pub trait RankingMethod: Send {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Called once at the start of every ranking pass, before any stand is
    /// ranked.  Methods that cache per-pass data refresh it here.
    fn begin_pass(&mut self, _requirements: &[Requirement], _ctx: &RankingContext<'_>) {}

    /// `true` if the method evaluates `requirement` itself inside
    /// `compute_rank` instead of using it as a hard eligibility gate.
    fn consumes(&self, _requirement: &Requirement) -> bool {
        false
    }

    /// Rank one stand that passed the eligibility gate.
    fn compute_rank(
        &mut self,
        stand:        StandId,
        requirements: &[Requirement],
        ctx:          &RankingContext<'_>,
    ) -> f64;
}

/// A ranking method plus its attached requirement set.
pub struct StandRanker {
    method:       Box<dyn RankingMethod>,
    requirements: Vec<Requirement>,
}

impl StandRanker {
    pub fn new(method: Box<dyn RankingMethod>, requirements: Vec<Requirement>) -> Self {
        Self { method, requirements }
    }

    pub fn method_name(&self) -> &'static str {
        self.method.name()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// `true` when every requirement not consumed by the method is met.
    pub fn is_eligible(&self, stand: StandId, ctx: &RankingContext<'_>) -> bool {
        self.requirements
            .iter()
            .filter(|r| !self.method.consumes(r))
            .all(|r| r.met_by(stand, ctx))
    }

    /// Rank `candidates` and return them best first.
    ///
    /// Ties are broken by ascending `StandId`, so the order is reproducible
    /// for identical landscape state.
    pub fn rank<I>(&mut self, candidates: I, ctx: &RankingContext<'_>) -> Vec<StandRanking>
    where
        I: IntoIterator<Item = StandId>,
    {
        self.method.begin_pass(&self.requirements, ctx);

        let mut rankings: Vec<StandRanking> = candidates
            .into_iter()
            .map(|stand| {
                let rank = if self.is_eligible(stand, ctx) {
                    self.method.compute_rank(stand, &self.requirements, ctx)
                } else {
                    0.0
                };
                StandRanking { stand, rank }
            })
            .collect();

        rankings.sort_by(|a, b| b.rank.total_cmp(&a.rank).then(a.stand.cmp(&b.stand)));

        tracing::debug!(
            method = self.method.name(),
            ranked = rankings.len(),
            positive = rankings.iter().filter(|r| r.rank > 0.0).count(),
            year = ctx.now.0,
            "ranking pass complete"
        );
        rankings
    }
}

impl fmt::Debug for StandRanker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandRanker")
            .field("method", &self.method.name())
            .field("requirements", &self.requirements)
            .finish()
    }
}
