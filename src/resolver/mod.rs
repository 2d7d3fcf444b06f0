//! Resolution of queued random operations.
//!
//! The resolver drains a state's pending list in insertion order. Each op
//! draws from the seed stream, and the context produced by one draw feeds the
//! next, so the outcome depends only on the starting context and the queue.
//! Results are written with copy-on-write [`set_at`], which keeps every
//! untouched subtree shared with the input state.
//!
//! # Examples
//!
//! ```rust
//! use tumbler::{context::Context, ops::Random, resolver::resolve, state::GameState};
//! use serde_json::json;
//!
//! let state = GameState::from_json(json!({"players": {"0": {"points": 100}}}));
//! let state = Random::d6(&state, "players.0.attackerDie");
//!
//! let (resolved, ctx) = resolve(&state, &Context::new("some_predetermined_seed")).unwrap();
//! assert_eq!(resolved.get("players.0.attackerDie").and_then(|v| v.as_i64()), Some(2));
//! assert!(!resolved.has_pending());
//! assert!(ctx.prng_state().is_some());
//! ```

use rustc_hash::FxHashMap;
use tracing::{debug, instrument, warn};

use crate::config::{ResolverConfig, UnknownOpPolicy};
use crate::context::Context;
use crate::errors::RandomError;
use crate::ops::{PendingOps, RandomOp};
use crate::path::{get_at, set_at};
use crate::state::GameState;
use crate::types::OpKind;
use crate::value::StateValue;

/// What a resolution pass did, for audit logs and replay checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveReport {
    /// Number of applied ops per kind.
    pub applied: FxHashMap<OpKind, usize>,
    /// Ops dropped under [`UnknownOpPolicy::Skip`], in queue order.
    pub skipped: Vec<RandomOp>,
    /// Fractions drawn from the seed stream.
    pub draws: u64,
}

impl ResolveReport {
    pub fn applied_count(&self, kind: &OpKind) -> usize {
        self.applied.get(kind).copied().unwrap_or(0)
    }

    pub fn total_applied(&self) -> usize {
        self.applied.values().sum()
    }
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub state: GameState,
    pub context: Context,
    pub report: ResolveReport,
}

/// Context threaded through one resolution pass.
struct Stream {
    ctx: Context,
    draws: u64,
}

impl Stream {
    fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            draws: 0,
        }
    }

    fn next(&mut self) -> f64 {
        let (ctx, fraction) = self.ctx.draw();
        self.ctx = ctx;
        self.draws += 1;
        fraction
    }
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve every pending op, returning the new state and context.
    pub fn resolve(
        &self,
        state: &GameState,
        ctx: &Context,
    ) -> Result<(GameState, Context), RandomError> {
        self.resolve_with_report(state, ctx)
            .map(|resolution| (resolution.state, resolution.context))
    }

    #[instrument(skip(self, state, ctx), fields(pending = state.pending().len()), err)]
    pub fn resolve_with_report(
        &self,
        state: &GameState,
        ctx: &Context,
    ) -> Result<Resolution, RandomError> {
        if state.pending().is_empty() {
            return Ok(Resolution {
                state: state.with_pending(PendingOps::default()),
                context: ctx.clone(),
                report: ResolveReport::default(),
            });
        }

        let mut data = state.data().clone();
        let mut stream = Stream::new(ctx);
        let mut report = ResolveReport::default();

        for op in state.pending() {
            match self.compute(&data, op, &mut stream)? {
                Some(value) => {
                    data = set_at(&data, &op.path, value)?;
                    *report.applied.entry(op.kind.clone()).or_default() += 1;
                    debug!(kind = %op.kind, path = %op.path, "applied random op");
                }
                None => {
                    warn!(kind = %op.kind, path = %op.path, "skipping unknown random op");
                    report.skipped.push(op.clone());
                }
            }
        }

        report.draws = stream.draws;
        debug!(draws = report.draws, applied = report.total_applied(), "resolution complete");
        Ok(Resolution {
            state: GameState::new(data),
            context: stream.ctx,
            report,
        })
    }

    /// Produce the value to write for `op`, or `None` when it is skipped.
    fn compute(
        &self,
        data: &StateValue,
        op: &RandomOp,
        stream: &mut Stream,
    ) -> Result<Option<StateValue>, RandomError> {
        match &op.kind {
            OpKind::Die => self.roll(op, stream).map(Some),
            OpKind::Number => Ok(Some(StateValue::from(stream.next()))),
            OpKind::Shuffle => shuffle(data, op, stream).map(Some),
            OpKind::Other(name) => match self.config.unknown_ops {
                UnknownOpPolicy::Skip => Ok(None),
                UnknownOpPolicy::Reject => Err(RandomError::UnknownOp {
                    kind: name.clone(),
                    path: op.path.to_string(),
                }),
            },
        }
    }

    fn roll(&self, op: &RandomOp, stream: &mut Stream) -> Result<StateValue, RandomError> {
        let spots = match op.args.first() {
            None => self.config.default_spots,
            Some(arg) => arg
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| invalid_argument(op, format!("spot count {arg} is not a u32")))?,
        };
        if spots == 0 {
            return Err(invalid_argument(op, "a die needs at least one spot".into()));
        }

        match op.args.get(1) {
            None => Ok(StateValue::from(roll_die(stream.next(), spots))),
            Some(arg) => {
                let count = arg
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| invalid_argument(op, format!("dice count {arg} is not a u32")))?;
                Ok(StateValue::array(
                    (0..count)
                        .map(|_| StateValue::from(roll_die(stream.next(), spots)))
                        .collect(),
                ))
            }
        }
    }
}

/// Resolve with the default configuration.
pub fn resolve(state: &GameState, ctx: &Context) -> Result<(GameState, Context), RandomError> {
    Resolver::default().resolve(state, ctx)
}

fn roll_die(fraction: f64, spots: u32) -> i64 {
    (fraction * f64::from(spots)).floor() as i64 + 1
}

/// Draw elements out of a shrinking pool; the last element fills each hole.
fn shuffle(data: &StateValue, op: &RandomOp, stream: &mut Stream) -> Result<StateValue, RandomError> {
    let items = match get_at(data, &op.path) {
        Some(StateValue::Array(items)) => items,
        other => {
            return Err(RandomError::InvalidShuffleTarget {
                path: op.path.to_string(),
                found: other.map_or("nothing", StateValue::kind_name),
            });
        }
    };

    let mut pool = items.to_vec();
    let mut shuffled = Vec::with_capacity(pool.len());
    while !pool.is_empty() {
        let pick = ((pool.len() as f64 * stream.next()) as usize).min(pool.len() - 1);
        shuffled.push(pool.swap_remove(pick));
    }
    Ok(StateValue::array(shuffled))
}

fn invalid_argument(op: &RandomOp, reason: String) -> RandomError {
    RandomError::InvalidOpArgument {
        kind: op.kind.to_string(),
        path: op.path.to_string(),
        reason,
    }
}
