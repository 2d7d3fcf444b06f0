//! # Tumbler: deterministic, replayable randomness for turn-based game state
//!
//! Game logic asks for random outcomes (dice, fractions, shuffles) by
//! *queueing* them against an immutable state. The host later *resolves* the
//! queue once per turn with the authoritative seed context. Resolution is a
//! pure function of `(state, context)`, so the same inputs always give the
//! same outcome, which is what replays, rollbacks and lock-step networking
//! need.
//!
//! ## Core Concepts
//!
//! - **Context**: seed plus generator position; every draw returns a new one
//! - **Queue**: [`ops::Random`] helpers append pending ops to a [`state::GameState`]
//! - **Resolver**: drains the queue in order and writes results copy-on-write
//! - **StateValue**: structurally shared JSON-like tree; untouched subtrees
//!   keep their identity across resolution
//!
//! ## Quick Start
//!
//! ```
//! use tumbler::{context::Context, ops::Random, resolver::resolve, state::GameState};
//! use serde_json::json;
//!
//! let state = GameState::from_json(json!({
//!     "players": {"0": {"hp": 20}, "1": {"hp": 14}}
//! }));
//!
//! // During the move: queue, don't roll.
//! let state = Random::d20(&state, "players.0.savingThrow");
//! let state = Random::number(&state, "luck");
//!
//! // At the end of the turn: resolve with the persisted context.
//! let ctx = Context::new("some_predetermined_seed");
//! let (resolved, next_ctx) = resolve(&state, &ctx).unwrap();
//!
//! assert_eq!(resolved.get("players.0.savingThrow").and_then(|v| v.as_i64()), Some(5));
//! assert!(resolved.get("players.1").unwrap().ptr_eq(state.get("players.1").unwrap()));
//! assert_ne!(next_ctx, ctx);
//! ```
//!
//! ## Error Handling
//!
//! Queueing and drawing never fail. Resolution returns
//! [`errors::RandomError`], which carries `miette` diagnostics:
//!
//! ```
//! use tumbler::{context::Context, errors::RandomError, ops::Random, resolver::resolve, state::GameState};
//! use serde_json::json;
//!
//! let state = Random::shuffle(&GameState::from_json(json!({"deck": 3})), "deck");
//! let err = resolve(&state, &Context::new(1)).unwrap_err();
//! assert!(matches!(err, RandomError::InvalidShuffleTarget { found: "number", .. }));
//! ```
//!
//! ## Module Guide
//!
//! - [`context`] - Seeds and the immutable stream position
//! - [`rng`] - The Alea generator behind the stream
//! - [`ops`] - Queue helpers and pending-op descriptors
//! - [`resolver`] - Draining the queue into a new state
//! - [`state`] - Public data plus the pending side channel
//! - [`value`] - Structurally shared state tree
//! - [`path`] - Dotted paths and copy-on-write writes
//! - [`config`] - Resolver configuration

pub mod config;
pub mod context;
pub mod errors;
pub mod ops;
pub mod path;
pub mod resolver;
pub mod rng;
pub mod state;
pub mod types;
pub mod utils;
pub mod value;

pub use context::{Context, Seed};
pub use errors::RandomError;
pub use ops::Random;
pub use resolver::{Resolver, resolve};
pub use state::GameState;
