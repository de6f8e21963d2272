// src/core/mod.rs — Request lifecycle: admission, dedup, dispatch, fallback

pub mod admission;
pub mod dispatch;
pub mod fallback;
pub mod ledger;
