// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core model and playback fallback controller for a browser movie library.
//!
//! `marquee_core` holds every decision the movie library page makes: it
//! validates endpoint payloads, orders and classifies movie records, drives
//! the per-card playback strategy state machine, and owns the registry of live
//! player handles. It is `no_std` compatible (with `alloc`) and never touches
//! a browser API directly; platform backends implement the [`backend::Host`]
//! and [`backend::Presenter`] traits and feed browser callbacks back in as
//! [`page::Input`] values.
//!
//! # Architecture
//!
//! ```text
//!   browser callback (click, fetch, XHR, timer, media event)
//!       │
//!       ▼
//!   Input ──► Page::handle() ──► Host (requests, players, timers)
//!                 │                   │
//!                 │                   └─► Input (completions, signals)
//!                 ▼
//!             Presenter (library, stage, panel, notice, upload views)
//! ```
//!
//! **[`movie`]** — Server-supplied movie records and their derived fields.
//!
//! **[`api`]** — Endpoint schemas, reply validation, and the
//! [`ApiError`](error::ApiError) taxonomy they surface.
//!
//! **[`error`]** — Request and playback error types.
//!
//! **[`config`]** — Page configuration presets and endpoint URLs.
//!
//! **[`card`]** — Card keys, playback-path classification, and the typed card
//! view models the presenter renders.
//!
//! **[`strategy`]** — The per-card playback strategy state machine.
//!
//! **[`registry`]** — Generation-stamped registry of live player handles with
//! dispose-then-store replacement.
//!
//! **[`player`]** — Launch descriptions, player options, and player signals.
//!
//! **[`placard`]** — Text layout for the decode-stub canvas.
//!
//! **[`upload`]** / **[`notice`]** — Upload progress and the transient
//! notice slot.
//!
//! **[`backend`]** — [`Host`](backend::Host) and
//! [`Presenter`](backend::Presenter), the traits a platform implements.
//!
//! **[`page`]** — The page controller that ties everything together.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and the events the
//! controller emits.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod api;
pub mod backend;
pub mod card;
pub mod config;
pub mod error;
pub mod movie;
pub mod notice;
pub mod page;
pub mod placard;
pub mod player;
pub mod registry;
pub mod strategy;
pub mod trace;
pub mod upload;
