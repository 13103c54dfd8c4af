// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for marquee.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`DomPresenter`]: renders page view models as DOM elements
//! - [`WebHost`]: `fetch`/`XMLHttpRequest` requests, `confirm()`, timers, and
//!   the three player kinds (video.js, Media Source Extensions, decode stub)
//! - [`Dispatcher`]: queues [`Input`](marquee_core::page::Input)s produced by
//!   browser callbacks and feeds them to the page one at a time
//! - [`ConsoleSink`]: a [`TraceSink`](marquee_core::trace::TraceSink) writing
//!   to the browser console
//!
//! [`mount`] wires all of them to a page root element.

#![no_std]

extern crate alloc;

mod config;
mod console;
mod decode_stub;
mod dispatch;
mod dom;
mod host;
mod http;
mod listener;
mod media_source;
mod player;
mod presenter;
mod timer;
mod videojs;

pub use config::{config_from_element, overlay_config};
pub use console::ConsoleSink;
pub use dispatch::{Dispatcher, Emitter, Handler};
pub use host::{PageDriver, WebHost, mount};
pub use marquee_core::backend::{Host, Presenter};
pub use player::WebPlayer;
pub use presenter::DomPresenter;
pub use timer::Timeout;
