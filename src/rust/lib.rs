// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

#![deny(clippy::all)]

#[macro_use]
extern crate log;

pub mod future;
pub mod runtime;

pub use self::{
    future::{
        aggregate::{
            execute_all,
            run_all,
            wait_all,
        },
        Future,
    },
    runtime::fail::Fail,
};
