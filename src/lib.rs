// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! # lenses_cli
//!
//! Configuration layer of the Lenses command-line client: named contexts,
//! their authentication, and the JSON/YAML files they are stored in.

#![deny(
    nonstandard_style,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    while_true,
    missing_debug_implementations,
    trivial_numeric_casts,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    unused_extern_crates,
    unused_import_braces
)]

pub mod config;
pub mod error;
