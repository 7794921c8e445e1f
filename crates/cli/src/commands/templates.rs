// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pipeforge templates` - list the built-in templates

use crate::{output, templates};

pub fn handle() -> i32 {
    println!("{}", output::header("Available templates"));
    for template in templates::TEMPLATES {
        println!("  {:<10} {}", template.name, output::muted(template.description));
    }
    0
}
