// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `hash-password` command.

use std::io::{self, BufRead};

use crate::cli::HashPasswordArgs;
use crate::error::{BinError, BinResult};

/// Prints an Argon2 PHC hash suitable for `users[].password_hash`.
pub fn hash_password(args: HashPasswordArgs) -> BinResult<()> {
    let password = if args.stdin {
        read_password(io::stdin().lock())?
    } else {
        args.password
            .ok_or_else(|| BinError::input("no password given"))?
    };

    if password.is_empty() {
        return Err(BinError::input("password must not be empty"));
    }

    println!("{}", vms_core::hash_password(&password)?);
    Ok(())
}

/// Reads the first line, without its line ending.
fn read_password(mut reader: impl BufRead) -> BinResult<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
