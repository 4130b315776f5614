// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `qr` command.

use campus_core::qr::{self, TextQrCodec};

use crate::cli::{Cli, QrArgs};
use crate::error::BinResult;

/// Executes the `qr` command to print an attendance payload.
pub fn qr(_cli: &Cli, args: QrArgs) -> BinResult<()> {
    let (_, json) = qr::generate(&TextQrCodec, &args.student_id, &args.school_id, args.sequence);
    println!("{}", json);
    Ok(())
}
