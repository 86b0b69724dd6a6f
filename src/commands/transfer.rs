// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{transfers, users};
use crate::models::UserId;
use crate::utils::{id_for_account, parse_decimal};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let user = users::find_by_name(conn, m.get_one::<String>("user").unwrap())?;
    let from = m.get_one::<String>("from").unwrap();
    let to = m.get_one::<String>("to").unwrap();
    let amount = parse_decimal(m.get_one::<String>("amount").unwrap())?;

    let from_id = id_for_account(conn, user.id, from)?;
    let to_id = id_for_account(conn, user.id, to)?;
    transfers::transfer(conn, UserId(user.id), from_id, to_id, amount)?;
    println!("Transferred {} from '{}' to '{}'", amount, from, to);
    Ok(())
}
