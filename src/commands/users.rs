// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::users;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let ccy = sub.get_one::<String>("currency").unwrap();
            let user = users::create(conn, name, ccy)?;
            println!("Added user '{}' ({})", user.name, user.main_currency);
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for u in users::list(conn)? {
                data.push(vec![u.id.to_string(), u.name, u.main_currency]);
            }
            println!("{}", pretty_table(&["Id", "Name", "Main CCY"], data));
        }
        _ => {}
    }
    Ok(())
}
