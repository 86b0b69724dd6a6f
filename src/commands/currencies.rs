// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::fx;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            let symbol = sub.get_one::<String>("symbol").unwrap();
            let ccy = fx::add_currency(conn, code, name, symbol)?;
            println!("Added currency {} ({})", ccy.code, ccy.symbol);
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for c in fx::list_currencies(conn)? {
                data.push(vec![c.code, c.name, c.symbol]);
            }
            println!("{}", pretty_table(&["Code", "Name", "Symbol"], data));
        }
        _ => {}
    }
    Ok(())
}
