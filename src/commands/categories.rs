// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{categories, users};
use crate::models::UserId;
use crate::utils::{id_for_category, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
            let name = sub.get_one::<String>("name").unwrap();
            let group = sub.get_one::<String>("group").map(|s| s.as_str());
            categories::create(conn, UserId(user.id), name, group)?;
            println!("Added category '{}'", name);
        }
        Some(("list", sub)) => {
            let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
            let mut data = Vec::new();
            for c in categories::list(conn, UserId(user.id))? {
                data.push(vec![
                    c.id.to_string(),
                    c.name,
                    c.group.unwrap_or_default(),
                ]);
            }
            println!("{}", pretty_table(&["Id", "Category", "Group"], data));
        }
        Some(("rm", sub)) => {
            let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
            let name = sub.get_one::<String>("name").unwrap();
            let id = id_for_category(conn, user.id, name)?;
            categories::delete(conn, UserId(user.id), id)?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
