// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use anyhow::Result;
use hc_adapters::HarvesterApi;

use crate::exit_error::ExitError;
use crate::output::{handle_list, OutputFormat};
use crate::table::{Column, Table};

/// `hc status-codes`: the backend's processing status code legend.
pub async fn handle<A: HarvesterApi>(api: &A, format: OutputFormat) -> Result<()> {
    let mut codes = api.status_codes().await.map_err(ExitError::from)?;
    codes.sort_by_key(|c| c.code);
    handle_list(format, &codes, "No status codes", |items, out| {
        let mut table = Table::new(vec![Column::right("CODE"), Column::left("STATUS")]);
        for c in items {
            table.row(vec![c.code.to_string(), c.status.clone()]);
        }
        table.render(out);
    })
}
