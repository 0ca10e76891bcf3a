// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

mod cli;

fn main() -> anyhow::Result<()> {
    cli::entry::run()
}
