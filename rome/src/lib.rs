//! Command line front-end for the Rome inliner. The modules are public so the
//! `xtask` crate can render completions and manpages from [`cli::Cli`], and so
//! the subcommands can be exercised from tests.
pub mod cli;
pub mod commands;
