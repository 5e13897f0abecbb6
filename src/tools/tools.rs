mod assemble_quest;
use assemble_quest::assemble_quest;
mod disassemble_quest;
use disassemble_quest::disassemble_quest;
mod show_episode;
use show_episode::show_episode;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qst_rs::Build;

/// Disassemble, assemble and inspect compiled quest scripts
#[derive(Clone, Debug, Parser)]
struct Args {
    #[command(subcommand)]
    operation: Operation,
}

#[derive(Clone, Debug, Subcommand)]
enum Operation {
    /// Disassemble a compiled quest into a textual listing
    Disassemble(DisassembleArgs),
    /// Assemble a textual listing into a compiled quest
    Assemble(AssembleArgs),
    /// Report which episode a compiled quest targets
    Episode(EpisodeArgs),
}

fn parse_build(name: &str) -> Result<Build, String> {
    Build::from_name(name).map_err(|err| format!("{err:#}"))
}

#[derive(Clone, Debug, Parser)]
struct DisassembleArgs {
    /// input quest binary
    input: PathBuf,
    /// output listing, stdout if not given
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// build the quest was compiled for, e.g. BB_V4
    #[arg(short = 'v', long = "version", value_parser = parse_build)]
    version: Build,
    /// override the header language byte
    #[arg(short, long)]
    language: Option<u8>,
    /// emit offsets, hex columns and data dumps instead of
    /// round-trippable source
    #[arg(long)]
    annotated: bool,
    /// prefer the alternate qedit mnemonics
    #[arg(long)]
    qedit_names: bool,
}

#[derive(Clone, Debug, Parser)]
struct AssembleArgs {
    /// input listing
    input: PathBuf,
    /// output quest binary
    output: PathBuf,
    /// target build, overrides the .version directive
    #[arg(short = 'v', long = "version", value_parser = parse_build)]
    version: Option<Build>,
    /// directory searched by .include_bin / .include_native
    #[arg(short, long)]
    include_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Parser)]
struct EpisodeArgs {
    /// input quest binary
    input: PathBuf,
    /// build the quest was compiled for, e.g. BB_V4
    #[arg(short = 'v', long = "version", value_parser = parse_build)]
    version: Build,
    /// override the header language byte
    #[arg(short, long)]
    language: Option<u8>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    match &args.operation {
        Operation::Disassemble(args) => disassemble_quest(args),
        Operation::Assemble(args) => assemble_quest(args),
        Operation::Episode(args) => show_episode(args),
    }
}
