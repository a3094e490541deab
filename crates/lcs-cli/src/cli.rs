use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lcs_types::Charset;

#[derive(Parser)]
#[command(
    name = "lcs",
    about = "Line config store — inspect and edit key=value configuration files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Charset used to read and write files
    #[arg(long, global = true, default_value = "UTF-8")]
    pub charset: Charset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ValueType {
    String,
    Byte,
    Short,
    Int,
    Long,
    Real,
    Bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print every entry of a file
    Show(ShowArgs),
    /// Read one property
    Get(GetArgs),
    /// Set one property and commit
    Set(SetArgs),
    /// Remove one property and commit
    Remove(RemoveArgs),
    /// Run the load / set / get / commit walkthrough against a file
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct GetArgs {
    pub file: PathBuf,
    pub key: String,
    /// Type the value is read as
    #[arg(long = "type", short = 't', default_value = "string")]
    pub value_type: ValueType,
    /// Printed when the key is absent
    #[arg(long)]
    pub default: Option<String>,
}

#[derive(Args)]
pub struct SetArgs {
    pub file: PathBuf,
    pub key: String,
    pub value: String,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub file: PathBuf,
    pub key: String,
}

#[derive(Args)]
pub struct DemoArgs {
    /// File the demo commits to
    pub file: PathBuf,
}
