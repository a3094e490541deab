use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use lcs_registry::Registry;
use lcs_store::ConfigStore;
use lcs_types::{Charset, Entry, StorageTarget};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let registry = Registry::new();
    let charset = cli.charset;
    let format = cli.format;
    match cli.command {
        Command::Show(args) => cmd_show(&registry, args, charset, format),
        Command::Get(args) => cmd_get(&registry, args, charset, format),
        Command::Set(args) => cmd_set(&registry, args, charset),
        Command::Remove(args) => cmd_remove(&registry, args, charset),
        Command::Demo(args) => cmd_demo(&registry, args, charset, format),
    }
}

fn cmd_show(
    registry: &Registry,
    args: ShowArgs,
    charset: Charset,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let store = registry.get_default();
    load_file(&store, &args.file, charset)?;
    print_entries(&store.list(), format)
}

fn cmd_get(
    registry: &Registry,
    args: GetArgs,
    charset: Charset,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let store = registry.get_default();
    load_file(&store, &args.file, charset)?;
    let value = read_typed(&store, &args.key, args.value_type, args.default.as_deref())?;
    match format {
        OutputFormat::Text => println!("{value}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "key": args.key, "value": value, "present": store.contains_key(&args.key) })
        ),
    }
    Ok(())
}

fn cmd_set(registry: &Registry, args: SetArgs, charset: Charset) -> anyhow::Result<()> {
    let store = open_for_edit(registry, &args.file, charset)?;
    store.set_property(&args.key, args.value.as_str());
    store
        .try_commit_sync()
        .with_context(|| format!("committing {}", args.file.display()))?;
    println!("{} Set {} = {}", "✓".green().bold(), args.key.bold(), args.value);
    Ok(())
}

fn cmd_remove(registry: &Registry, args: RemoveArgs, charset: Charset) -> anyhow::Result<()> {
    let store = open_for_edit(registry, &args.file, charset)?;
    if !store.remove_property(&args.key) {
        println!("{} is not set", args.key.bold());
        return Ok(());
    }
    store
        .try_commit_sync()
        .with_context(|| format!("committing {}", args.file.display()))?;
    println!("{} Removed {}", "✓".green().bold(), args.key.bold());
    Ok(())
}

fn cmd_demo(
    registry: &Registry,
    args: DemoArgs,
    charset: Charset,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let store = registry.get_default();

    if args.file.exists() {
        let ok = store.load(
            File::open(&args.file).with_context(|| format!("opening {}", args.file.display()))?,
            charset,
        );
        println!("{} load: {}", "→".cyan(), if ok { "ok".green() } else { "failed".red() });
        print_entries(&store.list(), format)?;
    }

    println!("{} setProperty", "→".cyan());
    store.set_property("name", "Roby");
    store.set_property("height", 173);
    store.set_property("weight", 63.5);
    store.set_property("sex", "men");
    store.set_property("age", 30i8);
    store.set_property("enable", true);
    print_entries(&store.list(), format)?;

    println!("{} getX", "→".cyan());
    println!("  name={}", store.get("name").unwrap_or_default());
    println!("  height={}", store.get_int("height", 0)?);
    println!("  weight={}", store.get_real("weight", 0.0)?);
    println!("  sex={}", store.get_string("sex", "women"));
    println!("  age={}", store.get_byte("age", 0)?);
    println!("  xxx={}", store.get_short("xxx", -1)?);
    println!("  yyy={}", store.get_long("yyy", 11_111_111)?);
    println!("  enable={}", store.get_bool("enable", false));

    println!("{} commit", "→".cyan());
    store.configure_storage(StorageTarget::writable(&args.file, charset));
    store.commit_sync();
    store.set_property("commitType", "async");
    store.commit_async();
    store.flush_async();

    let reread = registry.get_instance("demo_write");
    load_file(&reread, &args.file, charset)?;
    println!("{} reloaded as {}", "✓".green().bold(), "demo_write".yellow());
    print_entries(&reread.list(), format)
}

/// Load `path` into the default store and arm it to commit back there.
/// A missing file starts an empty document.
fn open_for_edit(
    registry: &Registry,
    path: &Path,
    charset: Charset,
) -> anyhow::Result<Arc<ConfigStore>> {
    let store = registry.get_default();
    if path.exists() {
        load_file(&store, path, charset)?;
    }
    store.configure_storage(StorageTarget::writable(path, charset));
    Ok(store)
}

fn load_file(store: &ConfigStore, path: &Path, charset: Charset) -> anyhow::Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    store
        .try_load(file, charset)
        .with_context(|| format!("loading {}", path.display()))?;
    Ok(())
}

fn read_typed(
    store: &ConfigStore,
    key: &str,
    value_type: ValueType,
    default: Option<&str>,
) -> anyhow::Result<String> {
    let value = match value_type {
        ValueType::String => store.get_string(key, default.unwrap_or("")),
        ValueType::Byte => store.get_byte(key, parse_default(default)?)?.to_string(),
        ValueType::Short => store.get_short(key, parse_default(default)?)?.to_string(),
        ValueType::Int => store.get_int(key, parse_default(default)?)?.to_string(),
        ValueType::Long => store.get_long(key, parse_default(default)?)?.to_string(),
        ValueType::Real => store.get_real(key, parse_default(default)?)?.to_string(),
        ValueType::Bool => store.get_bool(key, parse_default(default)?).to_string(),
    };
    Ok(value)
}

fn parse_default<T>(default: Option<&str>) -> anyhow::Result<T>
where
    T: FromStr + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match default {
        None => Ok(T::default()),
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid --default {raw:?}")),
    }
}

fn print_entries(entries: &[Entry], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entries)?),
        OutputFormat::Text => {
            for entry in entries {
                match entry {
                    Entry::Comment { text } => println!("  {}", text.dimmed()),
                    Entry::Property { key, value } => println!("  {} = {}", key.bold(), value),
                }
            }
        }
    }
    Ok(())
}
