use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::json;
use talk_store::{read_media_file, write_media_file, ProfileStore, StoreConfig, TalkStore};
use talk_types::{Clip, Record};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let config = store_config(&cli)?;
    match cli.command {
        Command::Create(args) => cmd_create(&open_store(config)?, args, format),
        Command::Show(args) => cmd_show(&open_store(config)?, &args.name, format),
        Command::List => cmd_list(&open_store(config)?, format),
        Command::Verify(args) => cmd_verify(config, &args.name, format),
        Command::Delete(args) => cmd_delete(&open_store(config)?, &args.name, format),
        Command::Export(args) => cmd_export(&open_store(config)?, args),
    }
}

/// `--dir` beats the config file's `root`, which beats `$TALK_HOME`.
fn store_config(cli: &Cli) -> anyhow::Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if let Some(dir) = &cli.dir {
        config.root = Some(dir.clone());
    }
    Ok(config)
}

fn open_store(config: StoreConfig) -> anyhow::Result<TalkStore> {
    let resolver = config.resolver();
    Ok(TalkStore::open(resolver.as_ref(), config)?)
}

fn cmd_create(store: &TalkStore, args: CreateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let clips = args
        .clips
        .iter()
        .map(|spec| -> anyhow::Result<Clip> {
            Ok(Clip::new(read_media_file(&spec.path)?, spec.weight))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let images = args
        .images
        .iter()
        .map(|path| read_media_file(path))
        .collect::<Result<Vec<_>, _>>()?;
    let record = store.create(&args.name, clips, images, args.tags)?;
    match format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Text => {
            println!("{} Saved {}", "✓".green().bold(), record.name.bold());
            print_details(&record);
        }
    }
    Ok(())
}

fn cmd_show(store: &TalkStore, name: &str, format: OutputFormat) -> anyhow::Result<()> {
    let record = store.load(name)?;
    match format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Text => {
            println!("{}", record.name.bold());
            print_details(&record);
        }
    }
    Ok(())
}

fn cmd_list(store: &TalkStore, format: OutputFormat) -> anyhow::Result<()> {
    let names = store.list()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Text if names.is_empty() => {
            println!("No profiles in {}", store.root().display());
        }
        OutputFormat::Text => {
            for name in &names {
                println!("{name}");
            }
        }
    }
    Ok(())
}

fn cmd_verify(mut config: StoreConfig, name: &str, format: OutputFormat) -> anyhow::Result<()> {
    // Verification is forced on whatever the config says.
    config.verify_checksums = true;
    let store = open_store(config)?;

    let record = store
        .load(name)
        .with_context(|| format!("verification failed for {name}"))?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "name": record.name,
                "version": record.format_version.tag(),
                "checksum": record.checksum.map(|c| c.to_hex()),
                "ok": true,
            }))?
        ),
        OutputFormat::Text => match record.checksum {
            Some(checksum) => println!(
                "{} {} ({}, checksum {})",
                "✓".green().bold(),
                record.name.bold(),
                record.format_version,
                checksum.short_hex().cyan()
            ),
            None => println!(
                "{} {} ({}, legacy format without checksum)",
                "✓".green().bold(),
                record.name.bold(),
                record.format_version
            ),
        },
    }
    Ok(())
}

fn cmd_delete(store: &TalkStore, name: &str, format: OutputFormat) -> anyhow::Result<()> {
    let deleted = store.delete(name)?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "name": name, "deleted": deleted }))?
        ),
        OutputFormat::Text if deleted => println!("Deleted {}", name.yellow()),
        OutputFormat::Text => println!("No profile named {}", name.yellow()),
    }
    Ok(())
}

fn cmd_export(store: &TalkStore, args: ExportArgs) -> anyhow::Result<()> {
    let record = store.load(&args.name)?;
    let Some(clip) = record.clips.get(args.clip) else {
        bail!(
            "{} has {} clip(s); index {} is out of range",
            record.name,
            record.clip_count(),
            args.clip
        );
    };
    write_media_file(&args.out, &clip.audio)?;
    println!(
        "{} Wrote clip {} ({} bytes) to {}",
        "✓".green().bold(),
        args.clip,
        clip.audio.len(),
        args.out.display()
    );
    Ok(())
}

fn print_json(record: &Record) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&record.summary())?);
    Ok(())
}

fn print_details(record: &Record) {
    println!("  Format:   {}", record.format_version);
    if let Some(id) = record.id {
        println!("  Id:       {}", id.to_string().cyan());
    }
    if let Some(created) = record.created_at {
        println!("  Created:  {created}");
    }
    if let Some(modified) = record.modified_at {
        println!("  Modified: {modified}");
    }
    for (i, clip) in record.clips.iter().enumerate() {
        println!(
            "  Clip {i}:   {} bytes, weight {}",
            clip.audio.len(),
            clip.weight.to_string().yellow()
        );
    }
    for (i, image) in record.images.iter().enumerate() {
        println!("  Image {i}:  {} bytes", image.len());
    }
    if !record.tags.is_empty() {
        println!("  Tags:     {}", record.tags.join(", "));
    }
    if let Some(checksum) = record.checksum {
        println!("  Checksum: {}", checksum.to_hex().dimmed());
    }
}
