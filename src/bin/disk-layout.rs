use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use disk_layout::customizations::{check_mountpoints, parse_size};
use disk_layout::disk::{fstab, sfdisk};
use disk_layout::{BasePartitionTables, MountpointRequest, PartitionTable};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn usage() -> &'static str {
    "Usage:\n  disk-layout plan <arch> [--size SIZE] [--seed N] [--templates FILE] [MOUNT=SIZE ...]\n  disk-layout sfdisk <arch> [options] [MOUNT=SIZE ...]\n  disk-layout fstab <arch> [options] [MOUNT=SIZE ...]\n  disk-layout arches [--templates FILE]"
}

#[derive(Debug)]
struct PlanArgs {
    arch: String,
    size: u64,
    seed: u64,
    templates: Option<PathBuf>,
    requests: Vec<MountpointRequest>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [cmd, rest @ ..] if cmd == "plan" => {
            let table = plan(&parse_plan_args(rest)?)?;
            let json = serde_json::to_string_pretty(&table).context("serializing layout")?;
            println!("{json}");
            Ok(())
        }
        [cmd, rest @ ..] if cmd == "sfdisk" => {
            let table = plan(&parse_plan_args(rest)?)?;
            print!("{}", sfdisk::script(&table));
            Ok(())
        }
        [cmd, rest @ ..] if cmd == "fstab" => {
            let table = plan(&parse_plan_args(rest)?)?;
            print!("{}", fstab::render(&table)?);
            Ok(())
        }
        [cmd] if cmd == "arches" => list_arches(None),
        [cmd, flag, path] if cmd == "arches" && flag == "--templates" => {
            list_arches(Some(Path::new(path)))
        }
        _ => bail!(usage()),
    }
}

fn load_templates(path: Option<&Path>) -> Result<BasePartitionTables> {
    match path {
        Some(path) => BasePartitionTables::load(path),
        None => Ok(BasePartitionTables::builtin()),
    }
}

fn list_arches(path: Option<&Path>) -> Result<()> {
    let templates = load_templates(path)?;
    for arch in templates.arches() {
        let table = templates.get(arch).context("listing templates")?;
        println!(
            "{arch}: {} ({} partitions)",
            table.table_type,
            table.partitions.len()
        );
    }
    Ok(())
}

fn plan(args: &PlanArgs) -> Result<PartitionTable> {
    check_mountpoints(&args.requests)?;
    let templates = load_templates(args.templates.as_deref())?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    let table = templates
        .partition_table(&args.arch, &args.requests, args.size, &mut rng)
        .with_context(|| format!("building partition table for '{}'", args.arch))?;

    eprintln!(
        "  {} {} table, {} MiB, {} partitions",
        args.arch,
        table.table_type,
        table.size / 1024 / 1024,
        table.partitions.len()
    );
    Ok(table)
}

fn parse_plan_args(args: &[String]) -> Result<PlanArgs> {
    let Some((arch, rest)) = args.split_first() else {
        bail!(usage());
    };
    if arch.starts_with('-') {
        bail!("expected an architecture before options, got '{}'", arch);
    }

    let mut parsed = PlanArgs {
        arch: arch.clone(),
        size: 0,
        seed: 0,
        templates: None,
        requests: Vec::new(),
    };

    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--size" => {
                let value = option_value(&mut iter, "--size")?;
                parsed.size = parse_size(value).context("parsing --size")?;
            }
            "--seed" => {
                let value = option_value(&mut iter, "--seed")?;
                parsed.seed = value
                    .parse()
                    .with_context(|| format!("parsing --seed '{}'", value))?;
            }
            "--templates" => {
                parsed.templates = Some(PathBuf::from(option_value(&mut iter, "--templates")?));
            }
            other if other.starts_with("--") => bail!("unknown option '{}'\n{}", other, usage()),
            request => parsed.requests.push(
                MountpointRequest::parse(request)
                    .with_context(|| format!("parsing mountpoint request '{}'", request))?,
            ),
        }
    }

    Ok(parsed)
}

fn option_value<'a>(iter: &mut std::slice::Iter<'a, String>, flag: &str) -> Result<&'a str> {
    match iter.next() {
        Some(value) => Ok(value.as_str()),
        None => bail!("{} requires a value", flag),
    }
}
