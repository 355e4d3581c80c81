//! Command line interface for the asset bundler.
//!
//! Merges the config file with command line overrides, resolves sources and
//! builds one artifact per invocation.

mod args;

pub use args::Args;

use std::{num::NonZeroUsize, path::PathBuf, sync::Arc};

use crate::{
    bundler::{
        Bundler, CachePolicy, CommandTransform, ContentKind, Settings, SettingsBuilder, markup,
    },
    config::{AssetsConfig, BundleConfig, load_config},
    error::{CliError, Result},
    source,
};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    execute(Args::parse_args()).await
}

/// Runs one invocation with already-parsed arguments.
///
/// Prints the artifact name, or its tag with `--link`, to stdout.
pub async fn execute(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AssetsConfig::default(),
    };

    let settings = settings_from(&args, &config.bundle)?;
    let mut bundler = Bundler::new(settings);
    register_transforms(&mut bundler, &args, &config.bundle)?;

    let sources = collect_sources(&args, bundler.settings())?;
    log::info!(
        "Bundling {} source(s) as {} into {}",
        sources.len(),
        args.kind,
        bundler.settings().dist_root().display()
    );

    let bundler = Arc::new(bundler);
    let name = Arc::clone(&bundler)
        .build_files_async(args.kind.clone(), sources)
        .await?;

    if args.link {
        println!("{}", markup::tag_for(&args.kind, &bundler.artifact_url(&name)));
    } else {
        println!("{name}");
    }
    Ok(0)
}

fn settings_from(args: &Args, config: &BundleConfig) -> Result<Settings> {
    let dist = args
        .dist
        .clone()
        .or_else(|| config.dist_root.clone())
        .ok_or_else(|| CliError::MissingArgument {
            argument: "--dist".to_string(),
        })?;

    let mut builder = SettingsBuilder::new()
        .dist_root(dist)
        .reload_always(args.reload_always || config.reload_always.unwrap_or(false));

    if let Some(root) = args.resource_root.as_ref().or(config.resource_root.as_ref()) {
        builder = builder.resource_root(root);
    }
    if let Some(base) = args.url_base.as_ref().or(config.url_base.as_ref()) {
        builder = builder.url_base(base.as_str());
    }
    if let Some(capacity) = config.cache_capacity.and_then(NonZeroUsize::new) {
        builder = builder.cache_policy(CachePolicy::Lru(capacity));
    }

    Ok(builder.build()?)
}

/// `--transform` applies to the requested kind and wins over the config file.
fn register_transforms(bundler: &mut Bundler, args: &Args, config: &BundleConfig) -> Result<()> {
    if let Some(command) = &args.transform {
        let transform = CommandTransform::from_command_line(command)?;
        bundler.register_transform(&args.kind, Arc::new(transform))?;
    }

    for (kind, command) in &config.transforms {
        let kind = ContentKind::from_name(kind);
        if args.transform.is_some() && kind == args.kind {
            log::debug!("--transform overrides configured transform for {kind}");
            continue;
        }
        let transform = CommandTransform::from_command_line(command)?;
        bundler.register_transform(&kind, Arc::new(transform))?;
    }
    Ok(())
}

/// File lists first, then positional patterns, in the order given.
fn collect_sources(args: &Args, settings: &Settings) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for list in &args.file_lists {
        sources.extend(source::parse_file_list(list, settings.resource_root())?);
    }
    sources.extend(source::expand_patterns(
        settings.resource_root(),
        &args.patterns,
    )?);
    Ok(sources)
}
