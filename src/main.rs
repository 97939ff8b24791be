use anyhow::{Context, Result};
use calltrace::{
    cli::{Cli, OutputFormat},
    config::{self, TracerConfig},
    filter,
    json_output::JsonOutput,
    render::RenderOptions,
    script::Script,
    Runtime, Tracer,
};
use clap::Parser;
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Merge the optional config file with command-line overrides
fn build_config(args: &Cli) -> Result<TracerConfig> {
    let mut config = match &args.config {
        Some(path) => TracerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TracerConfig::default(),
    };

    if let Some(depth) = args.max_depth {
        config.set_max_depth(i64::from(depth));
    }

    config.extend_path_cuts(args.path_cuts.iter().flat_map(|s| filter::parse_list(s)));
    config.extend_path_filters(args.path_filters.iter().flat_map(|s| filter::parse_list(s)));

    if args.show_args {
        config.set_show_args(true);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let script = Script::from_file(&args.script)
        .with_context(|| format!("Failed to read event script {}", args.script.display()))?;
    config::replace(build_config(&args)?);

    let options = RenderOptions {
        color: args.format == OutputFormat::Text
            && args.color.enabled(std::io::stdout().is_terminal()),
    };
    let mut tracer = Tracer::with_registry(script.registry()).with_options(options);
    if args.format == OutputFormat::Json {
        tracer = tracer.quiet();
    }

    let mut rt = Runtime::new();
    let ((), history) = tracer.traced(&mut rt, |rt| script.replay(rt))?;

    if args.format == OutputFormat::Json {
        let config = config::snapshot();
        println!("{}", JsonOutput::new(&history, &config).to_json()?);
    }

    Ok(())
}
